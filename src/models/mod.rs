mod subscriber;

pub use subscriber::{StoreSubscriberError, Subscriber};
