mod new_subscriber;
mod news_article;
mod resource_id;
mod subscriber_email;

pub use new_subscriber::NewSubscriber;
pub use news_article::{NewsArticle, NewsSource};
pub use resource_id::ResourceId;
pub use subscriber_email::SubscriberEmail;
