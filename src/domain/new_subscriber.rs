use crate::domain::SubscriberEmail;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct NewSubscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}

impl NewSubscriber {
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            subscribed_at: Utc::now(),
        }
    }
}
