pub mod health_check;
pub mod matches;
pub mod news;
pub mod newsletter;
pub mod players;
pub mod teams;
