pub mod dispatch;
pub mod subscribe;
