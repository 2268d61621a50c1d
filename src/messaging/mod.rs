pub mod dispatch;
pub mod templates;
