pub mod api;
pub mod notification;
pub mod push;
