pub mod access;
pub mod authcode;
pub mod notification;
pub mod progress;
pub mod purchase;
pub mod session;
