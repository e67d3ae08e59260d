pub mod payment_event;
pub mod repository;
pub mod types;
