pub mod access;
pub mod auth;
pub mod progress;
pub mod webhook;
