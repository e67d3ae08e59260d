//! Session credential types shared by the academy HTTP surface.
//!
//! Provides the session cookie builders and the `SessionToken` extractor.

pub mod cookie;
pub mod credential;
