//! API middleware stack.

pub mod audit;
pub mod auth;
