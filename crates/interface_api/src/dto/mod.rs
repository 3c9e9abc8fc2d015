//! Request and response bodies

pub mod auth;
pub mod claims;
pub mod hr;
