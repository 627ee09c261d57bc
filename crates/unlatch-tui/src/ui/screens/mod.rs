//! Screen modules for different views

pub mod authenticator;
