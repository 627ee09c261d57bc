//! Unlatch TUI Library
//!
//! Terminal front end for the unlatch sign-in gate: an authenticator screen,
//! a stand-in for the platform prompt, and the notice alerts.

pub mod app;
pub mod ui;

pub use app::App;
