//! Reusable UI components

pub mod alert;
pub mod prompt;
pub mod toggle;
