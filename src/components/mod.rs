//! Reusable view components.

pub mod backdrop;
