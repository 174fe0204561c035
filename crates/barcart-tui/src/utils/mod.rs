//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{fit_field, truncate_string};
