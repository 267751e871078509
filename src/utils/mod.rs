//! Shared constants and unit conversions

pub mod constants;
