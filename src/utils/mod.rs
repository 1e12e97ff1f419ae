//! Utility modules shared across the publisher.

pub mod exec;
pub mod path;
