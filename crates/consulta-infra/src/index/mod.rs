//! Vector index persistence.

pub mod store;
