//! Terrastream - chunk requirement scheduling for streamed terrain
//!
//! Tracks moving observers and periodically ranks which chunks of an
//! infinite world should exist, and at what detail. Generation, loading and
//! eviction belong to the caller; this crate only produces the list.

pub mod core;
pub mod streaming;
