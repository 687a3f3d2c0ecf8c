//! Format implementations
//!
//! This module contains all format implementations that convert between
//! [`LoomTree`](crate::tree::LoomTree) and their text representations.

pub mod common;
pub mod flatmap;
pub mod graph;
pub mod nested;
pub mod treeviz;

pub use flatmap::FlatMapFormat;
pub use graph::GraphFormat;
pub use nested::NestedFormat;
pub use treeviz::TreevizFormat;
