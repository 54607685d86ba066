//! Media stream inventory.
//!
//! This module turns the prober's raw JSON report into typed stream
//! descriptors that the planner consumes. It performs no I/O of its own; the
//! external prober lives in [`crate::external`].

pub mod inventory;
pub mod stream;

pub use inventory::{Inventory, parse_streams};
pub use stream::{CodecType, StreamDescriptor};
