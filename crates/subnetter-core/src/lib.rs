//! # Subnetter Core
//!
//! Core domain logic for application network allocation.
//!
//! This crate contains pure business logic with no I/O dependencies:
//! - Address types (base network, application blocks, sub-blocks)
//! - Next-free-block allocation over an injected stack listing
//! - Block division into /27 placement ranges
//! - Stack status normalization
//!
//! ## Design Principles
//!
//! - **Injected collaborators**: stack listing and diagnostics are traits,
//!   never global clients
//! - **Derived state**: allocations are read back from stack tags on every
//!   call, nothing is cached
//! - **Deterministic**: the lowest free block always wins for a given snapshot

pub mod allocation;
pub mod errors;
pub mod models;
pub mod status;

// Re-export commonly used types
pub use allocation::{
    divide_block, in_use_blocks, AddressPool, Allocator, StackLister, MAX_DIVISIONS, POOL_SIZE,
};
pub use errors::{AllocationError, CoreError, Result};
pub use models::{
    AddressBlock, AllocationRecord, BaseNetwork, LifecycleState, StackSummary, SubBlock,
};
pub use status::{normalize, DiagnosticSink, LogSink, StatusNormalizer};
