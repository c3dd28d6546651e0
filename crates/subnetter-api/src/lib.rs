//! # Subnetter API
//!
//! CloudFormation adapter for Subnetter.
//! This crate lists stacks through the AWS SDK and wires the core allocator
//! and status normalizer into a single high-level interface.

pub mod client;
pub mod errors;
pub mod sdk;

// Re-export common types for convenience
pub use client::*;
pub use errors::*;
pub use sdk::*;

// Re-export core types that API consumers will need
pub use subnetter_core::{AddressBlock, AllocationError, LifecycleState, StackSummary, SubBlock};
