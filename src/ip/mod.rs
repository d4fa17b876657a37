//! IP address space management.
//!
//! - `allocator.rs`: hands out non-overlapping subnets of a requested prefix
//!   length from the request's base block.
//! - `registry.rs`: records every allocation with the purpose it serves, for
//!   reporting and overlap auditing.
//!
//! All state is owned per generation request; nothing here touches process
//! globals, so concurrent requests never interfere.

pub mod allocator;
pub mod registry;

pub use allocator::SubnetAllocator;
pub use registry::{SubnetPurpose, SubnetRecord, SubnetRegistry};
