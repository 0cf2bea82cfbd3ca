//! Integration test suite for the memory substrate
//!
//! This crate holds tests that cross component boundaries: the garbage
//! collector managing objects that hold buffer handles, and several views
//! sharing one buffer.

/// Re-export components for test convenience
pub mod components {
    pub use binary_data;
    pub use core_types;
    pub use memory_manager;
}
