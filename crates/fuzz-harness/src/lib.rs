//! Beam Assignment Fuzz Harness
//!
//! Property-based testing strategies for user and satellite layouts.
//! Strategies yield plain `nalgebra` vectors so any crate in the workspace can
//! consume them without a dependency cycle.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(layout in scenario(1..20, 1..4)) {
//!         prop_assert!(!layout.users.is_empty());
//!     }
//! }
//! ```

pub mod generators;

pub mod prelude {
    pub use crate::generators::*;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
