//! TLE Forge Fuzz Harness
//!
//! Property-based testing infrastructure for the forger: proptest strategies
//! for orbital inputs, the property checks every forged record must pass, a
//! runner that counts passes and failures, and CI-friendly reports.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(params in orbital_parameters()) {
//!         prop_assert!(params.eccentricity < 0.1);
//!     }
//! }
//! ```

pub mod generators;
pub mod properties;
pub mod reports;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::properties::*;
    pub use crate::runner::{FuzzConfig, FuzzResult, FuzzRunner};
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
