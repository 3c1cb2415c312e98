//! # calcstack testkit
//!
//! Testing utilities for calcstack.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Demo calculations**: `Add`, `Subtract`, `MyFirstStack`, `NestedStack`
//! - **Golden vectors**: known inputs with expected outputs for every demo
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: a kernel with every demo defined
//!
//! ## Test Fixtures
//!
//! ```rust
//! use calcstack_testkit::fixtures::TestFixture;
//! use calcstack_testkit::calculations::InputModel;
//!
//! let fixture = TestFixture::deterministic();
//! let response = fixture.first_stack.execute(&InputModel::new(10.0, 3.0)).unwrap();
//! assert_eq!(response.success().unwrap().output.z, 5.0);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use calcstack_testkit::generators::accepted_input;
//!
//! proptest! {
//!     #[test]
//!     fn add_sums(input in accepted_input()) {
//!         let response = fixture.add.execute(&input).unwrap();
//!         prop_assert_eq!(response.success().unwrap().output.z, input.x + input.y);
//!     }
//! }
//! ```

pub mod calculations;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use calculations::{Add, InputModel, MyFirstStack, NestedStack, OutputModel, Repeated, Subtract};
pub use fixtures::{init_tracing, TestFixture, FIXTURE_SEED};
pub use vectors::{all_vectors, GoldenVector};
