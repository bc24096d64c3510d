//! Pegdex End-to-End Test Infrastructure
//!
//! Integration tests for the full classify, extract, resolve and correlate
//! flow live under `tests/`:
//!
//! - `e2e_pipeline`: batch files through the CLI library, cache persistence
//! - `proptest_properties`: classifier thresholds, similarity, tokens and
//!   geometry over arbitrary inputs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pegdex-tests
//! ```

pub mod fixtures;
