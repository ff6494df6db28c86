//! Property-based tests for backend-resilience.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across the building blocks.

pub mod queue;
