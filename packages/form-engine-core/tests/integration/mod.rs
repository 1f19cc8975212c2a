//! Integration test suite for the form engine.
//!
//! 1. Submission scenarios across the validation engine and pipeline
//! 2. Operator editing workflow from draft to rendered form

pub mod editing_tests;
pub mod submission_tests;
