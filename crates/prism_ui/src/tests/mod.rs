//! Integration tests for the input-to-value pipeline.
//!
//! These drive whole components through realistic event sequences and check
//! the geometry resolver's properties over generated inputs.

mod config_tests;
