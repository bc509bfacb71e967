//! Test utilities for interpreter testing.
