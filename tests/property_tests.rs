// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties that must hold
//! for all valid inputs to the version ordering, since that ordering is
//! the sole input to promotion and rollback scope selection.

mod property;
