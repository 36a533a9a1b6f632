//! # Mockyard Support
//!
//! Shared utilities for the mockyard workspace.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - Type-name helpers shared between mockyard crates

pub mod rendering;
