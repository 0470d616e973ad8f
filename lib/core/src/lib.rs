//! Core domain types for the cryptofolio session layer.
//!
//! This crate provides the foundational identifier types shared by the
//! session-management and navigation crates.

pub mod id;

pub use id::{ParseIdError, UserId};
