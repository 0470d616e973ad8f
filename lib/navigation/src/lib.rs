//! Route guarding and navigation for the cryptofolio application.
//!
//! This crate provides:
//! - `RouteAccess`: the static per-route authentication requirement
//! - `decide`: the pure guard function mapping a session snapshot and a
//!   route requirement to a decision
//! - `NavigationIntent`: the originally requested location, preserved
//!   across a login redirect
//! - `NavigationController`: applies guard decisions to an actual location
//!
//! # Guard Model
//!
//! The guard is stateless between evaluations: every decision derives
//! solely from the current session snapshot and the route's requirement.
//! While the session is loading no redirect ever fires; the pending
//! request parks in the controller and is re-evaluated when the session
//! changes.

pub mod controller;
pub mod guard;
pub mod intent;
pub mod route;

// Re-export main types at crate root
pub use controller::{NavigationController, NavigationOutcome};
pub use guard::{GuardDecision, decide};
pub use intent::NavigationIntent;
pub use route::{RouteAccess, RouteTable};
