//! Session management for the cryptofolio application.
//!
//! This crate provides:
//! - The `Session` state container (`user`, `loading`, `auth_error`)
//! - The `SessionManager`, the single authority over session mutations
//! - The `IdentityProvider` trait boundary with simulated and HTTP-backed
//!   implementations
//! - OAuth broker configuration and PKCE login initiation
//! - Caller-side form validation for sign-in and sign-up
//!
//! # State Model
//!
//! A single `Session` value is shared process-wide through a
//! `tokio::sync::watch` channel. The `SessionManager` owns the sending half;
//! every other component holds a receiver and reads snapshots. Only the
//! manager mutates the session.
//!
//! # Example
//!
//! ```no_run
//! use cryptofolio_session::{AuthOutcome, SessionManager, provider::SimulatedProvider};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let provider = Arc::new(SimulatedProvider::with_demo_account());
//! let manager = SessionManager::new(provider);
//! manager.initialize().await;
//!
//! match manager.sign_in("demo@cryptofolio.com", "demo123").await {
//!     AuthOutcome::Granted(user) => println!("welcome {}", user.email()),
//!     AuthOutcome::Denied { message } => println!("rejected: {message}"),
//! }
//! # }
//! ```

pub mod error;
pub mod manager;
pub mod oauth;
pub mod profile;
pub mod provider;
pub mod session;
pub mod user;
pub mod validate;

// Re-export main types at crate root
pub use error::{MIN_PASSWORD_LEN, ProviderError, ValidationError};
pub use manager::{OAuthSignIn, SessionManager};
pub use oauth::{CallbackData, LoginInitiation, OAuthConfig, OAuthConfigBuilder};
pub use profile::{NotificationPreferences, UserProfile};
pub use provider::{
    AuthOutcome, BrokerSignIn, HttpIdentityProvider, IdentityProvider, ProviderEvent,
    SimulatedProvider,
};
pub use session::Session;
pub use user::User;
pub use validate::{SignInForm, SignUpForm};
