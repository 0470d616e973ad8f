//! Runnable wiring for the cryptofolio session core.
//!
//! Builds the identity provider selected by configuration, stands up the
//! session manager and navigation controller, and walks the standard flow:
//! request the dashboard unauthenticated, bounce through login, sign in,
//! and land back on the originally requested view.

mod config;

use std::sync::Arc;

use cryptofolio_navigation::{NavigationController, RouteTable};
use cryptofolio_session::{
    AuthOutcome, HttpIdentityProvider, IdentityProvider, SessionManager, SimulatedProvider,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let provider: Arc<dyn IdentityProvider> = match &config.auth_service_url {
        Some(url) => {
            tracing::info!(url = %url, "using backend auth service");
            let mut provider = HttpIdentityProvider::new(url.clone());
            if let Some(oauth) = config.oauth.clone() {
                provider = provider.with_oauth_config(oauth);
            }
            Arc::new(provider)
        }
        None => {
            tracing::info!("no auth service configured, using simulated provider");
            let mut provider = SimulatedProvider::with_demo_account();
            if let Some(oauth) = config.oauth.clone() {
                provider = provider.with_oauth_config(oauth);
            }
            Arc::new(provider)
        }
    };

    let manager = SessionManager::new(provider);
    let _watcher = manager.spawn_revocation_watcher();

    let table = RouteTable::cryptofolio();
    let login_path = table.login_path().to_string();
    let mut controller = NavigationController::new(table, manager.subscribe());

    // Boot: the session is loading, so the first request parks.
    let outcome = controller.navigate("/portfolio-dashboard");
    tracing::info!(?outcome, location = controller.location(), "requested dashboard");

    manager.initialize().await;
    let outcome = controller.refresh();
    tracing::info!(?outcome, location = controller.location(), "session settled");

    if controller.location() == login_path {
        match manager.sign_in(&config.demo.email, &config.demo.password).await {
            AuthOutcome::Granted(user) => {
                tracing::info!(user = %user.id(), email = user.email(), "signed in");
            }
            AuthOutcome::Denied { message } => {
                tracing::error!(message = %message, "sign-in rejected");
                return;
            }
        }

        let outcome = controller.continue_after_sign_in();
        tracing::info!(?outcome, location = controller.location(), "resolved intent");
    }

    tracing::info!(location = controller.location(), "navigation settled");

    manager.sign_out().await;
    tracing::info!(
        authenticated = manager.current().is_authenticated(),
        "signed out"
    );
}
