//! Web Larek storefront host.
//!
//! Loads configuration, fetches the catalog from the Web Larek API, and
//! writes the rendered storefront page to `LAREK_RENDER_OUT`.
//!
//! # Runtime
//!
//! - Current-thread tokio runtime with a `LocalSet`: the storefront's state
//!   lives in `Rc`/`RefCell` and its order submissions use `spawn_local`
//! - Sentry for error tracking, fed by the tracing layer

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tokio::task::LocalSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_larek_storefront::Storefront;
use web_larek_storefront::api::LarekClient;
use web_larek_storefront::config::LarekConfig;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &LarekConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = LarekConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "web_larek_storefront=info,web_larek=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    LocalSet::new().run_until(run(config)).await;
}

async fn run(config: LarekConfig) {
    let client = LarekClient::new(&config.api).expect("Failed to build API client");
    let storefront = Storefront::new(
        client,
        config.api.cdn_url.clone(),
        config.priceless_policy,
    )
    .expect("Failed to set up storefront");

    let count = storefront.load_catalog().await;
    tracing::info!(products = count, api = %config.api.base_url, "Catalog loaded");

    let html = storefront
        .document()
        .expect("Failed to render storefront page");

    if let Some(parent) = config.render_out.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .expect("Failed to create output directory");
    }
    tokio::fs::write(&config.render_out, html.as_str())
        .await
        .expect("Failed to write storefront page");

    tracing::info!(path = %config.render_out.display(), "Storefront page written");
}
