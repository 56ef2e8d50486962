//! Strata Core
//!
//! Layered-configuration resolution engine for static-analysis tools.
//! Given an ordered sequence of configuration layers (file-pattern matchers,
//! plugin bindings, rule settings, ignore lists), this crate computes the
//! effective configuration for any file path.
//!
//! The engine is purely functional over a sealed [`LayerStore`]: build the
//! store once (directly or through [`ConfigLoader`]), hand it to a
//! [`Resolver`], and call [`Resolver::resolve`] from as many threads as you
//! like. Rule semantics, parsers, and plugin execution are external
//! collaborators; the engine only decides *which* rules and options apply to
//! *which* files.

pub mod block;
pub mod error;
pub mod loader;
pub mod merge;
pub mod pattern;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use block::{
    ConfigBlock, EffectiveConfig, PluginRef, ResolvedRule, RuleSetting, Severity,
};
pub use error::{ConstructionError, ResolutionError};
pub use loader::ConfigLoader;
pub use resolver::Resolver;
pub use store::{Layer, LayerStore};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
