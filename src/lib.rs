//! shelf application library
//!
//! Entity models, the resource services, and the three HTTP modules
//! (`books`, `authors`, `categories`) assembled on top of the framework crates.

pub mod modules;
pub mod service;
pub mod utils;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use service::{Resource, ResourceService, Services};

/// Registry holding every resource module wired to `services`
pub fn build_registry(services: &Services) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, services)?;
    Ok(registry)
}

/// Full HTTP application without binding a socket
pub fn app(services: &Services, settings: &Settings) -> anyhow::Result<shelf_http::App> {
    let registry = build_registry(services)?;
    Ok(shelf_http::build_router(&registry, settings))
}

/// Open the configured stores, initialize every module, and serve until ctrl-c
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = settings.environment.as_str(),
        data_dir = %settings.storage.data_dir.display(),
        "shelf bootstrap starting"
    );

    let services = Services::open(&settings.storage);
    let registry = build_registry(&services)?;

    registry
        .init_all(&InitCtx {
            settings: &settings,
        })
        .await
        .context("failed to initialize modules")?;

    shelf_http::start_server(&registry, &settings).await
}
