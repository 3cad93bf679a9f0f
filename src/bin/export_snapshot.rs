use anyhow::{Context, Result};
use i18n_router::config::RouterConfig;
use i18n_router::i18n::{ClientSnapshot, LocalePathMap};
use std::fs;
use tracing::info;

/// Write the client config artifact next to the built site.
///
/// Usage: `export-snapshot [output]`, default output
/// `docs/.vitepress/dist/__i18n/snapshot.js`. A `.json` output gets bare JSON,
/// anything else a script assigning the global.
fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("export_snapshot=info".parse()?),
        )
        .init();

    let config_path = std::env::var("I18N_CONFIG").context("I18N_CONFIG not set")?;
    let router = RouterConfig::from_file(&config_path)?;
    let map = LocalePathMap::from_config(&router)?;
    let snapshot = ClientSnapshot::from_map(&map);

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "docs/.vitepress/dist/__i18n/snapshot.js".to_string());
    let contents = if output_path.ends_with(".json") {
        snapshot.to_json()?
    } else {
        snapshot.to_script()?
    };

    if let Some(parent) = std::path::Path::new(&output_path).parent() {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(&output_path, contents).context("Failed to write client snapshot")?;

    info!(
        "✓ Exported {} locales (default: {}) to {}",
        map.len(),
        map.default_locale(),
        output_path
    );

    Ok(())
}
