//! Engine configuration loading

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use std::path::Path;
use tracing::debug;
use translation_eval_core::EngineConfig;

/// Environment variables use this prefix, e.g. `TRANSLATION_EVAL_LANGUAGE=de`
/// or `TRANSLATION_EVAL_REFERENCE_WEIGHTS__BLEU=20`.
pub const ENV_PREFIX: &str = "TRANSLATION_EVAL";

/// Load configuration from `config/default`, `config/local`, the environment
/// and finally `explicit`, each layer overriding the previous one.
///
/// Keys are snake_case: the loader lowercases every key it reads.
pub fn load(explicit: Option<&Path>) -> Result<EngineConfig> {
    let mut builder = ConfigLoader::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config: EngineConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    let config = config
        .validated()
        .context("Invalid configuration")?;

    debug!(
        "Configuration loaded (language {}, chrF order {})",
        config.language, config.chrf.max_order
    );

    Ok(config)
}
