//! Provider configuration resolution.
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file, and command-line flags. Later layers win.

use crate::cli::ModelArgs;
use crate::error::{CliError, Result};
use framescope_llm::OpenAiConfig;
use std::fs;
use std::path::Path;

/// Load provider settings from a TOML file.
///
/// Missing fields fall back to their defaults, so a file can set just the
/// model name or just the endpoint.
pub fn load_model_config(path: &Path) -> Result<OpenAiConfig> {
    let contents = fs::read_to_string(path)?;
    let config: OpenAiConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Resolve the final provider configuration from the model flags.
///
/// `default_cache_dir` is used when neither the file nor the flags name a
/// cache directory; the clustering pass depends on the cache for resumable
/// runs, so it is always on.
pub fn resolve_model_config(
    args: &ModelArgs,
    default_cache_dir: &Path,
) -> Result<OpenAiConfig> {
    let mut config = match &args.config {
        Some(path) => load_model_config(path)?,
        None => OpenAiConfig::default(),
    };

    if let Some(api_key) = &args.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(delay) = args.delay {
        config.delay_secs = delay;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }
    if config.cache_dir.is_none() {
        config.cache_dir = Some(default_cache_dir.to_path_buf());
    }

    if config.api_key.is_empty() {
        return Err(CliError::Config(
            "No API key: pass --api-key, set OPENAI_API_KEY, or put api_key in the config file"
                .to_string(),
        ));
    }

    Ok(config)
}
