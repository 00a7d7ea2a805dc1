use docchat_core::ClientConfig;
use std::path::Path;
use tracing::{debug, info};

/// Overrides `api_base_url` from the config file.
pub const ENV_API_BASE_URL: &str = "DOCCHAT_API_BASE_URL";

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "docchat.toml";

/// Reads the config file. A missing file is only an error when the user
/// named it explicitly; otherwise the defaults apply.
pub async fn load_file(path: &Path, explicit: bool) -> anyhow::Result<ClientConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => {
            info!(path = %path.display(), "Loaded config file");
            Ok(ClientConfig::from_toml_str(&s)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(ClientConfig::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        )),
    }
}

/// Applies overrides in precedence order: file < environment < flag.
pub fn apply_overrides(
    mut config: ClientConfig,
    env_url: Option<String>,
    flag_url: Option<String>,
) -> anyhow::Result<ClientConfig> {
    if let Some(url) = flag_url.or(env_url).filter(|u| !u.trim().is_empty()) {
        config = config.with_api_base_url(url);
    }
    config.validate()?;
    Ok(config)
}
