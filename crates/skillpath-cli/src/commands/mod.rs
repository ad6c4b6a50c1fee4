pub mod dashboard;
pub mod feedback;
pub mod init;
pub mod questions;
pub mod register;
pub mod submit;

use std::path::PathBuf;

use anyhow::Result;

use skillpath_core::store::LocalStore;
use skillpath_providers::config::load_config_from;
use skillpath_providers::SkillpathConfig;

/// Load config and open the store, letting `--store` override the configured path.
pub fn open_store(
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(SkillpathConfig, LocalStore)> {
    let config = load_config_from(config_path.as_deref())?;
    let path = store_path.unwrap_or_else(|| config.store_path.clone());
    let store = LocalStore::open(&path)?;
    Ok((config, store))
}
