//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime` without depending directly on `common`.

use std::path::PathBuf;

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, data_dir).await
}

/// Path of a named store file inside the data directory.
pub fn data_file(data_dir: &str, name: &str) -> PathBuf {
    common::env::data_file(data_dir, name)
}
