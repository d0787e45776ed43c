//! Global configuration loader for Consulta.
//!
//! Reads `config.toml` from the data directory (`~/.consulta/` by default)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use consulta_types::config::GlobalConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CONSULTA_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CONSULTA_DATA_DIR` environment variable
/// 2. `~/.consulta`
/// 3. `.consulta` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".consulta");
    }

    PathBuf::from(".consulta")
}

/// Resolve a configured path: absolute paths are kept, relative ones are
/// joined onto the data directory.
pub fn resolve_path(data_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        data_dir.join(configured)
    }
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.memory.max_tokens, 200);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[retrieval]
top_k = 5

[memory]
max_tokens = 80

[index]
dir = "/var/lib/consulta/index"
split_by_file = true
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.embed_batch_size, 64);
        assert_eq!(config.memory.max_tokens, 80);
        assert_eq!(config.index.dir, PathBuf::from("/var/lib/consulta/index"));
        assert!(config.index.split_by_file);
        assert_eq!(config.index.chunk_size, 300);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn resolve_path_keeps_absolute_and_joins_relative() {
        let data_dir = PathBuf::from("/home/user/.consulta");
        assert_eq!(
            resolve_path(&data_dir, Path::new("faiss_index")),
            PathBuf::from("/home/user/.consulta/faiss_index")
        );
        assert_eq!(
            resolve_path(&data_dir, Path::new("/srv/docs")),
            PathBuf::from("/srv/docs")
        );
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is the only one touching the variable and restores it immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-consulta");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-consulta"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
