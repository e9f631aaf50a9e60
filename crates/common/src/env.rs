//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Warn when the static client directory is missing.
///
/// The service keeps everything in memory, so nothing has to be created on
/// disk; a missing frontend only means `/` will 404.
pub async fn ensure_env(frontend_dir: &str) -> anyhow::Result<bool> {
    match tokio::fs::metadata(frontend_dir).await {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(anyhow::anyhow!("{frontend_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn missing_dir_is_only_a_warning() {
        let found = ensure_env("/nonexistent-presence-frontend").await.unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn existing_dir_is_reported() {
        let dir = std::env::temp_dir();
        let found = ensure_env(dir.to_str().unwrap()).await.unwrap();
        assert!(found);
    }

    #[tokio::test]
    async fn file_instead_of_dir_is_an_error() {
        let file = std::env::temp_dir().join(format!("presence_env_{}", std::process::id()));
        tokio::fs::write(&file, b"x").await.unwrap();
        assert!(ensure_env(file.to_str().unwrap()).await.is_err());
        let _ = tokio::fs::remove_file(&file).await;
    }
}
