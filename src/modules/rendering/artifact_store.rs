use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::renderer::RenderedArtifact;
use crate::core::Result;

/// A rendered artifact written to scratch storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    /// Name offered to the client for download
    pub download_name: String,
}

/// Per-request scratch storage for generated files. Every write goes to a
/// fresh `<stem>-<uuid>.<ext>` path, so concurrent requests never share a file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub async fn store(&self, stem: &str, artifact: &RenderedArtifact) -> Result<StoredArtifact> {
        let stem = sanitize_stem(stem);
        let path = self
            .root
            .join(format!("{}-{}.{}", stem, Uuid::new_v4(), artifact.extension));

        tokio::fs::write(&path, &artifact.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "Artifact stored");

        Ok(StoredArtifact {
            path,
            download_name: format!("{}.{}", stem, artifact.extension),
        })
    }
}

/// Keeps file names to `[A-Za-z0-9._-]`, spaces become `-`
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('-'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}
