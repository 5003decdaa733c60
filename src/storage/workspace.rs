use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::types::Category;

/// Owns the output directory holding downloaded config files. Nothing else
/// writes there; files of managed extensions are wiped at the start of each
/// run and recreated by the retriever.
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the output directory if it does not exist yet. Idempotent.
    pub async fn prepare(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Delete every existing file whose extension is managed by one of the
    /// given categories. Files with unmanaged extensions are left alone.
    /// Returns the number of files removed.
    pub async fn purge(&self, categories: &[Category]) -> std::io::Result<usize> {
        let managed: HashSet<&str> = categories
            .iter()
            .map(|category| category.output_extension())
            .collect();

        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_managed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| managed.contains(ext));
            if is_managed {
                debug!("purging stale config {}", path.display());
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Destination path for the `ordinal`-th (1-based) file of a category.
    pub fn stored_path(&self, category: Category, ordinal: usize) -> PathBuf {
        self.root.join(format!(
            "{}{}.{}",
            category.file_prefix(),
            ordinal,
            category.output_extension()
        ))
    }

    /// Whole-buffer write with overwrite semantics.
    pub async fn store(
        &self,
        category: Category,
        ordinal: usize,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        let path = self.stored_path(category, ordinal);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepare_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("nested").join("configs"));
        workspace.prepare().await.unwrap();
        workspace.prepare().await.unwrap();
        assert!(workspace.root().is_dir());
    }

    #[test]
    fn stored_paths_follow_prefix_and_fixed_extension() {
        let workspace = Workspace::new("configs");
        assert_eq!(
            workspace.stored_path(Category::Clash, 1),
            PathBuf::from("configs/1.yaml")
        );
        assert_eq!(
            workspace.stored_path(Category::V2ray, 2),
            PathBuf::from("configs/v2.yaml")
        );
    }

    #[tokio::test]
    async fn purge_removes_only_managed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        workspace.prepare().await.unwrap();

        for name in ["1.yaml", "v1.yaml", "notes.txt", "README.md"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let removed = workspace.purge(&Category::ALL).await.unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.path().join("1.yaml").exists());
        assert!(!dir.path().join("v1.yaml").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn store_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        workspace.prepare().await.unwrap();

        workspace.store(Category::Clash, 1, b"old").await.unwrap();
        let path = workspace.store(Category::Clash, 1, b"new").await.unwrap();
        assert_eq!(tokio::fs::read(path).await.unwrap(), b"new");
    }
}
