use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use super::workspace::Workspace;
use crate::core::types::Category;
use crate::scraping::fetcher::PageFetcher;

/// Outcome tally for one category's download pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub saved: usize,
    pub failed: usize,
}

/// Downloads discovered resource URLs into the workspace, one file per link,
/// under the same transport contract as the page fetches.
pub struct Retriever<'a> {
    fetcher: &'a PageFetcher,
    workspace: &'a Workspace,
}

impl<'a> Retriever<'a> {
    pub fn new(fetcher: &'a PageFetcher, workspace: &'a Workspace) -> Self {
        Self { fetcher, workspace }
    }

    /// Fetch every URL in order and store it under its 1-based ordinal.
    /// A failed item is logged and skipped; later items still run. Best
    /// effort: no rollback, no retry.
    pub async fn download_all(&self, category: Category, urls: &[String]) -> DownloadSummary {
        let mut summary = DownloadSummary::default();
        for (idx, url) in urls.iter().enumerate() {
            let ordinal = idx + 1;
            info!("Downloading {} config {} from {}", category, ordinal, url);
            match self.download_one(category, ordinal, url).await {
                Ok(path) => {
                    info!("Saved config to {}", path.display());
                    summary.saved += 1;
                }
                Err(e) => {
                    error!("Failed to download {} config {}: {:#}", category, ordinal, e);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    async fn download_one(
        &self,
        category: Category,
        ordinal: usize,
        url: &str,
    ) -> Result<PathBuf> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        let path = self.workspace.store(category, ordinal, &bytes).await?;
        Ok(path)
    }
}
