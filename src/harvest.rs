use anyhow::Context;
use tracing::{error, info};

use crate::core::config::HarvestConfig;
use crate::core::types::{Category, RunOutcome};
use crate::scraping::discover::{self, LinkDiscoverer};
use crate::scraping::fetcher::PageFetcher;
use crate::storage::download::Retriever;
use crate::storage::workspace::Workspace;

#[derive(Clone, Copy, Debug)]
enum HarvestState {
    Start,
    HomeFetched,
    DailyLinkResolved,
    DailyPageFetched,
    LinksClassified,
    Purged,
    Downloading,
    Done,
    Aborted,
}

fn log_state(state: HarvestState) {
    info!("harvest_state={:?}", state);
}

/// One full fetch-discover-download pass over the site. Strictly sequential:
/// each network call completes (or times out) before the next is issued.
pub struct Harvester {
    config: HarvestConfig,
    fetcher: PageFetcher,
    workspace: Workspace,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        let fetcher = PageFetcher::new(config.timeout);
        let workspace = Workspace::new(config.output_dir.clone());
        Self {
            config,
            fetcher,
            workspace,
        }
    }

    /// Run the whole pipeline once. Every failure ends up in the log; none
    /// propagates past this method. A failure before downloading aborts the
    /// run; a failed individual download does not.
    pub async fn run(&self) -> RunOutcome {
        match self.run_pipeline().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("harvest run failed: {:#}", e);
                log_state(HarvestState::Aborted);
                RunOutcome::Aborted
            }
        }
    }

    async fn run_pipeline(&self) -> anyhow::Result<RunOutcome> {
        log_state(HarvestState::Start);
        self.workspace
            .prepare()
            .await
            .context("failed to create output directory")?;

        let discoverer = LinkDiscoverer::new(&self.fetcher, &self.config);

        let home = discoverer
            .fetch_home()
            .await
            .context("failed to fetch home page")?;
        log_state(HarvestState::HomeFetched);

        let href =
            discover::daily_link(&home).context("could not find latest article on home page")?;
        let daily_url = discoverer.absolute_daily_url(&href);
        info!("Found daily URL: {}", daily_url);
        log_state(HarvestState::DailyLinkResolved);

        let daily = discoverer
            .fetch_daily(&daily_url)
            .await
            .context("failed to fetch daily proxy page")?;
        log_state(HarvestState::DailyPageFetched);

        let links = discover::resource_links(&daily);
        for category in Category::ALL {
            info!("Found {} {} configurations", links.count(category), category);
        }
        log_state(HarvestState::LinksClassified);

        let removed = self
            .workspace
            .purge(&Category::ALL)
            .await
            .context("failed to purge stale configs")?;
        info!("Purged {} stale config file(s)", removed);
        log_state(HarvestState::Purged);

        log_state(HarvestState::Downloading);
        let retriever = Retriever::new(&self.fetcher, &self.workspace);
        let mut saved = 0;
        let mut failed = 0;
        for category in Category::ALL {
            let summary = retriever.download_all(category, links.urls(category)).await;
            saved += summary.saved;
            failed += summary.failed;
        }

        info!("Harvest complete: {} saved, {} failed", saved, failed);
        log_state(HarvestState::Done);
        Ok(RunOutcome::Done)
    }
}
