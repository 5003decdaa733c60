use tracing::debug;
use url::Url;

use super::dom::{self, Document};
use super::fetcher::{self, PageFetcher};
use crate::core::config::HarvestConfig;
use crate::core::types::{Category, FetchError, ResourceLinks, StructureNotFound};

/// Container id of the article list on the home page.
const BLOG_LIST_ID: &str = "blog-list";
/// Classes on each article row inside the list. The site's structure is
/// undocumented; these match what it currently serves.
const ARTICLE_ROW_CLASSES: [&str; 3] = ["row", "item", "py-3"];

/// Today's publication link: the blog list's first row, its anchor's href.
/// The href may be relative or absolute; callers resolve it against the
/// configured base URL.
pub fn daily_link(home: &Document) -> Result<String, StructureNotFound> {
    let list = home
        .element_by_id(BLOG_LIST_ID)
        .ok_or(StructureNotFound::BlogList)?;
    let row = dom::first_descendant(list, "div", &ARTICLE_ROW_CLASSES)
        .ok_or(StructureNotFound::ArticleEntry)?;
    let anchor = dom::first_descendant(row, "a", &[]).ok_or(StructureNotFound::ArticleHref)?;
    dom::attr(anchor, "href")
        .map(str::to_string)
        .ok_or(StructureNotFound::ArticleHref)
}

/// Scan every paragraph on the daily page and classify the ones whose
/// trimmed text ends with a recognized suffix. Document order is preserved
/// per category, so re-running over the same markup yields the same mapping.
///
/// Deliberately loose: any text ending in a known suffix qualifies, wherever
/// it sits. The site's markup drifts, and over-constraining the scan would
/// silently drop valid links. Non-matching text is skipped, not an error.
pub fn resource_links(daily: &Document) -> ResourceLinks {
    let mut links = ResourceLinks::default();
    for text in daily.texts_matching("p", |t| Category::classify(t).is_some()) {
        if let Some(category) = Category::classify(&text) {
            debug!("classified {} link: {}", category, text);
            links.push(category, text);
        }
    }
    links
}

/// Fetch-and-parse front end over the pure extraction functions above. In
/// offline mode the two page fetches read local fixture files instead.
pub struct LinkDiscoverer<'a> {
    fetcher: &'a PageFetcher,
    config: &'a HarvestConfig,
}

impl<'a> LinkDiscoverer<'a> {
    pub fn new(fetcher: &'a PageFetcher, config: &'a HarvestConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn fetch_home(&self) -> Result<Document, FetchError> {
        let markup = match &self.config.fixtures {
            Some(fixtures) => fetcher::read_fixture(&fixtures.home_page).await?,
            None => self.fetcher.fetch_text(&self.config.base_url).await?,
        };
        Ok(Document::parse(&markup))
    }

    pub async fn fetch_daily(&self, daily_url: &str) -> Result<Document, FetchError> {
        let markup = match &self.config.fixtures {
            Some(fixtures) => fetcher::read_fixture(&fixtures.daily_page).await?,
            None => self.fetcher.fetch_text(daily_url).await?,
        };
        Ok(Document::parse(&markup))
    }

    /// Resolve a possibly-relative article href against the site root.
    pub fn absolute_daily_url(&self, href: &str) -> String {
        match Url::parse(&self.config.base_url).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.config.base_url.trim_end_matches('/'), href),
        }
    }
}
