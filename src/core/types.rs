use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of a resource link by the suffix its text carries on the
/// daily page. The match is case-sensitive: the site publishes lowercase
/// suffixes, and anything else is treated as not-a-config-link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Clash,
    V2ray,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Clash, Category::V2ray];

    /// Suffix a paragraph's trimmed text must end with to land in this category.
    pub fn source_suffix(self) -> &'static str {
        match self {
            Category::Clash => ".yaml",
            Category::V2ray => ".txt",
        }
    }

    /// Filename prefix for stored files of this category.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Category::Clash => "",
            Category::V2ray => "v",
        }
    }

    /// Extension stored files carry. Fixed regardless of the source suffix —
    /// the downstream proxy client only watches one pattern.
    pub fn output_extension(self) -> &'static str {
        "yaml"
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Clash => "clash",
            Category::V2ray => "v2ray",
        }
    }

    /// Classify a trimmed text node by its suffix, if it matches any category.
    pub fn classify(text: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| text.ends_with(category.source_suffix()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category resource URLs, each list in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceLinks {
    by_category: BTreeMap<Category, Vec<String>>,
}

impl ResourceLinks {
    pub fn push(&mut self, category: Category, url: String) {
        self.by_category.entry(category).or_default().push(url);
    }

    pub fn urls(&self, category: Category) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.urls(category).len()
    }

    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Final result of one harvest run. Failures never propagate past the
/// orchestrator; callers get this and the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Done,
    Aborted,
}

/// Transport failure, timeout, non-2xx status, or unreadable offline fixture
/// on any GET.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read fixture {}", .path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Expected container/element absent from otherwise parseable markup.
/// Terminal for the run: without the daily link there is nothing to harvest.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StructureNotFound {
    #[error("blog list container missing from home page")]
    BlogList,
    #[error("blog list has no article entry")]
    ArticleEntry,
    #[error("latest article entry carries no link")]
    ArticleHref,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_suffix_based() {
        assert_eq!(
            Category::classify("https://x/y.yaml"),
            Some(Category::Clash)
        );
        assert_eq!(Category::classify("https://x/y.txt"), Some(Category::V2ray));
        assert_eq!(Category::classify("plain text"), None);
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(Category::classify("https://x/y.YAML"), None);
        assert_eq!(Category::classify("https://x/y.Txt"), None);
    }

    #[test]
    fn resource_links_preserve_push_order() {
        let mut links = ResourceLinks::default();
        links.push(Category::Clash, "a.yaml".into());
        links.push(Category::V2ray, "b.txt".into());
        links.push(Category::Clash, "c.yaml".into());

        assert_eq!(links.urls(Category::Clash), ["a.yaml", "c.yaml"]);
        assert_eq!(links.urls(Category::V2ray), ["b.txt"]);
        assert_eq!(links.total(), 3);
        assert!(!links.is_empty());
    }
}
