use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// FileConfig — file-based config loader (clash-harvest.json) with env-var
// fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "CLASH_HARVEST_CONFIG";
pub const ENV_BASE_URL: &str = "CLASH_HARVEST_BASE_URL";
pub const ENV_OUTPUT_DIR: &str = "CLASH_HARVEST_OUTPUT_DIR";
pub const ENV_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_FIXTURE_DIR: &str = "CLASH_HARVEST_FIXTURE_DIR";

pub const DEFAULT_BASE_URL: &str = "https://www.freeclashnode.com";
pub const DEFAULT_OUTPUT_DIR: &str = "configs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FIXTURE_DIR: &str = "fixtures";

/// Raw keys of `clash-harvest.json`. Every field is optional; resolution
/// order per field is JSON → env var → hard default.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub output_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fixture_dir: Option<String>,
}

/// Load `clash-harvest.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `CLASH_HARVEST_CONFIG` env var path
/// 2. `./clash-harvest.json`
/// 3. `../clash-harvest.json`
///
/// Missing file → `FileConfig::default()` (silent, env-var fallbacks apply).
/// Parse error → log a warning, return `FileConfig::default()`.
pub fn load_file_config() -> FileConfig {
    let candidates: Vec<PathBuf> = {
        let mut v = vec![
            PathBuf::from("clash-harvest.json"),
            PathBuf::from("../clash-harvest.json"),
        ];
        if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            v.insert(0, PathBuf::from(env_path));
        }
        v
    };

    for path in &candidates {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<FileConfig>(&contents) {
                Ok(cfg) => {
                    tracing::info!("clash-harvest.json loaded from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(
                        "clash-harvest.json parse error at {}: {} — using defaults",
                        path.display(),
                        e
                    );
                    return FileConfig::default();
                }
            },
            Err(_) => continue, // not found at this path — try next
        }
    }

    FileConfig::default()
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------

/// Local fixture files substituted for the two page fetches in offline mode.
#[derive(Clone, Debug)]
pub struct FixtureSet {
    pub home_page: PathBuf,
    pub daily_page: PathBuf,
}

impl FixtureSet {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            home_page: dir.join("home_page.html"),
            daily_page: dir.join("daily_page.html"),
        }
    }
}

/// Resolved settings handed to every component at construction. No global
/// state: tests build isolated instances and run in parallel.
#[derive(Clone, Debug)]
pub struct HarvestConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    /// `Some` in offline mode: home/daily fetches read these files instead
    /// of the network. Resource downloads still go out over the wire.
    pub fixtures: Option<FixtureSet>,
}

impl HarvestConfig {
    pub fn resolve(file: &FileConfig, offline: bool) -> Self {
        let base_url = file
            .base_url
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env_nonempty(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let output_dir = file
            .output_dir
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env_nonempty(ENV_OUTPUT_DIR))
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let timeout_secs = file
            .timeout_secs
            .or_else(|| env_nonempty(ENV_TIMEOUT_SECS).and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let fixture_dir = file
            .fixture_dir
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env_nonempty(ENV_FIXTURE_DIR))
            .unwrap_or_else(|| DEFAULT_FIXTURE_DIR.to_string());

        Self {
            base_url,
            output_dir: PathBuf::from(output_dir),
            timeout: Duration::from_secs(timeout_secs),
            fixtures: offline.then(|| FixtureSet::in_dir(&fixture_dir)),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fixtures: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_defaults() {
        let config = HarvestConfig::resolve(&FileConfig::default(), false);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.fixtures.is_none());
    }

    #[test]
    fn resolve_prefers_file_values() {
        let file = FileConfig {
            base_url: Some("https://mirror.example".into()),
            output_dir: Some("out".into()),
            timeout_secs: Some(5),
            fixture_dir: None,
        };
        let config = HarvestConfig::resolve(&file, false);
        assert_eq!(config.base_url, "https://mirror.example");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn offline_mode_points_at_fixture_files() {
        let file = FileConfig {
            fixture_dir: Some("testdata".into()),
            ..FileConfig::default()
        };
        let config = HarvestConfig::resolve(&file, true);
        let fixtures = config.fixtures.expect("offline mode sets fixtures");
        assert_eq!(fixtures.home_page, PathBuf::from("testdata/home_page.html"));
        assert_eq!(
            fixtures.daily_page,
            PathBuf::from("testdata/daily_page.html")
        );
    }
}
