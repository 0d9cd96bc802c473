// Configuration loading and parsing (config/auction.toml).

use std::path::{Path, PathBuf};

use bidbot_core::config::{AuctionConfig, EngineConfig, PolicyConfig, QuotaConfig};
use bidbot_data::TablePaths;
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "auction.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

impl From<bidbot_core::ValidationError> for ConfigError {
    fn from(e: bidbot_core::ValidationError) -> Self {
        ConfigError::ValidationError {
            field: e.field,
            message: e.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    /// Role table paths, resolved against the base directory.
    pub data: TablePaths,
    pub session: SessionConfig,
}

/// The driver's candidate stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Candidate names in nomination order.
    pub candidates: Vec<String>,
    /// Seed for the simulated bid stream.
    pub bid_seed: u64,
    /// Where to write the JSON session report, if anywhere.
    pub report_path: Option<PathBuf>,
}

/// Raw deserialization target for auction.toml.
#[derive(Debug, Deserialize)]
struct AuctionFile {
    #[serde(default)]
    auction: AuctionConfig,
    #[serde(default)]
    quota: QuotaConfig,
    #[serde(default)]
    policy: PolicyConfig,
    data: TablePaths,
    #[serde(default)]
    session: SessionConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/auction.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: AuctionFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        engine: EngineConfig {
            auction: file.auction,
            quota: file.quota,
            policy: file.policy,
        },
        data: file.data.relative_to(base_dir),
        session: SessionConfig {
            report_path: file.session.report_path.map(|p| base_dir.join(p)),
            ..file.session
        },
    };

    validate(&config)?;

    Ok(config)
}

/// Copy any file in `defaults/` that is missing from `config/`. Existing
/// files are never overwritten and `.example` files are skipped. Returns the
/// copied paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let source = entry.path();
        if !source.is_file() {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {}: {e}", source.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    config.engine.validate()?;

    if config.session.candidates.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "session.candidates".into(),
            message: "must list at least one candidate".into(),
        });
    }
    if let Some(i) = config
        .session
        .candidates
        .iter()
        .position(|c| c.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: format!("session.candidates[{i}]"),
            message: "must not be blank".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The bidbot-cli package root, which holds `defaults/`.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/bidbot-cli/defaults").exists() {
            cwd.join("crates/bidbot-cli")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/auction.toml` holding `text`.
    fn temp_with_config(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    const MINIMAL: &str = r#"
[data]
batsmen = "data/batsmen.csv"
bowlers = "data/bowlers.csv"
wicket_keepers = "data/wicket_keepers.csv"
all_rounders = "data/all_rounders.csv"

[session]
candidates = ["V Kohli"]
"#;

    fn expect_validation_field(base: &Path, expected: &str) {
        match load_config_from(base).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_with_config("bidbot_config_defaults", &default_text());

        let config = load_config_from(&tmp).expect("default config should load");
        assert_eq!(config.engine.auction.total_budget, 40.0);
        assert_eq!(config.engine.auction.foreign_limit, 4);
        assert_eq!(config.engine.quota.batsmen, 3);
        assert!((config.engine.policy.learning_rate - 0.8).abs() < f64::EPSILON);
        assert!((config.engine.policy.epsilon_decay - 0.9).abs() < f64::EPSILON);
        assert_eq!(
            config.session.candidates,
            vec!["MP Stoinis", "AR Patel", "R Ashwin", "H Klaasen"]
        );
        assert_eq!(config.data.batsmen, tmp.join("data/batsmen.csv"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn omitted_sections_take_engine_defaults() {
        let tmp = temp_with_config("bidbot_config_minimal", MINIMAL);

        let config = load_config_from(&tmp).expect("minimal config should load");
        assert_eq!(config.engine.auction.total_budget, 40.0);
        assert_eq!(config.engine.quota.wicket_keepers, 1);
        assert!((config.engine.policy.epsilon - 0.5).abs() < f64::EPSILON);
        assert!(config.engine.policy.seed.is_none());
        assert_eq!(config.session.bid_seed, 0);
        assert!(config.session.report_path.is_none());
        assert!(SessionConfig::default().candidates.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn report_path_resolves_against_base() {
        let text = format!("{MINIMAL}report_path = \"out/report.json\"\n");
        let tmp = temp_with_config("bidbot_config_report", &text);

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.session.report_path, Some(tmp.join("out/report.json")));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_budget() {
        let text = format!("[auction]\ntotal_budget = 0.0\n{MINIMAL}");
        let tmp = temp_with_config("bidbot_config_zero_budget", &text);
        expect_validation_field(&tmp, "auction.total_budget");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_epsilon_above_one() {
        let text = default_text().replace("epsilon = 0.5", "epsilon = 1.5");
        let tmp = temp_with_config("bidbot_config_epsilon", &text);
        expect_validation_field(&tmp, "policy.epsilon");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_candidate_list() {
        let text = MINIMAL.replace("candidates = [\"V Kohli\"]", "candidates = []");
        let tmp = temp_with_config("bidbot_config_no_candidates", &text);
        expect_validation_field(&tmp, "session.candidates");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_candidate() {
        let text = MINIMAL.replace("[\"V Kohli\"]", "[\"V Kohli\", \" \"]");
        let tmp = temp_with_config("bidbot_config_blank_candidate", &text);
        expect_validation_field(&tmp, "session.candidates[1]");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("bidbot_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_with_config("bidbot_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_when_data_section_missing() {
        let tmp = temp_with_config("bidbot_config_no_data", "[session]\ncandidates = [\"A\"]\n");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("bidbot_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();
        fs::write(defaults_dir.join("auction.toml.example"), "# template\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE).exists());
        assert!(!tmp.join("config/auction.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = temp_with_config("bidbot_config_ensure_skips", "# custom\n");
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("bidbot_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
