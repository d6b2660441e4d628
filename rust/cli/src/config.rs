use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use fivepiles_ai::AI_NAMES;

pub const CONFIG_ENV: &str = "FIVEPILES_CONFIG";
pub const SEED_ENV: &str = "FIVEPILES_SEED";
pub const GAMES_ENV: &str = "FIVEPILES_GAMES";
pub const P1_AI_ENV: &str = "FIVEPILES_P1_AI";
pub const P2_AI_ENV: &str = "FIVEPILES_P2_AI";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub games: u32,
    pub p1_ai: String,
    pub p2_ai: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub games: ValueSource,
    pub p1_ai: ValueSource,
    pub p2_ai: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            games: ValueSource::Default,
            p1_ai: ValueSource::Default,
            p2_ai: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            games: 100,
            p1_ai: "baseline".into(),
            p2_ai: "random".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `FIVEPILES_CONFIG`, then the
/// individual `FIVEPILES_*` variables. Empty variables are ignored.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.games {
            cfg.games = v;
            sources.games = ValueSource::File;
        }
        if let Some(v) = f.p1_ai {
            cfg.p1_ai = v;
            sources.p1_ai = ValueSource::File;
        }
        if let Some(v) = f.p2_ai {
            cfg.p2_ai = v;
            sources.p2_ai = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(games) = std::env::var(GAMES_ENV)
        && !games.is_empty()
    {
        cfg.games = games
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid games: {}", games)))?;
        sources.games = ValueSource::Env;
    }
    if let Ok(name) = std::env::var(P1_AI_ENV)
        && !name.is_empty()
    {
        cfg.p1_ai = name;
        sources.p1_ai = ValueSource::Env;
    }
    if let Ok(name) = std::env::var(P2_AI_ENV)
        && !name.is_empty()
    {
        cfg.p2_ai = name;
        sources.p2_ai = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    games: Option<u32>,
    #[serde(default)]
    p1_ai: Option<String>,
    #[serde(default)]
    p2_ai: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >=1".into(),
        ));
    }
    for name in [&cfg.p1_ai, &cfg.p2_ai] {
        validate_ai_name(name).map_err(ConfigError::Invalid)?;
    }
    Ok(())
}

/// Accepts the names understood by `fivepiles_ai::create_ai`.
pub fn validate_ai_name(name: &str) -> Result<(), String> {
    let normalized = name.trim().to_ascii_lowercase();
    if AI_NAMES.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "Invalid configuration: unknown AI '{}' (expected one of: {})",
            name,
            AI_NAMES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write as _;

    const ALL_VARS: [&str; 5] = [CONFIG_ENV, SEED_ENV, GAMES_ENV, P1_AI_ENV, P2_AI_ENV];

    fn clear_env() {
        for key in ALL_VARS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_when_nothing_is_set() {
        clear_env();
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources.games, ValueSource::Default);
        assert_eq!(resolved.sources.p2_ai, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 7\ngames = 12\np1_ai = \"random\"").unwrap();
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
            std::env::set_var(SEED_ENV, "99");
        }

        let resolved = load_with_sources().unwrap();
        clear_env();

        assert_eq!(resolved.config.seed, Some(99));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.games, 12);
        assert_eq!(resolved.sources.games, ValueSource::File);
        assert_eq!(resolved.config.p1_ai, "random");
        assert_eq!(resolved.sources.p1_ai, ValueSource::File);
        assert_eq!(resolved.sources.p2_ai, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn zero_games_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var(GAMES_ENV, "0");
        }
        let err = load().unwrap_err();
        clear_env();
        assert!(err.to_string().contains("games must be >=1"));
    }

    #[test]
    #[serial]
    fn unknown_ai_and_bad_numbers_are_rejected() {
        clear_env();
        unsafe {
            std::env::set_var(P2_AI_ENV, "oracle");
        }
        let err = load().unwrap_err();
        assert!(err.to_string().contains("unknown AI 'oracle'"));

        clear_env();
        unsafe {
            std::env::set_var(SEED_ENV, "abc");
        }
        let err = load().unwrap_err();
        clear_env();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    #[serial]
    fn unknown_file_keys_fail_to_parse() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = 3").unwrap();
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        let err = load().unwrap_err();
        clear_env();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn ai_names_are_case_insensitive() {
        assert!(validate_ai_name("Baseline").is_ok());
        assert!(validate_ai_name(" random ").is_ok());
        assert!(validate_ai_name("gto").is_err());
    }
}
