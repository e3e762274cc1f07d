//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults, `jsonsearch.toml`,
//! `jsonsearch.<env>.toml` (selected by `RUST_ENV`) and `APP_*` env vars.
//! Nested keys are reached from the environment with `__`, e.g.
//! `APP_EMBED__BATCH_SIZE=64`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::corpus::{DEFAULT_EXTENSION, DEFAULT_MIN_CHARS};
use crate::error::{Error, Result};

pub const DEFAULT_ROOT: &str = "./postman-twitter-api-master";
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSettings {
    pub root: String,
    pub min_chars: usize,
    pub extension: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            min_chars: DEFAULT_MIN_CHARS,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedSettings {
    pub model_dir: Option<String>,
    pub model_name: String,
    pub max_len: usize,
    pub batch_size: usize,
    pub fake: bool,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            model_dir: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_len: 256,
            batch_size: 32,
            fake: false,
        }
    }
}

impl EmbedSettings {
    /// The configured model directory with `~` and env vars expanded.
    pub fn model_dir_path(&self) -> Option<PathBuf> { self.model_dir.as_deref().map(expand_path) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self { Self { top_k: DEFAULT_TOP_K } }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub corpus: CorpusSettings,
    #[serde(default)]
    pub embed: EmbedSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.search.top_k == 0 {
            return Err(Error::InvalidConfig("search.top_k must be at least 1".into()));
        }
        if self.embed.batch_size == 0 {
            return Err(Error::InvalidConfig("embed.batch_size must be at least 1".into()));
        }
        if self.embed.max_len == 0 {
            return Err(Error::InvalidConfig("embed.max_len must be at least 1".into()));
        }
        if self.corpus.extension.is_empty() {
            return Err(Error::InvalidConfig("corpus.extension must not be empty".into()));
        }
        Ok(())
    }

    pub fn corpus_root(&self) -> PathBuf { expand_path(&self.corpus.root) }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("jsonsearch.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("jsonsearch.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("jsonsearch.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("jsonsearch.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extracts and validates the full [`Settings`] tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
