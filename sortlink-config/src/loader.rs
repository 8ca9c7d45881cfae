use crate::models::{ConfigSource, SortingConfig};
use anyhow::{Context, anyhow};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const CONFIG_PATH_VAR: &str = "SORTLINK_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "SORTLINK_CONFIG_JSON";

const DEFAULT_FILES: &[&str] =
    &["sortlink.toml", "sortlink.json", "config/sortlink.toml"];

impl SortingConfig {
    /// Load sorting configuration using environment variables.
    /// Evaluation order:
    /// 1) `$SORTLINK_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$SORTLINK_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// Same as [`SortingConfig::load_from_env`], reading variables through
    /// `lookup` and default files relative to `root`.
    pub fn load_with<F>(
        lookup: F,
        root: &Path,
    ) -> anyhow::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, source) = Self::locate(lookup, root)?;
        config
            .validate()
            .with_context(|| format!("invalid sorting config from {source:?}"))?;
        debug!(?source, "loaded sorting config");
        Ok((config, source))
    }

    fn locate<F>(lookup: F, root: &Path) -> anyhow::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_VAR)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_VAR)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(root) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read sorting config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid sorting config {}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid sorting config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parse TOML, falling back to JSON.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse sorting config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid sorting config json: {err}"))
    }

    fn find_default_file(root: &Path) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }
}
