//! The JSON config file holding the server's location and the bot's
//! credentials.
//!
//! ```json
//! {
//!     "mattermost_api": "<mattermost url WITHOUT /api/v4>",
//!     "mattermost_user": "<username or email address>",
//!     "mattermost_password": "<password>",
//!     "mattermost_team": "<team name>",
//!     "default_channel": "<default channel if not provided>"
//! }
//! ```

use crate::mattermost::api::API_PREFIX;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use url::Url;

/// Where the config lives when no other path is given, relative to the
/// user's home directory.
pub const DEFAULT_PATH: &str = ".config/mmmsg.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config failed to load from {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("Config failed to parse from {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Config has no value for key '{0}'")]
    MissingKey(&'static str),
    #[error("Config has an invalid URL for key 'mattermost_api': {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Failed to identify config path: no home directory")]
    NoHome,
    #[error("No channel given and config has no value for key 'default_channel'")]
    NoChannel,
}

/// The config file exactly as written.
#[serde_as]
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    mattermost_api: String,
    #[serde(default)]
    mattermost_user: String,
    #[serde(default)]
    mattermost_password: String,
    #[serde(default)]
    mattermost_team: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    default_channel: Option<String>,
}

/// A loaded and validated config.
#[derive(Clone, Debug)]
pub struct Config {
    /// The server's base URL, without a trailing slash or API prefix.
    pub api_base: String,
    pub user: String,
    pub password: String,
    pub team: String,
    pub default_channel: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_owned(),
            source,
        })?;

        let raw: RawConfig =
            serde_json::from_slice(&data).map_err(|source| ConfigError::Malformed {
                path: path.to_owned(),
                source,
            })?;

        Config::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let required = [
            ("mattermost_api", &raw.mattermost_api),
            ("mattermost_user", &raw.mattermost_user),
            ("mattermost_password", &raw.mattermost_password),
            ("mattermost_team", &raw.mattermost_team),
        ];

        if let Some((key, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::MissingKey(*key));
        }

        Ok(Config {
            api_base: normalise_api_url(&raw.mattermost_api)?,
            user: raw.mattermost_user,
            password: raw.mattermost_password,
            team: raw.mattermost_team,
            default_channel: raw.default_channel,
        })
    }

    /// The channel to post in: the one requested, falling back to the
    /// configured default.
    pub fn channel<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, ConfigError> {
        requested
            .filter(|c| !c.is_empty())
            .or(self.default_channel.as_deref())
            .ok_or(ConfigError::NoChannel)
    }
}

/// Validate the server URL and strip it back to its base, tolerating a
/// trailing slash or an included API prefix.
///
/// ```
/// assert_eq!(
///     normalise_api_url("https://chat.example.com/api/v4/").unwrap(),
///     "https://chat.example.com"
/// );
/// ```
pub fn normalise_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim())?;

    let base = url.as_str().trim_end_matches('/');
    let base = base.strip_suffix(API_PREFIX).unwrap_or(base);

    Ok(base.trim_end_matches('/').to_owned())
}

/// `$HOME/.config/mmmsg.json`.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_PATH))
        .ok_or(ConfigError::NoHome)
}
