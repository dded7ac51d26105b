use thiserror::Error;

/// Sum type representing every possible unexceptional fail state when talking
/// to the Mattermost API.
#[derive(Debug, Error)]
pub enum MattermostError {
    #[error("Mattermost API request failed: {0}")]
    APIRequestFailed(#[from] reqwest::Error),
    #[error("Mattermost API returned error ({status}): {message}")]
    APIResponseError { status: u16, message: String },
    #[error("Mattermost API response was missing the `{0}` header")]
    MissingHeader(&'static str),
    #[error("Server version {0} is not supported")]
    UnsupportedVersion(String),
    #[error("Mattermost client is not logged in")]
    NotLoggedIn,
}
