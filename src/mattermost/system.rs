//! Server health and version checks.

use super::{
    api::{decode, header, MattermostClient},
    error::MattermostError,
};
use serde::Deserialize;

/// The oldest major release line that serves the v4 API we rely on.
pub const MIN_SERVER_MAJOR: u32 = 5;

/// <https://api.mattermost.com/#tag/system/operation/GetPing>
#[derive(Deserialize)]
struct PingResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_ok")]
    status: String,
}

impl MattermostClient {
    /// Check the server is reachable and healthy, returning the version it
    /// reports.
    pub async fn ping(&self) -> Result<String, MattermostError> {
        let res = self.get("/system/ping").send().await?;

        let version = header(&res, "X-Version-Id");
        let _: PingResponse = decode(res).await?;

        version.ok_or(MattermostError::MissingHeader("X-Version-Id"))
    }
}

/// Whether we can talk to a server reporting the given version.
///
/// Mattermost reports versions in a dotted form with build metadata trailing
/// the release number, e.g. `9.5.0.9.5.0.abc123.false`; only the leading
/// major component matters here.
///
/// ```
/// assert!(is_supported_version("9.5.0.9.5.0.abc123.false"));
/// assert!(!is_supported_version("3.10.0"));
/// ```
pub fn is_supported_version(version: &str) -> bool {
    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse::<u32>().ok())
        .is_some_and(|major| major >= MIN_SERVER_MAJOR)
}
