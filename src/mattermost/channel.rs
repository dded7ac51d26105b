//! Interact with Mattermost channels, including the ability to open a direct
//! message channel with another user.

use super::{
    api::{decode, MattermostClient},
    error::MattermostError,
    team::TeamId,
    user::UserId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separates the two participants' user IDs in a direct channel's name.
pub const DIRECT_NAME_SEPARATOR: &str = "__";

/// Because channel names can change, channels are generally referred to by
/// their underlying ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Format without the surrounding newtype wrapper.
impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// <https://api.mattermost.com/#tag/channels>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
    #[serde(other)]
    Other,
}

/// The metadata we care about per-channel.
#[derive(Clone, Debug, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: ChannelType,
}

impl Channel {
    /// Whether this is a direct channel with the given user on one end.
    pub fn is_direct_with(&self, user: &UserId) -> bool {
        self.typ == ChannelType::Direct
            && direct_participants(&self.name)
                .is_some_and(|(a, b)| a == user.0 || b == user.0)
    }
}

/// Split a direct channel's name into its two participants' user IDs, which
/// appear in no particular order. Anything that isn't exactly two parts is
/// malformed.
///
/// ```
/// assert_eq!(direct_participants("abc__xyz"), Some(("abc", "xyz")));
/// assert_eq!(direct_participants("abc"), None);
/// ```
pub fn direct_participants(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split(DIRECT_NAME_SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

impl MattermostClient {
    /// Every channel in a team that the logged in user is a member of,
    /// including direct channels, in the order the server returns them.
    ///
    /// <https://api.mattermost.com/#tag/channels/operation/GetChannelsForTeamForUser>
    pub async fn get_channels(&self, team: &TeamId) -> Result<Vec<Channel>, MattermostError> {
        let res = self
            .get(format!("/users/me/teams/{}/channels", team))
            .send()
            .await?;

        decode(res).await
    }

    /// Open a direct channel between the logged in user and another user.
    /// Mattermost returns the existing channel if there already is one.
    ///
    /// <https://api.mattermost.com/#tag/channels/operation/CreateDirectChannel>
    pub async fn create_direct_channel(&self, user: &UserId) -> Result<Channel, MattermostError> {
        let me = &self.session()?.user_id;

        let res = self
            .post("/channels/direct")
            .json(&[me, user])
            .send()
            .await?;

        decode(res).await
    }
}
