//! User profiles within a team.

use super::{
    api::{decode, MattermostClient},
    error::MattermostError,
    team::TeamId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata we care about per-user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
}

/// <https://api.mattermost.com/#tag/users/operation/GetUsers>
#[derive(Serialize)]
struct ListRequest<'a> {
    in_team: &'a TeamId,
    page: u32,
    /// Maximum supported is 200.
    per_page: u32,
}

const PER_PAGE: u32 = 200;

impl MattermostClient {
    /// Every user in a team, paging through the full list in the order the
    /// server returns it.
    pub async fn get_user_profiles(
        &self,
        team: &TeamId,
    ) -> Result<Vec<UserProfile>, MattermostError> {
        let mut users: Vec<UserProfile> = Vec::new();
        let mut page = 0;

        loop {
            let res = self
                .get("/users")
                .query(&ListRequest {
                    in_team: team,
                    page,
                    per_page: PER_PAGE,
                })
                .send()
                .await?;

            let mut batch: Vec<UserProfile> = decode(res).await?;
            let is_last = batch.len() < PER_PAGE as usize;
            users.append(&mut batch);

            if is_last {
                break Ok(users);
            }

            page += 1;
        }
    }
}

/// Find a user by exact, case-sensitive username. The first match wins.
pub fn find_user<'a>(users: &'a [UserProfile], username: &str) -> Option<&'a UserProfile> {
    users.iter().find(|u| u.username == username)
}
