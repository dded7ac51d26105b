//! Teams the logged in user belongs to.

use super::{
    api::{decode, MattermostClient},
    error::MattermostError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata we care about per-team.
#[derive(Clone, Debug, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl MattermostClient {
    /// Every team the logged in user is a member of.
    ///
    /// <https://api.mattermost.com/#tag/teams/operation/GetTeamsForUser>
    pub async fn get_teams(&self) -> Result<Vec<Team>, MattermostError> {
        let res = self.get("/users/me/teams").send().await?;

        decode(res).await
    }
}

/// Find a team by its (URL-safe) name. Should the server ever return more
/// than one team with the same name the first wins.
pub fn find_team<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: TeamId(id.into()),
            name: name.into(),
        }
    }

    #[test]
    fn test_find_team() {
        let teams = vec![
            team("t1", "engineering"),
            team("t2", "design"),
            team("t3", "engineering"),
        ];

        assert_eq!(
            find_team(&teams, "engineering").map(|t| &t.id),
            Some(&TeamId("t1".into()))
        );
        assert_eq!(
            find_team(&teams, "design").map(|t| &t.id),
            Some(&TeamId("t2".into()))
        );
        assert!(find_team(&teams, "Engineering").is_none());
        assert!(find_team(&[], "engineering").is_none());
    }

    #[tokio::test]
    async fn test_get_teams() {
        let mut srv = mockito::Server::new_async().await;
        let mock = srv
            .mock("GET", "/api/v4/users/me/teams")
            .with_body(
                r#"[
                    {"id": "t1", "name": "engineering", "display_name": "Engineering"},
                    {"id": "t2", "name": "design", "display_name": "Design"}
                ]"#,
            )
            .create_async()
            .await;

        let teams = MattermostClient::new(srv.url()).get_teams().await.unwrap();

        mock.assert_async().await;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[1].name, "design");
    }
}
