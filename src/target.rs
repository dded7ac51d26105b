//! Turn a human supplied target into the channel a message should land in.
//!
//! A target is either a plain channel name (`town-square`) or a username
//! prefixed with `@` (`@alice`), the latter meaning a direct message. All
//! lookups are linear scans over the lists exactly as the server returned
//! them; whenever more than one entry matches, the first wins.

use crate::mattermost::{
    channel::{Channel, ChannelId},
    team::{find_team, Team},
    user::{find_user, UserProfile},
};
use thiserror::Error;
use tracing::info;

/// Marks a target as a username rather than a channel name.
pub const USER_PREFIX: char = '@';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Bot does not appear to be a member of the team '{0}'")]
    UnknownTeam(String),
    #[error("Failed to find channel with name '{0}'")]
    UnknownChannel(String),
}

/// The outcome of a successful resolution.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// An existing channel, either named directly or a direct channel
    /// already open with the target user.
    Channel(&'a ChannelId),
    /// The target user exists but there's no direct channel with them yet;
    /// one must be created before posting.
    CreateDirect(&'a UserProfile),
}

/// Select the configured team from those the bot belongs to.
pub fn resolve_team<'a>(teams: &'a [Team], name: &str) -> Result<&'a Team, ResolutionError> {
    find_team(teams, name).ok_or_else(|| ResolutionError::UnknownTeam(name.to_owned()))
}

/// Resolve `target` against a team's channels and users.
///
/// An `@username` target with no such user isn't an error: channel names may
/// themselves begin with `@`, so we fall back to matching the whole target,
/// prefix included, as a channel name.
pub fn resolve<'a>(
    target: &str,
    channels: &'a [Channel],
    users: &'a [UserProfile],
) -> Result<Resolution<'a>, ResolutionError> {
    if let Some(username) = target.strip_prefix(USER_PREFIX) {
        if let Some(user) = find_user(users, username) {
            return Ok(find_direct_channel(channels, user)
                .map(|c| Resolution::Channel(&c.id))
                .unwrap_or(Resolution::CreateDirect(user)));
        }
        info!("No user by the name '{}', maybe it's just a channel", username);
    }

    // Historically this matched the configured default channel rather than
    // the requested target, ignoring `--channel` for anything but usernames.
    // We match the target, which is the same key whenever no override is
    // given.
    find_channel(channels, target)
        .map(|c| Resolution::Channel(&c.id))
        .ok_or_else(|| ResolutionError::UnknownChannel(target.to_owned()))
}

/// The first channel with exactly the given name.
pub fn find_channel<'a>(channels: &'a [Channel], name: &str) -> Option<&'a Channel> {
    channels.iter().find(|c| c.name == name)
}

/// The first direct channel between the bot and `user`.
pub fn find_direct_channel<'a>(channels: &'a [Channel], user: &UserProfile) -> Option<&'a Channel> {
    channels.iter().find(|c| c.is_direct_with(&user.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mattermost::{
        channel::ChannelType,
        team::TeamId,
        user::UserId,
    };

    fn channel(id: &str, name: &str, typ: ChannelType) -> Channel {
        Channel {
            id: ChannelId(id.into()),
            name: name.into(),
            typ,
        }
    }

    fn user(id: &str, username: &str) -> UserProfile {
        UserProfile {
            id: UserId(id.into()),
            username: username.into(),
        }
    }

    fn channels() -> Vec<Channel> {
        vec![
            channel("c-town", "town-square", ChannelType::Open),
            channel("c-dev", "dev", ChannelType::Open),
            channel("c-dm-bob", "bot__u-bob", ChannelType::Direct),
            channel("c-broken", "u-carol", ChannelType::Direct),
            channel("c-at", "@announcements", ChannelType::Open),
            channel("c-dev-2", "dev", ChannelType::Open),
        ]
    }

    fn users() -> Vec<UserProfile> {
        vec![
            user("bot", "bot"),
            user("u-alice", "alice"),
            user("u-bob", "bob"),
            user("u-carol", "carol"),
        ]
    }

    fn resolved_id(res: Result<Resolution<'_>, ResolutionError>) -> Option<String> {
        match res {
            Ok(Resolution::Channel(id)) => Some(id.0.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_channel_name() {
        let (cs, us) = (channels(), users());

        assert_eq!(
            resolved_id(resolve("town-square", &cs, &us)),
            Some("c-town".into())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let (cs, us) = (channels(), users());

        assert_eq!(resolved_id(resolve("dev", &cs, &us)), Some("c-dev".into()));
    }

    #[test]
    fn test_channel_names_are_exact() {
        let (cs, us) = (channels(), users());

        assert_eq!(
            resolve("Town-Square", &cs, &us),
            Err(ResolutionError::UnknownChannel("Town-Square".into()))
        );
        assert_eq!(
            resolve("#dev", &cs, &us),
            Err(ResolutionError::UnknownChannel("#dev".into()))
        );
    }

    #[test]
    fn test_existing_direct_channel() {
        let (cs, us) = (channels(), users());

        assert_eq!(
            resolved_id(resolve("@bob", &cs, &us)),
            Some("c-dm-bob".into())
        );
    }

    #[test]
    fn test_direct_channel_either_order() {
        let cs = vec![channel("c-dm", "u-alice__bot", ChannelType::Direct)];
        let us = users();

        assert_eq!(resolved_id(resolve("@alice", &cs, &us)), Some("c-dm".into()));
    }

    #[test]
    fn test_direct_channel_wins_over_channel_name() {
        let cs = vec![
            channel("c-named", "@bob", ChannelType::Open),
            channel("c-dm", "bot__u-bob", ChannelType::Direct),
        ];
        let us = users();

        assert_eq!(resolved_id(resolve("@bob", &cs, &us)), Some("c-dm".into()));
    }

    #[test]
    fn test_missing_direct_channel_requires_creation() {
        let (cs, us) = (channels(), users());

        match resolve("@alice", &cs, &us) {
            Ok(Resolution::CreateDirect(u)) => assert_eq!(u.id, UserId("u-alice".into())),
            _ => panic!("expected a direct channel to be created"),
        }
    }

    #[test]
    fn test_malformed_direct_channel_name_is_skipped() {
        let (cs, us) = (channels(), users());

        // `c-broken` is named after carol's ID alone and so must not match.
        match resolve("@carol", &cs, &us) {
            Ok(Resolution::CreateDirect(u)) => assert_eq!(u.username, "carol"),
            _ => panic!("expected a direct channel to be created"),
        }
    }

    #[test]
    fn test_non_direct_channel_never_matches_user() {
        let cs = vec![channel("c-group", "bot__u-bob", ChannelType::Group)];
        let us = users();

        assert!(matches!(
            resolve("@bob", &cs, &us),
            Ok(Resolution::CreateDirect(_))
        ));
    }

    #[test]
    fn test_unknown_user_falls_back_to_channel_name() {
        let (cs, us) = (channels(), users());

        assert_eq!(
            resolved_id(resolve("@announcements", &cs, &us)),
            Some("c-at".into())
        );
        assert_eq!(
            resolve("@nobody", &cs, &us),
            Err(ResolutionError::UnknownChannel("@nobody".into()))
        );
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (cs, us) = (channels(), users());

        assert_eq!(
            resolve("@Bob", &cs, &us),
            Err(ResolutionError::UnknownChannel("@Bob".into()))
        );
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(
            resolve("town-square", &[], &[]),
            Err(ResolutionError::UnknownChannel("town-square".into()))
        );
        assert_eq!(
            resolve("@bob", &[], &[]),
            Err(ResolutionError::UnknownChannel("@bob".into()))
        );
        assert_eq!(
            resolve("", &[], &[]),
            Err(ResolutionError::UnknownChannel("".into()))
        );
    }

    #[test]
    fn test_resolve_team() {
        let teams = vec![
            Team {
                id: TeamId("t1".into()),
                name: "engineering".into(),
            },
            Team {
                id: TeamId("t2".into()),
                name: "engineering".into(),
            },
        ];

        assert_eq!(
            resolve_team(&teams, "engineering").map(|t| &t.id),
            Ok(&TeamId("t1".into()))
        );
        assert_eq!(
            resolve_team(&teams, "design").map(|t| &t.id),
            Err(ResolutionError::UnknownTeam("design".into()))
        );
    }

    quickcheck! {
        fn test_resolve_never_panics(target: String, names: Vec<String>, usernames: Vec<String>) -> () {
            let cs: Vec<Channel> = names
                .iter()
                .enumerate()
                .map(|(i, n)| channel(&i.to_string(), n, ChannelType::Direct))
                .collect();
            let us: Vec<UserProfile> = usernames
                .iter()
                .enumerate()
                .map(|(i, n)| user(&i.to_string(), n))
                .collect();

            let _ = resolve(&target, &cs, &us);
        }
    }
}
