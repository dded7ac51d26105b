use crate::{
    config::ConfigError, mattermost::MattermostError, message::AssemblyError,
    target::ResolutionError,
};
use thiserror::Error;

/// Sum type representing every way a run can fail. None are retried; each
/// renders as a single line.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Reaching, authenticating with, or agreeing a version with the server.
    #[error("{action}: {source}")]
    Connectivity {
        action: &'static str,
        source: MattermostError,
    },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    /// Any other exchange with the server once logged in.
    #[error("{action}: {source}")]
    Transport {
        action: &'static str,
        source: MattermostError,
    },
}

/// Wrap a client error as a connectivity failure, for use with `map_err`.
pub fn connectivity(action: &'static str) -> impl FnOnce(MattermostError) -> Failure {
    move |source| Failure::Connectivity { action, source }
}

/// Wrap a client error as a transport failure, for use with `map_err`.
pub fn transport(action: &'static str) -> impl FnOnce(MattermostError) -> Failure {
    move |source| Failure::Transport { action, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_messages() {
        let failures = vec![
            Failure::from(ConfigError::MissingKey("mattermost_team")),
            connectivity("Failed to login to Mattermost")(MattermostError::APIResponseError {
                status: 401,
                message: "Enter a valid email or username and/or password.".into(),
            }),
            Failure::from(ResolutionError::UnknownChannel("dev".into())),
            Failure::from(AssemblyError::EmptyInput),
            transport("Failed to post message")(MattermostError::MissingHeader("Token")),
        ];

        let messages: Vec<String> = failures.iter().map(ToString::to_string).collect();

        assert_eq!(
            messages,
            vec![
                "Config has no value for key 'mattermost_team'",
                "Failed to login to Mattermost: Mattermost API returned error (401): Enter a valid email or username and/or password.",
                "Failed to find channel with name 'dev'",
                "No stdin provided for message",
                "Failed to post message: Mattermost API response was missing the `Token` header",
            ]
        );
        assert!(messages.iter().all(|m| !m.contains('\n')));
    }
}
