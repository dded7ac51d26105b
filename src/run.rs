//! A single end-to-end run: read the message, find where it's going, and
//! post it.

use crate::{
    config::Config,
    error::{connectivity, transport, Failure},
    mattermost::{
        post::NewPost, system::is_supported_version, MattermostClient, MattermostError,
    },
    message::Draft,
    target::{resolve, resolve_team, Resolution, USER_PREFIX},
};
use std::{io::Read, path::PathBuf};
use tracing::{debug, info};

/// Everything asked of a run, fixed up front.
#[derive(Debug)]
pub struct Invocation {
    pub config_path: PathBuf,
    /// Overrides the config's default channel. Either a channel name or
    /// `@username`.
    pub channel: Option<String>,
    pub code_block: bool,
    pub attachment: Option<PathBuf>,
}

/// Post the message read from `input`.
///
/// Local problems (bad input, a missing attachment, a broken config) are
/// reported before anything is sent over the network. Each call to the server
/// is made at most once and the first failure ends the run.
pub async fn run<R: Read>(inv: Invocation, input: R) -> Result<(), Failure> {
    let draft = Draft::read(input, inv.code_block, inv.attachment)?;
    debug!("Message is {} characters", draft.text().chars().count());

    let config = Config::load(&inv.config_path)?;
    let target = config.channel(inv.channel.as_deref())?;

    let mut client = MattermostClient::new(config.api_base.clone());

    info!("Connecting to Mattermost server at {}..", client.base());
    let version = client
        .ping()
        .await
        .map_err(connectivity("Failed to connect to Mattermost"))?;

    info!("Server at {} is running version {}", client.base(), version);
    if !is_supported_version(&version) {
        return Err(connectivity("Failed to connect to Mattermost")(
            MattermostError::UnsupportedVersion(version),
        ));
    }

    info!("Logging in..");
    client
        .login(&config.user, &config.password)
        .await
        .map_err(connectivity("Failed to login to Mattermost"))?;

    info!("Loading teams..");
    let teams = client
        .get_teams()
        .await
        .map_err(transport("Failed to get initial Mattermost data"))?;
    let team = resolve_team(&teams, &config.team)?;

    info!("Pulling list of channels..");
    let channels = client
        .get_channels(&team.id)
        .await
        .map_err(transport("Failed to pull channel list"))?;

    // Users are only needed to address a direct message.
    let users = if target.starts_with(USER_PREFIX) {
        info!("Pulling user profiles..");
        client
            .get_user_profiles(&team.id)
            .await
            .map_err(transport("Failed to pull user profiles"))?
    } else {
        Vec::new()
    };

    info!("Scanning for '{}'..", target);
    let channel_id = match resolve(target, &channels, &users)? {
        Resolution::Channel(id) => id.clone(),
        Resolution::CreateDirect(user) => {
            info!("Creating new direct message channel with '{}'..", user.username);
            client
                .create_direct_channel(&user.id)
                .await
                .map_err(transport("Failed to create direct message channel"))?
                .id
        }
    };

    if let Some(path) = draft.attachment() {
        info!("Attachment was specified, reading bytes from {}", path.display());
    }
    let payload = draft.assemble(&channel_id)?;

    // The upload must succeed before we post anything referencing it.
    let file_ids = match payload.attachment {
        Some(multipart) => {
            info!("Uploading attachment of {} bytes..", multipart.body().len());
            let content_type = multipart.content_type();
            client
                .upload_attachment(multipart.into_body(), &content_type)
                .await
                .map_err(transport("Failed to upload file"))?
        }
        None => Vec::new(),
    };

    info!("Posting message of {} bytes..", payload.text.len());
    let post = client
        .create_post(&NewPost {
            channel_id: &channel_id,
            message: &payload.text,
            file_ids: &file_ids,
        })
        .await
        .map_err(transport("Failed to post message"))?;

    debug!("Created post {}", post.id);

    Ok(())
}
