//! Create posts, optionally with previously uploaded files attached.

use super::{
    api::{decode, MattermostClient},
    channel::ChannelId,
    error::MattermostError,
};
use serde::{Deserialize, Serialize};

/// Identifies an uploaded file that's yet to be attached to a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileId(pub String);

/// <https://api.mattermost.com/#tag/posts/operation/CreatePost>
#[derive(Debug, Serialize)]
pub struct NewPost<'a> {
    pub channel_id: &'a ChannelId,
    pub message: &'a str,
    #[serde(skip_serializing_if = "no_files")]
    pub file_ids: &'a [FileId],
}

fn no_files(xs: &&[FileId]) -> bool {
    xs.is_empty()
}

/// <https://api.mattermost.com/#tag/posts/operation/CreatePost>
#[derive(Debug, Deserialize)]
pub struct Post {
    pub id: String,
}

#[derive(Deserialize)]
struct FileInfo {
    id: FileId,
}

/// <https://api.mattermost.com/#tag/files/operation/UploadFile>
#[derive(Deserialize)]
struct UploadResponse {
    file_infos: Vec<FileInfo>,
}

impl MattermostClient {
    /// Upload a prebuilt `multipart/form-data` body, which must carry both the
    /// `files` and `channel_id` fields. `content_type` must name the body's
    /// boundary.
    pub async fn upload_attachment(
        &self,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<FileId>, MattermostError> {
        let res: UploadResponse = decode(
            self.post("/files")
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body)
                .send()
                .await?,
        )
        .await?;

        Ok(res.file_infos.into_iter().map(|f| f.id).collect())
    }

    pub async fn create_post(&self, post: &NewPost<'_>) -> Result<Post, MattermostError> {
        let res = self.post("/posts").json(post).send().await?;

        decode(res).await
    }
}
