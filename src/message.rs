//! Assemble the message to post from raw input, plus the optional file
//! upload that accompanies it.
//!
//! Assembly happens in two steps. A [Draft] is read before we ever talk to
//! the server, so that bad input fails fast. Once the destination channel is
//! known the draft is [assembled](Draft::assemble) into a [MessagePayload],
//! which is when any attachment is read from disk.

use crate::mattermost::channel::ChannelId;
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

/// The most characters (Unicode code points, not bytes) a message may hold.
pub const CHARACTER_LIMIT: usize = 4000;

/// Surrounds text to have it rendered as preformatted.
pub const CODE_FENCE: &str = "```";

/// Room reserved for both fences and their newlines when wrapping a message
/// in a code block.
const CODE_BLOCK_OVERHEAD: usize = 8;

/// Used for attachments we can't guess a more specific type for.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Attachment file {} does not exist", .0.display())]
    AttachmentMissing(PathBuf),
    #[error("Failed to read attachment file {}: {source}", .path.display())]
    AttachmentUnreadable { path: PathBuf, source: io::Error },
    #[error("No stdin provided for message")]
    EmptyInput,
    #[error("Failed to read message from stdin: {0}")]
    InputUnreadable(io::Error),
}

/// A message whose text is final, but which hasn't yet been addressed to a
/// channel.
#[derive(Debug)]
pub struct Draft {
    text: String,
    attachment: Option<PathBuf>,
}

impl Draft {
    /// Read the whole of `input` as the message body.
    ///
    /// The attachment, if any, is checked for existence before `input` is
    /// touched.
    pub fn read<R: Read>(
        mut input: R,
        code_block: bool,
        attachment: Option<PathBuf>,
    ) -> Result<Self, AssemblyError> {
        if let Some(path) = &attachment {
            ensure_exists(path)?;
        }

        let mut raw = Vec::new();
        input
            .read_to_end(&mut raw)
            .map_err(AssemblyError::InputUnreadable)?;

        Ok(Draft {
            text: build_text(&raw, code_block)?,
            attachment,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.attachment.as_deref()
    }

    /// Address the draft to a channel, reading and packaging the attachment
    /// if there is one.
    pub fn assemble(self, channel: &ChannelId) -> Result<MessagePayload, AssemblyError> {
        let attachment = match &self.attachment {
            Some(path) => Some(Attachment::read(path)?.into_multipart(channel)),
            None => None,
        };

        Ok(MessagePayload {
            text: self.text,
            attachment,
        })
    }
}

/// Everything needed to post a message.
#[derive(Debug)]
pub struct MessagePayload {
    pub text: String,
    /// An upload body carrying the attachment and its destination channel.
    pub attachment: Option<Multipart>,
}

/// Fail only if nothing is at `path`. Any other trouble with the file
/// surfaces when it's read.
pub fn ensure_exists(path: &Path) -> Result<(), AssemblyError> {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(AssemblyError::AttachmentMissing(path.to_owned()))
        }
        _ => Ok(()),
    }
}

/// Decode, truncate, and optionally wrap raw input as message text.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn build_text(raw: &[u8], code_block: bool) -> Result<String, AssemblyError> {
    let limit = if code_block {
        CHARACTER_LIMIT - CODE_BLOCK_OVERHEAD
    } else {
        CHARACTER_LIMIT
    };

    let decoded = String::from_utf8_lossy(raw);
    if decoded.is_empty() {
        return Err(AssemblyError::EmptyInput);
    }

    let text = truncate(&decoded, limit);

    Ok(if code_block {
        format!("{}\n{}\n{}", CODE_FENCE, text, CODE_FENCE)
    } else {
        text.to_owned()
    })
}

/// Cut `s` down to at most `limit` code points, never splitting one.
///
/// ```
/// assert_eq!(truncate("héllo", 2), "hé");
/// ```
pub fn truncate(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// A local file read fully into memory, ready for upload.
#[derive(Debug)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// The file handle is closed before this returns, whatever the outcome.
    pub fn read(path: &Path) -> Result<Self, AssemblyError> {
        let bytes = fs::read(path).map_err(|source| AssemblyError::AttachmentUnreadable {
            path: path.to_owned(),
            source,
        })?;

        Ok(Attachment {
            filename: base_filename(path),
            content_type: content_type_for(path),
            bytes,
        })
    }

    /// Build the upload body Mattermost expects: the file itself under
    /// `files`, followed by the `channel_id` it's destined for.
    pub fn into_multipart(self, channel: &ChannelId) -> Multipart {
        let mut w = MultipartWriter::new();
        w.file("files", &self.filename, &self.content_type, &self.bytes);
        w.field("channel_id", &channel.0);
        w.finish()
    }
}

fn base_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Guess a content type from the file extension.
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_owned())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_owned())
}

/// Make a filename safe to embed in a quoted header parameter.
///
/// ```
/// assert_eq!(escape_quoted(r#"a "b" \c"#), r#"a \"b\" \\c"#);
/// ```
pub fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            // A line break would end the header early.
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}

/// A finished `multipart/form-data` body.
#[derive(Debug)]
pub struct Multipart {
    boundary: String,
    body: Vec<u8>,
}

impl Multipart {
    /// The `Content-Type` header value to send alongside the body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary())
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Writes parts one after another. The body can only be closed once, by
/// [MultipartWriter::finish], which consumes the writer.
struct MultipartWriter {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartWriter {
    fn new() -> Self {
        MultipartWriter {
            boundary: Uuid::new_v4().simple().to_string(),
            body: Vec::new(),
        }
    }

    fn file(&mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
        self.part(
            &format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}",
                escape_quoted(name),
                escape_quoted(filename),
                content_type
            ),
            bytes,
        );
    }

    fn field(&mut self, name: &str, value: &str) {
        self.part(
            &format!(
                "Content-Disposition: form-data; name=\"{}\"",
                escape_quoted(name)
            ),
            value.as_bytes(),
        );
    }

    fn part(&mut self, headers: &str, content: &[u8]) {
        self.body
            .extend_from_slice(format!("--{}\r\n{}\r\n\r\n", self.boundary, headers).as_bytes());
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
    }

    fn finish(mut self) -> Multipart {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        Multipart {
            boundary: self.boundary,
            body: self.body,
        }
    }
}
