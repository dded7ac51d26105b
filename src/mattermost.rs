//! A deliberately small client for the Mattermost REST API (v4).
//!
//! Only the handful of endpoints needed to post a single message are
//! supported. Every call is made exactly once; there's no retry logic.
//!
//! See [api::MattermostClient].

pub mod api;
pub mod auth;
pub mod channel;
pub mod error;
pub mod post;
pub mod system;
pub mod team;
pub mod user;

pub use api::MattermostClient;
pub use error::MattermostError;
