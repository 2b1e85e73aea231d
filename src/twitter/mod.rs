pub mod auth;
pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod fake;

pub use client::TwitterClient;
pub use error::{ApiError, ApiErrors, TwitterError};

use async_trait::async_trait;

/// A tweet, reduced to the fields the feed is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub full_text: String,
    /// Twitter's own `created_at` string, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
    pub created_at: String,
    pub in_reply_to: Option<String>,
    pub retweeted: Option<Box<Post>>,
    pub hashtags: Vec<String>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }
}

/// Read access to the Twitter API, the seam between the resolver and the network.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Most recent tweets of `screen_name`, newest first.
    async fn user_timeline(&self, screen_name: &str) -> Result<Vec<Post>, TwitterError>;

    /// A single tweet by id.
    async fn show(&self, id: &str) -> Result<Post, TwitterError>;
}
