use super::auth::{self, BearerToken, Credentials};
use super::error::TwitterError;
use super::{Post, TwitterApi};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const TWITTER_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_TIMELINE_COUNT: u32 = 200;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Twitter v1.1 REST client authorized with an application bearer token.
pub struct TwitterClient {
    client: reqwest::Client,
    api_base: String,
    token: BearerToken,
    timeline_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id_str: String,
    full_text: String,
    created_at: String,
    user: ApiUser,
    #[serde(default)]
    in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    retweeted_status: Option<Box<ApiTweet>>,
    #[serde(default)]
    entities: ApiEntities,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    screen_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiEntities {
    #[serde(default)]
    hashtags: Vec<ApiHashtag>,
}

#[derive(Debug, Deserialize)]
struct ApiHashtag {
    text: String,
}

impl From<ApiTweet> for Post {
    fn from(tweet: ApiTweet) -> Self {
        Post {
            id: tweet.id_str,
            author: tweet.user.screen_name,
            full_text: tweet.full_text,
            created_at: tweet.created_at,
            in_reply_to: tweet.in_reply_to_status_id_str,
            retweeted: tweet.retweeted_status.map(|rt| Box::new(Post::from(*rt))),
            hashtags: tweet.entities.hashtags.into_iter().map(|h| h.text).collect(),
        }
    }
}

impl TwitterClient {
    /// Builds the HTTP client and performs the one-time bearer token exchange.
    pub async fn connect(
        api_base: impl Into<String>,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, TwitterError> {
        let api_base = api_base.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tweetrss/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = auth::acquire_bearer_token(&client, &api_base, credentials).await?;
        Ok(Self::with_token(client, api_base, token))
    }

    pub fn with_token(client: reqwest::Client, api_base: impl Into<String>, token: BearerToken) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            timeline_count: DEFAULT_TIMELINE_COUNT,
        }
    }

    pub fn timeline_count(mut self, count: u32) -> Self {
        self.timeline_count = count;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TwitterError> {
        let url = format!("{}/1.1/{}", self.api_base, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TwitterError::from_response_body(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn user_timeline(&self, screen_name: &str) -> Result<Vec<Post>, TwitterError> {
        let count = self.timeline_count.to_string();
        let tweets: Vec<ApiTweet> = self
            .get_json(
                "statuses/user_timeline.json",
                &[
                    ("screen_name", screen_name),
                    ("tweet_mode", "extended"),
                    ("count", &count),
                ],
            )
            .await?;

        Ok(tweets.into_iter().map(Post::from).collect())
    }

    async fn show(&self, id: &str) -> Result<Post, TwitterError> {
        let path = format!("statuses/show/{}.json", urlencoding::encode(id));
        let tweet: ApiTweet = self.get_json(&path, &[("tweet_mode", "extended")]).await?;
        Ok(tweet.into())
    }
}
