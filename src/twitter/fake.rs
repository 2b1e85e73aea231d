//! In-memory [`TwitterApi`] for tests: canned timelines and tweets, call
//! counters, and optional per-tweet delays to shuffle completion order.

use super::error::{ApiError, ApiErrors, TwitterError};
use super::{Post, TwitterApi};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Lookup {
    Found(Post),
    Codes(Vec<u32>),
    Unstructured,
}

#[derive(Default)]
pub(crate) struct FakeTwitter {
    timelines: HashMap<String, Vec<Post>>,
    tweets: HashMap<String, Lookup>,
    delays: HashMap<String, Duration>,
    timeline_calls: AtomicUsize,
    show_calls: AtomicUsize,
    pub(crate) completed: Mutex<Vec<String>>,
}

impl FakeTwitter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_timeline(mut self, handle: &str, posts: Vec<Post>) -> Self {
        self.timelines.insert(handle.to_string(), posts);
        self
    }

    pub(crate) fn with_tweet(mut self, post: Post) -> Self {
        self.tweets.insert(post.id.clone(), Lookup::Found(post));
        self
    }

    pub(crate) fn with_error(mut self, id: &str, codes: &[u32]) -> Self {
        self.tweets.insert(id.to_string(), Lookup::Codes(codes.to_vec()));
        self
    }

    pub(crate) fn with_unstructured_error(mut self, id: &str) -> Self {
        self.tweets.insert(id.to_string(), Lookup::Unstructured);
        self
    }

    pub(crate) fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    pub(crate) fn timeline_calls(&self) -> usize {
        self.timeline_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }
}

fn api_errors(codes: &[u32]) -> TwitterError {
    TwitterError::Api(ApiErrors {
        errors: codes
            .iter()
            .map(|&code| ApiError {
                code,
                message: format!("error {}", code),
            })
            .collect(),
    })
}

#[async_trait]
impl TwitterApi for FakeTwitter {
    async fn user_timeline(&self, screen_name: &str) -> Result<Vec<Post>, TwitterError> {
        self.timeline_calls.fetch_add(1, Ordering::SeqCst);
        self.timelines
            .get(screen_name)
            .cloned()
            .ok_or_else(|| api_errors(&[34]))
    }

    async fn show(&self, id: &str) -> Result<Post, TwitterError> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().unwrap().push(id.to_string());

        match self.tweets.get(id) {
            Some(Lookup::Found(post)) => Ok(post.clone()),
            Some(Lookup::Codes(codes)) => Err(api_errors(codes)),
            Some(Lookup::Unstructured) => Err(TwitterError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "Internal Error".to_string(),
            }),
            None => Err(api_errors(&[144])),
        }
    }
}

/// Shorthand for a plain tweet.
pub(crate) fn post(id: &str, author: &str, text: &str) -> Post {
    Post {
        id: id.to_string(),
        author: author.to_string(),
        full_text: text.to_string(),
        created_at: "Wed Oct 10 20:19:24 +0000 2018".to_string(),
        in_reply_to: None,
        retweeted: None,
        hashtags: Vec::new(),
    }
}

pub(crate) fn reply(id: &str, author: &str, text: &str, parent: &str) -> Post {
    Post {
        in_reply_to: Some(parent.to_string()),
        ..post(id, author, text)
    }
}
