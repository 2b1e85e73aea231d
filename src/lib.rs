//! Serve a Twitter account's recent tweets as an RSS feed.
//!
//! Each request for `/feed/{handle}` reads the handle's timeline (cached for
//! fifteen minutes), looks up the tweet each reply answers, and renders the
//! result with the parent quoted above the reply.

pub mod cache;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod timeline;
pub mod twitter;

pub use cache::TimelineCache;
pub use error::{Error, Result};
pub use server::FeedService;
pub use timeline::{resolve_timeline, ResolvedPost, ResolvedTimeline};
pub use twitter::{Post, TwitterApi, TwitterClient};
