//! Timeline resolution: fetch a user's tweets and attach the tweet each reply
//! answers.

use crate::twitter::error::{CODE_NOT_AUTHORIZED, CODE_NOT_FOUND};
use crate::twitter::{Post, TwitterApi, TwitterError};
use futures::future::try_join_all;
use tracing::{error, warn};

/// Parent lookup failures that leave the reply in the feed without context.
pub const TOLERATED_CODES: [u32; 2] = [CODE_NOT_FOUND, CODE_NOT_AUTHORIZED];

/// A tweet plus the tweet it replies to, when that one could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub post: Post,
    pub preceding: Option<Post>,
}

/// Resolved tweets in the order the timeline endpoint returned them.
pub type ResolvedTimeline = Vec<ResolvedPost>;

/// Fetches the timeline of `handle` and looks up every reply's parent.
///
/// Parent lookups run concurrently. A lookup that fails with code 144 or 179
/// leaves `preceding` empty; any other failure aborts the whole resolution
/// and the remaining lookups are dropped.
pub async fn resolve_timeline(
    api: &dyn TwitterApi,
    handle: &str,
) -> Result<ResolvedTimeline, TwitterError> {
    let posts = api.user_timeline(handle).await?;

    // try_join_all yields results in input order, whatever order they finish in.
    try_join_all(posts.into_iter().map(|post| resolve_post(api, post))).await
}

async fn resolve_post(api: &dyn TwitterApi, post: Post) -> Result<ResolvedPost, TwitterError> {
    let preceding = match post.in_reply_to.as_deref() {
        None => None,
        Some(parent_id) => match api.show(parent_id).await {
            Ok(parent) => Some(parent),
            Err(err) if is_tolerated(&err) => {
                warn!(post = %post.id, parent = %parent_id, "parent tweet unavailable: {}", err);
                None
            }
            Err(err) => {
                error!(post = %post.id, parent = %parent_id, "parent lookup failed: {}", err);
                return Err(err);
            }
        },
    };

    Ok(ResolvedPost { post, preceding })
}

fn is_tolerated(err: &TwitterError) -> bool {
    err.api_errors()
        .is_some_and(|errors| errors.contains_any(&TOLERATED_CODES))
}
