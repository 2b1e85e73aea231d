//! HTTP surface: `GET /feed/{handle}` serves RSS, everything else comes from
//! the static asset directory.

use crate::cache::TimelineCache;
use crate::error::{Error, Result};
use crate::render::{render_feed, RSS_CONTENT_TYPE};
use crate::timeline::{resolve_timeline, ResolvedTimeline};
use crate::twitter::TwitterApi;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

/// Cache-first access to resolved timelines and their rendered feeds.
///
/// Built once at startup and shared by every request.
pub struct FeedService {
    api: Arc<dyn TwitterApi>,
    cache: TimelineCache,
}

impl FeedService {
    pub fn new(api: Arc<dyn TwitterApi>, cache: TimelineCache) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &TimelineCache {
        &self.cache
    }

    /// The cached timeline of `handle`, resolving and caching it on a miss.
    /// Failed resolutions are not cached.
    pub async fn timeline(&self, handle: &str) -> Result<Arc<ResolvedTimeline>> {
        if let Some(timeline) = self.cache.get(handle) {
            debug!(handle, "cache hit");
            return Ok(timeline);
        }

        info!(handle, "cache miss, resolving timeline");
        let timeline = Arc::new(resolve_timeline(self.api.as_ref(), handle).await?);
        self.cache.put(handle, Arc::clone(&timeline));
        Ok(timeline)
    }

    pub async fn feed(&self, handle: &str) -> Result<String> {
        let timeline = self.timeline(handle).await?;
        let xml = render_feed(handle, &timeline)?;
        debug!(handle, entries = timeline.len(), bytes = xml.len(), "rendered feed");
        Ok(xml)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Credential(_) | Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Builds the router: the feed route, with `public_dir` as the fallback.
pub fn router(service: Arc<FeedService>, public_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/feed/:handle", get(feed_handler))
        .with_state(service)
        .fallback_service(ServeDir::new(public_dir.into()))
}

async fn feed_handler(
    State(service): State<Arc<FeedService>>,
    Path(handle): Path<String>,
) -> Result<Response> {
    match service.feed(&handle).await {
        Ok(xml) => Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response()),
        Err(err) => {
            error!(handle = %handle, "feed request failed: {}", err);
            Err(err)
        }
    }
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
