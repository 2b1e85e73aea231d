//! Turns a resolved timeline into an RSS 2.0 document.

use crate::timeline::ResolvedPost;
use crate::twitter::Post;
use chrono::DateTime;
use rss::{Category, Channel, Guid, Item};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Refresh hint advertised to feed readers, in minutes.
pub const FEED_TTL_MINUTES: u32 = 15;

const RETWEET_MARKER: &str = "🔁";

/// Format of Twitter's `created_at`, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write feed: {0}")]
    Write(#[from] rss::Error),

    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders `timeline` as the feed of `handle`.
///
/// Output depends only on the arguments, so the same timeline always
/// renders to the same bytes.
pub fn render_feed(handle: &str, timeline: &[ResolvedPost]) -> Result<String, RenderError> {
    let mut channel = Channel::default();
    channel.set_title(format!("Twitter @{}", handle));
    channel.set_link(String::new());
    channel.set_description(String::new());
    channel.set_ttl(Some(FEED_TTL_MINUTES.to_string()));
    channel.set_items(
        timeline
            .iter()
            .map(|resolved| feed_item(handle, resolved))
            .collect::<Vec<_>>(),
    );

    let bytes = channel.pretty_write_to(Vec::new(), b' ', 2)?;
    Ok(String::from_utf8(bytes)?)
}

fn feed_item(handle: &str, resolved: &ResolvedPost) -> Item {
    let post = &resolved.post;

    let mut guid = Guid::default();
    guid.set_value(post.id.clone());
    guid.set_permalink(false);

    let categories: Vec<Category> = post
        .hashtags
        .iter()
        .map(|tag| {
            let mut category = Category::default();
            category.set_name(tag.clone());
            category
        })
        .collect();

    let mut item = Item::default();
    item.set_title(Some(String::new()));
    item.set_link(Some(status_url(handle, &post.id)));
    item.set_description(Some(entry_body(resolved)));
    item.set_guid(Some(guid));
    item.set_pub_date(Some(pub_date(&post.created_at)));
    item.set_categories(categories);
    item
}

pub fn status_url(handle: &str, id: &str) -> String {
    format!("http://twitter.com/{}/status/{}", handle, id)
}

/// The tweet's text, or the retweeted tweet's text behind a 🔁 marker.
pub fn base_text(post: &Post) -> String {
    match &post.retweeted {
        Some(retweeted) => format!("{}{}", RETWEET_MARKER, retweeted.full_text),
        None => post.full_text.clone(),
    }
}

/// Item description: the base text, preceded by the quoted parent for replies.
pub fn entry_body(resolved: &ResolvedPost) -> String {
    let text = base_text(&resolved.post);
    match &resolved.preceding {
        Some(parent) => format!(
            "<blockquote>@{}: {}</blockquote>\n{}",
            parent.author, parent.full_text, text
        ),
        None => text,
    }
}

/// RSS wants RFC 2822 dates; anything Twitter sends that doesn't parse is kept as-is.
fn pub_date(created_at: &str) -> String {
    DateTime::parse_from_str(created_at, TWITTER_DATE_FORMAT)
        .map(|date| date.to_rfc2822())
        .unwrap_or_else(|_| created_at.to_string())
}
