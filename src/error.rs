use crate::render::RenderError;
use crate::twitter::TwitterError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The startup token exchange failed; the server cannot run without it.
    #[error("could not obtain a Twitter bearer token")]
    Credential(#[source] TwitterError),

    #[error(transparent)]
    Upstream(#[from] TwitterError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
