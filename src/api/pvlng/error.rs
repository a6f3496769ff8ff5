/// Why a dashboard section could not be fetched.
///
/// Empty data is not an error: a valid response without rows is a normal state.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to request `{path}`")]
    Transport {
        path: String,

        #[source]
        source: reqwest::Error,
    },

    #[error("malformed `{path}` response")]
    Malformed {
        path: String,

        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build the URL for `{0}`")]
    Url(String),
}

impl FetchError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Malformed { .. } => "malformed",
            Self::Url(_) => "url",
        }
    }
}
