use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the widget core.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to surface a failure; the CLI glue continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum HannahError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Page loading ────────────────────────────────────────────────────
    #[error("page: {0}")]
    Page(#[from] PageError),

    // ── Chat transport ──────────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Page errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid page location: {0}")]
    Location(String),
}

// ─── Transport errors ───────────────────────────────────────────────────────

/// Failure of a single chat send.
///
/// The display form is shown to the visitor after the
/// "Sorry — I ran into an issue: " prefix, so it stays short and plain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint answered with something other than JSON, usually an HTML
    /// error page from a misrouted path.
    #[error("Chat endpoint returned a non-JSON response ({status}): {excerpt}")]
    MalformedResponse { status: u16, excerpt: String },

    /// The endpoint answered with JSON but signalled failure.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// The request never completed.
    #[error("Network error: {0}")]
    Network(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MalformedResponse { status, .. } | Self::RequestFailed { status, .. } => {
                Some(*status)
            }
            Self::Network(_) => None,
        }
    }
}

// ─── Convenience alias ──────────────────────────────────────────────────────

pub type HannahResult<T> = std::result::Result<T, HannahError>;
