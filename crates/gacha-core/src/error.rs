use crate::tier::Tier;

/// Alias for `Result<T, GachaError>`.
pub type GachaResult<T> = Result<T, GachaError>;

/// Failures reading a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document does not exist.
    #[error("config not found: {0}")]
    NotFound(String),

    /// The document exists but lacks required fields or is not valid JSON.
    #[error("malformed config {name}: {reason}")]
    Malformed {
        /// Banner or document name.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// Any other read failure.
    #[error("failed to read {name}: {source}")]
    Io {
        /// Banner or document name.
        name: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Errors surfaced to callers of the draw engine.
#[derive(Debug, thiserror::Error)]
pub enum GachaError {
    /// The banner is not loaded and could not be loaded.
    #[error("banner unavailable: {0}")]
    BannerUnavailable(String),

    /// The drawn tier's pool and both fallback pools are empty.
    #[error("reward pool exhausted: {banner} / {tier}")]
    PoolExhausted {
        /// Banner name.
        banner: String,
        /// Tier that was drawn.
        tier: Tier,
    },

    /// No loaded banner owns this ticket kind.
    #[error("unknown ticket kind: {0}")]
    UnknownTicket(String),

    /// Only single draws and ten-draws exist.
    #[error("invalid draw count {0}: expected 1 or 10")]
    InvalidDrawCount(usize),

    /// The caller lacks operator privilege.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A configuration read failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
