//! Fatal configuration errors
//!
//! Everything here signals a content or programming mistake (bad template
//! references, mismatched weight tables, impossible pick requests). Steady-state
//! play never produces these; callers propagate them with `?` up to `main`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid JSON for `GameConfig`
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A template names a sprite sheet that was never registered
    #[error("unknown sprite sheet `{0}`")]
    UnknownSheet(String),

    /// A template references another template that does not exist
    #[error("unknown {kind} template `{name}`")]
    UnknownTemplate { kind: &'static str, name: String },

    /// A template carries values the entity constructors cannot use
    #[error("invalid template `{name}`: {reason}")]
    InvalidTemplate { name: String, reason: String },

    /// `weighted_pick` was given parallel arrays of different lengths
    #[error("options and weights length mismatch ({options} options, {weights} weights)")]
    WeightMismatch { options: usize, weights: usize },

    /// `weighted_pick` has nothing to pick from
    #[error("weights sum to zero")]
    ZeroTotalWeight,

    /// `choices(.., unique = true)` asked for more distinct values than exist
    #[error("requested {requested} unique choices but only {available} distinct options exist")]
    NotEnoughUniqueOptions { requested: usize, available: usize },
}
