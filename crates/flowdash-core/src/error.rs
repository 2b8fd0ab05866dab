//! Core error types.

/// Failures surfaced by the aggregation core.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The interface-summary fetch failed, so no snapshot can be built.
    /// Supplementary resources never cause this — they degrade instead.
    #[error("dashboard unavailable: {source}")]
    Unavailable {
        #[source]
        source: flowdash_api::Error,
    },

    /// An upstream payload's root was not an indexable structure where
    /// one is required for derivation (null or a scalar in place of an
    /// object/array). Rare; indicates an upstream contract change.
    #[error("malformed upstream payload: {what}")]
    Normalization { what: String },
}
