// Gift-exchange domain core: participants, wishlist submission, and the draw.

pub mod draw;
pub mod participant;
pub mod wishlist;

pub use draw::DrawResult;
pub use participant::{Participant, MAX_WISHLIST_ITEMS};

use thiserror::Error;

/// Errors produced by the exchange operations. The HTTP layer maps each
/// variant to a status code; everything is terminal per request.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("no participant named `{name}`")]
    ParticipantNotFound { name: String },

    #[error("no eligible participants remain for the draw")]
    PoolExhausted,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ExchangeError {
    /// Shorthand for a [`ExchangeError::Validation`] with an owned field name.
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        ExchangeError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
