//! emokit Core
//!
//! Shared building blocks for the emokit emotion classifier:
//! - The fixed [`Emotion`] label enumeration
//! - Error types and result handling
//! - The [`TextNormalizer`] used by every prediction stage and the trainer

pub mod error;
pub mod label;
pub mod normalize;

pub use error::{Error, Result};
pub use label::Emotion;
pub use normalize::TextNormalizer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::label::Emotion;
    pub use crate::normalize::TextNormalizer;
}
