//! Error types reported by the texture manager and the method-call surface.

use thiserror::Error;

use crate::registry::RegistryError;
use crate::texture_manager::TextureId;

/// Error from a texture operation.
///
/// Every variant maps to a short machine-readable code (see [`TextureError::code`]) that is
/// sent back to the caller together with the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    /// A required argument was not supplied.
    #[error("missing required argument `{name}`")]
    MissingArgument {
        /// Name of the argument.
        name: &'static str,
    },

    /// An argument was supplied with a value of the wrong kind.
    #[error("argument `{name}` must be {expected}")]
    InvalidArgument {
        /// Name of the argument.
        name: &'static str,
        /// Description of the expected value kind.
        expected: &'static str,
    },

    /// The handle does not refer to a live texture.
    #[error("texture {0} is not registered")]
    UnknownTexture(TextureId),

    /// The host texture registry refused the texture.
    #[error("failed to register texture: {0}")]
    RegistrationFailed(#[from] RegistryError),

    /// Requested buffer dimensions cannot be allocated.
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },

    /// The manager already holds the configured maximum number of textures.
    #[error("texture limit of {limit} reached")]
    TooManyTextures {
        /// Configured limit.
        limit: usize,
    },
}

impl TextureError {
    /// Error code reported to method-channel callers.
    pub fn code(&self) -> &'static str {
        match self {
            TextureError::MissingArgument { .. } => "MISSING",
            TextureError::InvalidArgument { .. } => "BAD_ARGUMENT",
            TextureError::UnknownTexture(_) => "UNKNOWN_TEXTURE",
            TextureError::RegistrationFailed(_) => "REGISTRATION_FAILED",
            TextureError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            TextureError::TooManyTextures { .. } => "TOO_MANY_TEXTURES",
        }
    }
}
