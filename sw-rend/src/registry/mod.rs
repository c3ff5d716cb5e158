//! Host texture registry seam.
//!
//! The host (Flutter embedder or a test harness) displays textures by pulling pixels from a
//! registered [`PixelSource`] whenever it composites a frame. [`TextureRegistry`] is the only
//! interface a platform adapter has to implement.

use thiserror::Error;

use crate::pixel_buffer::PixelSource;
use crate::texture_manager::TextureId;

mod headless;

pub use headless::HeadlessRegistry;

/// Error reported by a host texture registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The host refused to register the texture.
    #[error("host rejected texture: {0}")]
    Rejected(String),

    /// The handle is already registered with this registry.
    #[error("texture {0} is already registered")]
    AlreadyRegistered(TextureId),
}

/// Host-side texture registry.
///
/// Implementations hold on to the [`PixelSource`] and read it from their pull callback. They
/// must not assume the source stays live: a disposed buffer yields `None`.
pub trait TextureRegistry {
    /// Registers a texture backed by `source`. Returns the host's own identifier for it, which
    /// is what the host display widget needs.
    fn register_texture(&mut self, id: TextureId, source: PixelSource) -> Result<i64, RegistryError>;

    /// Removes a previously registered texture. Unknown handles are ignored.
    fn unregister_texture(&mut self, id: TextureId);

    /// Tells the host that the texture contents changed and should be pulled again before the
    /// next composited frame.
    fn mark_frame_available(&mut self, id: TextureId);
}

impl<R: TextureRegistry + ?Sized> TextureRegistry for Box<R> {
    fn register_texture(&mut self, id: TextureId, source: PixelSource) -> Result<i64, RegistryError> {
        (**self).register_texture(id, source)
    }

    fn unregister_texture(&mut self, id: TextureId) {
        (**self).unregister_texture(id)
    }

    fn mark_frame_available(&mut self, id: TextureId) {
        (**self).mark_frame_available(id)
    }
}
