//! Registry of live pixel buffers keyed by manager-issued handles.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace, warn};

use crate::config::ManagerConfig;
use crate::error::TextureError;
use crate::pixel_buffer::{DrawnRect, PixelBuffer};
use crate::registry::TextureRegistry;

/// Opaque handle of a live texture.
///
/// Handles are issued by a [`TextureManager`] from a monotonically increasing counter and are
/// never reused by the same manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TextureId(i64);

impl TextureId {
    /// Wraps a raw handle value, e.g. one received from a method call.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TextureId> for i64 {
    fn from(id: TextureId) -> Self {
        id.0
    }
}

/// Target rectangle of a draw. Omitted fields default to the whole buffer: `x` and `y` to 0,
/// `width` and `height` to the buffer's dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawRegion {
    /// Left edge in buffer pixels.
    pub x: Option<i64>,
    /// Top edge in buffer pixels.
    pub y: Option<i64>,
    /// Width of the source rectangle; also the source row length in pixels.
    pub width: Option<i64>,
    /// Height of the source rectangle.
    pub height: Option<i64>,
}

impl DrawRegion {
    /// Region covering the whole buffer.
    pub fn full() -> Self {
        Self::default()
    }

    /// Explicit rectangle.
    pub fn rect(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }
}

struct TextureEntry {
    buffer: PixelBuffer,
    host_id: i64,
}

/// Owns every live [`PixelBuffer`] and keeps the host registry in sync with them.
///
/// Dropping the manager unregisters and disposes all remaining textures.
pub struct TextureManager<R: TextureRegistry> {
    registry: R,
    config: ManagerConfig,
    textures: HashMap<TextureId, TextureEntry>,
    last_id: i64,
}

impl<R: TextureRegistry> TextureManager<R> {
    /// Creates a manager with the default configuration.
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, ManagerConfig::default())
    }

    /// Creates a manager with the given configuration.
    pub fn with_config(registry: R, config: ManagerConfig) -> Self {
        Self {
            registry,
            config,
            textures: HashMap::new(),
            last_id: 0,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Host registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the host registry.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether there are no live textures.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Allocates a zeroed `width` x `height` texture and registers it with the host.
    ///
    /// If the registry refuses the texture the buffer is released and no handle is consumed.
    pub fn create_texture(&mut self, width: i64, height: i64) -> Result<TextureId, TextureError> {
        let max = i64::from(self.config.max_dimension);
        if width > max || height > max {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        if let Some(limit) = self.config.max_textures {
            if self.textures.len() >= limit {
                return Err(TextureError::TooManyTextures { limit });
            }
        }

        let buffer = PixelBuffer::new(width, height)?;
        let id = TextureId(self.last_id + 1);
        let host_id = match self.registry.register_texture(id, buffer.source()) {
            Ok(host_id) => host_id,
            Err(err) => {
                warn!("Registry rejected {width}x{height} texture: {err}");
                buffer.dispose();
                return Err(err.into());
            }
        };

        self.last_id = id.0;
        self.textures.insert(id, TextureEntry { buffer, host_id });
        debug!("Created {width}x{height} texture {id} (host texture {host_id})");

        Ok(id)
    }

    /// Copies `pixels` into the texture at `region`, clipped to the texture bounds.
    ///
    /// Returns the area actually written, `None` if the region was fully clipped.
    pub fn draw_texture(
        &mut self,
        id: TextureId,
        pixels: &[u8],
        region: DrawRegion,
    ) -> Result<Option<DrawnRect>, TextureError> {
        let buffer = &mut self.entry_mut(id)?.buffer;
        let (width, height) = buffer.size();

        Ok(buffer.draw_rect(
            pixels,
            region.x.unwrap_or(0),
            region.y.unwrap_or(0),
            region.width.unwrap_or(i64::from(width)),
            region.height.unwrap_or(i64::from(height)),
        ))
    }

    /// Asks the host to pull the texture again before its next frame.
    pub fn invalidate_texture(&mut self, id: TextureId) -> Result<(), TextureError> {
        self.entry(id)?;
        trace!("Texture {id} invalidated");
        self.registry.mark_frame_available(id);
        Ok(())
    }

    /// Copy of the texture contents, `width * height * 4` bytes.
    pub fn read_texture(&self, id: TextureId) -> Result<Vec<u8>, TextureError> {
        Ok(self.entry(id)?.buffer.read())
    }

    /// Texture dimensions as `(width, height)`.
    pub fn texture_size(&self, id: TextureId) -> Result<(u32, u32), TextureError> {
        Ok(self.entry(id)?.buffer.size())
    }

    /// Identifier the host registry assigned to the texture.
    pub fn host_texture_id(&self, id: TextureId) -> Result<i64, TextureError> {
        Ok(self.entry(id)?.host_id)
    }

    /// Unregisters the texture from the host and releases its buffer.
    pub fn dispose_texture(&mut self, id: TextureId) -> Result<(), TextureError> {
        let entry = self
            .textures
            .remove(&id)
            .ok_or(TextureError::UnknownTexture(id))?;
        self.registry.unregister_texture(id);
        entry.buffer.dispose();
        debug!("Disposed texture {id}");
        Ok(())
    }

    /// Handles of all live textures, in ascending order.
    pub fn list_textures(&self) -> Vec<TextureId> {
        let mut ids: Vec<_> = self.textures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Unregisters and releases every live texture.
    pub fn dispose_all(&mut self) {
        if self.textures.is_empty() {
            return;
        }

        debug!("Disposing {} remaining textures", self.textures.len());
        for (id, entry) in self.textures.drain() {
            self.registry.unregister_texture(id);
            entry.buffer.dispose();
        }
    }

    fn entry(&self, id: TextureId) -> Result<&TextureEntry, TextureError> {
        self.textures.get(&id).ok_or(TextureError::UnknownTexture(id))
    }

    fn entry_mut(&mut self, id: TextureId) -> Result<&mut TextureEntry, TextureError> {
        self.textures
            .get_mut(&id)
            .ok_or(TextureError::UnknownTexture(id))
    }
}

impl<R: TextureRegistry> Drop for TextureManager<R> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
