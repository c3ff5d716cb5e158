use std::collections::HashMap;

use log::{debug, warn};

use super::{RegistryError, TextureRegistry};
use crate::pixel_buffer::{PixelFrame, PixelSource};
use crate::texture_manager::TextureId;

struct HeadlessTexture {
    host_id: i64,
    source: PixelSource,
    frames_available: u64,
}

/// In-memory texture registry with no display attached.
///
/// Useful for offscreen rendering and for tests: it records every registration and
/// frame-available notification, and [`HeadlessRegistry::pull`] reads a texture the same way a
/// compositor would.
#[derive(Default)]
pub struct HeadlessRegistry {
    textures: HashMap<TextureId, HeadlessTexture>,
    next_host_id: i64,
    capacity: Option<usize>,
}

impl HeadlessRegistry {
    /// Creates an empty registry that accepts any number of textures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that rejects registrations once `capacity` textures are registered.
    ///
    /// A capacity of zero rejects everything.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Number of registered textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no textures are registered.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Whether `id` is registered.
    pub fn is_registered(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Host id assigned to `id` on registration.
    pub fn host_id(&self, id: TextureId) -> Option<i64> {
        self.textures.get(&id).map(|texture| texture.host_id)
    }

    /// Number of frame-available notifications received for `id`.
    pub fn frames_available(&self, id: TextureId) -> Option<u64> {
        self.textures.get(&id).map(|texture| texture.frames_available)
    }

    /// Pulls the current contents of `id` like a compositor would.
    ///
    /// Returns `None` if `id` is not registered or its buffer was already released.
    pub fn pull(&self, id: TextureId) -> Option<PixelFrame> {
        self.textures.get(&id)?.source.copy_pixels()
    }
}

impl TextureRegistry for HeadlessRegistry {
    fn register_texture(&mut self, id: TextureId, source: PixelSource) -> Result<i64, RegistryError> {
        if self.textures.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        if let Some(capacity) = self.capacity {
            if self.textures.len() >= capacity {
                warn!("Headless registry is full ({capacity} textures), rejecting {id}");
                return Err(RegistryError::Rejected(format!(
                    "registry capacity of {capacity} textures reached"
                )));
            }
        }

        self.next_host_id += 1;
        let host_id = self.next_host_id;
        self.textures.insert(
            id,
            HeadlessTexture {
                host_id,
                source,
                frames_available: 0,
            },
        );
        debug!("Registered texture {id} as host texture {host_id}");

        Ok(host_id)
    }

    fn unregister_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            debug!("Unregistered texture {id}");
        }
    }

    fn mark_frame_available(&mut self, id: TextureId) {
        if let Some(texture) = self.textures.get_mut(&id) {
            texture.frames_available += 1;
        }
    }
}
