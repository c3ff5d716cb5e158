use std::collections::HashMap;
use std::sync::Arc;

use irondash_texture::{BoxedPixelData, PayloadProvider, SimplePixelData, Texture};
use log::{debug, info, warn};
use sw_rend::{PixelSource, RegistryError, TextureId, TextureRegistry};

/// Texture pixel provider that implements irondash's PayloadProvider.
///
/// Flutter pulls from it on the raster thread; it only holds a weak view of the buffer.
struct PixelSourceProvider {
    source: PixelSource,
}

impl PayloadProvider<BoxedPixelData> for PixelSourceProvider {
    fn get_payload(&self) -> BoxedPixelData {
        match self.source.copy_pixels() {
            Some(frame) => {
                SimplePixelData::new_boxed(frame.width as i32, frame.height as i32, frame.data)
            }
            // Pulled after dispose: hand Flutter an empty frame instead of stale memory.
            None => SimplePixelData::new_boxed(0, 0, Vec::new()),
        }
    }
}

/// [`TextureRegistry`] backed by irondash pixel-buffer textures of one Flutter engine.
///
/// irondash textures are not `Send`; the registry and the plugin owning it stay on the
/// platform thread.
pub struct IrondashRegistry {
    engine_handle: i64,
    textures: HashMap<TextureId, Texture<BoxedPixelData>>,
}

impl IrondashRegistry {
    pub fn new(engine_handle: i64) -> Self {
        Self {
            engine_handle,
            textures: HashMap::new(),
        }
    }

    pub fn engine_handle(&self) -> i64 {
        self.engine_handle
    }
}

impl TextureRegistry for IrondashRegistry {
    fn register_texture(&mut self, id: TextureId, source: PixelSource) -> Result<i64, RegistryError> {
        if self.textures.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        let provider: Arc<dyn PayloadProvider<BoxedPixelData>> =
            Arc::new(PixelSourceProvider { source });
        let texture = Texture::new_with_provider(self.engine_handle, provider)
            .map_err(|err| RegistryError::Rejected(format!("{err:?}")))?;
        let texture_id = texture.id();
        self.textures.insert(id, texture);

        info!(
            "Created Flutter texture {texture_id} for {id} on engine {}",
            self.engine_handle
        );
        Ok(texture_id)
    }

    fn unregister_texture(&mut self, id: TextureId) {
        // Dropping the irondash texture unregisters it from the engine.
        if let Some(texture) = self.textures.remove(&id) {
            debug!("Releasing Flutter texture {} for {id}", texture.id());
        }
    }

    fn mark_frame_available(&mut self, id: TextureId) {
        if let Some(texture) = self.textures.get(&id) {
            if let Err(err) = texture.mark_frame_available() {
                warn!("Failed to mark frame available for {id}: {err:?}");
            }
        }
    }
}
