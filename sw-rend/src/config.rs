//! Limits applied by the texture manager.

/// Default maximum texture width or height, matching common GPU texture limits.
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

/// Configuration of a [`TextureManager`](crate::TextureManager).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Largest accepted width or height, in pixels.
    pub max_dimension: u32,
    /// Largest number of live textures, or `None` for no limit.
    pub max_textures: Option<usize>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_textures: None,
        }
    }
}

impl ManagerConfig {
    /// Sets the largest accepted width or height.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Limits the number of live textures.
    pub fn with_max_textures(mut self, max_textures: usize) -> Self {
        self.max_textures = Some(max_textures);
        self
    }
}
