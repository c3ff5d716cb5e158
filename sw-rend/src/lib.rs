//! Software-rendered RGBA pixel buffers exposed as host textures.
//!
//! The crate is the platform-agnostic core of the `sw_rend` Flutter plugin:
//!
//! - [`PixelBuffer`] is a fixed-size RGBA8888 raster drawn into with clipped rectangle blits.
//! - [`TextureManager`] maps handles to live buffers and keeps a [`TextureRegistry`] in sync.
//! - [`SwRendPlugin`] decodes host [`MethodCall`]s and dispatches them to the manager.
//!
//! Platform adapters only implement [`TextureRegistry`]; [`HeadlessRegistry`] is an in-memory
//! implementation for offscreen use and tests.
//!
//! ```ignore
//! use sw_rend::{HeadlessRegistry, MethodCall, SwRendPlugin};
//!
//! let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
//! let texture = plugin
//!     .handle_method_call(&MethodCall::new("init").with_argument("width", 2).with_argument("height", 2))
//!     .into_result()?;
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod pixel_buffer;
pub mod plugin;
pub mod registry;
pub mod texture_manager;

pub use channel::{Method, MethodCall, MethodError, MethodResponse, Value, CHANNEL_NAME};
pub use config::ManagerConfig;
pub use error::TextureError;
pub use pixel_buffer::{DrawnRect, PixelBuffer, PixelFrame, PixelSource, BYTES_PER_PIXEL};
pub use plugin::SwRendPlugin;
pub use registry::{HeadlessRegistry, RegistryError, TextureRegistry};
pub use texture_manager::{DrawRegion, TextureId, TextureManager};
