//! Dispatch of host method calls to the texture manager.

use log::{debug, warn};

use crate::channel::{Arguments, Method, MethodCall, MethodResponse, Value};
use crate::config::ManagerConfig;
use crate::error::TextureError;
use crate::registry::TextureRegistry;
use crate::texture_manager::{DrawRegion, TextureManager};

/// Plugin instance serving one host session.
///
/// Decodes named arguments, runs the operation on its [`TextureManager`] and encodes the
/// result. Calls are processed one at a time on the caller's thread.
pub struct SwRendPlugin<R: TextureRegistry> {
    manager: TextureManager<R>,
}

impl<R: TextureRegistry> SwRendPlugin<R> {
    /// Creates a plugin that registers its textures with `registry`.
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, ManagerConfig::default())
    }

    /// Creates a plugin with explicit manager limits.
    pub fn with_config(registry: R, config: ManagerConfig) -> Self {
        Self {
            manager: TextureManager::with_config(registry, config),
        }
    }

    /// Texture manager backing this plugin.
    pub fn manager(&self) -> &TextureManager<R> {
        &self.manager
    }

    /// Mutable access to the texture manager.
    pub fn manager_mut(&mut self) -> &mut TextureManager<R> {
        &mut self.manager
    }

    /// Handles a single call from the host.
    pub fn handle_method_call(&mut self, call: &MethodCall) -> MethodResponse {
        let Some(method) = Method::from_name(&call.method) else {
            debug!("Unknown method `{}`", call.method);
            return MethodResponse::NotImplemented;
        };

        match self.dispatch(method, &call.arguments) {
            Ok(value) => MethodResponse::Success(value),
            Err(err) => {
                warn!("Method `{method}` failed: {err}");
                err.into()
            }
        }
    }

    fn dispatch(&mut self, method: Method, arguments: &Value) -> Result<Value, TextureError> {
        if method == Method::ListTextures {
            return Ok(self.list_textures());
        }

        let args = Arguments::new(arguments)?;
        match method {
            Method::Init => self.init(&args),
            Method::Draw => self.draw(&args),
            Method::Invalidate => {
                self.manager.invalidate_texture(args.texture()?)?;
                Ok(Value::Null)
            }
            Method::GetPixels => Ok(Value::Uint8List(
                self.manager.read_texture(args.texture()?)?,
            )),
            Method::GetSize => {
                let (width, height) = self.manager.texture_size(args.texture()?)?;
                // Dimensions are bounded by i32 at creation.
                Ok(Value::Int32List(vec![width as i32, height as i32]))
            }
            Method::GetTextureId => Ok(Value::Int(
                self.manager.host_texture_id(args.texture()?)?,
            )),
            Method::Dispose => {
                self.manager.dispose_texture(args.texture()?)?;
                Ok(Value::Null)
            }
            Method::ListTextures => Ok(self.list_textures()),
        }
    }

    fn init(&mut self, args: &Arguments<'_>) -> Result<Value, TextureError> {
        let width = args.required_int("width")?;
        let height = args.required_int("height")?;
        let id = self.manager.create_texture(width, height)?;
        Ok(id.into())
    }

    fn draw(&mut self, args: &Arguments<'_>) -> Result<Value, TextureError> {
        let id = args.texture()?;
        // Unknown handles are reported before missing pixel data.
        self.manager.texture_size(id)?;

        let pixels = args.required_bytes("pixels")?;
        let region = DrawRegion {
            x: args.optional_int("x")?,
            y: args.optional_int("y")?,
            width: args.optional_int("width")?,
            height: args.optional_int("height")?,
        };
        self.manager.draw_texture(id, pixels, region)?;

        Ok(Value::Null)
    }

    fn list_textures(&self) -> Value {
        Value::Int64List(
            self.manager
                .list_textures()
                .into_iter()
                .map(i64::from)
                .collect(),
        )
    }
}
