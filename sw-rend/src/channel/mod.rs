//! Method-call surface shared by all host adapters.
//!
//! Hosts deliver calls as a method name plus a map of named [`Value`]s and expect a
//! [`MethodResponse`] back. The transport and its binary encoding belong to the host.

use std::fmt;

use thiserror::Error;

use crate::error::TextureError;

mod value;

pub use value::{Arguments, Value};

/// Name of the method channel the plugin listens on.
pub const CHANNEL_NAME: &str = "com.funguscow/sw_rend";

/// Methods understood by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Create a texture: `width`, `height` -> handle.
    Init,
    /// Blit pixels: `texture`, `pixels`, optional `x`, `y`, `width`, `height`.
    Draw,
    /// Request a redisplay: `texture`.
    Invalidate,
    /// Read the whole buffer: `texture` -> bytes.
    GetPixels,
    /// Texture dimensions: `texture` -> `[width, height]`.
    GetSize,
    /// Host texture id for display widgets: `texture` -> id.
    GetTextureId,
    /// Release a texture: `texture`.
    Dispose,
    /// Handles of all live textures.
    ListTextures,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 8] = [
        Method::Init,
        Method::Draw,
        Method::Invalidate,
        Method::GetPixels,
        Method::GetSize,
        Method::GetTextureId,
        Method::Dispose,
        Method::ListTextures,
    ];

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Method::Init => "init",
            Method::Draw => "draw",
            Method::Invalidate => "invalidate",
            Method::GetPixels => "get_pixels",
            Method::GetSize => "get_size",
            Method::GetTextureId => "get_texture_id",
            Method::Dispose => "dispose",
            Method::ListTextures => "list_textures",
        }
    }

    /// Looks a method up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A call received from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Method name.
    pub method: String,
    /// Call arguments, usually a [`Value::Map`].
    pub arguments: Value,
}

impl MethodCall {
    /// Creates a call without arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }

    /// Adds a named argument, turning the arguments into a map if needed.
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if !matches!(self.arguments, Value::Map(_)) {
            self.arguments = Value::Map(Default::default());
        }
        if let Value::Map(map) = &mut self.arguments {
            map.insert(name.into(), value.into());
        }
        self
    }
}

/// Reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// The call succeeded.
    Success(Value),
    /// The call failed.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        message: String,
        /// Extra error data, usually null.
        details: Value,
    },
    /// The method name is not known.
    NotImplemented,
}

impl MethodResponse {
    /// Converts the response into a `Result`, turning errors and unknown methods into
    /// [`MethodError`].
    pub fn into_result(self) -> Result<Value, MethodError> {
        match self {
            MethodResponse::Success(value) => Ok(value),
            MethodResponse::Error { code, message, .. } => Err(MethodError { code, message }),
            MethodResponse::NotImplemented => Err(MethodError {
                code: "NOT_IMPLEMENTED".to_owned(),
                message: "method is not implemented".to_owned(),
            }),
        }
    }
}

impl From<TextureError> for MethodResponse {
    fn from(err: TextureError) -> Self {
        MethodResponse::Error {
            code: err.code().to_owned(),
            message: err.to_string(),
            details: Value::Null,
        }
    }
}

/// Failed method call as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct MethodError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}
