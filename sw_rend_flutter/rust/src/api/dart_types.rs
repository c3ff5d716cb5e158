//! Types shared between Dart and Rust for the sw_rend Flutter integration.
//! All types here are used by flutter_rust_bridge_codegen.

use sw_rend::{MethodCall, Value};

/// Named arguments of a generic method call. Unset fields are omitted from the call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodArguments {
    pub texture: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    /// RGBA8888 pixels, row-major
    pub pixels: Option<Vec<u8>>,
}

impl MethodArguments {
    pub(crate) fn into_call(self, method: String) -> MethodCall {
        let mut call = MethodCall::new(method);
        let ints = [
            ("texture", self.texture),
            ("width", self.width),
            ("height", self.height),
            ("x", self.x),
            ("y", self.y),
        ];
        for (name, value) in ints {
            if let Some(value) = value {
                call = call.with_argument(name, value);
            }
        }
        if let Some(pixels) = self.pixels {
            call = call.with_argument("pixels", pixels);
        }
        call
    }
}

/// Result of a generic method call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
    Null,
    Int(i64),
    Bytes(Vec<u8>),
    Ints(Vec<i64>),
}

impl TryFrom<Value> for MethodResult {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => MethodResult::Null,
            Value::Int(v) => MethodResult::Int(v),
            Value::Uint8List(v) => MethodResult::Bytes(v),
            Value::Int32List(v) => MethodResult::Ints(v.into_iter().map(i64::from).collect()),
            Value::Int64List(v) => MethodResult::Ints(v),
            other => anyhow::bail!("unsupported result value {other:?}"),
        })
    }
}

/// Dimensions of a texture in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}
