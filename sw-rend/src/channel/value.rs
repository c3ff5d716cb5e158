use std::collections::BTreeMap;

use crate::error::TextureError;
use crate::texture_manager::TextureId;

/// A value exchanged over the method channel.
///
/// Mirrors the kinds of values the host's standard codec can carry. Host integers of either
/// width decode to [`Value::Int`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 32 or 64 bit integer.
    Int(i64),
    /// Double precision float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Byte list.
    Uint8List(Vec<u8>),
    /// 32 bit integer list.
    Int32List(Vec<i32>),
    /// 64 bit integer list.
    Int64List(Vec<i64>),
    /// Double list.
    Float64List(Vec<f64>),
    /// Heterogeneous list.
    List(Vec<Value>),
    /// String-keyed map.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Byte payload, if this is a byte list.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Uint8List(v) => Some(v),
            _ => None,
        }
    }

    /// Map payload, if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Uint8List(v)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::Int32List(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Int64List(v)
    }
}

impl From<TextureId> for Value {
    fn from(id: TextureId) -> Self {
        Value::Int(id.get())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Named arguments of a method call.
///
/// Missing keys and explicit nulls are both treated as absent.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    map: Option<&'a BTreeMap<String, Value>>,
}

impl<'a> Arguments<'a> {
    /// Reads call arguments. `Null` means no arguments; anything other than a map is rejected.
    pub fn new(value: &'a Value) -> Result<Self, TextureError> {
        match value {
            Value::Null => Ok(Self { map: None }),
            Value::Map(map) => Ok(Self { map: Some(map) }),
            _ => Err(TextureError::InvalidArgument {
                name: "arguments",
                expected: "a map",
            }),
        }
    }

    /// Raw argument value, if present and not null.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.map?.get(name).filter(|value| !value.is_null())
    }

    /// Integer argument that must be present.
    pub fn required_int(&self, name: &'static str) -> Result<i64, TextureError> {
        self.optional_int(name)?
            .ok_or(TextureError::MissingArgument { name })
    }

    /// Integer argument that may be omitted.
    pub fn optional_int(&self, name: &'static str) -> Result<Option<i64>, TextureError> {
        self.get(name)
            .map(|value| {
                value.as_int().ok_or(TextureError::InvalidArgument {
                    name,
                    expected: "an integer",
                })
            })
            .transpose()
    }

    /// Byte-list argument that must be present.
    pub fn required_bytes(&self, name: &'static str) -> Result<&'a [u8], TextureError> {
        let value = self.get(name).ok_or(TextureError::MissingArgument { name })?;
        value.as_bytes().ok_or(TextureError::InvalidArgument {
            name,
            expected: "a byte list",
        })
    }

    /// The `texture` handle argument.
    pub fn texture(&self) -> Result<TextureId, TextureError> {
        self.required_int("texture").map(TextureId::new)
    }
}
