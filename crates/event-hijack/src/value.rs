//! Event argument values.

use std::fmt;
use std::rc::Rc;

/// Shared, immutable byte buffer.
///
/// Cloning is cheap and preserves identity, so a listener can tell whether it
/// received the exact buffer that was emitted.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer(Rc<[u8]>);

impl Buffer {
    /// Creates a buffer holding a copy of `bytes`.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(Rc::from(bytes.as_ref()))
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Buffer {} bytes>", self.len())
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Rc::from(bytes))
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

/// A single argument passed to `emit` and on to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Buffer(Buffer),
    Json(serde_json::Value),
}

impl Arg {
    /// Byte-buffer predicate used by the shorthand handler adapter.
    pub fn as_buffer(&self) -> Option<&Buffer> {
        match self {
            Arg::Buffer(buf) => Some(buf),
            _ => None,
        }
    }

    pub fn is_buffer(&self) -> bool {
        self.as_buffer().is_some()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => write!(f, "null"),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Float(x) => write!(f, "{}", x),
            Arg::Str(s) => write!(f, "{}", s),
            Arg::Buffer(buf) => write!(f, "{:?}", buf),
            Arg::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Int(n.into())
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<usize> for Arg {
    fn from(n: usize) -> Self {
        Arg::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Float(x)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<Buffer> for Arg {
    fn from(buf: Buffer) -> Self {
        Arg::Buffer(buf)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Self {
        Arg::Json(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Arg::Null)
    }
}
