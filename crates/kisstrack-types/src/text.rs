//! Textual rules shared by every call: `SimpleText`, properties, and the
//! byte encodings used when rendering query arguments.
//!
//! The tracking service treats `,` and `:` as field separators inside names
//! and identities and silently rewrites them to spaces. It also truncates
//! names longer than [`SimpleText::MAX_LEN`] bytes. None of this is enforced
//! here: values are sent exactly as given, and a caller that breaks the rules
//! gets mangled data server-side rather than a local error.

use std::borrow::Cow;
use std::fmt;

/// Maximum documented size of a property value, in bytes (8 KiB).
pub const PROPERTY_VALUE_MAX_LEN: usize = 8 * 1024;

/// Query keys the wire protocol uses for its own arguments.
///
/// `_k` carries the API key, `_n` the event name (or second identity for an
/// alias), `_p` the identity, `_d`/`_t` the manual timestamp.
pub const RESERVED_KEYS: [&str; 5] = ["_k", "_n", "_p", "_d", "_t"];

/// A short byte string used for names and identities.
///
/// Documented constraints: at most [`SimpleText::MAX_LEN`] bytes, no comma
/// and no colon. They are not checked on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SimpleText(Vec<u8>);

impl SimpleText {
    /// Longest value the service stores without truncation.
    pub const MAX_LEN: usize = 255;

    /// Wraps raw bytes without inspecting them.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value and returns the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the value as text, replacing invalid UTF-8 sequences.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reports whether the value respects the documented length and
    /// separator rules. Purely informational.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() <= Self::MAX_LEN && !self.0.iter().any(|b| *b == b',' || *b == b':')
    }
}

impl fmt::Display for SimpleText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl From<&str> for SimpleText {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for SimpleText {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&[u8]> for SimpleText {
    fn from(b: &[u8]) -> Self {
        Self(b.to_vec())
    }
}

impl From<Vec<u8>> for SimpleText {
    fn from(b: Vec<u8>) -> Self {
        Self(b)
    }
}

impl AsRef<[u8]> for SimpleText {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A named attribute attached to a record or set-properties call.
///
/// The name follows the [`SimpleText`] rules. The value is free text of up to
/// [`PROPERTY_VALUE_MAX_LEN`] bytes, kept as text until it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: SimpleText,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<SimpleText>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true when the name shadows one of [`RESERVED_KEYS`].
    ///
    /// Such properties are still sent; the resulting duplicate key is left
    /// for the server to resolve.
    pub fn uses_reserved_name(&self) -> bool {
        RESERVED_KEYS
            .iter()
            .any(|key| key.as_bytes() == self.name.as_bytes())
    }

    /// Returns true when the value exceeds the documented size limit.
    pub fn value_is_oversized(&self) -> bool {
        self.value.len() > PROPERTY_VALUE_MAX_LEN
    }

    /// Renders the property as a `(key, value)` query argument.
    pub fn to_query_arg(&self) -> (Vec<u8>, Vec<u8>) {
        (self.name.as_bytes().to_vec(), encode_value(&self.value))
    }
}

impl<N: Into<SimpleText>, V: Into<String>> From<(N, V)> for Property {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// UTF-8 encodes a property value.
///
/// No escaping happens here; percent-encoding for the URL is applied when
/// the query string is rendered.
pub fn encode_value(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}
