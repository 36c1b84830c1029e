//! Mapping a [`CallType`] to a URL path and ordered query arguments.
//!
//! Argument order is stable so the exact request bytes are reproducible.
//! The server itself does not depend on it.

use crate::call::CallType;
use crate::text::Property;

/// One `(key, value)` query argument as raw bytes, before URL encoding.
pub type QueryArg = (Vec<u8>, Vec<u8>);

/// URL paths of the tracking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallPath {
    /// `/e`: record an event.
    Record,
    /// `/s`: set properties.
    SetProps,
    /// `/a`: alias two identities.
    Alias,
}

impl CallPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Record => "/e",
            Self::SetProps => "/s",
            Self::Alias => "/a",
        }
    }
}

impl std::fmt::Display for CallPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallPath {
    type Err = ParseCallPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/e" => Ok(Self::Record),
            "/s" => Ok(Self::SetProps),
            "/a" => Ok(Self::Alias),
            _ => Err(ParseCallPathError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown call path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown call path: {0}")]
pub struct ParseCallPathError(pub String);

/// The path and query arguments of a rendered call, without the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInfo {
    pub path: CallPath,
    pub args: Vec<QueryArg>,
}

/// Renders a call into its path and ordered query arguments.
///
/// - record: `_n`, `_p`, timestamp args, then properties
/// - set properties: `_p`, timestamp args, then properties
/// - alias: `_p`, `_n`
///
/// Property names that shadow reserved keys are emitted as-is.
pub fn call_info(call: &CallType) -> CallInfo {
    match call {
        CallType::Record {
            event_name,
            identity,
            timestamp,
            properties,
        } => {
            let mut args = Vec::with_capacity(4 + properties.len());
            args.push((b"_n".to_vec(), event_name.render_event_name().into_bytes()));
            args.push((b"_p".to_vec(), identity.render_identity().into_bytes()));
            args.extend(timestamp.query_args());
            args.extend(properties.iter().map(Property::to_query_arg));
            CallInfo {
                path: CallPath::Record,
                args,
            }
        }
        CallType::SetProps {
            identity,
            timestamp,
            properties,
        } => {
            let mut args = Vec::with_capacity(3 + properties.len());
            args.push((b"_p".to_vec(), identity.render_identity().into_bytes()));
            args.extend(timestamp.query_args());
            args.extend(properties.iter().map(Property::to_query_arg));
            CallInfo {
                path: CallPath::SetProps,
                args,
            }
        }
        CallType::Alias {
            identity,
            identity2,
        } => CallInfo {
            path: CallPath::Alias,
            args: vec![
                (b"_p".to_vec(), identity.render_identity().into_bytes()),
                (b"_n".to_vec(), identity2.render_identity().into_bytes()),
            ],
        },
    }
}
