//! Call types for the KISSmetrics tracking API.
//!
//! The API accepts three kinds of call, each sent as a single GET request:
//!
//! | Call | Path | Arguments |
//! |------|------|-----------|
//! | record | `/e` | `_n` event name, `_p` identity, timestamp, properties |
//! | set properties | `/s` | `_p` identity, timestamp, properties |
//! | alias | `/a` | `_p` identity, `_n` second identity |
//!
//! This crate holds the typed representation of those calls and renders
//! them into a path plus ordered raw query arguments. It performs no I/O;
//! sending is done by `kisstrack-client`.
//!
//! # Usage
//!
//! ```rust
//! use kisstrack_types::{call_info, CallType, Property, SimpleText, Timestamp};
//!
//! let call = CallType::record(
//!     SimpleText::from("Purchased"),
//!     SimpleText::from("user-42"),
//!     Timestamp::Automatic,
//!     [Property::new("item", "Widget")],
//! );
//! let info = call_info(&call);
//! assert_eq!(info.path.as_str(), "/e");
//! assert_eq!(info.args.len(), 3);
//! ```

mod call;
mod name;
mod query;
mod text;
mod timestamp;

pub use call::{BoxedEventName, BoxedIdentity, CallType};
pub use name::{EventName, Identity};
pub use query::{call_info, CallInfo, CallPath, ParseCallPathError, QueryArg};
pub use text::{encode_value, Property, SimpleText, PROPERTY_VALUE_MAX_LEN, RESERVED_KEYS};
pub use timestamp::{generate_timestamp, Timestamp};
