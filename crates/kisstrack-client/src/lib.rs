//! Dispatcher for the KISSmetrics tracking API.
//!
//! Turns a [`CallType`](kisstrack_types::CallType) into a signed HTTPS GET
//! against `trk.kissmetrics.com:443`, sends it over a caller-supplied
//! [`reqwest::Client`], and drains the response so the connection can be
//! reused.
//!
//! The service answers every request with a 200 and a 1x1 image whether or
//! not the call was recorded, so a successful return only means the request
//! made it over the wire. There is no batching, no retry, and no local
//! queue; wrap [`call`] if you need any of those.
//!
//! # Usage
//!
//! ```rust,no_run
//! use kisstrack_client::{build_client, call, ApiKey, ClientConfig};
//! use kisstrack_types::{CallType, Property, SimpleText, Timestamp};
//!
//! # async fn run() -> Result<(), kisstrack_client::DispatchError> {
//! let client = build_client(&ClientConfig::default())?;
//! let key = ApiKey::new("0123456789abcdef");
//!
//! let purchase = CallType::record(
//!     SimpleText::from("Purchased"),
//!     SimpleText::from("user-42"),
//!     Timestamp::now(),
//!     [Property::new("item", "Widget")],
//! );
//! call(&client, &key, &purchase).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod tracker;

pub use config::{
    build_client, ApiKey, ClientConfig, Endpoint, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USER_AGENT,
};
pub use dispatch::{call, call_at, render_query, request_url};
pub use error::DispatchError;
pub use tracker::Tracker;

pub use kisstrack_types as types;
