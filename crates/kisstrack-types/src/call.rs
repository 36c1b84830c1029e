//! The three request shapes the tracking API accepts.

use std::fmt;

use crate::name::{EventName, Identity};
use crate::text::Property;
use crate::timestamp::Timestamp;

/// An event name of any concrete type.
pub type BoxedEventName = Box<dyn EventName + Send + Sync>;

/// An identity of any concrete type.
pub type BoxedIdentity = Box<dyn Identity + Send + Sync>;

/// A single call to the tracking API.
///
/// Every name-like field is boxed independently, so a record call can pair
/// e.g. a typed event enum with a typed user-id wrapper. Values are built
/// once and handed to the dispatcher; nothing mutates them afterwards.
pub enum CallType {
    /// Records that `identity` performed `event_name`.
    Record {
        event_name: BoxedEventName,
        identity: BoxedIdentity,
        timestamp: Timestamp,
        properties: Vec<Property>,
    },
    /// Sets properties on `identity` without recording an event.
    SetProps {
        identity: BoxedIdentity,
        timestamp: Timestamp,
        properties: Vec<Property>,
    },
    /// Declares that two identities are the same person.
    Alias {
        identity: BoxedIdentity,
        identity2: BoxedIdentity,
    },
}

impl CallType {
    pub fn record<N, I, P>(event_name: N, identity: I, timestamp: Timestamp, properties: P) -> Self
    where
        N: EventName + Send + Sync + 'static,
        I: Identity + Send + Sync + 'static,
        P: IntoIterator<Item = Property>,
    {
        Self::Record {
            event_name: Box::new(event_name),
            identity: Box::new(identity),
            timestamp,
            properties: properties.into_iter().collect(),
        }
    }

    pub fn set_props<I, P>(identity: I, timestamp: Timestamp, properties: P) -> Self
    where
        I: Identity + Send + Sync + 'static,
        P: IntoIterator<Item = Property>,
    {
        Self::SetProps {
            identity: Box::new(identity),
            timestamp,
            properties: properties.into_iter().collect(),
        }
    }

    pub fn alias<I, J>(identity: I, identity2: J) -> Self
    where
        I: Identity + Send + Sync + 'static,
        J: Identity + Send + Sync + 'static,
    {
        Self::Alias {
            identity: Box::new(identity),
            identity2: Box::new(identity2),
        }
    }

    /// The call's properties; empty for an alias.
    pub fn properties(&self) -> &[Property] {
        match self {
            Self::Record { properties, .. } | Self::SetProps { properties, .. } => properties,
            Self::Alias { .. } => &[],
        }
    }

    /// The call's timestamp, if the shape carries one.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Record { timestamp, .. } | Self::SetProps { timestamp, .. } => Some(*timestamp),
            Self::Alias { .. } => None,
        }
    }
}

impl fmt::Debug for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record {
                event_name,
                identity,
                timestamp,
                properties,
            } => f
                .debug_struct("Record")
                .field("event_name", &event_name.render_event_name())
                .field("identity", &identity.render_identity())
                .field("timestamp", timestamp)
                .field("properties", properties)
                .finish(),
            Self::SetProps {
                identity,
                timestamp,
                properties,
            } => f
                .debug_struct("SetProps")
                .field("identity", &identity.render_identity())
                .field("timestamp", timestamp)
                .field("properties", properties)
                .finish(),
            Self::Alias {
                identity,
                identity2,
            } => f
                .debug_struct("Alias")
                .field("identity", &identity.render_identity())
                .field("identity2", &identity2.render_identity())
                .finish(),
        }
    }
}
