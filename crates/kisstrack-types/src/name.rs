//! Name-like capabilities: anything that can stand in for an event name or
//! an identity on the wire.
//!
//! Implementations must be pure and total: rendering never fails, never
//! performs I/O, and returns the same text for the same value.

use crate::text::SimpleText;

/// A value that can be sent as the name of a recorded event.
pub trait EventName {
    fn render_event_name(&self) -> SimpleText;
}

/// A value that identifies the person (or subject) a call is about.
pub trait Identity {
    fn render_identity(&self) -> SimpleText;
}

impl EventName for SimpleText {
    fn render_event_name(&self) -> SimpleText {
        self.clone()
    }
}

impl Identity for SimpleText {
    fn render_identity(&self) -> SimpleText {
        self.clone()
    }
}

impl<T: EventName + ?Sized> EventName for &T {
    fn render_event_name(&self) -> SimpleText {
        (**self).render_event_name()
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn render_identity(&self) -> SimpleText {
        (**self).render_identity()
    }
}
