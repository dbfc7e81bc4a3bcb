//! Lifecycle context and event sinks
//!
//! Progress is reported as structured [`Event`]s through an [`EventSink`]
//! carried by the [`LifecycleContext`]. The caller picks the sink.

use serde::{Deserialize, Serialize};

/// Kind of progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Reading live state
    Check,
    /// Creating a resource
    Create,
    /// Updating a resource
    Update,
    /// Live state already matches
    Unchanged,
    /// Synchronizing membership (permissions, tags, ...)
    Sync,
    /// Removing a resource
    Remove,
    /// Persisting a state snapshot
    Record,
    /// A recoverable condition was handled locally
    Recovered,
}

/// A single structured progress event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the resource the event is about
    pub resource_id: String,
    /// What happened
    pub kind: EventKind,
    /// Human-readable message
    pub message: String,
}

impl Event {
    /// Create a new event
    pub fn new(resource_id: impl Into<String>, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Receiver for lifecycle progress events
pub trait EventSink: Send {
    /// Handle one event
    fn emit(&mut self, event: Event);

    /// Convenience wrapper around [`EventSink::emit`]
    fn event(&mut self, resource_id: &str, kind: EventKind, message: &str) {
        self.emit(Event::new(resource_id, kind, message));
    }
}

/// No-op sink
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&mut self, _event: Event) {}
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of a given kind
    pub fn of_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Identity of one deployed component instance
///
/// The identity is stable across deploys and is used to derive default
/// resource names and state keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceIdentity {
    pub app: Option<String>,
    pub stage: String,
    pub instance: Option<String>,
}

impl InstanceIdentity {
    /// Create an identity for a stage with no app or instance name
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            app: None,
            stage: stage.into(),
            instance: None,
        }
    }

    /// Set the app name
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Set the instance name
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Whether the identity is stable enough to derive a resource name from
    pub fn is_stable(&self) -> bool {
        self.instance.is_some()
    }

    /// Key used to store state for this instance (`app.stage.instance`)
    pub fn key(&self) -> String {
        format!(
            "{}.{}.{}",
            self.app.as_deref().unwrap_or("default"),
            self.stage,
            self.instance.as_deref().unwrap_or("default")
        )
    }
}

impl Default for InstanceIdentity {
    fn default() -> Self {
        Self::new("dev")
    }
}

/// Context passed to component lifecycle operations
pub struct LifecycleContext<'a> {
    /// Identity of the instance being deployed or removed
    pub identity: &'a InstanceIdentity,
    /// Where progress events go
    pub events: &'a mut dyn EventSink,
}

impl<'a> LifecycleContext<'a> {
    /// Create a new lifecycle context
    pub fn new(identity: &'a InstanceIdentity, events: &'a mut dyn EventSink) -> Self {
        Self { identity, events }
    }

    /// Emit an event for a resource
    pub fn emit(&mut self, resource_id: &str, kind: EventKind, message: impl Into<String>) {
        self.events.emit(Event::new(resource_id, kind, message));
    }
}
