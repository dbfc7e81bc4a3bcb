//! # Declarative
//!
//! A small framework for declarative resource lifecycles.
//!
//! This crate provides the vocabulary shared by components that converge a
//! remote resource to a desired state: a single existence read decides
//! between create and update, membership lists are reconciled as sets, and
//! progress is reported as structured events.
//!
//! ## Core Concepts
//!
//! - **Component**: Something with `deploy` / `remove` entry points and
//!   caller-owned state between cycles
//! - **Action**: Create or update, decided by [`decide`]
//! - **SetDiff**: Elements to add and remove to converge a membership set
//! - **EventSink**: Receiver for progress events, injected through the
//!   [`LifecycleContext`]
//!
//! ## Example
//!
//! ```
//! use declarative::{decide, Action, SetDiff};
//!
//! let live: Option<&String> = None;
//! assert_eq!(decide(live), Action::Create);
//!
//! let desired = vec!["111111111111".to_string()];
//! let current: Vec<String> = Vec::new();
//! let diff = SetDiff::compute(&desired, &current);
//! assert_eq!(diff.additions(), desired);
//! assert!(diff.to_remove.is_empty());
//! ```

pub mod component;
pub mod context;
pub mod diff;
pub mod types;

// Re-export main types at crate root
pub use component::Component;
pub use context::{
    Event, EventKind, EventSink, InstanceIdentity, LifecycleContext, NoEvents,
    RecordingSink,
};
pub use diff::SetDiff;
pub use types::{Action, ApplyResult, ResourceState, decide};
