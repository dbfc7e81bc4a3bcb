//! Core types for declarative resource management

use serde::{Deserialize, Serialize};

/// Current or desired state of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    /// Resource exists
    Present { details: Option<String> },
    /// Resource does not exist
    Absent,
}

impl ResourceState {
    /// Build a state from an optional live observation
    pub fn observe<T>(live: Option<&T>, details: impl FnOnce(&T) -> Option<String>) -> Self {
        match live {
            Some(value) => Self::Present {
                details: details(value),
            },
            None => Self::Absent,
        }
    }

    /// Check if state represents presence
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Check if state represents absence
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Mutation chosen for a resource after the existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Resource is absent and must be created
    Create,
    /// Resource exists and its content is replaced
    Update,
}

impl Action {
    /// Present-tense verb for progress output
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Decide between create and update from a single read of the live resource
pub fn decide<T>(live: Option<&T>) -> Action {
    if live.is_some() {
        Action::Update
    } else {
        Action::Create
    }
}

/// Result of applying a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Resource was removed
    Removed,
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}
