//! Reconciliation engine for ssmdoc
//!
//! The engine turns inputs into a deployed document:
//! 1. Resolving - Pick content and format from the inputs
//! 2. Building - Combine inputs, prior state and identity into a desired document
//! 3. Reconciling - Create or update the document, then converge share permissions
//! 4. Recording - Describe the result for the state file

pub mod desired;
pub mod differ;
pub mod lifecycle;
pub mod permissions;
pub mod planner;
pub mod reconcile;
pub mod recorder;
pub mod resolver;

pub use lifecycle::SsmDocument;
