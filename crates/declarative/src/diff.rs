//! Set-based diff computation
//!
//! Membership lists such as share permissions are compared as sets: order
//! and duplicates in either input never produce a change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Elements to add and remove to turn a live set into a desired one
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetDiff<T: Ord> {
    /// `desired - live`
    pub to_add: BTreeSet<T>,
    /// `live - desired`
    pub to_remove: BTreeSet<T>,
}

impl<T: Ord + Clone> SetDiff<T> {
    /// Compute the diff between desired and live memberships
    pub fn compute<'a, D, L>(desired: D, live: L) -> Self
    where
        T: 'a,
        D: IntoIterator<Item = &'a T>,
        L: IntoIterator<Item = &'a T>,
    {
        let desired: BTreeSet<T> = desired.into_iter().cloned().collect();
        let live: BTreeSet<T> = live.into_iter().cloned().collect();

        Self {
            to_add: desired.difference(&live).cloned().collect(),
            to_remove: live.difference(&desired).cloned().collect(),
        }
    }

    /// Diff that strips every live member
    pub fn remove_all<'a, L>(live: L) -> Self
    where
        T: 'a,
        L: IntoIterator<Item = &'a T>,
    {
        Self {
            to_add: BTreeSet::new(),
            to_remove: live.into_iter().cloned().collect(),
        }
    }

    /// Check if there is nothing to change
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// Elements to add, in sorted order
    pub fn additions(&self) -> Vec<T> {
        self.to_add.iter().cloned().collect()
    }

    /// Elements to remove, in sorted order
    pub fn removals(&self) -> Vec<T> {
        self.to_remove.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_diff_add_and_remove() {
        let desired = ids(&["111111111111", "222222222222"]);
        let live = ids(&["222222222222", "333333333333"]);

        let diff = SetDiff::compute(&desired, &live);
        assert_eq!(diff.additions(), ids(&["111111111111"]));
        assert_eq!(diff.removals(), ids(&["333333333333"]));
        assert_eq!(diff.total(), 2);
    }

    #[test]
    fn test_diff_identical_sets_is_empty() {
        let set = ids(&["111111111111", "222222222222"]);
        let diff = SetDiff::compute(&set, &set);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_ignores_order_and_duplicates() {
        let desired = ids(&["222222222222", "111111111111", "111111111111"]);
        let live = ids(&["111111111111", "222222222222"]);
        assert!(SetDiff::compute(&desired, &live).is_empty());
    }

    #[test]
    fn test_diff_from_empty() {
        let desired = ids(&["111111111111"]);
        let diff = SetDiff::compute(&desired, &Vec::new());
        assert_eq!(diff.additions(), desired);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let live = ids(&["111111111111", "222222222222"]);
        let diff = SetDiff::remove_all(&live);
        assert!(diff.to_add.is_empty());
        assert_eq!(diff.removals(), live);
    }
}
