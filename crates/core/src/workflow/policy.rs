//! Configurable per-role approval gates.
//!
//! Approval is not a fixed chain: each active+required policy entry is one
//! "gate" that must independently collect its minimum number of approvals.
//! Operators add or remove gates at runtime; repositories load a snapshot of
//! the configuration and pass it into the engine per call, so there are no
//! ambient lookups.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use feriado_shared::types::PolicyEntryId;

use crate::workflow::approval::Role;

/// One configured approval gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Unique identifier for the entry.
    pub id: PolicyEntryId,
    /// The approving role this gate belongs to. Unique per policy.
    pub role: Role,
    /// Whether the gate must be satisfied for full approval.
    pub required: bool,
    /// Ordering hint for display and evaluation order.
    pub order_position: i16,
    /// Approvals needed from this role before the gate is satisfied.
    pub minimum_approvals: u32,
    /// Inactive entries are ignored entirely (soft-deleted).
    pub active: bool,
}

/// An immutable snapshot of the approval policy configuration.
///
/// Entries are held in `order_position` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    entries: Vec<PolicyEntry>,
}

impl PolicySnapshot {
    /// Creates a snapshot, ordering entries by their position hint.
    #[must_use]
    pub fn new(mut entries: Vec<PolicyEntry>) -> Self {
        entries.sort_by_key(|e| e.order_position);
        Self { entries }
    }

    /// The default configuration seeded for new installations:
    /// direct leader first, then HR, one approval each.
    #[must_use]
    pub fn default_two_gate() -> Self {
        Self::new(vec![
            PolicyEntry {
                id: PolicyEntryId::new(),
                role: Role::Leader,
                required: true,
                order_position: 1,
                minimum_approvals: 1,
                active: true,
            },
            PolicyEntry {
                id: PolicyEntryId::new(),
                role: Role::Hr,
                required: true,
                order_position: 2,
                minimum_approvals: 1,
                active: true,
            },
        ])
    }

    /// All entries, ordered, including inactive ones.
    #[must_use]
    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }

    /// The ordered workflow: (role, minimum approvals) over active+required
    /// entries only.
    #[must_use]
    pub fn active_workflow(&self) -> Vec<(Role, u32)> {
        self.entries
            .iter()
            .filter(|e| e.active && e.required)
            .map(|e| (e.role, e.minimum_approvals))
            .collect()
    }

    /// Every role that may record approvals: all active entries, required
    /// or not.
    #[must_use]
    pub fn roles_that_can_approve(&self) -> BTreeSet<Role> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.role)
            .collect()
    }

    /// The active entry for a role, if any.
    #[must_use]
    pub fn active_entry(&self, role: Role) -> Option<&PolicyEntry> {
        self.entries.iter().find(|e| e.active && e.role == role)
    }

    /// Whether an entry may be deactivated: the last remaining
    /// active+required gate must always stay, so the workflow never loses
    /// its final gate.
    #[must_use]
    pub fn can_be_deleted(&self, entry: &PolicyEntry) -> bool {
        if !(entry.required && entry.active) {
            return true;
        }

        self.entries
            .iter()
            .filter(|e| e.active && e.required)
            .count()
            > 1
    }

    /// Whether every active+required gate has met its minimum, given the
    /// per-role count of approved records.
    #[must_use]
    pub fn is_fully_approved(&self, approved_counts: &BTreeMap<Role, u32>) -> bool {
        self.active_workflow()
            .iter()
            .all(|(role, minimum)| approved_counts.get(role).copied().unwrap_or(0) >= *minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: Role, required: bool, order: i16, minimum: u32, active: bool) -> PolicyEntry {
        PolicyEntry {
            id: PolicyEntryId::new(),
            role,
            required,
            order_position: order,
            minimum_approvals: minimum,
            active,
        }
    }

    #[test]
    fn test_active_workflow_filters_and_orders() {
        let snapshot = PolicySnapshot::new(vec![
            entry(Role::Hr, true, 2, 1, true),
            entry(Role::Leader, true, 1, 1, true),
            entry(Role::Admin, false, 3, 1, true),    // optional gate
            entry(Role::Employee, true, 0, 1, false), // inactive
        ]);

        assert_eq!(
            snapshot.active_workflow(),
            vec![(Role::Leader, 1), (Role::Hr, 1)]
        );
    }

    #[test]
    fn test_roles_that_can_approve_includes_optional_gates() {
        let snapshot = PolicySnapshot::new(vec![
            entry(Role::Leader, true, 1, 1, true),
            entry(Role::Admin, false, 2, 1, true),
            entry(Role::Hr, true, 3, 1, false),
        ]);

        let roles = snapshot.roles_that_can_approve();
        assert!(roles.contains(&Role::Leader));
        assert!(roles.contains(&Role::Admin));
        assert!(!roles.contains(&Role::Hr));
    }

    #[test]
    fn test_last_required_gate_cannot_be_deleted() {
        let leader = entry(Role::Leader, true, 1, 1, true);
        let optional = entry(Role::Admin, false, 2, 1, true);
        let snapshot = PolicySnapshot::new(vec![leader.clone(), optional.clone()]);

        assert!(!snapshot.can_be_deleted(&leader));
        assert!(snapshot.can_be_deleted(&optional));
    }

    #[test]
    fn test_required_gate_deletable_while_another_remains() {
        let leader = entry(Role::Leader, true, 1, 1, true);
        let hr = entry(Role::Hr, true, 2, 1, true);
        let snapshot = PolicySnapshot::new(vec![leader.clone(), hr]);

        assert!(snapshot.can_be_deleted(&leader));
    }

    #[test]
    fn test_fully_approved_requires_every_gate() {
        let snapshot = PolicySnapshot::default_two_gate();

        let mut counts = BTreeMap::new();
        assert!(!snapshot.is_fully_approved(&counts));

        counts.insert(Role::Leader, 1);
        assert!(!snapshot.is_fully_approved(&counts));

        counts.insert(Role::Hr, 1);
        assert!(snapshot.is_fully_approved(&counts));
    }

    #[test]
    fn test_fully_approved_respects_minimum_counts() {
        let snapshot = PolicySnapshot::new(vec![entry(Role::Hr, true, 1, 2, true)]);

        let mut counts = BTreeMap::new();
        counts.insert(Role::Hr, 1);
        assert!(!snapshot.is_fully_approved(&counts));

        counts.insert(Role::Hr, 2);
        assert!(snapshot.is_fully_approved(&counts));
    }

    #[test]
    fn test_empty_workflow_is_trivially_approved() {
        // A policy with no active+required gates approves immediately;
        // the seeded default always has at least one gate.
        let snapshot = PolicySnapshot::new(vec![entry(Role::Admin, false, 1, 1, true)]);
        assert!(snapshot.is_fully_approved(&BTreeMap::new()));
    }
}
