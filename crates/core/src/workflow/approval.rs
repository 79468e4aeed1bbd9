//! Roles, role sets, and the approval eligibility engine.
//!
//! An employee holds a set of roles rather than a single one. Capability
//! checks are explicit methods on the set; approval eligibility is decided
//! by a stateless engine against a policy snapshot, never by ambient
//! configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use feriado_shared::types::EmployeeId;

use crate::workflow::error::WorkflowError;
use crate::workflow::policy::PolicySnapshot;
use crate::workflow::types::RequestStatus;

/// Employee role.
///
/// The declaration order is the scan order used when picking an approver's
/// role slot: the first held role that is configured as an approving role
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee; requests vacations.
    Employee,
    /// Leads a team; approves direct reports' requests.
    Leader,
    /// Human resources; approves any request.
    Hr,
    /// System administrator; approves any request.
    Admin,
}

impl Role {
    /// All roles in scan order.
    pub const ALL: [Self; 4] = [Self::Employee, Self::Leader, Self::Hr, Self::Admin];

    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "leader" => Some(Self::Leader),
            "hr" => Some(Self::Hr),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Leader => "leader",
            Self::Hr => "hr",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of roles held simultaneously by one employee.
///
/// Every employee holds at least one role; an empty set is invalid and is
/// rejected at the repository boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a role set from individual role flags, the shape the
    /// storage layer uses.
    #[must_use]
    pub fn from_flags(employee: bool, leader: bool, hr: bool, admin: bool) -> Self {
        let mut roles = BTreeSet::new();
        if employee {
            roles.insert(Role::Employee);
        }
        if leader {
            roles.insert(Role::Leader);
        }
        if hr {
            roles.insert(Role::Hr);
        }
        if admin {
            roles.insert(Role::Admin);
        }
        Self { roles }
    }

    /// Creates a role set from a list of roles.
    #[must_use]
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Adds a role to the set.
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role);
    }

    /// Returns true if the set contains the role.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if no role is held. Invalid for a persisted employee.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterates held roles in scan order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Capability: may act on approval workflows at all.
    #[must_use]
    pub fn can_approve_requests(&self) -> bool {
        self.contains(Role::Leader) || self.contains(Role::Hr) || self.contains(Role::Admin)
    }

    /// Capability: may mark approved requests as taken.
    #[must_use]
    pub fn can_mark_taken(&self) -> bool {
        self.contains(Role::Hr) || self.contains(Role::Admin)
    }

    /// Capability: may manage employees, countries, and the approval policy.
    #[must_use]
    pub fn can_manage(&self) -> bool {
        self.contains(Role::Hr) || self.contains(Role::Admin)
    }
}

/// The facts about a request that approval eligibility depends on.
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts {
    /// Current request status.
    pub status: RequestStatus,
    /// The requesting employee.
    pub employee: EmployeeId,
    /// The requesting employee's direct manager, if any.
    pub employee_lead: Option<EmployeeId>,
}

/// The facts about an approver that eligibility depends on.
#[derive(Debug, Clone)]
pub struct ApproverFacts {
    /// The approver's employee id.
    pub employee: EmployeeId,
    /// The approver's role set.
    pub roles: RoleSet,
}

/// Stateless engine for approval eligibility and completeness.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Determines the role slot an approver fills on a request, enforcing
    /// every authorization precondition.
    ///
    /// The scan walks the approver's roles in declaration order and stops
    /// at the first role that is active in the policy and whose gate is
    /// not yet satisfied. That role then decides:
    /// - `hr` / `admin` may approve any pending request
    /// - `leader` only when the approver is the requester's direct lead
    /// - any other configured role never qualifies
    ///
    /// # Errors
    ///
    /// * `WorkflowError::NotPending` - the request has been decided
    /// * `WorkflowError::SelfApproval` - approver is the requester
    /// * `WorkflowError::NotAuthorizedToApprove` - no eligible role
    pub fn eligible_role(
        request: &RequestFacts,
        approver: &ApproverFacts,
        policy: &PolicySnapshot,
        approved_counts: &BTreeMap<Role, u32>,
    ) -> Result<Role, WorkflowError> {
        if request.status != RequestStatus::Pending {
            return Err(WorkflowError::NotPending {
                status: request.status,
            });
        }

        if approver.employee == request.employee {
            return Err(WorkflowError::SelfApproval);
        }

        let configured = policy.roles_that_can_approve();
        if !approver.roles.iter().any(|r| configured.contains(&r)) {
            return Err(WorkflowError::NotAuthorizedToApprove);
        }

        for role in approver.roles.iter() {
            let Some(entry) = policy.active_entry(role) else {
                continue;
            };

            let current = approved_counts.get(&role).copied().unwrap_or(0);
            if current >= entry.minimum_approvals {
                continue; // gate already satisfied, try the next held role
            }

            return match role {
                Role::Hr | Role::Admin => Ok(role),
                Role::Leader if request.employee_lead == Some(approver.employee) => Ok(role),
                _ => Err(WorkflowError::NotAuthorizedToApprove),
            };
        }

        Err(WorkflowError::NotAuthorizedToApprove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_gate_policy() -> PolicySnapshot {
        PolicySnapshot::default_two_gate()
    }

    fn request(employee: EmployeeId, lead: Option<EmployeeId>) -> RequestFacts {
        RequestFacts {
            status: RequestStatus::Pending,
            employee,
            employee_lead: lead,
        }
    }

    fn approver(employee: EmployeeId, roles: &[Role]) -> ApproverFacts {
        ApproverFacts {
            employee,
            roles: RoleSet::from_roles(roles.iter().copied()),
        }
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("manager"), None);
    }

    #[test]
    fn test_role_set_from_flags() {
        let roles = RoleSet::from_flags(true, false, true, false);
        assert!(roles.contains(Role::Employee));
        assert!(roles.contains(Role::Hr));
        assert!(!roles.contains(Role::Leader));
        assert!(!roles.is_empty());
    }

    #[test]
    fn test_role_set_capabilities() {
        assert!(RoleSet::from_roles([Role::Leader]).can_approve_requests());
        assert!(!RoleSet::from_roles([Role::Leader]).can_mark_taken());
        assert!(RoleSet::from_roles([Role::Hr]).can_mark_taken());
        assert!(RoleSet::from_roles([Role::Admin]).can_manage());
        assert!(!RoleSet::from_roles([Role::Employee]).can_approve_requests());
    }

    #[test]
    fn test_hr_can_approve_any_pending_request() {
        let requester = EmployeeId::new();
        let hr = approver(EmployeeId::new(), &[Role::Hr]);

        let result = ApprovalEngine::eligible_role(
            &request(requester, None),
            &hr,
            &two_gate_policy(),
            &BTreeMap::new(),
        );
        assert_eq!(result.unwrap(), Role::Hr);
    }

    #[test]
    fn test_leader_can_approve_only_direct_reports() {
        let requester = EmployeeId::new();
        let lead_id = EmployeeId::new();
        let lead = approver(lead_id, &[Role::Employee, Role::Leader]);

        let ok = ApprovalEngine::eligible_role(
            &request(requester, Some(lead_id)),
            &lead,
            &two_gate_policy(),
            &BTreeMap::new(),
        );
        assert_eq!(ok.unwrap(), Role::Leader);

        let not_their_report = ApprovalEngine::eligible_role(
            &request(requester, Some(EmployeeId::new())),
            &lead,
            &two_gate_policy(),
            &BTreeMap::new(),
        );
        assert!(matches!(
            not_their_report,
            Err(WorkflowError::NotAuthorizedToApprove)
        ));
    }

    #[test]
    fn test_self_approval_is_rejected_for_every_role() {
        let requester = EmployeeId::new();
        let me = approver(requester, &[Role::Hr, Role::Admin]);

        let result = ApprovalEngine::eligible_role(
            &request(requester, None),
            &me,
            &two_gate_policy(),
            &BTreeMap::new(),
        );
        assert!(matches!(result, Err(WorkflowError::SelfApproval)));
    }

    #[test]
    fn test_decided_request_is_not_approvable() {
        let mut facts = request(EmployeeId::new(), None);
        facts.status = RequestStatus::Approved;

        let hr = approver(EmployeeId::new(), &[Role::Hr]);
        let result =
            ApprovalEngine::eligible_role(&facts, &hr, &two_gate_policy(), &BTreeMap::new());
        assert!(matches!(
            result,
            Err(WorkflowError::NotPending {
                status: RequestStatus::Approved
            })
        ));
    }

    #[test]
    fn test_unconfigured_role_cannot_approve() {
        let plain = approver(EmployeeId::new(), &[Role::Employee]);
        let result = ApprovalEngine::eligible_role(
            &request(EmployeeId::new(), None),
            &plain,
            &two_gate_policy(),
            &BTreeMap::new(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::NotAuthorizedToApprove)
        ));
    }

    #[test]
    fn test_satisfied_gate_falls_through_to_next_role() {
        // Approver is both the requester's lead and HR. The leader gate is
        // already satisfied, so the scan lands on the HR slot.
        let requester = EmployeeId::new();
        let lead_id = EmployeeId::new();
        let both = approver(lead_id, &[Role::Leader, Role::Hr]);

        let mut counts = BTreeMap::new();
        counts.insert(Role::Leader, 1);

        let result = ApprovalEngine::eligible_role(
            &request(requester, Some(lead_id)),
            &both,
            &two_gate_policy(),
            &counts,
        );
        assert_eq!(result.unwrap(), Role::Hr);
    }

    #[test]
    fn test_all_gates_satisfied_leaves_nothing_to_fill() {
        let hr = approver(EmployeeId::new(), &[Role::Hr]);

        let mut counts = BTreeMap::new();
        counts.insert(Role::Leader, 1);
        counts.insert(Role::Hr, 1);

        let result = ApprovalEngine::eligible_role(
            &request(EmployeeId::new(), None),
            &hr,
            &two_gate_policy(),
            &counts,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::NotAuthorizedToApprove)
        ));
    }
}
