//! Approval policy repository.
//!
//! The policy is loaded as an immutable snapshot and passed into the
//! approval engine per call; there are no ambient configuration lookups.
//! Entries are soft-deactivated, never deleted, and the last remaining
//! active+required gate can never be removed.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use feriado_core::workflow::{PolicyEntry, PolicySnapshot, Role};
use feriado_shared::types::PolicyEntryId;

use crate::entities::{approval_policy_entries, sea_orm_active_enums::ApproverRole};

/// Approval policy repository errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy entry not found.
    #[error("Approval policy entry {0} not found")]
    NotFound(Uuid),

    /// A policy entry for this role already exists.
    #[error("An approval policy entry for role {0} already exists")]
    DuplicateRole(Role),

    /// Minimum approvals must be positive.
    #[error("Minimum approvals must be greater than zero")]
    InvalidMinimum,

    /// The last remaining active+required gate cannot be deactivated.
    #[error("Cannot remove the last required approval gate")]
    LastRequiredGate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Input for creating a policy entry.
#[derive(Debug, Clone)]
pub struct CreatePolicyEntryInput {
    /// The approving role; unique across entries.
    pub role: Role,
    /// Whether the gate is required for full approval.
    pub required: bool,
    /// Ordering hint.
    pub order_position: i16,
    /// Approvals needed from this role.
    pub minimum_approvals: i16,
    /// Human-readable description.
    pub description: Option<String>,
}

/// Input for updating a policy entry.
#[derive(Debug, Clone, Default)]
pub struct UpdatePolicyEntryInput {
    /// New required flag.
    pub required: Option<bool>,
    /// New ordering hint.
    pub order_position: Option<i16>,
    /// New minimum approvals.
    pub minimum_approvals: Option<i16>,
    /// New description.
    pub description: Option<Option<String>>,
}

/// Approval policy repository.
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    db: DatabaseConnection,
}

impl PolicyRepository {
    /// Creates a new policy repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the current policy snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn snapshot(&self) -> Result<PolicySnapshot, PolicyError> {
        Self::snapshot_on(&self.db).await
    }

    /// Loads the policy snapshot on an arbitrary connection, so the
    /// orchestrator can read it inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn snapshot_on<C: ConnectionTrait>(conn: &C) -> Result<PolicySnapshot, PolicyError> {
        let rows = approval_policy_entries::Entity::find()
            .order_by_asc(approval_policy_entries::Column::OrderPosition)
            .all(conn)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))?;

        Ok(PolicySnapshot::new(
            rows.iter().map(entry_to_core).collect(),
        ))
    }

    /// Lists all policy entries, active and inactive, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<approval_policy_entries::Model>, PolicyError> {
        approval_policy_entries::Entity::find()
            .order_by_asc(approval_policy_entries::Column::OrderPosition)
            .all(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))
    }

    /// Creates a policy entry. Reactivates and reconfigures a previously
    /// deactivated entry for the same role instead of inserting a second
    /// row, keeping the role-uniqueness invariant.
    ///
    /// # Errors
    ///
    /// Returns an error when the minimum is non-positive, the role already
    /// has an active entry, or the database fails.
    pub async fn create(
        &self,
        input: CreatePolicyEntryInput,
    ) -> Result<approval_policy_entries::Model, PolicyError> {
        if input.minimum_approvals <= 0 {
            return Err(PolicyError::InvalidMinimum);
        }

        let existing = approval_policy_entries::Entity::find()
            .filter(approval_policy_entries::Column::Role.eq(core_role_to_db(input.role)))
            .one(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))?;

        let now = Utc::now().into();
        match existing {
            Some(row) if row.active => Err(PolicyError::DuplicateRole(input.role)),
            Some(row) => {
                let mut active: approval_policy_entries::ActiveModel = row.into();
                active.required = Set(input.required);
                active.order_position = Set(input.order_position);
                active.minimum_approvals = Set(input.minimum_approvals);
                active.description = Set(input.description);
                active.active = Set(true);
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| PolicyError::Database(e.to_string()))
            }
            None => {
                let entry = approval_policy_entries::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    role: Set(core_role_to_db(input.role)),
                    required: Set(input.required),
                    order_position: Set(input.order_position),
                    minimum_approvals: Set(input.minimum_approvals),
                    description: Set(input.description),
                    active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                entry
                    .insert(&self.db)
                    .await
                    .map_err(|e| PolicyError::Database(e.to_string()))
            }
        }
    }

    /// Updates a policy entry's configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the entry is missing, the new minimum is
    /// non-positive, or the database fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePolicyEntryInput,
    ) -> Result<approval_policy_entries::Model, PolicyError> {
        if matches!(input.minimum_approvals, Some(min) if min <= 0) {
            return Err(PolicyError::InvalidMinimum);
        }

        let entry = approval_policy_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))?
            .ok_or(PolicyError::NotFound(id))?;

        let mut active: approval_policy_entries::ActiveModel = entry.into();
        if let Some(required) = input.required {
            active.required = Set(required);
        }
        if let Some(order) = input.order_position {
            active.order_position = Set(order);
        }
        if let Some(minimum) = input.minimum_approvals {
            active.minimum_approvals = Set(minimum);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))
    }

    /// Soft-deactivates a policy entry, honoring the last-required-gate
    /// guard: at least one active+required gate must always remain.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::LastRequiredGate` when the guard blocks the
    /// deactivation.
    pub async fn deactivate(
        &self,
        id: Uuid,
    ) -> Result<approval_policy_entries::Model, PolicyError> {
        let entry = approval_policy_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))?
            .ok_or(PolicyError::NotFound(id))?;

        let snapshot = self.snapshot().await?;
        if !snapshot.can_be_deleted(&entry_to_core(&entry)) {
            return Err(PolicyError::LastRequiredGate);
        }

        let mut active: approval_policy_entries::ActiveModel = entry.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))
    }

    /// Seeds the default two-gate configuration (leader, then hr) when the
    /// table is empty. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn setup_default(&self) -> Result<(), PolicyError> {
        let count = approval_policy_entries::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| PolicyError::Database(e.to_string()))?;
        if count > 0 {
            return Ok(());
        }

        self.create(CreatePolicyEntryInput {
            role: Role::Leader,
            required: true,
            order_position: 1,
            minimum_approvals: 1,
            description: Some("Direct leader approval".to_string()),
        })
        .await?;
        self.create(CreatePolicyEntryInput {
            role: Role::Hr,
            required: true,
            order_position: 2,
            minimum_approvals: 1,
            description: Some("Human resources approval".to_string()),
        })
        .await?;

        Ok(())
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a database policy row to the core policy entry.
#[must_use]
pub fn entry_to_core(row: &approval_policy_entries::Model) -> PolicyEntry {
    PolicyEntry {
        id: PolicyEntryId::from_uuid(row.id),
        role: db_role_to_core(&row.role),
        required: row.required,
        order_position: row.order_position,
        minimum_approvals: u32::try_from(row.minimum_approvals).unwrap_or(1),
        active: row.active,
    }
}

/// Converts a database role enum to the core role.
#[must_use]
pub const fn db_role_to_core(role: &ApproverRole) -> Role {
    match role {
        ApproverRole::Employee => Role::Employee,
        ApproverRole::Leader => Role::Leader,
        ApproverRole::Hr => Role::Hr,
        ApproverRole::Admin => Role::Admin,
    }
}

/// Converts a core role to the database enum.
#[must_use]
pub const fn core_role_to_db(role: Role) -> ApproverRole {
    match role {
        Role::Employee => ApproverRole::Employee,
        Role::Leader => ApproverRole::Leader,
        Role::Hr => ApproverRole::Hr,
        Role::Admin => ApproverRole::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion_round_trip() {
        for role in Role::ALL {
            assert_eq!(db_role_to_core(&core_role_to_db(role)), role);
        }
    }

    #[test]
    fn test_entry_to_core_maps_fields() {
        let row = approval_policy_entries::Model {
            id: Uuid::now_v7(),
            role: ApproverRole::Hr,
            required: true,
            order_position: 2,
            minimum_approvals: 3,
            description: None,
            active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let entry = entry_to_core(&row);
        assert_eq!(entry.role, Role::Hr);
        assert_eq!(entry.minimum_approvals, 3);
        assert!(entry.required && entry.active);
        assert_eq!(entry.id.into_inner(), row.id);
    }
}
