//! Vacation request repository and approval orchestrator.
//!
//! The approve/reject critical section runs in a single transaction
//! holding a row-level lock on the request, so concurrent approvers
//! serialize: the loser of a race re-reads a decided request and fails
//! with "not pending" instead of double-applying effects.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use feriado_core::calendar::WorkingCalendar;
use feriado_core::workflow::{
    ApprovalEngine, ApproverFacts, CandidateRequest, RequestFacts, RequestLifecycle, Role,
    SweepAction, ValidationIssue, WorkflowError,
};
use feriado_shared::types::EmployeeId;

use crate::entities::{
    employees, sea_orm_active_enums, vacation_approvals, vacation_requests,
};
use crate::repositories::balance::{ledger_year, BalanceRepository};
use crate::repositories::employee::role_set;
use crate::repositories::policy::{core_role_to_db, db_role_to_core, PolicyRepository};

/// Request repository errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Field-level validation failures; surfaced verbatim, never corrected.
    #[error("Request validation failed")]
    Validation(Vec<ValidationIssue>),

    /// Workflow rule violation (state machine or authorization).
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The acting party may not perform this operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Employee not found.
    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    /// Vacation request not found.
    #[error("Vacation request {0} not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl RequestError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Workflow(e) => e.status_code(),
            Self::Forbidden(_) => 403,
            Self::EmployeeNotFound(_) | Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Workflow(e) => e.error_code(),
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::NotFound(_) => "REQUEST_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for creating a vacation request.
#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    /// The employee the vacation is for.
    pub employee_id: Uuid,
    /// First day off, inclusive.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Bulk historical import path: the request is recorded directly as
    /// `taken` and skips overlap validation.
    pub imported_taken: bool,
}

/// Outcome of an approve call.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// The request after the call.
    pub request: vacation_requests::Model,
    /// True exactly when this call performed the final transition to
    /// `approved`; the caller fires the notification once on this signal.
    pub newly_approved: bool,
}

/// Outcome of one time-driven sweep run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepSummary {
    /// Approved requests whose end date passed, now taken.
    pub marked_taken: usize,
    /// Taken requests whose end date is ahead, reverted to approved.
    pub reverted: usize,
    /// Requests that failed to update; logged and skipped.
    pub failed: usize,
}

/// Vacation request repository.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    db: DatabaseConnection,
}

impl RequestRepository {
    /// Creates a new request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a vacation request for an employee.
    ///
    /// The requested-day count is derived from the employee's working
    /// calendar, never user-supplied. Validation checks date ordering, a
    /// positive day count, and overlap against the employee's existing
    /// approved-or-taken requests (skipped for imported `taken` rows).
    ///
    /// # Errors
    ///
    /// Returns `RequestError::Validation` with every failed check.
    pub async fn create(
        &self,
        input: CreateRequestInput,
        calendar: &WorkingCalendar,
    ) -> Result<vacation_requests::Model, RequestError> {
        let employee = employees::Entity::find_by_id(input.employee_id)
            .filter(employees::Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::EmployeeNotFound(input.employee_id))?;

        let days_requested = calendar.count_working_days(input.start_date, input.end_date);
        let status = if input.imported_taken {
            feriado_core::workflow::RequestStatus::Taken
        } else {
            feriado_core::workflow::RequestStatus::Pending
        };

        let blocking_ranges: Vec<(NaiveDate, NaiveDate)> = vacation_requests::Entity::find()
            .filter(vacation_requests::Column::EmployeeId.eq(employee.id))
            .filter(vacation_requests::Column::Status.is_in([
                sea_orm_active_enums::RequestStatus::Approved,
                sea_orm_active_enums::RequestStatus::Taken,
            ]))
            .all(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .into_iter()
            .map(|r| (r.start_date, r.end_date))
            .collect();

        let candidate = CandidateRequest {
            start_date: input.start_date,
            end_date: input.end_date,
            days_requested,
            status,
        };
        RequestLifecycle::validate(&candidate, &blocking_ranges)
            .map_err(RequestError::Validation)?;

        let now = Utc::now().into();
        let request = vacation_requests::ActiveModel {
            id: Set(Uuid::now_v7()),
            employee_id: Set(employee.id),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            days_requested: Set(days_requested as i32),
            status: Set(core_status_to_db(status)),
            approved_by: Set(None),
            approved_at: Set(None),
            rejected_reason: Set(None),
            company: Set(employee.company.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = request
            .insert(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        info!(
            request_id = %created.id,
            employee_id = %employee.id,
            days = created.days_requested,
            "Vacation request created"
        );

        Ok(created)
    }

    /// Fetches a request by id.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::NotFound` if no such request exists.
    pub async fn get(&self, id: Uuid) -> Result<vacation_requests::Model, RequestError> {
        vacation_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::NotFound(id))
    }

    /// Lists requests, optionally filtered by employee and status, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        employee_id: Option<Uuid>,
        status: Option<feriado_core::workflow::RequestStatus>,
    ) -> Result<Vec<vacation_requests::Model>, RequestError> {
        let mut query =
            vacation_requests::Entity::find().order_by_desc(vacation_requests::Column::CreatedAt);
        if let Some(employee_id) = employee_id {
            query = query.filter(vacation_requests::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = status {
            query = query.filter(vacation_requests::Column::Status.eq(core_status_to_db(status)));
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))
    }

    /// Lists the approval records of one request in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn approvals_for(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<vacation_approvals::Model>, RequestError> {
        vacation_approvals::Entity::find()
            .filter(vacation_approvals::Column::RequestId.eq(request_id))
            .order_by_asc(vacation_approvals::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))
    }

    /// Cancels a pending request whose start date is still ahead.
    ///
    /// Only the requester, HR, or an admin may cancel. Pending requests
    /// are the only ones that may be removed; anything acted upon stays
    /// forever.
    ///
    /// # Errors
    ///
    /// * `RequestError::Forbidden` - acting party may not cancel
    /// * `RequestError::Workflow` - not pending, or already started
    pub async fn cancel(
        &self,
        request_id: Uuid,
        acting_employee_id: Uuid,
    ) -> Result<(), RequestError> {
        let request = self.get(request_id).await?;
        let acting = employees::Entity::find_by_id(acting_employee_id)
            .filter(employees::Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::EmployeeNotFound(acting_employee_id))?;

        let may_cancel = acting.id == request.employee_id || role_set(&acting).can_manage();
        if !may_cancel {
            return Err(RequestError::Forbidden(
                "only the requester or HR may cancel a request".to_string(),
            ));
        }

        RequestLifecycle::can_cancel(
            db_status_to_core(&request.status),
            request.start_date,
            Utc::now().date_naive(),
        )?;

        request
            .delete(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        info!(request_id = %request_id, acting = %acting_employee_id, "Vacation request cancelled");
        Ok(())
    }

    /// Records one approver's positive decision and drives the request
    /// transition.
    ///
    /// The whole read-decide-write sequence runs inside a transaction with
    /// the request row locked, so two racing approvers serialize and the
    /// final transition (and its notification signal) happens exactly once.
    ///
    /// # Errors
    ///
    /// * `RequestError::Workflow` - not pending, self-approval, or no
    ///   eligible role
    pub async fn approve(
        &self,
        request_id: Uuid,
        approver_id: Uuid,
    ) -> Result<ApprovalOutcome, RequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let request = lock_request(&txn, request_id).await?;
        let approver = active_employee_on(&txn, approver_id).await?;
        let requester = employees::Entity::find_by_id(request.employee_id)
            .one(&txn)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::EmployeeNotFound(request.employee_id))?;

        let policy = PolicyRepository::snapshot_on(&txn)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;
        let approvals = approvals_on(&txn, request_id).await?;
        let approved_counts = approved_counts(&approvals);

        let facts = RequestFacts {
            status: db_status_to_core(&request.status),
            employee: EmployeeId::from_uuid(requester.id),
            employee_lead: requester.lead_id.map(EmployeeId::from_uuid),
        };
        let approver_facts = ApproverFacts {
            employee: EmployeeId::from_uuid(approver.id),
            roles: role_set(&approver),
        };

        let role = ApprovalEngine::eligible_role(&facts, &approver_facts, &policy, &approved_counts)
            .map_err(RequestError::Workflow)?;

        let now = Utc::now();
        write_approval_slot(
            &txn,
            &approvals,
            request_id,
            approver.id,
            role,
            sea_orm_active_enums::ApprovalStatus::Approved,
            format!("Approved by {}", approver.name),
            now,
        )
        .await?;

        // A rejected slot anywhere is an absolute veto, regardless of the
        // other gates.
        let has_rejection = approvals
            .iter()
            .any(|a| a.status == sea_orm_active_enums::ApprovalStatus::Rejected);

        let outcome = if has_rejection {
            let mut active: vacation_requests::ActiveModel = request.into();
            active.status = Set(sea_orm_active_enums::RequestStatus::Rejected);
            active.updated_at = Set(now.into());
            let updated = active
                .update(&txn)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?;

            warn!(request_id = %request_id, "Request force-rejected by earlier veto");
            ApprovalOutcome {
                request: updated,
                newly_approved: false,
            }
        } else {
            let mut counts = approved_counts;
            *counts.entry(role).or_insert(0) += 1;

            if policy.is_fully_approved(&counts) {
                let mut active: vacation_requests::ActiveModel = request.into();
                active.status = Set(sea_orm_active_enums::RequestStatus::Approved);
                active.approved_by = Set(Some(approver.id));
                active.approved_at = Set(Some(now.into()));
                active.updated_at = Set(now.into());
                let updated = active
                    .update(&txn)
                    .await
                    .map_err(|e| RequestError::Database(e.to_string()))?;

                info!(
                    request_id = %request_id,
                    approver = %approver.id,
                    "Vacation request fully approved"
                );
                ApprovalOutcome {
                    request: updated,
                    newly_approved: true,
                }
            } else {
                info!(
                    request_id = %request_id,
                    approver = %approver.id,
                    role = %role,
                    "Approval recorded; gates still pending"
                );
                ApprovalOutcome {
                    request,
                    newly_approved: false,
                }
            }
        };

        txn.commit()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(outcome)
    }

    /// Records one approver's veto: the slot is marked rejected and the
    /// whole request is rejected immediately, without waiting for other
    /// gates.
    ///
    /// # Errors
    ///
    /// Same authorization preconditions as `approve`.
    pub async fn reject(
        &self,
        request_id: Uuid,
        approver_id: Uuid,
        reason: Option<String>,
    ) -> Result<vacation_requests::Model, RequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let request = lock_request(&txn, request_id).await?;
        let approver = active_employee_on(&txn, approver_id).await?;
        let requester = employees::Entity::find_by_id(request.employee_id)
            .one(&txn)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::EmployeeNotFound(request.employee_id))?;

        let policy = PolicyRepository::snapshot_on(&txn)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;
        let approvals = approvals_on(&txn, request_id).await?;
        let approved_counts = approved_counts(&approvals);

        let facts = RequestFacts {
            status: db_status_to_core(&request.status),
            employee: EmployeeId::from_uuid(requester.id),
            employee_lead: requester.lead_id.map(EmployeeId::from_uuid),
        };
        let approver_facts = ApproverFacts {
            employee: EmployeeId::from_uuid(approver.id),
            roles: role_set(&approver),
        };

        let role = ApprovalEngine::eligible_role(&facts, &approver_facts, &policy, &approved_counts)
            .map_err(RequestError::Workflow)?;

        let reason_text = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "No reason provided".to_string());

        let now = Utc::now();
        write_approval_slot(
            &txn,
            &approvals,
            request_id,
            approver.id,
            role,
            sea_orm_active_enums::ApprovalStatus::Rejected,
            reason_text.clone(),
            now,
        )
        .await?;

        let mut active: vacation_requests::ActiveModel = request.into();
        active.status = Set(sea_orm_active_enums::RequestStatus::Rejected);
        active.rejected_reason = Set(Some(reason_text));
        active.updated_at = Set(now.into());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        info!(request_id = %request_id, approver = %approver_id, "Vacation request rejected");
        Ok(updated)
    }

    /// Marks an approved request as taken and consumes its days from the
    /// employee's balance, atomically.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` for any status other
    /// than `approved`.
    pub async fn mark_taken(
        &self,
        request_id: Uuid,
    ) -> Result<vacation_requests::Model, RequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let request = lock_request(&txn, request_id).await?;
        RequestLifecycle::mark_taken(db_status_to_core(&request.status))?;

        let updated = take_request_on(&txn, request).await?;

        txn.commit()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        info!(request_id = %request_id, "Vacation request marked as taken");
        Ok(updated)
    }

    /// Time-driven maintenance pass: approved requests whose end date has
    /// passed become taken (consuming balance days exactly once), and
    /// taken requests whose end date is still ahead revert to approved.
    ///
    /// Each request is re-validated under its own row lock, so the sweep
    /// is idempotent and safe to run concurrently with user actions. The
    /// balance effect of a revert is reconciled by the next batch
    /// recalculation.
    ///
    /// # Errors
    ///
    /// Returns an error only when the candidate listing fails; per-request
    /// failures are logged and counted in the summary.
    pub async fn sweep_time_transitions(
        &self,
        today: NaiveDate,
    ) -> Result<SweepSummary, RequestError> {
        let mut summary = SweepSummary::default();

        let ended = vacation_requests::Entity::find()
            .filter(
                vacation_requests::Column::Status.eq(sea_orm_active_enums::RequestStatus::Approved),
            )
            .filter(vacation_requests::Column::EndDate.lt(today))
            .all(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        for row in ended {
            match self.sweep_one(row.id, today).await {
                Ok(Some(SweepAction::MarkTaken)) => summary.marked_taken += 1,
                Ok(Some(SweepAction::RevertToApproved)) => summary.reverted += 1,
                Ok(None) => {}
                Err(e) => {
                    error!(request_id = %row.id, error = %e, "Sweep failed for request");
                    summary.failed += 1;
                }
            }
        }

        let ahead = vacation_requests::Entity::find()
            .filter(
                vacation_requests::Column::Status.eq(sea_orm_active_enums::RequestStatus::Taken),
            )
            .filter(vacation_requests::Column::EndDate.gt(today))
            .all(&self.db)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        for row in ahead {
            match self.sweep_one(row.id, today).await {
                Ok(Some(SweepAction::MarkTaken)) => summary.marked_taken += 1,
                Ok(Some(SweepAction::RevertToApproved)) => summary.reverted += 1,
                Ok(None) => {}
                Err(e) => {
                    error!(request_id = %row.id, error = %e, "Sweep failed for request");
                    summary.failed += 1;
                }
            }
        }

        info!(
            marked_taken = summary.marked_taken,
            reverted = summary.reverted,
            failed = summary.failed,
            "Time-driven sweep finished"
        );

        Ok(summary)
    }

    /// Applies the sweep to one request under its own lock, re-checking
    /// the classification after acquiring it.
    async fn sweep_one(
        &self,
        request_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<SweepAction>, RequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        let request = lock_request(&txn, request_id).await?;
        let action =
            RequestLifecycle::sweep_action(db_status_to_core(&request.status), request.end_date, today);

        match action {
            Some(SweepAction::MarkTaken) => {
                take_request_on(&txn, request).await?;
            }
            Some(SweepAction::RevertToApproved) => {
                let mut active: vacation_requests::ActiveModel = request.into();
                active.status = Set(sea_orm_active_enums::RequestStatus::Approved);
                active.updated_at = Set(Utc::now().into());
                active
                    .update(&txn)
                    .await
                    .map_err(|e| RequestError::Database(e.to_string()))?;
            }
            None => {}
        }

        txn.commit()
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?;

        Ok(action)
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Loads a request with a row-level exclusive lock.
async fn lock_request<C: ConnectionTrait>(
    conn: &C,
    request_id: Uuid,
) -> Result<vacation_requests::Model, RequestError> {
    vacation_requests::Entity::find_by_id(request_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| RequestError::Database(e.to_string()))?
        .ok_or(RequestError::NotFound(request_id))
}

/// Loads an active employee on an arbitrary connection.
async fn active_employee_on<C: ConnectionTrait>(
    conn: &C,
    employee_id: Uuid,
) -> Result<employees::Model, RequestError> {
    employees::Entity::find_by_id(employee_id)
        .filter(employees::Column::Active.eq(true))
        .one(conn)
        .await
        .map_err(|e| RequestError::Database(e.to_string()))?
        .ok_or(RequestError::EmployeeNotFound(employee_id))
}

/// Loads a request's approval records.
async fn approvals_on<C: ConnectionTrait>(
    conn: &C,
    request_id: Uuid,
) -> Result<Vec<vacation_approvals::Model>, RequestError> {
    vacation_approvals::Entity::find()
        .filter(vacation_approvals::Column::RequestId.eq(request_id))
        .all(conn)
        .await
        .map_err(|e| RequestError::Database(e.to_string()))
}

/// Per-role count of approved records.
fn approved_counts(approvals: &[vacation_approvals::Model]) -> BTreeMap<Role, u32> {
    let mut counts = BTreeMap::new();
    for approval in approvals {
        if approval.status == sea_orm_active_enums::ApprovalStatus::Approved {
            *counts.entry(db_role_to_core(&approval.role)).or_insert(0) += 1;
        }
    }
    counts
}

/// Finds-or-creates the (request, role) approval slot and records the
/// decision on it.
#[allow(clippy::too_many_arguments)]
async fn write_approval_slot<C: ConnectionTrait>(
    conn: &C,
    approvals: &[vacation_approvals::Model],
    request_id: Uuid,
    approver_id: Uuid,
    role: Role,
    status: sea_orm_active_enums::ApprovalStatus,
    comment: String,
    now: chrono::DateTime<Utc>,
) -> Result<(), RequestError> {
    let db_role = core_role_to_db(role);
    let existing = approvals.iter().find(|a| a.role == db_role);

    match existing {
        Some(slot) => {
            let mut active: vacation_approvals::ActiveModel = slot.clone().into();
            active.employee_id = Set(approver_id);
            active.status = Set(status);
            active.decided_at = Set(Some(now.into()));
            active.comment = Set(Some(comment));
            active.updated_at = Set(now.into());
            active
                .update(conn)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?;
        }
        None => {
            let slot = vacation_approvals::ActiveModel {
                id: Set(Uuid::now_v7()),
                request_id: Set(request_id),
                employee_id: Set(approver_id),
                role: Set(db_role),
                status: Set(status),
                decided_at: Set(Some(now.into())),
                comment: Set(Some(comment)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            slot.insert(conn)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?;
        }
    }

    Ok(())
}

/// Flips a request to taken and consumes its days from the balance, on
/// the caller's transaction.
async fn take_request_on<C: ConnectionTrait>(
    conn: &C,
    request: vacation_requests::Model,
) -> Result<vacation_requests::Model, RequestError> {
    let employee_id = request.employee_id;
    let year = ledger_year(request.start_date);
    let days = request.days_requested;

    let mut active: vacation_requests::ActiveModel = request.into();
    active.status = Set(sea_orm_active_enums::RequestStatus::Taken);
    active.updated_at = Set(Utc::now().into());
    let updated = active
        .update(conn)
        .await
        .map_err(|e| RequestError::Database(e.to_string()))?;

    BalanceRepository::apply_consumption_on(conn, employee_id, year, days)
        .await
        .map_err(|e| RequestError::Database(e.to_string()))?;

    Ok(updated)
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a database request status to the core status.
#[must_use]
pub const fn db_status_to_core(
    status: &sea_orm_active_enums::RequestStatus,
) -> feriado_core::workflow::RequestStatus {
    match status {
        sea_orm_active_enums::RequestStatus::Pending => {
            feriado_core::workflow::RequestStatus::Pending
        }
        sea_orm_active_enums::RequestStatus::Approved => {
            feriado_core::workflow::RequestStatus::Approved
        }
        sea_orm_active_enums::RequestStatus::Rejected => {
            feriado_core::workflow::RequestStatus::Rejected
        }
        sea_orm_active_enums::RequestStatus::Taken => feriado_core::workflow::RequestStatus::Taken,
    }
}

/// Converts a core request status to the database enum.
#[must_use]
pub const fn core_status_to_db(
    status: feriado_core::workflow::RequestStatus,
) -> sea_orm_active_enums::RequestStatus {
    match status {
        feriado_core::workflow::RequestStatus::Pending => {
            sea_orm_active_enums::RequestStatus::Pending
        }
        feriado_core::workflow::RequestStatus::Approved => {
            sea_orm_active_enums::RequestStatus::Approved
        }
        feriado_core::workflow::RequestStatus::Rejected => {
            sea_orm_active_enums::RequestStatus::Rejected
        }
        feriado_core::workflow::RequestStatus::Taken => sea_orm_active_enums::RequestStatus::Taken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        use feriado_core::workflow::RequestStatus as Core;
        for status in [Core::Pending, Core::Approved, Core::Rejected, Core::Taken] {
            assert_eq!(db_status_to_core(&core_status_to_db(status)), status);
        }
    }

    #[test]
    fn test_approved_counts_ignores_pending_and_rejected() {
        let now = Utc::now().into();
        let mk = |role, status| vacation_approvals::Model {
            id: Uuid::now_v7(),
            request_id: Uuid::now_v7(),
            employee_id: Uuid::now_v7(),
            role,
            status,
            decided_at: None,
            comment: None,
            created_at: now,
            updated_at: now,
        };

        let approvals = vec![
            mk(
                sea_orm_active_enums::ApproverRole::Leader,
                sea_orm_active_enums::ApprovalStatus::Approved,
            ),
            mk(
                sea_orm_active_enums::ApproverRole::Hr,
                sea_orm_active_enums::ApprovalStatus::Pending,
            ),
            mk(
                sea_orm_active_enums::ApproverRole::Admin,
                sea_orm_active_enums::ApprovalStatus::Rejected,
            ),
        ];

        let counts = approved_counts(&approvals);
        assert_eq!(counts.get(&Role::Leader), Some(&1));
        assert_eq!(counts.get(&Role::Hr), None);
        assert_eq!(counts.get(&Role::Admin), None);
    }
}
