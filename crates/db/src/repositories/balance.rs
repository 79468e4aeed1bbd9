//! Vacation balance repository.
//!
//! Balance rows are derived data: one row per (employee, year), created
//! lazily, recomputed wholesale by the batch recalculation and updated
//! incrementally when a request transitions into `taken`.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use feriado_core::ledger::{tenure, BalanceSnapshot};

use crate::entities::{
    employees, sea_orm_active_enums::RequestStatus, vacation_balances, vacation_requests,
};

/// Balance repository errors.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Employee not found.
    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    /// The employee is hired after the ledger year; entitlement is
    /// undefined before hire and no row is created.
    #[error("Employee {employee} is not hired until after {year}")]
    NotYetHired {
        /// The employee.
        employee: Uuid,
        /// The requested ledger year.
        year: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Outcome of one batch recalculation run.
#[derive(Debug, Clone, Copy)]
pub struct RecalculationSummary {
    /// The ledger year that was recalculated.
    pub year: i32,
    /// Rows recomputed successfully.
    pub processed: usize,
    /// Employees skipped (hired after the year).
    pub skipped: usize,
    /// Employees whose recomputation failed; logged and carried on.
    pub failed: usize,
}

/// Vacation balance repository.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the balance row for (employee, year), creating it from the
    /// current request sums when missing.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NotYetHired` for employees hired after the
    /// ledger year; no row is created for them.
    pub async fn get_or_create(
        &self,
        employee_id: Uuid,
        year: i32,
    ) -> Result<vacation_balances::Model, BalanceError> {
        let employee = employees::Entity::find_by_id(employee_id)
            .one(&self.db)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?
            .ok_or(BalanceError::EmployeeNotFound(employee_id))?;

        if let Some(hire_date) = employee.hire_date
            && !tenure::accrues_in_year(hire_date, year)
        {
            return Err(BalanceError::NotYetHired {
                employee: employee_id,
                year,
            });
        }

        let existing = vacation_balances::Entity::find()
            .filter(vacation_balances::Column::EmployeeId.eq(employee_id))
            .filter(vacation_balances::Column::Year.eq(year))
            .one(&self.db)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?;

        if let Some(row) = existing {
            return Ok(row);
        }

        let snapshot =
            compute_snapshot_on(&self.db, &employee, year, Utc::now().date_naive()).await?;
        insert_row_on(&self.db, employee_id, year, snapshot).await
    }

    /// Recomputes every active employee's balance for `year`.
    ///
    /// Full and idempotent: running it twice with no intervening request
    /// changes yields identical rows. Per-employee failures are logged and
    /// the run continues.
    ///
    /// # Errors
    ///
    /// Returns an error only when the employee listing itself fails;
    /// individual failures are reported in the summary.
    pub async fn recalculate_all(&self, year: i32) -> Result<RecalculationSummary, BalanceError> {
        let today = Utc::now().date_naive();
        let employees = employees::Entity::find()
            .filter(employees::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?;

        let mut summary = RecalculationSummary {
            year,
            processed: 0,
            skipped: 0,
            failed: 0,
        };

        for employee in employees {
            if let Some(hire_date) = employee.hire_date
                && !tenure::accrues_in_year(hire_date, year)
            {
                summary.skipped += 1;
                continue;
            }

            match self.recalculate_one(&employee, year, today).await {
                Ok(()) => summary.processed += 1,
                Err(e) => {
                    error!(
                        employee_id = %employee.id,
                        year,
                        error = %e,
                        "Balance recalculation failed for employee"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            year,
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Balance recalculation finished"
        );

        Ok(summary)
    }

    /// Recomputes and upserts one employee's balance row.
    async fn recalculate_one(
        &self,
        employee: &employees::Model,
        year: i32,
        today: NaiveDate,
    ) -> Result<(), BalanceError> {
        let snapshot = compute_snapshot_on(&self.db, employee, year, today).await?;

        let existing = vacation_balances::Entity::find()
            .filter(vacation_balances::Column::EmployeeId.eq(employee.id))
            .filter(vacation_balances::Column::Year.eq(year))
            .one(&self.db)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?;

        match existing {
            Some(row) => {
                let mut active: vacation_balances::ActiveModel = row.into();
                active.worked_days = Set(snapshot.worked_days);
                active.days_to_enjoy = Set(snapshot.days_to_enjoy);
                active.days_scheduled = Set(snapshot.days_scheduled);
                active.used_days = Set(snapshot.used_days);
                active.days_available = Set(snapshot.days_available);
                active.updated_at = Set(Utc::now().into());
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| BalanceError::Database(e.to_string()))?;
            }
            None => {
                insert_row_on(&self.db, employee.id, year, snapshot).await?;
            }
        }

        Ok(())
    }

    /// Applies consumption for a request that just transitioned into
    /// `taken`, inside the orchestrator's transaction.
    ///
    /// Contract: the caller flips the request status first, then calls this
    /// exactly once per transition. An existing row is updated
    /// incrementally (days move from scheduled to used); a missing row is
    /// rebuilt from the full request sums, which already count the request
    /// as taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee is missing or the database fails.
    pub async fn apply_consumption_on<C: ConnectionTrait>(
        conn: &C,
        employee_id: Uuid,
        year: i32,
        days_requested: i32,
    ) -> Result<(), BalanceError> {
        let employee = employees::Entity::find_by_id(employee_id)
            .one(conn)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?
            .ok_or(BalanceError::EmployeeNotFound(employee_id))?;

        if let Some(hire_date) = employee.hire_date
            && !tenure::accrues_in_year(hire_date, year)
        {
            // Entitlement undefined before hire; nothing to consume against.
            debug!(employee_id = %employee_id, year, "Skipping consumption before hire year");
            return Ok(());
        }

        let existing = vacation_balances::Entity::find()
            .filter(vacation_balances::Column::EmployeeId.eq(employee_id))
            .filter(vacation_balances::Column::Year.eq(year))
            .one(conn)
            .await
            .map_err(|e| BalanceError::Database(e.to_string()))?;

        match existing {
            Some(row) => {
                let snapshot = BalanceSnapshot {
                    worked_days: row.worked_days,
                    days_to_enjoy: row.days_to_enjoy,
                    days_scheduled: row.days_scheduled,
                    used_days: row.used_days,
                    days_available: row.days_available,
                }
                .after_consumption(days_requested);

                let mut active: vacation_balances::ActiveModel = row.into();
                active.days_scheduled = Set(snapshot.days_scheduled);
                active.used_days = Set(snapshot.used_days);
                active.days_available = Set(snapshot.days_available);
                active.updated_at = Set(Utc::now().into());
                active
                    .update(conn)
                    .await
                    .map_err(|e| BalanceError::Database(e.to_string()))?;
            }
            None => {
                let snapshot =
                    compute_snapshot_on(conn, &employee, year, Utc::now().date_naive()).await?;
                insert_row_on(conn, employee_id, year, snapshot).await?;
            }
        }

        Ok(())
    }
}

/// Computes an employee's balance snapshot from tenure and request sums.
async fn compute_snapshot_on<C: ConnectionTrait>(
    conn: &C,
    employee: &employees::Model,
    year: i32,
    today: NaiveDate,
) -> Result<BalanceSnapshot, BalanceError> {
    let (days_scheduled, used_days) = request_sums_on(conn, employee.id, year).await?;

    Ok(match employee.hire_date {
        Some(hire_date) => BalanceSnapshot::compute(hire_date, today, days_scheduled, used_days),
        // Without a hire date there is no tenure to accrue from.
        None => BalanceSnapshot {
            worked_days: 0,
            days_to_enjoy: 0,
            days_scheduled,
            used_days,
            days_available: -used_days - days_scheduled,
        },
    })
}

/// Sums requested days over (approved, taken) requests starting in `year`.
async fn request_sums_on<C: ConnectionTrait>(
    conn: &C,
    employee_id: Uuid,
    year: i32,
) -> Result<(i32, i32), BalanceError> {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| BalanceError::Database(format!("invalid ledger year {year}")))?;
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| BalanceError::Database(format!("invalid ledger year {year}")))?;

    let requests = vacation_requests::Entity::find()
        .filter(vacation_requests::Column::EmployeeId.eq(employee_id))
        .filter(
            vacation_requests::Column::Status
                .is_in([RequestStatus::Approved, RequestStatus::Taken]),
        )
        .filter(vacation_requests::Column::StartDate.between(year_start, year_end))
        .all(conn)
        .await
        .map_err(|e| BalanceError::Database(e.to_string()))?;

    let mut scheduled = 0;
    let mut used = 0;
    for request in requests {
        match request.status {
            RequestStatus::Approved => scheduled += request.days_requested,
            RequestStatus::Taken => used += request.days_requested,
            _ => {}
        }
    }

    Ok((scheduled, used))
}

/// Inserts a fresh balance row.
async fn insert_row_on<C: ConnectionTrait>(
    conn: &C,
    employee_id: Uuid,
    year: i32,
    snapshot: BalanceSnapshot,
) -> Result<vacation_balances::Model, BalanceError> {
    let now = Utc::now().into();
    let row = vacation_balances::ActiveModel {
        id: Set(Uuid::now_v7()),
        employee_id: Set(employee_id),
        year: Set(year),
        worked_days: Set(snapshot.worked_days),
        days_to_enjoy: Set(snapshot.days_to_enjoy),
        days_scheduled: Set(snapshot.days_scheduled),
        used_days: Set(snapshot.used_days),
        days_available: Set(snapshot.days_available),
        created_at: Set(now),
        updated_at: Set(now),
    };

    row.insert(conn)
        .await
        .map_err(|e| BalanceError::Database(e.to_string()))
}

/// The ledger year a request belongs to: the year its vacation starts.
#[must_use]
pub fn ledger_year(start_date: NaiveDate) -> i32 {
    start_date.year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_year_follows_start_date() {
        // A request spanning a year boundary is accounted to its start year.
        let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(ledger_year(start), 2024);
    }
}
