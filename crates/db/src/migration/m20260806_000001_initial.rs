//! Initial database migration.
//!
//! Creates the enums and core tables: countries, employees, vacation
//! requests, approval records, the approval policy, and balances.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(COUNTRIES_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;
        db.execute_unprepared(VACATION_REQUESTS_SQL).await?;
        db.execute_unprepared(VACATION_APPROVALS_SQL).await?;
        db.execute_unprepared(APPROVAL_POLICY_SQL).await?;
        db.execute_unprepared(VACATION_BALANCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS vacation_balances CASCADE;
            DROP TABLE IF EXISTS approval_policy_entries CASCADE;
            DROP TABLE IF EXISTS vacation_approvals CASCADE;
            DROP TABLE IF EXISTS vacation_requests CASCADE;
            DROP TABLE IF EXISTS employees CASCADE;
            DROP TABLE IF EXISTS countries CASCADE;
            DROP TYPE IF EXISTS request_status;
            DROP TYPE IF EXISTS approval_status;
            DROP TYPE IF EXISTS approver_role;
            ",
        )
        .await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE request_status AS ENUM ('pending', 'approved', 'rejected', 'taken');
CREATE TYPE approval_status AS ENUM ('pending', 'approved', 'rejected');
CREATE TYPE approver_role AS ENUM ('employee', 'leader', 'hr', 'admin');
";

const COUNTRIES_SQL: &str = r"
CREATE TABLE countries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(120) NOT NULL UNIQUE,
    vacation_term VARCHAR(120) NOT NULL DEFAULT 'vacaciones',
    default_vacation_days INTEGER NOT NULL DEFAULT 15,
    working_days JSONB NOT NULL,
    holiday_key VARCHAR(2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_default_days_range
        CHECK (default_vacation_days > 0 AND default_vacation_days <= 30)
);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    document_number VARCHAR(60) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(45),
    company VARCHAR(120),
    country_id UUID NOT NULL REFERENCES countries(id),
    lead_id UUID REFERENCES employees(id),
    hire_date DATE,
    working_days JSONB,
    is_employee BOOLEAN NOT NULL DEFAULT TRUE,
    is_leader BOOLEAN NOT NULL DEFAULT FALSE,
    is_hr BOOLEAN NOT NULL DEFAULT FALSE,
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- every employee holds at least one role
    CONSTRAINT chk_at_least_one_role
        CHECK (is_employee OR is_leader OR is_hr OR is_admin)
);

CREATE INDEX idx_employees_country ON employees(country_id);
CREATE INDEX idx_employees_lead ON employees(lead_id) WHERE lead_id IS NOT NULL;
CREATE INDEX idx_employees_active ON employees(active) WHERE active;
";

const VACATION_REQUESTS_SQL: &str = r"
CREATE TABLE vacation_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES employees(id),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    days_requested INTEGER NOT NULL,
    status request_status NOT NULL DEFAULT 'pending',
    approved_by UUID REFERENCES employees(id),
    approved_at TIMESTAMPTZ,
    rejected_reason TEXT,
    company VARCHAR(120),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_dates_ordered CHECK (end_date >= start_date),
    CONSTRAINT chk_days_requested_positive CHECK (days_requested > 0)
);

CREATE INDEX idx_requests_employee ON vacation_requests(employee_id, start_date);
CREATE INDEX idx_requests_status ON vacation_requests(status);
-- sweep boundaries
CREATE INDEX idx_requests_approved_end ON vacation_requests(end_date)
    WHERE status = 'approved';
CREATE INDEX idx_requests_taken_end ON vacation_requests(end_date)
    WHERE status = 'taken';
";

const VACATION_APPROVALS_SQL: &str = r"
CREATE TABLE vacation_approvals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    request_id UUID NOT NULL REFERENCES vacation_requests(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES employees(id),
    role approver_role NOT NULL,
    status approval_status NOT NULL DEFAULT 'pending',
    decided_at TIMESTAMPTZ,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- a role slot is filled once per request
    CONSTRAINT uq_approvals_request_role UNIQUE (request_id, role)
);

CREATE INDEX idx_approvals_request ON vacation_approvals(request_id);
CREATE INDEX idx_approvals_employee ON vacation_approvals(employee_id);
";

const APPROVAL_POLICY_SQL: &str = r"
CREATE TABLE approval_policy_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    role approver_role NOT NULL UNIQUE,
    required BOOLEAN NOT NULL DEFAULT TRUE,
    order_position SMALLINT NOT NULL DEFAULT 0,
    minimum_approvals SMALLINT NOT NULL DEFAULT 1,
    description TEXT,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_order_position CHECK (order_position >= 0),
    CONSTRAINT chk_minimum_approvals CHECK (minimum_approvals > 0)
);
";

const VACATION_BALANCES_SQL: &str = r"
CREATE TABLE vacation_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES employees(id),
    year INTEGER NOT NULL,
    worked_days INTEGER NOT NULL DEFAULT 0,
    days_to_enjoy INTEGER NOT NULL DEFAULT 0,
    days_scheduled INTEGER NOT NULL DEFAULT 0,
    used_days INTEGER NOT NULL DEFAULT 0,
    days_available INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- one ledger row per employee per year
    CONSTRAINT uq_balances_employee_year UNIQUE (employee_id, year)
);

CREATE INDEX idx_balances_year ON vacation_balances(year);
";
