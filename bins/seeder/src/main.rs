//! Database seeder for Feriado development and testing.
//!
//! Seeds two countries (Colombia and Mexico), the default two-gate
//! approval policy, and a small employee tree (hr -> leader -> employee)
//! for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use feriado_core::calendar::WorkWeek;
use feriado_db::entities::{countries, employees};
use feriado_db::PolicyRepository;

/// Colombia country ID (consistent for all seeds)
const COLOMBIA_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Mexico country ID (consistent for all seeds)
const MEXICO_ID: &str = "00000000-0000-0000-0000-000000000002";
/// HR employee ID (consistent for all seeds)
const HR_ID: &str = "00000000-0000-0000-0000-000000000011";
/// Leader employee ID (consistent for all seeds)
const LEADER_ID: &str = "00000000-0000-0000-0000-000000000012";
/// Employee ID (consistent for all seeds)
const EMPLOYEE_ID: &str = "00000000-0000-0000-0000-000000000013";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = feriado_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding countries...");
    seed_countries(&db).await;

    println!("Seeding approval policy...");
    seed_approval_policy(&db).await;

    println!("Seeding employees...");
    seed_employees(&db).await;

    println!("Seeding complete!");
}

fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

/// Seeds Colombia and Mexico with their vacation terms and day grants.
async fn seed_countries(db: &DatabaseConnection) {
    let now = Utc::now().into();
    let seeds = [
        (COLOMBIA_ID, "Colombia", "vacaciones", 15, Some("CO")),
        (MEXICO_ID, "Mexico", "días de descanso", 12, Some("MX")),
    ];

    for (country_id, name, term, days, holiday_key) in seeds {
        if countries::Entity::find_by_id(id(country_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Country {name} already exists, skipping...");
            continue;
        }

        let country = countries::ActiveModel {
            id: Set(id(country_id)),
            name: Set(name.to_string()),
            vacation_term: Set(term.to_string()),
            default_vacation_days: Set(days),
            working_days: Set(serde_json::to_value(WorkWeek::MONDAY_TO_FRIDAY).unwrap()),
            holiday_key: Set(holiday_key.map(String::from)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = country.insert(db).await {
            eprintln!("Failed to insert country {name}: {e}");
        } else {
            println!("  Created country: {name}");
        }
    }
}

/// Seeds the default two-gate approval policy (leader, then hr).
async fn seed_approval_policy(db: &DatabaseConnection) {
    let repo = PolicyRepository::new(db.clone());
    match repo.setup_default().await {
        Ok(()) => println!("  Approval policy ready"),
        Err(e) => eprintln!("Failed to seed approval policy: {e}"),
    }
}

/// Seeds the hr -> leader -> employee tree in Colombia.
async fn seed_employees(db: &DatabaseConnection) {
    let now = Utc::now().into();
    let today = Utc::now().date_naive();

    let seeds = [
        (
            HR_ID,
            "12345678",
            "HR Colombia",
            "hr.colombia@feriado.dev",
            (false, false, true, false),
            None,
            today - Duration::days(3 * 365),
        ),
        (
            LEADER_ID,
            "87654321",
            "Líder Colombia",
            "leader.colombia@feriado.dev",
            (true, true, false, false),
            Some(HR_ID),
            today - Duration::days(2 * 365),
        ),
        (
            EMPLOYEE_ID,
            "11223344",
            "Empleado Colombia",
            "empleado.colombia@feriado.dev",
            (true, false, false, false),
            Some(LEADER_ID),
            today - Duration::days(365),
        ),
    ];

    for (employee_id, document, name, email, roles, lead, hire_date) in seeds {
        if employees::Entity::find_by_id(id(employee_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Employee {name} already exists, skipping...");
            continue;
        }

        let (is_employee, is_leader, is_hr, is_admin) = roles;
        let employee = employees::ActiveModel {
            id: Set(id(employee_id)),
            document_number: Set(document.to_string()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(Some("+57-300-123-4567".to_string())),
            company: Set(Some("Feriado Demo".to_string())),
            country_id: Set(id(COLOMBIA_ID)),
            lead_id: Set(lead.map(id)),
            hire_date: Set(Some(hire_date)),
            working_days: Set(None),
            is_employee: Set(is_employee),
            is_leader: Set(is_leader),
            is_hr: Set(is_hr),
            is_admin: Set(is_admin),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = employee.insert(db).await {
            eprintln!("Failed to insert employee {name}: {e}");
        } else {
            println!("  Created employee: {name}");
        }
    }
}
