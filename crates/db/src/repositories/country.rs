//! Country repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use feriado_core::calendar::WorkWeek;

use crate::entities::countries;

/// Country repository errors.
#[derive(Debug, Error)]
pub enum CountryError {
    /// Country not found.
    #[error("Country {0} not found")]
    NotFound(Uuid),

    /// A country with this name already exists.
    #[error("Country name already in use: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Input for creating a country.
#[derive(Debug, Clone)]
pub struct CreateCountryInput {
    /// Country name, unique.
    pub name: String,
    /// Locale word for "vacation"; defaults to "vacaciones".
    pub vacation_term: Option<String>,
    /// Annual day grant; defaults to 15.
    pub default_vacation_days: Option<i32>,
    /// Work-week mask; defaults to Monday-Friday.
    pub working_days: Option<WorkWeek>,
    /// ISO code for the holiday provider; None means no public holidays.
    pub holiday_key: Option<String>,
}

/// Input for updating a country.
#[derive(Debug, Clone, Default)]
pub struct UpdateCountryInput {
    /// New vacation term.
    pub vacation_term: Option<String>,
    /// New annual day grant.
    pub default_vacation_days: Option<i32>,
    /// New work-week mask.
    pub working_days: Option<WorkWeek>,
    /// New holiday key (`Some(None)` clears it).
    pub holiday_key: Option<Option<String>>,
}

/// Country repository.
#[derive(Debug, Clone)]
pub struct CountryRepository {
    db: DatabaseConnection,
}

impl CountryRepository {
    /// Creates a new country repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a country, filling in the Monday-Friday mask and the other
    /// defaults when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the database fails.
    pub async fn create(&self, input: CreateCountryInput) -> Result<countries::Model, CountryError> {
        let existing = countries::Entity::find()
            .filter(countries::Column::Name.eq(&input.name))
            .one(&self.db)
            .await
            .map_err(|e| CountryError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(CountryError::DuplicateName(input.name));
        }

        let mask = input.working_days.unwrap_or_default();
        let now = Utc::now().into();

        let country = countries::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            vacation_term: Set(input
                .vacation_term
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "vacaciones".to_string())),
            default_vacation_days: Set(input.default_vacation_days.unwrap_or(15)),
            working_days: Set(workweek_to_json(mask)),
            holiday_key: Set(input.holiday_key.filter(|k| !k.trim().is_empty())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        country
            .insert(&self.db)
            .await
            .map_err(|e| CountryError::Database(e.to_string()))
    }

    /// Fetches a country by id.
    ///
    /// # Errors
    ///
    /// Returns `CountryError::NotFound` if no such country exists.
    pub async fn get(&self, id: Uuid) -> Result<countries::Model, CountryError> {
        countries::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CountryError::Database(e.to_string()))?
            .ok_or(CountryError::NotFound(id))
    }

    /// Lists all countries ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<countries::Model>, CountryError> {
        countries::Entity::find()
            .order_by_asc(countries::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| CountryError::Database(e.to_string()))
    }

    /// Updates a country's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the country is missing or the database fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCountryInput,
    ) -> Result<countries::Model, CountryError> {
        let country = self.get(id).await?;

        let mut active: countries::ActiveModel = country.into();
        if let Some(term) = input.vacation_term {
            active.vacation_term = Set(term);
        }
        if let Some(days) = input.default_vacation_days {
            active.default_vacation_days = Set(days);
        }
        if let Some(mask) = input.working_days {
            active.working_days = Set(workweek_to_json(mask));
        }
        if let Some(key) = input.holiday_key {
            active.holiday_key = Set(key.filter(|k| !k.trim().is_empty()));
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| CountryError::Database(e.to_string()))
    }
}

/// Decodes a country's stored mask, defaulting to Monday-Friday when the
/// stored JSON is malformed.
#[must_use]
pub fn country_workweek(country: &countries::Model) -> WorkWeek {
    serde_json::from_value(country.working_days.clone()).unwrap_or_default()
}

/// Encodes a work-week mask for storage.
#[must_use]
pub fn workweek_to_json(mask: WorkWeek) -> serde_json::Value {
    serde_json::to_value(mask).unwrap_or_else(|_| serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workweek_json_round_trip() {
        let mask = WorkWeek {
            saturday: true,
            ..WorkWeek::MONDAY_TO_FRIDAY
        };
        let json = workweek_to_json(mask);
        let decoded: WorkWeek = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, mask);
    }

    #[test]
    fn test_malformed_mask_falls_back_to_default() {
        let country = countries::Model {
            id: Uuid::now_v7(),
            name: "Colombia".into(),
            vacation_term: "vacaciones".into(),
            default_vacation_days: 15,
            working_days: serde_json::json!({"monday": "not-a-bool"}),
            holiday_key: Some("CO".into()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        assert_eq!(country_workweek(&country), WorkWeek::MONDAY_TO_FRIDAY);
    }
}
