//! Public-holiday provider client.
//!
//! Fetches national holiday calendars from a Nager.Date-compatible API and
//! caches them in-process per (country, year). Countries without a holiday
//! key resolve to an empty calendar.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::HolidayProviderConfig;

/// Maximum number of cached (country, year) calendars.
const CACHE_CAPACITY: u64 = 256;

/// Holiday provider errors.
#[derive(Debug, Error)]
pub enum HolidayError {
    /// The provider request failed.
    #[error("Holiday provider request failed: {0}")]
    Request(String),
    /// The provider returned an unexpected payload.
    #[error("Holiday provider returned invalid data: {0}")]
    InvalidPayload(String),
}

/// One holiday entry as returned by the provider.
#[derive(Debug, Deserialize)]
struct ProviderHoliday {
    date: String,
}

/// Client for the public-holiday provider.
///
/// Cheap to clone; the underlying HTTP client and cache are shared.
#[derive(Clone)]
pub struct HolidayService {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<(String, i32), Arc<Vec<NaiveDate>>>,
}

impl HolidayService {
    /// Creates a new holiday service from configuration.
    #[must_use]
    pub fn new(config: &HolidayProviderConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Returns the holiday dates for one country and year, cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or returns
    /// malformed data. Cached entries never error.
    pub async fn holidays_for_year(
        &self,
        country_code: &str,
        year: i32,
    ) -> Result<Arc<Vec<NaiveDate>>, HolidayError> {
        let key = (country_code.to_uppercase(), year);

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let dates = Arc::new(self.fetch_year(&key.0, year).await?);
        self.cache.insert(key, Arc::clone(&dates)).await;

        Ok(dates)
    }

    /// Returns the merged, sorted holiday calendar for a span of years.
    ///
    /// A `None` country code means the country has no holiday calendar
    /// configured and yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if any year cannot be fetched.
    pub async fn calendar(
        &self,
        country_code: Option<&str>,
        years: std::ops::RangeInclusive<i32>,
    ) -> Result<Vec<NaiveDate>, HolidayError> {
        let Some(code) = country_code.filter(|c| !c.trim().is_empty()) else {
            return Ok(Vec::new());
        };

        let mut dates = Vec::new();
        for year in years {
            dates.extend(self.holidays_for_year(code, year).await?.iter().copied());
        }
        dates.sort_unstable();
        dates.dedup();

        Ok(dates)
    }

    /// Fetches one (country, year) calendar from the provider.
    async fn fetch_year(&self, country_code: &str, year: i32) -> Result<Vec<NaiveDate>, HolidayError> {
        let url = format!("{}/api/v3/PublicHolidays/{year}/{country_code}", self.base_url);
        debug!(%url, "Fetching holiday calendar");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HolidayError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| HolidayError::Request(e.to_string()))?;

        let holidays: Vec<ProviderHoliday> = response
            .json()
            .await
            .map_err(|e| HolidayError::InvalidPayload(e.to_string()))?;

        holidays
            .into_iter()
            .map(|h| {
                NaiveDate::parse_from_str(&h.date, "%Y-%m-%d")
                    .map_err(|e| HolidayError::InvalidPayload(format!("{}: {e}", h.date)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> HolidayService {
        HolidayService::new(&HolidayProviderConfig::default())
    }

    #[tokio::test]
    async fn test_blank_country_code_yields_empty_calendar() {
        let svc = service();
        assert!(svc.calendar(None, 2024..=2025).await.unwrap().is_empty());
        assert!(svc.calendar(Some("  "), 2024..=2025).await.unwrap().is_empty());
    }

    #[test]
    fn test_provider_date_format_parses() {
        let date = NaiveDate::parse_from_str("2024-12-25", "%Y-%m-%d").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
    }
}
