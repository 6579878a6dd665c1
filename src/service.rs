//! Request boundary used by outer layers (CLI, web handlers).
//!
//! A [`Forecaster`] is built once at startup and then shared by reference;
//! every query reads it without locking.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::data::{parse_calendar_date, HistoricalSeries, RawRow};
use crate::error::{ForecastError, Result};
use crate::forecast::{self, ForecastEngine};
use crate::predictor::{FittedModel, HoldoutMetrics, TrainingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Next-day prediction for a date inside the historical series.
    Lookup,
    /// Recursive forecast for a date after the series ends.
    Forecast,
}

impl QueryMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "lookup" => Ok(Self::Lookup),
            "2" | "forecast" => Ok(Self::Forecast),
            other => Err(ForecastError::InvalidQueryMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReply {
    pub mode: Option<QueryMode>,
    pub date: String,
    pub value: Option<f64>,
    pub error: Option<String>,
}

impl QueryReply {
    fn from_result(mode: Option<QueryMode>, date: &str, result: Result<f64>) -> Self {
        let (value, error) = match result {
            Ok(v) => (Some(v), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            mode,
            date: date.to_string(),
            value,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Human-readable sentence for the reply.
    pub fn message(&self) -> String {
        if let Some(err) = &self.error {
            return err.clone();
        }
        let value = self.value.map(format_usd).unwrap_or_default();
        match self.mode {
            Some(QueryMode::Lookup) => format!(
                "Predicted closing price for the NEXT day after {}: {}",
                self.date, value
            ),
            Some(QueryMode::Forecast) => {
                format!("Predicted closing price on {}: {}", self.date, value)
            }
            None => value,
        }
    }
}

/// Historical series plus the model fitted on it.
#[derive(Debug)]
pub struct Forecaster {
    series: HistoricalSeries,
    model: FittedModel,
    max_horizon_days: Option<i64>,
}

impl Forecaster {
    /// Clean the raw rows, then fit the normalizer and regressor once.
    pub fn initialize(raw: &[RawRow], cfg: TrainingConfig) -> Result<Self> {
        let series = HistoricalSeries::from_raw_rows(raw)?;
        let model = FittedModel::fit(&series, cfg)?;
        Ok(Self {
            series,
            model,
            max_horizon_days: None,
        })
    }

    /// Cap how far ahead [`Forecaster::query`] will extrapolate.
    pub fn with_max_horizon_days(mut self, days: i64) -> Self {
        self.max_horizon_days = Some(days);
        self
    }

    pub fn series(&self) -> &HistoricalSeries {
        &self.series
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn holdout(&self) -> HoldoutMetrics {
        self.model.holdout()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.series.last_date()
    }

    pub fn engine(&self) -> ForecastEngine<'_, FittedModel> {
        ForecastEngine::new(&self.series, &self.model)
    }

    pub fn lookup(&self, date: &str) -> Result<f64> {
        forecast::lookup(&self.series, &self.model, date)
    }

    pub fn forecast_to(&self, target_date: &str) -> Result<f64> {
        self.engine().forecast_to(target_date)
    }

    pub fn forecast_to_with_rng<R: Rng + ?Sized>(
        &self,
        target_date: &str,
        rng: &mut R,
    ) -> Result<f64> {
        self.engine().forecast_to_with_rng(target_date, rng)
    }

    /// Dispatch a `(mode, date)` request and fold the outcome into a reply.
    pub fn query(&self, mode: &str, date: &str) -> QueryReply {
        match QueryMode::parse(mode) {
            Ok(mode) => self.run_query(mode, date),
            Err(e) => QueryReply::from_result(None, date, Err(e)),
        }
    }

    pub fn run_query(&self, mode: QueryMode, date: &str) -> QueryReply {
        let result = match mode {
            QueryMode::Lookup => self.lookup(date),
            QueryMode::Forecast => self.forecast_within_horizon(date),
        };
        if let Err(e) = &result {
            tracing::debug!(?mode, date, error = %e, "Query rejected");
        }
        QueryReply::from_result(Some(mode), date, result)
    }

    fn forecast_within_horizon(&self, date: &str) -> Result<f64> {
        let target = parse_calendar_date(date).ok_or(ForecastError::InvalidDateFormat)?;
        let engine = self.engine();
        if let Some(max_days) = self.max_horizon_days {
            let days = engine.horizon_days(target)?;
            if days > max_days {
                return Err(ForecastError::HorizonTooFar { days, max_days });
            }
        }
        engine.forecast_date_with_rng(target, &mut rand::thread_rng())
    }
}

/// `1234567.891` -> `$1,234,567.89`.
pub fn format_usd(value: f64) -> String {
    let s = format!("{:.2}", value.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_mode_accepts_numeric_and_named_options() {
        assert_eq!(QueryMode::parse("1").unwrap(), QueryMode::Lookup);
        assert_eq!(QueryMode::parse(" Forecast ").unwrap(), QueryMode::Forecast);
        assert!(matches!(
            QueryMode::parse("3"),
            Err(ForecastError::InvalidQueryMode(_))
        ));
    }

    #[test]
    fn format_usd_groups_thousands() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.5), "-$42.50");
    }

    #[test]
    fn reply_message_prefers_error_text() {
        let reply = QueryReply::from_result(
            Some(QueryMode::Lookup),
            "2024-01-06",
            Err(ForecastError::DateNotFound(
                NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            )),
        );
        assert!(!reply.is_ok());
        assert_eq!(reply.message(), "Date not found in dataset.");

        let reply = QueryReply::from_result(Some(QueryMode::Forecast), "2024-02-01", Ok(43210.5));
        assert_eq!(
            reply.message(),
            "Predicted closing price on 2024-02-01: $43,210.50"
        );
    }
}
