use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("data load error: {0}")]
    DataLoad(String),

    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDateFormat,

    #[error("Date not found in dataset.")]
    DateNotFound(NaiveDate),

    #[error("Target date must be AFTER the last dataset date ({last_date}).")]
    TargetDateNotInFuture { last_date: NaiveDate },

    #[error("No data available for last date in dataset.")]
    NoHistoricalData,

    #[error("Invalid option selected.")]
    InvalidQueryMode(String),

    #[error("Target date is {days} days ahead; forecasts are limited to {max_days} days.")]
    HorizonTooFar { days: i64, max_days: i64 },

    #[error("model error: {0}")]
    Model(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// User input problems the caller can render and recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidDateFormat
                | ForecastError::DateNotFound(_)
                | ForecastError::TargetDateNotInFuture { .. }
                | ForecastError::InvalidQueryMode(_)
                | ForecastError::HorizonTooFar { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_errors_are_recoverable() {
        let last_date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(ForecastError::InvalidDateFormat.is_recoverable());
        assert!(ForecastError::DateNotFound(last_date).is_recoverable());
        assert!(ForecastError::TargetDateNotInFuture { last_date }.is_recoverable());
        assert!(!ForecastError::NoHistoricalData.is_recoverable());
        assert!(!ForecastError::DataLoad("empty".to_string()).is_recoverable());
    }

    #[test]
    fn not_in_future_message_names_last_date() {
        let last_date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert_eq!(
            ForecastError::TargetDateNotInFuture { last_date }.to_string(),
            "Target date must be AFTER the last dataset date (2024-05-31)."
        );
    }
}
