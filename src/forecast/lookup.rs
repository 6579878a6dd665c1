use crate::data::{parse_calendar_date, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::predictor::NextClosePredictor;

/// Direct model prediction for a date present in the historical series.
///
/// The model was trained against next-day closes, so the value is the
/// predicted close of the day after `date`. No randomness is involved.
pub fn lookup<P: NextClosePredictor + ?Sized>(
    series: &HistoricalSeries,
    predictor: &P,
    date: &str,
) -> Result<f64> {
    let date = parse_calendar_date(date).ok_or(ForecastError::InvalidDateFormat)?;
    let row = series.find(date).ok_or(ForecastError::DateNotFound(date))?;
    Ok(predictor.predict_next_close(&row.feature_vector()))
}
