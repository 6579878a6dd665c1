use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::data::{parse_calendar_date, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::model::{DerivedFeatures, Observation, SyntheticDay};
use crate::predictor::NextClosePredictor;

/// Upper bound of the uniform draw widening the synthetic high above the
/// open/close envelope (and the low below it).
pub const MAX_WICK_FRACTION: f64 = 0.02;
pub const VOLUME_FACTOR_MIN: f64 = 0.95;
pub const VOLUME_FACTOR_MAX: f64 = 1.05;

/// Day-by-day extrapolation beyond the last historical row.
///
/// Each step predicts the next close from the current day's features, then
/// synthesizes a full OHLCV day around that close, which becomes the input of
/// the following step. The recurrence is strictly sequential.
pub struct ForecastEngine<'a, P: NextClosePredictor + ?Sized> {
    series: &'a HistoricalSeries,
    predictor: &'a P,
}

impl<'a, P: NextClosePredictor + ?Sized> ForecastEngine<'a, P> {
    pub fn new(series: &'a HistoricalSeries, predictor: &'a P) -> Self {
        Self { series, predictor }
    }

    pub fn predict_next_close(&self, day: &SyntheticDay) -> f64 {
        self.predictor.predict_next_close(&day.feature_vector())
    }

    pub fn forecast_to(&self, target_date: &str) -> Result<f64> {
        self.forecast_to_with_rng(target_date, &mut rand::thread_rng())
    }

    pub fn forecast_to_with_rng<R: Rng + ?Sized>(
        &self,
        target_date: &str,
        rng: &mut R,
    ) -> Result<f64> {
        let target = parse_calendar_date(target_date).ok_or(ForecastError::InvalidDateFormat)?;
        self.forecast_date_with_rng(target, rng)
    }

    /// Close of the synthesized day at `target`. Only the current day is kept
    /// between steps, so memory does not grow with the horizon.
    pub fn forecast_date_with_rng<R: Rng + ?Sized>(
        &self,
        target: NaiveDate,
        rng: &mut R,
    ) -> Result<f64> {
        let (seed, days) = self.start(target)?;
        let mut current = seed;
        for step in 0..days {
            current = self.step(&current, step, rng);
        }
        Ok(current.close())
    }

    /// Every synthesized day from the day after the last historical date up
    /// to and including `target`.
    pub fn forecast_path<R: Rng + ?Sized>(
        &self,
        target: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<SyntheticDay>> {
        let (seed, days) = self.start(target)?;
        let mut current = seed;
        let mut path = Vec::new();
        for step in 0..days {
            current = self.step(&current, step, rng);
            path.push(current);
        }
        Ok(path)
    }

    fn start(&self, target: NaiveDate) -> Result<(SyntheticDay, i64)> {
        let seed = self.series.last().ok_or(ForecastError::NoHistoricalData)?;
        let days = self.horizon_days(target)?;
        tracing::debug!(
            last_date = %seed.date(),
            target = %target,
            days,
            "Forecasting beyond historical series"
        );
        Ok((SyntheticDay::from(seed), days))
    }

    fn step<R: Rng + ?Sized>(
        &self,
        current: &SyntheticDay,
        step: i64,
        rng: &mut R,
    ) -> SyntheticDay {
        let predicted_close = self.predict_next_close(current);
        let next = synthesize_day(current, predicted_close, rng);
        tracing::trace!(
            step,
            date = %next.date(),
            close = next.close(),
            high = next.observation.high,
            low = next.observation.low,
            "Synthesized day"
        );
        next
    }

    /// Calendar days between the last historical date and `target`; fails
    /// unless `target` is strictly later.
    pub fn horizon_days(&self, target: NaiveDate) -> Result<i64> {
        let last_date = self
            .series
            .last_date()
            .ok_or(ForecastError::NoHistoricalData)?;
        if target <= last_date {
            return Err(ForecastError::TargetDateNotInFuture { last_date });
        }
        Ok((target - last_date).num_days())
    }
}

/// Build the day after `current` around a predicted close. The open carries
/// over from the previous close, the high and low widen the open/close
/// envelope by up to `MAX_WICK_FRACTION`, and volume drifts by a uniform factor.
pub fn synthesize_day<R: Rng + ?Sized>(
    current: &SyntheticDay,
    predicted_close: f64,
    rng: &mut R,
) -> SyntheticDay {
    let prev_close = current.close();
    let open = prev_close;
    let high_change = rng.gen_range(0.0..MAX_WICK_FRACTION);
    let low_change = rng.gen_range(0.0..MAX_WICK_FRACTION);
    let high = open.max(predicted_close) * (1.0 + high_change);
    let low = open.min(predicted_close) * (1.0 - low_change);
    let volume = current.observation.volume * rng.gen_range(VOLUME_FACTOR_MIN..VOLUME_FACTOR_MAX);

    SyntheticDay {
        observation: Observation {
            date: current.date() + Duration::days(1),
            open,
            high,
            low,
            close: predicted_close,
            volume,
        },
        features: DerivedFeatures {
            open_close_diff: open - predicted_close,
            high_low_diff: high - low,
            pct_change_1d: (predicted_close - prev_close) / prev_close,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn day(close: f64, volume: f64) -> SyntheticDay {
        SyntheticDay {
            observation: Observation {
                date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            },
            features: DerivedFeatures {
                open_close_diff: 0.0,
                high_low_diff: 0.0,
                pct_change_1d: 0.0,
            },
        }
    }

    #[test]
    fn synthesize_with_zero_draws_hugs_the_envelope() {
        let mut rng = StepRng::new(0, 0);
        let next = synthesize_day(&day(100.0, 1_000.0), 110.0, &mut rng);
        assert_eq!(next.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(next.observation.open, 100.0);
        assert_eq!(next.observation.high, 110.0);
        assert_eq!(next.observation.low, 100.0);
        assert_eq!(next.close(), 110.0);
        assert!((next.observation.volume - 950.0).abs() < 1e-9);
        assert_eq!(next.features.open_close_diff, -10.0);
        assert_eq!(next.features.high_low_diff, 10.0);
        assert!((next.features.pct_change_1d - 0.1).abs() < 1e-12);
    }

    #[test]
    fn synthesize_keeps_ohlc_ordering_for_falling_close() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let next = synthesize_day(&day(100.0, 1_000.0), 90.0, &mut rng);
            let o = next.observation;
            assert!(o.high >= o.open && o.high >= o.close);
            assert!(o.low <= o.open && o.low <= o.close);
            assert!(o.high <= 100.0 * (1.0 + MAX_WICK_FRACTION));
            assert!(o.low >= 90.0 * (1.0 - MAX_WICK_FRACTION));
            assert!(o.volume >= 950.0 && o.volume <= 1_050.0);
        }
    }
}
