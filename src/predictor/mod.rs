pub mod metrics;
pub mod normalizer;
pub mod svr;

pub use metrics::HoldoutMetrics;
pub use normalizer::Normalizer;
pub use svr::{KernelRegressor, SvrParams};

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::model::{FeatureVector, TrainingRow};

pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Anything that maps a raw (unnormalized) feature vector to the next day's
/// close. Implementations must be deterministic for a fixed input.
pub trait NextClosePredictor: Send + Sync {
    fn predict_next_close(&self, features: &FeatureVector) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub svr: SvrParams,
    /// Fraction of the series (taken from the end) held out of training.
    pub test_ratio: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            svr: SvrParams::default(),
            test_ratio: DEFAULT_TEST_RATIO,
        }
    }
}

/// Frozen scaler + regressor pair, shared read-only by every request.
#[derive(Debug)]
pub struct FittedModel {
    normalizer: Normalizer,
    regressor: KernelRegressor,
    train_rows: usize,
    holdout: HoldoutMetrics,
}

impl FittedModel {
    pub fn fit(series: &HistoricalSeries, cfg: TrainingConfig) -> Result<Self> {
        let (train, test) = series.split_chronological(cfg.test_ratio);
        if train.is_empty() {
            return Err(ForecastError::DataLoad(format!(
                "{} usable rows leave nothing to train on after holding out {:.0}%",
                series.len(),
                cfg.test_ratio * 100.0
            )));
        }

        let inputs: Vec<FeatureVector> = train.iter().map(TrainingRow::feature_vector).collect();
        let targets: Vec<f64> = train.iter().map(|r| r.target).collect();

        let normalizer = Normalizer::fit(&inputs).ok_or_else(|| {
            ForecastError::DataLoad("cannot fit normalizer on an empty training set".to_string())
        })?;
        let scaled: Vec<FeatureVector> = inputs.iter().map(|x| normalizer.transform(x)).collect();
        let regressor = KernelRegressor::fit(cfg.svr, &scaled, &targets)?;

        let mut model = Self {
            normalizer,
            regressor,
            train_rows: train.len(),
            holdout: HoldoutMetrics::default(),
        };
        model.holdout = model.evaluate(test);

        tracing::info!(
            train_rows = train.len(),
            holdout_rows = test.len(),
            holdout_mae = ?model.holdout.mae,
            holdout_rmse = ?model.holdout.rmse,
            holdout_r2 = ?model.holdout.r2,
            "Fitted next-close model"
        );
        Ok(model)
    }

    pub fn evaluate(&self, rows: &[TrainingRow]) -> HoldoutMetrics {
        let scaled: Vec<FeatureVector> = rows
            .iter()
            .map(|r| self.normalizer.transform(&r.feature_vector()))
            .collect();
        let preds = self.regressor.predict_batch(&scaled);
        HoldoutMetrics::from_pairs(rows.iter().map(|r| r.target).zip(preds))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn regressor(&self) -> &KernelRegressor {
        &self.regressor
    }

    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    pub fn holdout(&self) -> HoldoutMetrics {
        self.holdout
    }
}

impl NextClosePredictor for FittedModel {
    fn predict_next_close(&self, features: &FeatureVector) -> f64 {
        self.regressor.predict(&self.normalizer.transform(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawRow;

    fn series(days: u32) -> HistoricalSeries {
        let rows: Vec<RawRow> = (0..days)
            .map(|i| {
                let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                let close = 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.2;
                RawRow::new(
                    &date.format("%Y-%m-%d").to_string(),
                    &format!("{:.4}", close - 0.5),
                    &format!("{:.4}", close + 1.0),
                    &format!("{:.4}", close - 1.5),
                    &format!("{:.4}", close),
                    &format!("{}", 1_000 + i * 10),
                )
            })
            .collect();
        HistoricalSeries::from_raw_rows(&rows).unwrap()
    }

    #[test]
    fn fit_trains_on_chronological_prefix() {
        let s = series(52);
        let model = FittedModel::fit(&s, TrainingConfig::default()).unwrap();
        assert_eq!(s.len(), 50);
        assert_eq!(model.train_rows(), 40);
        assert_eq!(model.holdout().samples, 10);
        assert!(model.holdout().mae.unwrap().is_finite());
    }

    #[test]
    fn prediction_is_bit_reproducible() {
        let s = series(30);
        let model = FittedModel::fit(&s, TrainingConfig::default()).unwrap();
        let x = s.rows()[5].feature_vector();
        let a = model.predict_next_close(&x);
        let b = model.predict_next_close(&x);
        assert!(a.is_finite());
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn too_small_series_is_a_load_error() {
        let s = series(3);
        assert_eq!(s.len(), 1);
        let err = FittedModel::fit(&s, TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, ForecastError::DataLoad(_)));
    }
}
