use serde::Serialize;

/// Minimum held-out size before R^2 is reported.
pub const HOLDOUT_R2_MIN_SAMPLES: usize = 3;

/// Error summary of the fitted model on the held-out tail of the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HoldoutMetrics {
    pub samples: usize,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub r2: Option<f64>,
}

impl HoldoutMetrics {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let pairs: Vec<(f64, f64)> = pairs
            .into_iter()
            .filter(|(y, yhat)| y.is_finite() && yhat.is_finite())
            .collect();
        let n = pairs.len();
        if n == 0 {
            return Self::default();
        }
        let nf = n as f64;
        let mae = pairs.iter().map(|(y, yhat)| (y - yhat).abs()).sum::<f64>() / nf;
        let sse = pairs
            .iter()
            .map(|(y, yhat)| (y - yhat) * (y - yhat))
            .sum::<f64>();
        let rmse = (sse / nf).sqrt();

        let r2 = if n < HOLDOUT_R2_MIN_SAMPLES {
            None
        } else {
            let mean_y = pairs.iter().map(|(y, _)| *y).sum::<f64>() / nf;
            let sst = pairs.iter().map(|(y, _)| (y - mean_y) * (y - mean_y)).sum::<f64>();
            if sst <= 1e-18 {
                Some(0.0)
            } else {
                Some(1.0 - sse / sst)
            }
        };

        Self {
            samples: n,
            mae: Some(mae),
            rmse: Some(rmse),
            r2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let m = HoldoutMetrics::from_pairs(vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(m.samples, 3);
        assert_eq!(m.mae, Some(0.0));
        assert_eq!(m.rmse, Some(0.0));
        assert_eq!(m.r2, Some(1.0));
    }

    #[test]
    fn mixed_errors() {
        let m = HoldoutMetrics::from_pairs(vec![(1.0, 2.0), (3.0, 1.0)]);
        assert!((m.mae.unwrap() - 1.5).abs() < 1e-12);
        assert!((m.rmse.unwrap() - (2.5f64).sqrt()).abs() < 1e-12);
        assert_eq!(m.r2, None);
    }

    #[test]
    fn empty_and_non_finite_pairs() {
        let m = HoldoutMetrics::from_pairs(vec![(f64::NAN, 1.0)]);
        assert_eq!(m, HoldoutMetrics::default());
    }
}
