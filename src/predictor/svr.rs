use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};

use crate::error::{ForecastError, Result};
use crate::model::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvrParams {
    /// Regularization strength.
    pub c: f64,
    /// RBF width in `exp(-gamma * |x - y|^2)`.
    pub gamma: f64,
    /// Half-width of the epsilon-insensitive tube.
    pub epsilon: f64,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            c: 100.0,
            gamma: 0.1,
            epsilon: 0.01,
        }
    }
}

/// Epsilon-SVR with a radial-basis kernel over normalized feature vectors.
pub struct KernelRegressor {
    params: SvrParams,
    svm: Svm<f64, f64>,
}

impl std::fmt::Debug for KernelRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelRegressor")
            .field("params", &self.params)
            .field("support_vectors", &self.svm.nsupport())
            .finish()
    }
}

impl KernelRegressor {
    pub fn fit(params: SvrParams, inputs: &[FeatureVector], targets: &[f64]) -> Result<Self> {
        if inputs.is_empty() || inputs.len() != targets.len() {
            return Err(ForecastError::Model(format!(
                "need matching non-empty inputs and targets (got {} and {})",
                inputs.len(),
                targets.len()
            )));
        }
        if params.gamma <= 0.0 {
            return Err(ForecastError::Model(format!(
                "gamma must be > 0 (got {})",
                params.gamma
            )));
        }

        let records = to_records(inputs);
        let dataset = Dataset::new(records, Array1::from(targets.to_vec()));

        // linfa's gaussian kernel is exp(-|x - y|^2 / eps), i.e. eps = 1 / gamma.
        let svm = Svm::<f64, f64>::params()
            .c_svr(params.c, Some(params.epsilon))
            .gaussian_kernel(1.0 / params.gamma)
            .fit(&dataset)
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        tracing::debug!(
            samples = inputs.len(),
            support_vectors = svm.nsupport(),
            c = params.c,
            gamma = params.gamma,
            epsilon = params.epsilon,
            "Fitted RBF support vector regressor"
        );
        Ok(Self { params, svm })
    }

    pub fn params(&self) -> SvrParams {
        self.params
    }

    pub fn predict(&self, x: &FeatureVector) -> f64 {
        let records = to_records(std::slice::from_ref(x));
        let out: Array1<f64> = self.svm.predict(&records);
        out[0]
    }

    pub fn predict_batch(&self, inputs: &[FeatureVector]) -> Vec<f64> {
        if inputs.is_empty() {
            return Vec::new();
        }
        let records = to_records(inputs);
        let out: Array1<f64> = self.svm.predict(&records);
        out.to_vec()
    }
}

fn to_records(inputs: &[FeatureVector]) -> Array2<f64> {
    Array2::from_shape_fn((inputs.len(), FEATURE_COUNT), |(i, j)| inputs[i][j])
}
