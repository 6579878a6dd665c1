use crate::model::{FeatureVector, FEATURE_COUNT};

/// Per-feature standard scaler. Fitted once on the training partition and
/// then applied unchanged to every vector, synthetic ones included.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    mean: FeatureVector,
    scale: FeatureVector,
}

impl Normalizer {
    /// Fit population mean and standard deviation. A constant column gets a
    /// unit scale so it maps to zero instead of NaN.
    pub fn fit(samples: &[FeatureVector]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for s in samples {
            for (m, v) in mean.iter_mut().zip(s) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = [0.0; FEATURE_COUNT];
        for s in samples {
            for j in 0..FEATURE_COUNT {
                let d = s[j] - mean[j];
                scale[j] += d * d;
            }
        }
        for sd in &mut scale {
            *sd = (*sd / n).sqrt();
            if !sd.is_finite() || *sd <= f64::EPSILON {
                *sd = 1.0;
            }
        }
        Some(Self { mean, scale })
    }

    pub fn transform(&self, x: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            out[j] = (x[j] - self.mean[j]) / self.scale[j];
        }
        out
    }

    pub fn mean(&self) -> &FeatureVector {
        &self.mean
    }

    pub fn scale(&self) -> &FeatureVector {
        &self.scale
    }
}
