use chrono::NaiveDate;

pub const FEATURE_COUNT: usize = 7;

/// Column order of every feature vector handed to the normalizer and regressor.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "open",
    "high",
    "low",
    "volume",
    "open_close_diff",
    "high_low_diff",
    "pct_change_1d",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// One calendar day of OHLCV market data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub open_close_diff: f64,
    pub high_low_diff: f64,
    pub pct_change_1d: f64,
}

impl DerivedFeatures {
    pub fn is_finite(&self) -> bool {
        self.open_close_diff.is_finite()
            && self.high_low_diff.is_finite()
            && self.pct_change_1d.is_finite()
    }
}

/// Derive the per-day features from an observation and the preceding close.
///
/// Returns `None` when there is no usable previous close (absent or zero),
/// since the one-day percent change is undefined there.
pub fn derive_features(obs: &Observation, prev_close: Option<f64>) -> Option<DerivedFeatures> {
    let prev_close = prev_close.filter(|p| *p != 0.0)?;
    Some(DerivedFeatures {
        open_close_diff: obs.open - obs.close,
        high_low_diff: obs.high - obs.low,
        pct_change_1d: (obs.close - prev_close) / prev_close,
    })
}

pub fn feature_vector(obs: &Observation, features: &DerivedFeatures) -> FeatureVector {
    [
        obs.open,
        obs.high,
        obs.low,
        obs.volume,
        features.open_close_diff,
        features.high_low_diff,
        features.pct_change_1d,
    ]
}

/// A historical day paired with its training target (the next day's close).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub observation: Observation,
    pub features: DerivedFeatures,
    pub target: f64,
}

impl TrainingRow {
    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn feature_vector(&self) -> FeatureVector {
        feature_vector(&self.observation, &self.features)
    }
}

/// A forecast-generated day beyond the historical record. Never written back
/// into the historical series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticDay {
    pub observation: Observation,
    pub features: DerivedFeatures,
}

impl SyntheticDay {
    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn close(&self) -> f64 {
        self.observation.close
    }

    pub fn feature_vector(&self) -> FeatureVector {
        feature_vector(&self.observation, &self.features)
    }
}

impl From<&TrainingRow> for SyntheticDay {
    fn from(row: &TrainingRow) -> Self {
        Self {
            observation: row.observation,
            features: row.features,
        }
    }
}
