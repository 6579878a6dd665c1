pub mod observation;

pub use observation::{
    derive_features, feature_vector, DerivedFeatures, FeatureVector, Observation, SyntheticDay,
    TrainingRow, FEATURE_COUNT, FEATURE_NAMES,
};
