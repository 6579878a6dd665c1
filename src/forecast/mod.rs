pub mod engine;
pub mod lookup;

pub use engine::{
    synthesize_day, ForecastEngine, MAX_WICK_FRACTION, VOLUME_FACTOR_MAX, VOLUME_FACTOR_MIN,
};
pub use lookup::lookup;
