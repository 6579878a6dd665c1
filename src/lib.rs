pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod input;
pub mod model;
pub mod predictor;
pub mod service;

pub use error::{ForecastError, Result};
pub use service::{Forecaster, QueryMode, QueryReply};
