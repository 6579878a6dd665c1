use std::io::Write;
use std::path::PathBuf;

use price_forecast::config::Config;

#[test]
fn parse_default_toml() {
    let toml_str = r#"
[data]
csv_path = "data/bitcoin_price_data.csv"

[model]
c = 100.0
gamma = 0.1
epsilon = 0.01
test_ratio = 0.2

[forecast]
max_horizon_days = 365

[logging]
level = "info"
json = false
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(
        config.data.csv_path,
        PathBuf::from("data/bitcoin_price_data.csv")
    );
    let training = config.model.training();
    assert!((training.svr.c - 100.0).abs() < f64::EPSILON);
    assert!((training.svr.gamma - 0.1).abs() < f64::EPSILON);
    assert!((training.svr.epsilon - 0.01).abs() < f64::EPSILON);
    assert!((training.test_ratio - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.forecast.max_horizon_days, 365);
    assert!(!config.logging.json);
    assert!(config.validate().is_ok());
}

#[test]
fn from_path_reads_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[model]\ngamma = 0.5\n\n[forecast]\nmax_horizon_days = 14").unwrap();
    file.flush().unwrap();

    let config = Config::from_path(file.path()).unwrap();
    assert!((config.model.gamma - 0.5).abs() < f64::EPSILON);
    assert!((config.model.c - 100.0).abs() < f64::EPSILON);
    assert_eq!(config.forecast.max_horizon_days, 14);
}

#[test]
fn from_path_reports_parse_errors_with_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[model\nc = ").unwrap();
    file.flush().unwrap();

    let err = Config::from_path(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to parse"));
}

#[test]
fn validate_rejects_invalid_hyperparameters() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.model.c = 0.0;
    assert!(config.validate().is_err());

    config = Config::default();
    config.model.gamma = -1.0;
    assert!(config.validate().is_err());

    config = Config::default();
    config.model.epsilon = -0.1;
    assert!(config.validate().is_err());

    config = Config::default();
    config.model.test_ratio = 1.0;
    assert!(config.validate().is_err());

    config = Config::default();
    config.forecast.max_horizon_days = 0;
    assert!(config.validate().is_err());
}
