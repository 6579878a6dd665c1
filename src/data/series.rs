use chrono::NaiveDate;

use crate::data::loader::RawRow;
use crate::data::parse::{parse_calendar_date, parse_price_field};
use crate::error::{ForecastError, Result};
use crate::model::{derive_features, Observation, TrainingRow};

/// Row counts from one cleaning pass, for startup logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub raw_rows: usize,
    pub bad_dates: usize,
    pub bad_numbers: usize,
    pub duplicate_dates: usize,
    pub non_finite: usize,
    pub kept: usize,
}

/// Cleaned, date-ordered training rows. Built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    rows: Vec<TrainingRow>,
}

impl HistoricalSeries {
    pub fn from_raw_rows(raw: &[RawRow]) -> Result<Self> {
        let (series, report) = Self::build(raw);
        tracing::info!(
            raw_rows = report.raw_rows,
            bad_dates = report.bad_dates,
            bad_numbers = report.bad_numbers,
            duplicate_dates = report.duplicate_dates,
            non_finite = report.non_finite,
            kept = report.kept,
            "Built historical series"
        );
        if series.is_empty() {
            return Err(ForecastError::DataLoad(format!(
                "no usable rows after cleaning ({} raw rows)",
                report.raw_rows
            )));
        }
        Ok(series)
    }

    /// Clean and order the raw rows. Rows with an unparseable date or numeric
    /// field are dropped silently; so are the first row (no previous close)
    /// and the last row (no next close).
    pub fn build(raw: &[RawRow]) -> (Self, CleaningReport) {
        let mut report = CleaningReport {
            raw_rows: raw.len(),
            ..CleaningReport::default()
        };

        let mut observations = Vec::with_capacity(raw.len());
        for row in raw {
            let Some(date) = row.date.as_deref().and_then(parse_calendar_date) else {
                report.bad_dates += 1;
                continue;
            };
            match parse_observation(date, row) {
                Some(obs) => observations.push(obs),
                None => report.bad_numbers += 1,
            }
        }

        observations.sort_by_key(|o| o.date);
        let before = observations.len();
        observations.dedup_by_key(|o| o.date);
        report.duplicate_dates = before - observations.len();

        let mut rows = Vec::with_capacity(observations.len().saturating_sub(2));
        for i in 1..observations.len().saturating_sub(1) {
            let obs = observations[i];
            let prev_close = observations[i - 1].close;
            let target = observations[i + 1].close;
            match derive_features(&obs, Some(prev_close)) {
                Some(features) if features.is_finite() && target.is_finite() => {
                    rows.push(TrainingRow {
                        observation: obs,
                        features,
                        target,
                    });
                }
                _ => report.non_finite += 1,
            }
        }
        report.kept = rows.len();

        (Self { rows }, report)
    }

    pub fn from_rows(mut rows: Vec<TrainingRow>) -> Self {
        rows.sort_by_key(|r| r.date());
        rows.dedup_by_key(|r| r.date());
        Self { rows }
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(TrainingRow::date)
    }

    pub fn last(&self) -> Option<&TrainingRow> {
        self.rows.last()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last().map(TrainingRow::date)
    }

    pub fn find(&self, date: NaiveDate) -> Option<&TrainingRow> {
        self.rows
            .binary_search_by_key(&date, TrainingRow::date)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Chronological split into (train, held-out). The held-out size is
    /// `ceil(test_ratio * n)`; the training prefix takes the rest. No shuffling.
    pub fn split_chronological(&self, test_ratio: f64) -> (&[TrainingRow], &[TrainingRow]) {
        let n = self.rows.len();
        let n_test = ((n as f64) * test_ratio.clamp(0.0, 1.0)).ceil() as usize;
        let n_train = n.saturating_sub(n_test.min(n));
        self.rows.split_at(n_train)
    }
}

fn parse_observation(date: NaiveDate, row: &RawRow) -> Option<Observation> {
    let field = |v: &Option<String>| v.as_deref().and_then(parse_price_field);
    Some(Observation {
        date,
        open: field(&row.open)?,
        high: field(&row.high)?,
        low: field(&row.low)?,
        close: field(&row.close)?,
        volume: field(&row.volume)?,
    })
}
