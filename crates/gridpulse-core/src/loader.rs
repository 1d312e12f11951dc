// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Single-pass CSV loader for the historic half-hourly demand file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use gridpulse_types::{DemandRecord, DemandStats};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{LoadError, LoadResult};

/// Records that survived validation plus statistics over exactly those records.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub records: Vec<DemandRecord>,
    pub stats: DemandStats,
    /// Rows dropped for an unreadable date or a malformed line (not for demand <= 0)
    pub skipped_rows: usize,
}

/// Raw CSV row, matched by header name. Columns the dashboard does not use are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    settlement_date: String,
    settlement_period: String,
    nd: String,
    england_wales_demand: String,
    embedded_wind_generation: String,
    embedded_wind_capacity: String,
    embedded_solar_generation: String,
    embedded_solar_capacity: String,
    ifa_flow: String,
    ifa2_flow: String,
    britned_flow: String,
    moyle_flow: String,
    east_west_flow: String,
    nemo_flow: String,
    nsl_flow: String,
    is_holiday: String,
}

fn parse_value_or_default<T: std::str::FromStr + Default>(s: &str) -> T {
    if s.is_empty() {
        T::default()
    } else {
        s.parse().unwrap_or_default()
    }
}

fn parse_number(s: &str) -> f64 {
    let value: f64 = parse_value_or_default(s);
    if value.is_finite() { value } else { 0.0 }
}

/// Accepts `2009-01-01`, `2009-01-01 00:00:00`, `2009-01-01T00:00:00` and `01-JAN-2009`.
fn parse_settlement_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.split([' ', 'T']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day, "%d-%b-%Y"))
        .ok()
}

impl RawRow {
    fn into_record(self) -> Option<DemandRecord> {
        let date = parse_settlement_date(&self.settlement_date)?;
        Some(DemandRecord {
            date,
            settlement_period: parse_value_or_default(&self.settlement_period),
            national_demand: parse_number(&self.nd),
            demand: parse_number(&self.england_wales_demand),
            wind_generation: parse_number(&self.embedded_wind_generation),
            wind_capacity: parse_number(&self.embedded_wind_capacity),
            solar_generation: parse_number(&self.embedded_solar_generation),
            solar_capacity: parse_number(&self.embedded_solar_capacity),
            ifa_flow: parse_number(&self.ifa_flow),
            ifa2_flow: parse_number(&self.ifa2_flow),
            britned_flow: parse_number(&self.britned_flow),
            moyle_flow: parse_number(&self.moyle_flow),
            east_west_flow: parse_number(&self.east_west_flow),
            nemo_flow: parse_number(&self.nemo_flow),
            nsl_flow: parse_number(&self.nsl_flow),
            is_holiday: self.is_holiday == "1",
        })
    }
}

/// Parse demand rows from any reader with a header line.
///
/// Numeric fields that fail to parse become 0 and rows whose England & Wales demand
/// is not positive are dropped before they reach the statistics. Only I/O errors
/// abort the parse.
pub fn parse_reader<R: Read>(reader: R) -> LoadResult<LoadedData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut loaded = LoadedData::default();
    let mut non_positive = 0_usize;

    for (index, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(LoadError::Csv(e)),
            Err(e) => {
                // +2: one for the header, one for 1-based line numbers
                debug!(line = index + 2, error = %e, "Skipping malformed CSV row");
                loaded.skipped_rows += 1;
                continue;
            }
        };

        let Some(record) = row.into_record() else {
            debug!(line = index + 2, "Skipping CSV row with unreadable settlement date");
            loaded.skipped_rows += 1;
            continue;
        };

        if record.demand <= 0.0 {
            non_positive += 1;
            continue;
        }

        loaded.stats.push(&record);
        loaded.records.push(record);
    }

    if loaded.skipped_rows > 0 {
        warn!(
            skipped = loaded.skipped_rows,
            "Skipped unreadable rows while parsing demand CSV"
        );
    }
    debug!(non_positive, "Dropped rows with non-positive demand");

    Ok(loaded)
}

/// Load and parse the demand CSV at `path`.
pub fn load_csv(path: &Path) -> LoadResult<LoadedData> {
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let loaded = parse_reader(file)?;
    info!(
        path = %path.display(),
        records = loaded.records.len(),
        start = ?loaded.stats.date_range.start,
        end = ?loaded.stats.date_range.end,
        "Parsed demand CSV"
    );
    Ok(loaded)
}
