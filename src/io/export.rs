//! CSV and JSON export of dispatch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::{SimulationResult, StepRecord};

/// Column header for CSV step export.
const HEADER: &str = "timestep,timestamp,solar_kw,wind_kw,chp_kw,total_generation_kw,\
                      demand_kw,surplus_kw,generation_off,battery_level_kwh,\
                      battery_change_kwh,grid_export_kwh,grid_import_kwh,\
                      thermal_level_kwh,thermal_change_kwh,thermal_demand_kw";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Thermal columns
/// are left empty when thermal modeling was disabled. Produces deterministic
/// output for identical inputs.
///
/// # Arguments
///
/// * `steps` - Complete simulation step records
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(steps: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(steps, io::BufWriter::new(file))
}

/// Writes step records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(steps: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in steps {
        let (level, change, demand) = match &s.thermal {
            Some(th) => (
                format!("{:.4}", th.level_kwh),
                format!("{:.4}", th.change_kwh),
                format!("{:.4}", th.demand_kw),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        wtr.write_record(&[
            s.timestep.to_string(),
            s.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", s.solar_kw),
            format!("{:.4}", s.wind_kw),
            format!("{:.4}", s.chp_kw),
            format!("{:.4}", s.total_generation_kw),
            format!("{:.4}", s.demand_kw),
            format!("{:.4}", s.surplus_kw),
            s.generation_off.to_string(),
            format!("{:.4}", s.battery_level_kwh),
            format!("{:.4}", s.battery_change_kwh),
            format!("{:.4}", s.grid_export_kwh),
            format!("{:.4}", s.grid_import_kwh),
            level,
            change,
            demand,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the full result as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_json(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_json(result, io::BufWriter::new(file))
}

/// Writes the full result as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(result: &SimulationResult, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::ThermalRecord;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn make_step(t: usize, thermal: bool) -> StepRecord {
        StepRecord {
            timestep: t,
            timestamp: start() + Duration::minutes(15 * t as i64),
            solar_kw: 0.0,
            wind_kw: 1.5,
            chp_kw: 3.0,
            total_generation_kw: 4.5,
            demand_kw: 2.0,
            surplus_kw: 2.5,
            generation_off: false,
            battery_level_kwh: 0.625 * (t + 1) as f32,
            battery_change_kwh: 0.625,
            grid_export_kwh: 0.0,
            grid_import_kwh: 0.0,
            thermal: thermal.then_some(ThermalRecord {
                level_kwh: 1.0,
                change_kwh: 1.0,
                demand_kw: 2.0,
            }),
        }
    }

    fn render(steps: &[StepRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(steps, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_has_all_columns() {
        let output = render(&[make_step(0, false)]);
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(first_line.split(',').count(), 16);
        assert!(first_line.starts_with("timestep,timestamp,solar_kw"));
        assert!(first_line.ends_with("thermal_demand_kw"));
    }

    #[test]
    fn row_count_matches_step_count() {
        let steps: Vec<StepRecord> = (0..24).map(|t| make_step(t, false)).collect();
        // 1 header + 24 data rows
        assert_eq!(render(&steps).lines().count(), 25);
    }

    #[test]
    fn deterministic_output() {
        let steps: Vec<StepRecord> = (0..5).map(|t| make_step(t, true)).collect();
        assert_eq!(render(&steps), render(&steps));
    }

    #[test]
    fn timestamps_and_thermal_columns() {
        let output = render(&[make_step(1, false), make_step(2, true)]);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "2024-03-01 00:15");
        assert_eq!(&rows[0][13], "");
        assert_eq!(&rows[1][13], "1.0000");
        let level: Result<f32, _> = rows[1][9].parse();
        assert_eq!(level.ok(), Some(1.875));
    }

    #[test]
    fn json_contains_steps() {
        let result = SimulationResult {
            steps: vec![make_step(0, false)],
            dt_hours: 0.25,
            battery_capacity_kwh: 10.0,
            thermal_capacity_kwh: None,
            peak_threshold_kw: Some(3.0),
        };
        let mut buf = Vec::new();
        assert!(write_json(&result, &mut buf).is_ok());
        let value: Result<serde_json::Value, _> = serde_json::from_slice(&buf);
        let value = value.ok();
        assert_eq!(
            value.as_ref().and_then(|v| v["steps"].as_array()).map(Vec::len),
            Some(1)
        );
        assert_eq!(
            value.as_ref().and_then(|v| v["peak_threshold_kw"].as_f64()),
            Some(3.0)
        );
    }
}
