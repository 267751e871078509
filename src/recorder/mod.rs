//! Time-series recording and CSV export
//!
//! [`DataRecorder`] keeps the full history of a session for export; memory
//! grows linearly with the number of recorded ticks (about 100 bytes per
//! point). Charting consumers that only need a recent window use
//! [`TrendWindow`], which has a fixed capacity and overwrites the oldest
//! samples.
//!
//! # CSV format
//!
//! ```csv
//! Time (s),Tank 1 Level (m),Tank 2 Level (m),Controller Output (%),Pump Flow (L/min),Setpoint (m)
//! 0.10,0.002,0.000,55.3,0.00,0.250
//! ```
//!
//! | Column | Decimals |
//! |--------|----------|
//! | time | 2 |
//! | tank levels | 3 |
//! | controller output | 1 |
//! | pump flow | 2 |
//! | setpoint | 3 |

pub mod trend;

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub use trend::{TrendSample, TrendWindow};

use crate::control::PidComponents;
use crate::error::{Error, Result};
use crate::simulation::SimulationState;

/// Column header of the CSV export
pub const CSV_HEADER: [&str; 6] = [
    "Time (s)",
    "Tank 1 Level (m)",
    "Tank 2 Level (m)",
    "Controller Output (%)",
    "Pump Flow (L/min)",
    "Setpoint (m)",
];

/// Snapshot of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationDataPoint {
    pub time: f64,
    pub tank1_level: f64,
    pub tank2_level: f64,
    pub controller_output: f64,
    pub pump_flow: f64,
    pub setpoint: f64,
    /// `setpoint - tank2_level`, absent in manual mode
    pub error: Option<f64>,
    pub pid_components: Option<PidComponents>,
}

impl SimulationDataPoint {
    pub fn from_state(state: &SimulationState) -> Self {
        let feedback = state.control_strategy.is_feedback();
        Self {
            time: state.time,
            tank1_level: state.tank1.height,
            tank2_level: state.tank2.height,
            controller_output: state.controller_output,
            pump_flow: state.pump_flow,
            setpoint: state.controller.setpoint,
            error: feedback.then(|| state.error()),
            pid_components: if feedback { state.pid_components } else { None },
        }
    }

    fn csv_fields(&self) -> [String; 6] {
        [
            format!("{:.2}", self.time),
            format!("{:.3}", self.tank1_level),
            format!("{:.3}", self.tank2_level),
            format!("{:.1}", self.controller_output),
            format!("{:.2}", self.pump_flow),
            format!("{:.3}", self.setpoint),
        ]
    }
}

/// One row read back from a CSV export
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Time (s)")]
    pub time: f64,
    #[serde(rename = "Tank 1 Level (m)")]
    pub tank1_level: f64,
    #[serde(rename = "Tank 2 Level (m)")]
    pub tank2_level: f64,
    #[serde(rename = "Controller Output (%)")]
    pub controller_output: f64,
    #[serde(rename = "Pump Flow (L/min)")]
    pub pump_flow: f64,
    #[serde(rename = "Setpoint (m)")]
    pub setpoint: f64,
}

/// Ordered, unbounded record of a simulation run
#[derive(Debug, Clone, Default)]
pub struct DataRecorder {
    points: Vec<SimulationDataPoint>,
}

impl DataRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `state`
    pub fn add_data_point(&mut self, state: &SimulationState) {
        self.points.push(SimulationDataPoint::from_state(state));
    }

    /// Drop every recorded point
    pub fn clear_data(&mut self) {
        debug!("clearing {} recorded points", self.points.len());
        self.points.clear();
    }

    pub fn data_point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recorded points, oldest first
    pub fn points(&self) -> &[SimulationDataPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&SimulationDataPoint> {
        self.points.last()
    }

    /// Write the header and one row per point, each terminated by `\n`
    pub fn save_to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for point in &self.points {
            wtr.write_record(point.csv_fields())?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// CSV text of the recording, empty when nothing was recorded
    ///
    /// Rows are separated by `\n` with no trailing newline.
    pub fn export_to_csv(&self) -> String {
        if self.points.is_empty() {
            return String::new();
        }

        let mut buf = Vec::with_capacity((self.points.len() + 1) * 40);
        if let Err(err) = self.save_to_writer(&mut buf) {
            warn!("CSV export failed: {}", err);
            return String::new();
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the CSV export to `path`, byte for byte the text of
    /// [`export_to_csv`](Self::export_to_csv)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] when nothing was recorded, or an I/O error
    /// if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.points.is_empty() {
            return Err(Error::NoData);
        }

        fs::write(path.as_ref(), self.export_to_csv())?;

        info!("saved {} points to {}", self.points.len(), path.as_ref().display());
        Ok(())
    }
}

/// Parse CSV text produced by [`DataRecorder::export_to_csv`]
///
/// Empty input yields no rows.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new().from_reader(text.as_bytes());

    let headers = rdr.headers()?;
    if headers.len() != CSV_HEADER.len() || headers.iter().zip(CSV_HEADER).any(|(a, b)| a != b) {
        return Err(Error::Csv {
            line: 1,
            reason: "unexpected header".to_string(),
        });
    }

    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = row.map_err(|err| Error::Csv {
            line: i + 2,
            reason: err.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
