//! CSV export of neighbour points.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::ExportError;
use crate::geo::Coordinate;
use crate::neighbors::NeighborPoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFilter {
    All,
    #[default]
    FeasibleOnly,
}

impl ExportFilter {
    fn keeps(&self, point: &NeighborPoint) -> bool {
        match self {
            ExportFilter::All => true,
            ExportFilter::FeasibleOnly => point.feasible,
        }
    }
}

#[derive(Serialize)]
struct ExportRow {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Radiacion_Wm2")]
    radiation_w_m2: f64,
    #[serde(rename = "Temperatura")]
    temperature_c: f64,
    #[serde(rename = "Humedad")]
    humidity_pct: f64,
    #[serde(rename = "Factible")]
    feasible: &'static str,
}

impl From<&NeighborPoint> for ExportRow {
    fn from(point: &NeighborPoint) -> Self {
        Self {
            latitude: point.coordinate.latitude,
            longitude: point.coordinate.longitude,
            radiation_w_m2: point.sample.radiation_w_m2,
            temperature_c: point.sample.temperature_c,
            humidity_pct: point.sample.humidity_pct,
            feasible: if point.feasible { "True" } else { "False" },
        }
    }
}

/// `puntos_factibles_<lat>_<lon>.csv`, four decimals per axis.
pub fn export_file_name(center: &Coordinate) -> String {
    format!(
        "puntos_factibles_{:.4}_{:.4}.csv",
        center.latitude, center.longitude
    )
}

/// Writes the filtered points as CSV and returns how many rows were written.
pub fn write_csv<W: Write>(
    writer: W,
    points: &[NeighborPoint],
    filter: ExportFilter,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for point in points.iter().filter(|point| filter.keeps(point)) {
        csv_writer.serialize(ExportRow::from(point))?;
        rows += 1;
    }
    if rows == 0 {
        // serde only emits the header alongside the first record
        csv_writer.write_record([
            "Latitude",
            "Longitude",
            "Radiacion_Wm2",
            "Temperatura",
            "Humedad",
            "Factible",
        ])?;
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub fn to_csv_bytes(points: &[NeighborPoint], filter: ExportFilter) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, points, filter)?;
    Ok(buffer)
}

/// Writes `<dir>/<export_file_name(center)>`, creating `dir` as needed.
pub fn export_to_dir(
    dir: impl AsRef<Path>,
    center: &Coordinate,
    points: &[NeighborPoint],
    filter: ExportFilter,
) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(center));
    export_to_path(&path, points, filter)?;
    Ok(path)
}

pub fn export_to_path(
    path: impl AsRef<Path>,
    points: &[NeighborPoint],
    filter: ExportFilter,
) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let rows = write_csv(file, points, filter)?;
    info!(path = %path.display(), rows, "exported neighbour points");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::EnvironmentalSample;

    fn point(radiation: f64, feasible: bool) -> NeighborPoint {
        NeighborPoint {
            coordinate: Coordinate::new(4.5, -74.25),
            sample: EnvironmentalSample {
                radiation_w_m2: radiation,
                temperature_c: 20.5,
                humidity_pct: 60.0,
            },
            feasible,
        }
    }

    #[test]
    fn header_and_boolean_encoding() {
        let points = [point(900.0, true), point(300.0, false)];
        let bytes = to_csv_bytes(&points, ExportFilter::All).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Latitude,Longitude,Radiacion_Wm2,Temperatura,Humedad,Factible")
        );
        assert_eq!(lines.next(), Some("4.5,-74.25,900.0,20.5,60.0,True"));
        assert_eq!(lines.next(), Some("4.5,-74.25,300.0,20.5,60.0,False"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn feasible_only_is_default() {
        let points = [point(900.0, true), point(300.0, false)];
        let bytes = to_csv_bytes(&points, ExportFilter::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("True\n"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let points = [point(300.0, false)];
        let bytes = to_csv_bytes(&points, ExportFilter::FeasibleOnly).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Latitude,Longitude,Radiacion_Wm2,Temperatura,Humedad,Factible\n"
        );
    }

    #[test]
    fn file_name_uses_four_decimals() {
        assert_eq!(
            export_file_name(&Coordinate::new(4.711, -74.072)),
            "puntos_factibles_4.7110_-74.0720.csv"
        );
    }
}
