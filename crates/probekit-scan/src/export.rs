//! CSV and DXF export of retrieved points

use crate::error::{ScanError, ScanResult};
use crate::program::ScanKind;
use chrono::NaiveDate;
use dxf::entities::{Entity, EntityType, ModelPoint, Polyline, Text, Vertex};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Color, Drawing, Point};
use probekit_core::{HasHeight, MeasurementSystem, RotarySamplePoint, SamplePoint};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Rotary points carry a text label every this many points
pub const LABEL_INTERVAL: usize = 10;

const LABEL_RAISE: f64 = 0.1;
const LABEL_HEIGHT: f64 = 0.1;

/// A record the exporters know how to write
pub trait ExportRecord: HasHeight {
    /// Scan kind the record belongs to
    const KIND: ScanKind;
    /// DXF layer name
    const LAYER: &'static str;
    /// DXF layer color index
    const LAYER_COLOR: u8;
    /// Join the records with a 3D polyline in visitation order
    const TRACE_PATH: bool = false;

    /// CSV column names
    fn csv_header(units: MeasurementSystem) -> Vec<String>;
    /// CSV row
    fn csv_row(&self) -> Vec<String>;
    /// 3D location of the record
    fn location(&self) -> Point;
    /// Text annotation placed above the point, if any
    fn label(&self) -> Option<String> {
        None
    }
}

impl ExportRecord for SamplePoint {
    const KIND: ScanKind = ScanKind::Surface;
    const LAYER: &'static str = "SCAN_POINTS";
    const LAYER_COLOR: u8 = 7;
    const TRACE_PATH: bool = true;

    fn csv_header(units: MeasurementSystem) -> Vec<String> {
        let u = units.label();
        vec![
            "Index".to_string(),
            format!("X ({})", u),
            format!("Y ({})", u),
            format!("Z ({})", u),
        ]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.x.to_string(),
            self.y.to_string(),
            self.z.to_string(),
        ]
    }

    fn location(&self) -> Point {
        Point::new(self.x, self.y, self.z)
    }
}

impl ExportRecord for RotarySamplePoint {
    const KIND: ScanKind = ScanKind::Rotary;
    const LAYER: &'static str = "ROTARY_SCAN";
    const LAYER_COLOR: u8 = 3;

    fn csv_header(units: MeasurementSystem) -> Vec<String> {
        let mut header = SamplePoint::csv_header(units);
        header.push("A (deg)".to_string());
        header.push("B (deg)".to_string());
        header
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.x.to_string(),
            self.y.to_string(),
            self.z.to_string(),
            self.a.to_string(),
            self.b.to_string(),
        ]
    }

    fn location(&self) -> Point {
        Point::new(self.x, self.y, self.z)
    }

    fn label(&self) -> Option<String> {
        Some(format!("A:{:.1} B:{:.1}", self.a, self.b))
    }
}

/// `surface_scan_2024-03-01.csv` style file name
pub fn default_file_name(kind: ScanKind, date: NaiveDate, extension: &str) -> String {
    let stem = match kind {
        ScanKind::Surface => "surface_scan",
        ScanKind::Rotary => "rotary_scan",
        ScanKind::ZProbe => "z_probe",
    };
    format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), extension)
}

/// Write records as CSV
pub fn write_csv<P: ExportRecord, W: Write>(
    writer: W,
    points: &[P],
    units: MeasurementSystem,
) -> ScanResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(P::csv_header(units))
        .map_err(|e| ScanError::ExportFailed(e.to_string()))?;
    for point in points {
        csv.write_record(point.csv_row())
            .map_err(|e| ScanError::ExportFailed(e.to_string()))?;
    }
    csv.flush()?;
    Ok(())
}

/// Build an R12 drawing with one POINT per record
///
/// Surface records are also joined by a 3D polyline in scan order.
pub fn build_drawing<P: ExportRecord>(points: &[P]) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R12;
    drawing.add_layer(Layer {
        name: P::LAYER.to_string(),
        color: Color::from_index(P::LAYER_COLOR),
        ..Default::default()
    });

    for (position, point) in points.iter().enumerate() {
        let location = point.location();
        let mut entity = Entity::new(EntityType::ModelPoint(ModelPoint {
            location: location.clone(),
            ..Default::default()
        }));
        entity.common.layer = P::LAYER.to_string();
        drawing.add_entity(entity);

        if position % LABEL_INTERVAL != 0 {
            continue;
        }
        if let Some(value) = point.label() {
            let mut text = Entity::new(EntityType::Text(Text {
                location: Point::new(location.x, location.y, location.z + LABEL_RAISE),
                text_height: LABEL_HEIGHT,
                value,
                ..Default::default()
            }));
            text.common.layer = P::LAYER.to_string();
            drawing.add_entity(text);
        }
    }

    if P::TRACE_PATH && !points.is_empty() {
        let mut polyline = Polyline::default();
        polyline.set_is_3d_polyline(true);
        for point in points {
            polyline.add_vertex(&mut drawing, Vertex::new(point.location()));
        }
        let mut entity = Entity::new(EntityType::Polyline(polyline));
        entity.common.layer = P::LAYER.to_string();
        drawing.add_entity(entity);
    }

    drawing
}

/// Write records as an R12 DXF drawing
pub fn write_dxf<P: ExportRecord, W: Write>(writer: &mut W, points: &[P]) -> ScanResult<()> {
    build_drawing(points)
        .save(writer)
        .map_err(|e| ScanError::ExportFailed(e.to_string()))
}

/// Write records to a CSV file
pub fn save_csv<P: ExportRecord>(
    path: impl AsRef<Path>,
    points: &[P],
    units: MeasurementSystem,
) -> ScanResult<()> {
    let path = path.as_ref();
    write_csv(BufWriter::new(File::create(path)?), points, units)?;
    info!("Exported {} {} points to {}", points.len(), P::KIND, path.display());
    Ok(())
}

/// Write records to a DXF file
pub fn save_dxf<P: ExportRecord>(path: impl AsRef<Path>, points: &[P]) -> ScanResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_dxf(&mut writer, points)?;
    writer.flush()?;
    info!("Exported {} {} points to {}", points.len(), P::KIND, path.display());
    Ok(())
}
