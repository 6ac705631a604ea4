//! Slicer markups JSON (`.json`) reader and writer.
//!
//! Only the first markup of the document is used:
//!
//! ```json
//! {"markups": [{"coordinateSystem": "LPS",
//!               "controlPoints": [{"label": "1", "position": [x, y, z],
//!                                  "description": "AC"}, ...]}]}
//! ```
//!
//! The format carries no producer version, so it is always reported as
//! [`UNKNOWN_VERSION`]. `coordinateSystem` may be a tag or a legacy numeric
//! code, where `0` is RAS and `1` is LPS. Note this is the reverse of the
//! fcsv codes.
//!
//! The writer fills the bundled template, emitting the coordinate system as
//! a tag and overwriting each control point's `position` in label order.
//! All other template content is preserved in its original key order.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coord_system::CoordinateSystem;
use super::parsed::{FiducialRecord, ParsedFiducials};
use super::set::{FiducialSet, UNKNOWN_VERSION};
use crate::error::AfidsError;

const TEMPLATE_NAME: &str = "template.json";
const TEMPLATE_JSON: &str = include_str!("../../resources/template.json");

// ============================================================================
// Markup JSON Schema Types (internal to this module)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MarkupDocument {
    markups: Vec<Markup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Markup {
    coordinate_system: Value,
    #[serde(default)]
    control_points: Vec<ControlPoint>,
}

#[derive(Debug, Deserialize)]
struct ControlPoint {
    label: Value,
    position: Vec<f64>,
    #[serde(default)]
    description: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads fiducial records from a markup JSON file.
pub fn read_markup_json(path: &Path) -> Result<ParsedFiducials, AfidsError> {
    let text = fs::read_to_string(path).map_err(AfidsError::Io)?;
    parse_markup(&text, path)
}

/// Writes a fiducial set to a markup JSON file using the bundled template.
pub fn write_markup_json(path: &Path, set: &FiducialSet) -> Result<(), AfidsError> {
    let contents = render(set, path)?;
    let mut file = fs::File::create(path).map_err(AfidsError::Io)?;
    file.write_all(contents.as_bytes())
        .map_err(AfidsError::Io)?;
    Ok(())
}

/// Reads fiducial records from a markup JSON string.
///
/// Useful for testing without file I/O.
pub fn from_markup_json_str(json: &str) -> Result<ParsedFiducials, AfidsError> {
    parse_markup(json, Path::new("<string>"))
}

/// Reads fiducial records from markup JSON bytes.
///
/// Useful for fuzzing.
pub fn from_markup_json_slice(bytes: &[u8]) -> Result<ParsedFiducials, AfidsError> {
    let path = Path::new("<bytes>");
    let doc: MarkupDocument =
        serde_json::from_slice(bytes).map_err(|source| AfidsError::MarkupJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    markup_to_records(doc, path)
}

/// Serializes a fiducial set to a pretty-printed markup JSON string.
pub fn to_markup_json_string(set: &FiducialSet) -> Result<String, AfidsError> {
    render(set, Path::new("<string>"))
}

fn render(set: &FiducialSet, path: &Path) -> Result<String, AfidsError> {
    let mut template: Value =
        serde_json::from_str(TEMPLATE_JSON).map_err(|_| template_not_found())?;

    let markup = template
        .get_mut("markups")
        .and_then(|m| m.get_mut(0))
        .and_then(Value::as_object_mut)
        .ok_or_else(template_not_found)?;

    markup.insert(
        "coordinateSystem".to_string(),
        Value::String(set.coord_system().as_str().to_string()),
    );

    let control_points = markup
        .get_mut("controlPoints")
        .and_then(Value::as_array_mut)
        .ok_or_else(template_not_found)?;

    if control_points.len() != set.len() {
        return Err(AfidsError::FiducialCountMismatch {
            expected: control_points.len(),
            found: set.len(),
        });
    }

    for (point, fid) in control_points.iter_mut().zip(set.iter()) {
        let point = point.as_object_mut().ok_or_else(template_not_found)?;
        point.insert(
            "position".to_string(),
            serde_json::json!([fid.x(), fid.y(), fid.z()]),
        );
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    template
        .serialize(&mut serializer)
        .map_err(|source| AfidsError::MarkupJsonWrite {
            path: path.to_path_buf(),
            source,
        })?;

    String::from_utf8(buf).map_err(|e| AfidsError::InvalidFieldValue {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

// ============================================================================
// Conversion: Markup JSON -> records
// ============================================================================

fn template_not_found() -> AfidsError {
    AfidsError::TemplateNotFound {
        name: TEMPLATE_NAME.to_string(),
    }
}

fn parse_markup(json: &str, path: &Path) -> Result<ParsedFiducials, AfidsError> {
    let doc: MarkupDocument =
        serde_json::from_str(json).map_err(|source| AfidsError::MarkupJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    markup_to_records(doc, path)
}

fn decode_coord_system(value: &Value) -> Result<CoordinateSystem, AfidsError> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    match raw.as_str() {
        "0" => Ok(CoordinateSystem::Ras),
        "1" => Ok(CoordinateSystem::Lps),
        tag => tag.parse(),
    }
}

fn decode_label(value: &Value, idx: usize, path: &Path) -> Result<i64, AfidsError> {
    let label = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    };
    label.ok_or_else(|| AfidsError::InvalidFieldValue {
        path: path.to_path_buf(),
        message: format!("control point {}: label {} is not an integer", idx, value),
    })
}

fn markup_to_records(doc: MarkupDocument, path: &Path) -> Result<ParsedFiducials, AfidsError> {
    let markup = doc
        .markups
        .into_iter()
        .next()
        .ok_or_else(|| AfidsError::MissingOrInvalidHeader {
            path: path.to_path_buf(),
            message: "document contains no markups".to_string(),
        })?;

    let coord_system = decode_coord_system(&markup.coordinate_system)?;

    let records = markup
        .control_points
        .into_iter()
        .enumerate()
        .map(|(idx, point)| {
            let label = decode_label(&point.label, idx, path)?;
            if point.position.len() != 3 {
                return Err(AfidsError::FiducialDimensionMismatch {
                    index: idx,
                    found: point.position.len(),
                });
            }
            Ok(FiducialRecord {
                label,
                x: point.position[0],
                y: point.position[1],
                z: point.position[2],
                desc: point.description,
            })
        })
        .collect::<Result<Vec<_>, AfidsError>>()?;

    Ok(ParsedFiducials {
        format_version: UNKNOWN_VERSION.to_string(),
        coord_system,
        records,
    })
}

// ============================================================================
// Tests
// ============================================================================
