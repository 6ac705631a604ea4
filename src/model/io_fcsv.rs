//! Slicer markups fiducial CSV (`.fcsv`) reader and writer.
//!
//! # Format Reference
//!
//! ```text
//! # Markups fiducial file version = 4.13
//! # CoordinateSystem = 0
//! # columns = id,x,y,z,ow,ox,oy,oz,vis,sel,lock,label,desc,associatedNodeID
//! vtkMRMLMarkupsFiducialNode_1,-0.07,-2.24,-4.25,0,0,0,1,1,1,0,1,AC,
//! ```
//!
//! - Line 1 carries the producer version as the first `<major>.<minor>` match.
//! - Line 2 ends with the coordinate system code: `0` is LPS, `1` is RAS.
//!   The literal tags `LPS`/`RAS` are accepted as well.
//! - Line 3 names the columns and is skipped.
//! - Rows are read by position. Only `x`, `y`, `z`, `label` and `desc` are
//!   interpreted; the remaining columns must be present but are opaque.
//!
//! # Writing
//!
//! Output is produced from the bundled template: its header skeleton and all
//! non-spatial columns are kept, line 2 is rewritten with the set's code, and
//! the `x`, `y`, `z` columns of each row are overwritten in label order.

use std::fs;
use std::io::Write;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::coord_system::CoordinateSystem;
use super::parsed::{FiducialRecord, ParsedFiducials};
use super::set::FiducialSet;
use crate::error::AfidsError;

const TEMPLATE_NAME: &str = "template.fcsv";
const TEMPLATE_FCSV: &str = include_str!("../../resources/template.fcsv");

/// Number of comment lines preceding the rows.
const HEADER_LINES: usize = 3;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+").expect("version pattern is valid"));

// ============================================================================
// FCSV Schema Type (internal to this module)
// ============================================================================

/// A single fcsv row, in column order.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct FcsvRow {
    id: String,
    x: f64,
    y: f64,
    z: f64,
    ow: String,
    ox: String,
    oy: String,
    oz: String,
    vis: String,
    sel: String,
    lock: String,
    label: String,
    desc: String,
    associated_node_id: String,
}

/// A file split into its three header lines and parsed rows.
struct FcsvDocument {
    header: Vec<String>,
    rows: Vec<FcsvRow>,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads fiducial records from an fcsv file.
///
/// # Errors
/// Returns an error if the file cannot be read, the header is missing or
/// invalid, or a row is malformed.
pub fn read_fcsv(path: &Path) -> Result<ParsedFiducials, AfidsError> {
    let text = fs::read_to_string(path).map_err(AfidsError::Io)?;
    parse_fcsv(&text, path)
}

/// Writes a fiducial set to an fcsv file using the bundled template.
pub fn write_fcsv(path: &Path, set: &FiducialSet) -> Result<(), AfidsError> {
    let contents = render(load_template()?, set.coord_system(), &set_coords(set), path)?;
    let mut file = fs::File::create(path).map_err(AfidsError::Io)?;
    file.write_all(contents.as_bytes())
        .map_err(AfidsError::Io)?;
    Ok(())
}

/// Reads fiducial records from an fcsv string.
///
/// Useful for testing without file I/O.
pub fn from_fcsv_str(text: &str) -> Result<ParsedFiducials, AfidsError> {
    parse_fcsv(text, Path::new("<string>"))
}

/// Reads fiducial records from fcsv bytes.
///
/// Useful for fuzzing. Input that is not valid UTF-8 is rejected with
/// [`AfidsError::InvalidFieldValue`].
pub fn from_fcsv_slice(bytes: &[u8]) -> Result<ParsedFiducials, AfidsError> {
    let path = Path::new("<bytes>");
    let text = std::str::from_utf8(bytes).map_err(|e| AfidsError::InvalidFieldValue {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8: {}", e),
    })?;
    parse_fcsv(text, path)
}

/// Serializes a fiducial set to an fcsv string.
pub fn to_fcsv_string(set: &FiducialSet) -> Result<String, AfidsError> {
    to_fcsv_string_from_coords(set.coord_system(), &set_coords(set))
}

/// Serializes raw `[x, y, z]` rows to an fcsv string.
///
/// Row `i` of `coords` is written to the template row for label `i + 1`.
///
/// # Errors
/// - [`AfidsError::FiducialCountMismatch`] if `coords` does not have one row
///   per template row.
/// - [`AfidsError::FiducialDimensionMismatch`] if a row is not 3 values long.
pub fn to_fcsv_string_from_coords(
    coord_system: CoordinateSystem,
    coords: &[Vec<f64>],
) -> Result<String, AfidsError> {
    render(load_template()?, coord_system, coords, Path::new("<string>"))
}

fn set_coords(set: &FiducialSet) -> Vec<Vec<f64>> {
    set.iter().map(|f| f.coords().to_vec()).collect()
}

// ============================================================================
// Coordinate system codes
// ============================================================================

fn decode_coord_system(token: &str) -> Result<CoordinateSystem, AfidsError> {
    match token {
        "0" => Ok(CoordinateSystem::Lps),
        "1" => Ok(CoordinateSystem::Ras),
        other => other.parse(),
    }
}

fn encode_coord_system(coord_system: CoordinateSystem) -> &'static str {
    match coord_system {
        CoordinateSystem::Lps => "0",
        CoordinateSystem::Ras => "1",
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn split_document(text: &str, path: &Path) -> Result<FcsvDocument, AfidsError> {
    let mut header = Vec::with_capacity(HEADER_LINES);
    let mut body_start = 0;
    for line in text.split_inclusive('\n').take(HEADER_LINES) {
        body_start += line.len();
        header.push(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text[body_start..].as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: FcsvRow = result.map_err(|source| AfidsError::FcsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    Ok(FcsvDocument { header, rows })
}

fn parse_header(header: &[String], path: &Path) -> Result<(String, CoordinateSystem), AfidsError> {
    let missing = |message: &str| AfidsError::MissingOrInvalidHeader {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let version_line = header.first().ok_or_else(|| missing("no version line"))?;
    let version = VERSION_RE
        .find(version_line)
        .ok_or_else(|| missing("no <major>.<minor> version on line 1"))?
        .as_str()
        .to_string();

    let coord_line = header
        .get(1)
        .ok_or_else(|| missing("no coordinate system line"))?;
    let token = coord_line
        .split_whitespace()
        .last()
        .ok_or_else(|| missing("empty coordinate system line"))?;

    Ok((version, decode_coord_system(token)?))
}

fn parse_fcsv(text: &str, path: &Path) -> Result<ParsedFiducials, AfidsError> {
    let doc = split_document(text, path)?;
    let (format_version, coord_system) = parse_header(&doc.header, path)?;

    let records = doc
        .rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let label = row
                .label
                .trim()
                .parse::<i64>()
                .map_err(|_| AfidsError::InvalidFieldValue {
                    path: path.to_path_buf(),
                    message: format!("row {}: label '{}' is not an integer", idx + 1, row.label),
                })?;
            Ok(FiducialRecord {
                label,
                x: row.x,
                y: row.y,
                z: row.z,
                desc: row.desc,
            })
        })
        .collect::<Result<Vec<_>, AfidsError>>()?;

    Ok(ParsedFiducials {
        format_version,
        coord_system,
        records,
    })
}

// ============================================================================
// Writing
// ============================================================================

fn load_template() -> Result<FcsvDocument, AfidsError> {
    let path = Path::new(TEMPLATE_NAME);
    let template = split_document(TEMPLATE_FCSV, path)?;
    if template.header.len() != HEADER_LINES || template.rows.is_empty() {
        return Err(AfidsError::TemplateNotFound {
            name: TEMPLATE_NAME.to_string(),
        });
    }
    Ok(template)
}

fn render(
    template: FcsvDocument,
    coord_system: CoordinateSystem,
    coords: &[Vec<f64>],
    path: &Path,
) -> Result<String, AfidsError> {
    let FcsvDocument { header, mut rows } = template;

    if coords.len() != rows.len() {
        return Err(AfidsError::FiducialCountMismatch {
            expected: rows.len(),
            found: coords.len(),
        });
    }
    if let Some((index, bad)) = coords.iter().enumerate().find(|(_, c)| c.len() != 3) {
        return Err(AfidsError::FiducialDimensionMismatch {
            index,
            found: bad.len(),
        });
    }

    for (row, xyz) in rows.iter_mut().zip(coords) {
        row.x = xyz[0];
        row.y = xyz[1];
        row.z = xyz[2];
    }

    let mut out = String::new();
    out.push_str(&header[0]);
    out.push('\n');
    out.push_str(&format!(
        "# CoordinateSystem = {}\n",
        encode_coord_system(coord_system)
    ));
    out.push_str(&header[2]);
    out.push('\n');

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in &rows {
        csv_writer
            .serialize(row)
            .map_err(|source| AfidsError::FcsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| AfidsError::Io(e.into_error()))?;
    let body = String::from_utf8(bytes).map_err(|e| AfidsError::InvalidFieldValue {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })?;
    out.push_str(&body);

    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
