use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::{CoordinateSystem, LabelMismatch};

/// The main error type for afids operations.
#[derive(Debug, Error)]
pub enum AfidsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provided AFID file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid file extension '{extension}' for {path} (supported: fcsv, json)")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Failed to parse fcsv from {path}: {source}")]
    FcsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write fcsv to {path}: {source}")]
    FcsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse markup JSON from {path}: {source}")]
    MarkupJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write markup JSON to {path}: {source}")]
    MarkupJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing or invalid header in {path}: {message}")]
    MissingOrInvalidHeader { path: PathBuf, message: String },

    #[error("Invalid coordinate system '{value}' (expected RAS or LPS)")]
    InvalidCoordinateSystem { value: String },

    #[error("Invalid field value in {path}: {message}")]
    InvalidFieldValue { path: PathBuf, message: String },

    #[error("AFID label {label} is not valid (expected 1..=32)")]
    InvalidLabel { label: i64 },

    #[error(
        "Description '{desc}' for label {label} does not match expected '{expected_desc}' or '{expected_acronym}'"
    )]
    FiducialDescriptionMismatch {
        label: u32,
        desc: String,
        expected_desc: String,
        expected_acronym: String,
    },

    #[error("Expected {expected} fiducials, found {found}")]
    IncorrectFiducialCount { expected: usize, found: usize },

    #[error("Incorrect fiducial labels: {}", DisplayMismatches(.mismatches))]
    IncorrectFiducialLabels { mismatches: Vec<LabelMismatch> },

    #[error("Unexpected number of fiducials in {path}: expected {expected}, found {found}")]
    UnexpectedFiducialCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Bundled template '{name}' is unavailable")]
    TemplateNotFound { name: String },

    #[error("Expected {expected} AFIDs, but received {found}")]
    FiducialCountMismatch { expected: usize, found: usize },

    #[error("Expected 3 spatial dimensions (x, y, z) for fiducial {index}, but received {found}")]
    FiducialDimensionMismatch { index: usize, found: usize },

    #[error("Mismatched coordinate systems: expected {expected}, found {found}")]
    MismatchedCoordinateSystem {
        expected: CoordinateSystem,
        found: CoordinateSystem,
    },

    #[error("No single common FiducialSet is shared by every distance set")]
    NoCommonReferenceSet,

    #[error("Invalid component '{component}' (expected x, y, z or distance)")]
    InvalidComponent { component: String },

    #[error("Expected at least one {what}")]
    EmptyInput { what: &'static str },

    #[error("Affine matrix is not invertible")]
    SingularAffine,

    #[error("Fiducial {label} does not map to a representable voxel index: {voxel:?}")]
    VoxelOutOfRange { label: u32, voxel: [f64; 3] },

    #[error("Invalid sampling parameters: {message}")]
    InvalidSampling { message: String },

    #[error("Bundled protocol table is invalid: {message}")]
    ProtocolResource { message: String },
}

struct DisplayMismatches<'a>(&'a [LabelMismatch]);

impl fmt::Display for DisplayMismatches<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mismatch) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", mismatch)?;
        }
        Ok(())
    }
}
