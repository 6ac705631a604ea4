//! The AFIDs protocol: the canonical table of 32 anatomical landmarks.
//!
//! The table is compiled into the crate from `resources/protocol.json` and
//! parsed once per process on first access. Every label-carrying type in
//! [`crate::model`] validates against it.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::AfidsError;

const PROTOCOL_JSON: &str = include_str!("../resources/protocol.json");

/// Number of fiducials defined by the protocol.
pub const NUM_FIDUCIALS: usize = 32;

static PROTOCOL: OnceCell<ProtocolMap> = OnceCell::new();

/// A single protocol landmark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    /// 1-based protocol label.
    pub label: u32,
    /// Canonical description (e.g. "Infracollicular sulcus").
    pub desc: String,
    /// Canonical acronym (e.g. "ICS").
    pub acronym: String,
}

#[derive(Deserialize)]
struct ProtocolDocument {
    fiducials: Vec<ProtocolEntry>,
}

/// The ordered, immutable protocol table.
#[derive(Clone, Debug)]
pub struct ProtocolMap {
    entries: Vec<ProtocolEntry>,
}

impl ProtocolMap {
    /// Returns the process-wide protocol table, parsing it on first use.
    ///
    /// Initialization is race-free: concurrent first callers block until a
    /// single parse has completed.
    pub fn load() -> Result<&'static ProtocolMap, AfidsError> {
        PROTOCOL.get_or_try_init(|| Self::from_json_str(PROTOCOL_JSON))
    }

    fn from_json_str(json: &str) -> Result<ProtocolMap, AfidsError> {
        let doc: ProtocolDocument =
            serde_json::from_str(json).map_err(|e| AfidsError::ProtocolResource {
                message: e.to_string(),
            })?;

        if doc.fiducials.len() != NUM_FIDUCIALS {
            return Err(AfidsError::ProtocolResource {
                message: format!(
                    "expected {} entries, found {}",
                    NUM_FIDUCIALS,
                    doc.fiducials.len()
                ),
            });
        }

        for (idx, entry) in doc.fiducials.iter().enumerate() {
            let expected = (idx + 1) as u32;
            if entry.label != expected {
                return Err(AfidsError::ProtocolResource {
                    message: format!(
                        "entry {} has label {} (expected {})",
                        idx, entry.label, expected
                    ),
                });
            }
        }

        Ok(ProtocolMap {
            entries: doc.fiducials,
        })
    }

    /// Looks up the entry for a label.
    ///
    /// # Errors
    /// Returns [`AfidsError::InvalidLabel`] if `label` is outside 1..=32.
    pub fn lookup(&self, label: i64) -> Result<&ProtocolEntry, AfidsError> {
        if label < 1 || label as usize > self.entries.len() {
            return Err(AfidsError::InvalidLabel { label });
        }
        Ok(&self.entries[(label - 1) as usize])
    }

    /// All entries in ascending label order.
    pub fn entries(&self) -> &[ProtocolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `desc` is the description or the acronym for `label`.
    ///
    /// The comparison is case-sensitive. Unknown labels never match.
    pub fn is_valid_desc(&self, label: i64, desc: &str) -> bool {
        self.lookup(label)
            .map(|entry| entry.desc == desc || entry.acronym == desc)
            .unwrap_or(false)
    }
}
