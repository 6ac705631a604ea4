//! Fuzz target for fcsv parsing and validation.
//!
//! Run with:
//!   cargo +nightly fuzz run fcsv_parse

#![no_main]

use std::path::Path;

use afids::model::io_fcsv::from_fcsv_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // A full 32-row file is a few KB; 1MB is generous.
    if data.len() > 1024 * 1024 {
        return;
    }

    // Errors are fine; panics are not.
    if let Ok(parsed) = from_fcsv_slice(data) {
        let _ = parsed.into_fiducial_set(Path::new("<fuzz>"));
    }
});
