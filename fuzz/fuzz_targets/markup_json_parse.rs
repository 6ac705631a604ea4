//! Fuzz target for markup JSON parsing and validation.
//!
//! Run with:
//!   cargo +nightly fuzz run markup_json_parse

#![no_main]

use std::path::Path;

use afids::model::io_markup_json::from_markup_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(parsed) = from_markup_json_slice(data) {
        let _ = parsed.into_fiducial_set(Path::new("<fuzz>"));
    }
});
