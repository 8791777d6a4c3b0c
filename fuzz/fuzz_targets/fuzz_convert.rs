#![no_main]

use libfuzzer_sys::fuzz_target;

use camt_recon::recon::{Converter, ProjectionMode};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(rows) = camt_recon::camt053::extract_str(s, "fuzz.xml") else {
        return;
    };
    let converter = Converter::new(ProjectionMode::Full).unwrap();
    let table = converter.finish(rows);
    let _ = camt_recon::export::to_csv_string(&table);
});
