#![allow(dead_code)]

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tempfile::TempDir;

pub mod test_subscriber;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn get_temp_dir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Read a generated table as text, decompressing `.gz` files.
pub fn read_table_text(path: &Path) -> String {
    let raw = std::fs::read(path).expect("failed to read generated file");
    if path.to_string_lossy().ends_with(".gz") {
        assert_eq!(raw[..2], GZIP_MAGIC, "{} is not gzip-compressed", path.display());
        let mut text = String::new();
        GzDecoder::new(raw.as_slice())
            .read_to_string(&mut text)
            .expect("failed to decompress gzip fixture");
        text
    } else {
        assert_ne!(raw.get(..2), Some(&GZIP_MAGIC[..]), "{} should not be compressed", path.display());
        String::from_utf8(raw).expect("plain fixtures should be UTF-8")
    }
}

pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

pub fn parse_table(text: &str) -> ParsedTable {
    let mut lines = text.lines();
    let headers = lines
        .next()
        .expect("table should have a header line")
        .split('\t')
        .map(str::to_owned)
        .collect();
    let rows = lines
        .map(|line| {
            line.split('\t')
                .map(|field| field.parse().unwrap_or_else(|_| panic!("{:?} is not a number", field)))
                .collect()
        })
        .collect();
    ParsedTable { headers, rows }
}

pub fn read_table(path: &Path) -> ParsedTable {
    parse_table(&read_table_text(path))
}
