#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a fixture archive from `(name, content)` entries.
pub fn make_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create fixture zip");
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in entries {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(content.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish fixture zip");
}

/// Read one entry of an archive as text.
pub fn read_zip_entry(path: &Path, name: &str) -> String {
    let file = File::open(path).expect("open archive");
    let mut zip = zip::ZipArchive::new(file).expect("parse archive");
    let mut entry = zip.by_name(name).expect("entry present");
    let mut contents = String::new();
    std::io::Read::read_to_string(&mut entry, &mut contents).expect("read entry");
    contents
}

/// All entry names of an archive.
pub fn zip_names(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("open archive");
    let zip = zip::ZipArchive::new(file).expect("parse archive");
    zip.file_names().map(String::from).collect()
}
