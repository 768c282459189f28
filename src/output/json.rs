//! JSON export of book records

use crate::output::OutputResult;
use crate::record::BookRecord;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes all records as one pretty-printed JSON array
///
/// Indented with four spaces; non-ASCII text is written as is. Missing
/// parent directories of `output_path` are created.
pub fn save_books(books: &[BookRecord], output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_books(books, &mut writer)?;
    writer.flush()?;

    Ok(())
}

/// Serializes records into any writer
pub fn write_books<W: Write>(books: &[BookRecord], writer: W) -> OutputResult<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    books.serialize(&mut serializer)?;
    Ok(())
}
