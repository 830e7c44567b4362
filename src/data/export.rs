use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::error::ExportError;
use super::model::{TitleRecord, TitleTable};

/// Matches the first format the loader tries for `date_added`.
const DATE_ADDED_FORMAT: &str = "%B %-d, %Y";

/// Row layout written back out, a subset of the source columns.
#[derive(Serialize)]
struct ExportRow<'a> {
    show_id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    country: String,
    date_added: String,
    release_year: i32,
    rating: &'a str,
    duration: String,
    listed_in: String,
}

impl<'a> From<&'a TitleRecord> for ExportRow<'a> {
    fn from(rec: &'a TitleRecord) -> Self {
        ExportRow {
            show_id: &rec.id,
            kind: rec.kind.label(),
            title: &rec.title,
            country: rec.countries.join(", "),
            date_added: rec
                .date_added
                .map(|d| d.format(DATE_ADDED_FORMAT).to_string())
                .unwrap_or_default(),
            release_year: rec.release_year,
            rating: rec.rating.as_deref().unwrap_or(""),
            duration: rec.duration.map(|d| d.to_string()).unwrap_or_default(),
            listed_in: rec.genres.join(", "),
        }
    }
}

/// Write `table` as CSV with a header row.
pub fn write_csv<W: Write>(table: &TitleTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for rec in table {
        wtr.serialize(ExportRow::from(rec))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_csv(table: &TitleTable, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, file)?;
    log::info!("Exported {} titles to {}", table.len(), path.display());
    Ok(())
}
