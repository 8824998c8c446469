use chrono::NaiveDate;

use crate::model::settings::MetadataFormat;

/// The trailing annotation recording when a task was archived, in the
/// notation the vault's settings prefer. The date is supplied by the caller
/// so the formatter stays clock-free.
pub fn completion_marker(format: MetadataFormat, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    match format {
        MetadataFormat::Dataview => format!("[completion:: {stamp}]"),
        MetadataFormat::Tasks => format!("✅ {stamp}"),
    }
}
