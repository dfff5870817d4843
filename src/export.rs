//! CSV assembly for the export stage.
//!
//! Builds the downloadable spreadsheet from the processed records: a fixed
//! header row `Title,Source,URL,Summary,Image`, one data row per record in
//! arrival order, UTF-8 encoded. A record without an image exports an empty
//! `Image` field.

use crate::models::ArticleRecord;
use std::error::Error;

/// Fixed column order of the exported table.
pub const CSV_HEADERS: [&str; 5] = ["Title", "Source", "URL", "Summary", "Image"];

/// Serialize records into CSV, header first, one row per record.
pub fn to_csv(records: &[ArticleRecord]) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new().from_writer(vec![]);

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record([
            record.title.as_str(),
            record.source.as_str(),
            record.url.as_str(),
            record.summary.as_str(),
            record.image.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize, image: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            headline: format!("Headline {n}"),
            title: format!("Title {n}"),
            source: "Example News".to_string(),
            url: format!("https://example.com/{n}"),
            summary: format!("Summary {n}"),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_header_row_order() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Title,Source,URL,Summary,Image");
    }

    #[test]
    fn test_one_row_per_record() {
        let records = vec![
            record(1, Some("https://example.com/1.jpg")),
            record(2, None),
            record(3, Some("https://example.com/3.jpg")),
        ];
        let csv = to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "Title 1,Example News,https://example.com/1,Summary 1,https://example.com/1.jpg"
        );
    }

    #[test]
    fn test_absent_image_is_empty_field() {
        let csv = to_csv(&[record(1, None)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].ends_with(",Summary 1,"));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut r = record(1, None);
        r.summary = "First, second".to_string();
        let csv = to_csv(&[r]).unwrap();
        assert!(csv.contains("\"First, second\""));
    }

    #[test]
    fn test_row_count_unaffected_by_failed_articles() {
        // failed extractions still occupy exactly one row
        let mut failed = record(2, None);
        failed.title = crate::models::ERROR_FETCHING_TITLE.to_string();
        let records = vec![record(1, None), failed, record(3, None)];

        let csv = to_csv(&records).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("Error fetching article"));
    }
}
