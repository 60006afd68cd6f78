//! Source directory loader
//!
//! Every `*.csv` file becomes a dataset with a single collection named after
//! the file stem. Every `*.json` file holds either an object of
//! `sheet -> [rows]` or a bare array of rows.

use crate::data::{Catalog, Collection, Dataset, Row};
use crate::error::{Result, SheetqlError};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSource {
    Sheets(IndexMap<String, Collection>),
    Rows(Collection),
}

/// Load every supported file in `dir` into a catalog keyed by file stem.
///
/// Files are visited in file-name order so that the catalog, and with it the
/// generated schema, is stable across runs.
pub fn load_catalog(dir: impl AsRef<Path>) -> Result<Catalog> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| SheetqlError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut catalog = Catalog::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let stem = stem.to_string();

        let dataset = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => {
                let mut dataset = Dataset::new();
                dataset.insert(stem.clone(), load_csv(&path)?);
                dataset
            }
            Some("json") => load_json(&path, &stem)?,
            _ => {
                tracing::debug!("Skipping unsupported file {}", path.display());
                continue;
            }
        };

        tracing::info!(
            "Loaded {} ({} collections) from {}",
            stem,
            dataset.len(),
            path.display()
        );
        catalog.insert(stem, dataset);
    }

    Ok(catalog)
}

/// Read a CSV file with a header row; every cell is kept as a string.
pub fn load_csv(path: &Path) -> Result<Collection> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Collection::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), JsonValue::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Read a JSON workbook; a bare array becomes one collection named `stem`.
pub fn load_json(path: &Path, stem: &str) -> Result<Dataset> {
    let contents = fs::read_to_string(path)?;
    let source: JsonSource = serde_json::from_str(&contents).map_err(|e| SheetqlError::Load {
        path: path.display().to_string(),
        message: format!("expected an object of row arrays or an array of rows: {}", e),
    })?;

    Ok(match source {
        JsonSource::Sheets(sheets) => sheets,
        JsonSource::Rows(rows) => {
            let mut dataset = Dataset::new();
            dataset.insert(stem.to_string(), rows);
            dataset
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_csv_keeps_column_order() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "people.csv", "name,age,active\nAda,36,1\nAlan,,0\n");

        let rows = load_csv(&dir.path().join("people.csv")).unwrap();

        assert_eq!(rows.len(), 2);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", "active"]);
        assert_eq!(rows[1]["age"], json!(""));
        assert_eq!(rows[0]["active"], json!("1"));
    }

    #[test]
    fn test_load_json_sheets_and_rows() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "library.json",
            r#"{"authors": [{"id": "1", "name": "Le Guin"}], "books": [{"id": "1", "authorId": "1"}]}"#,
        );
        write_file(&dir, "tags.json", r#"[{"label": "scifi"}]"#);
        write_file(&dir, "notes.txt", "ignored");

        let catalog = load_catalog(dir.path()).unwrap();

        let names: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["library", "tags"]);

        let library = &catalog["library"];
        let sheets: Vec<&str> = library.keys().map(String::as_str).collect();
        assert_eq!(sheets, vec!["authors", "books"]);
        assert_eq!(catalog["tags"]["tags"][0]["label"], json!("scifi"));
    }

    #[test]
    fn test_load_json_rejects_scalars() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "broken.json", "42");

        let result = load_catalog(dir.path());
        assert!(matches!(result, Err(SheetqlError::Load { .. })));
    }

    #[test]
    fn test_missing_directory() {
        let result = load_catalog("/definitely/not/here");
        assert!(result.is_err());
    }
}
