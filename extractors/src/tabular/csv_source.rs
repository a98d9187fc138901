use super::{RawRow, SheetRows, TabularSource};
use csv::ReaderBuilder;
use shared_types::ImportError;
use std::path::{Path, PathBuf};

/// CSV-backed tabular source.
///
/// A single `.csv` file is one sheet named after its file stem. A
/// directory is a multi-sheet source: every `.csv` file directly inside
/// it is a sheet, ordered by stem.
#[derive(Debug)]
pub struct CsvSource {
    sheets: Vec<(String, PathBuf)>,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        if path.is_file() {
            let name = sheet_name(path)
                .ok_or_else(|| ImportError::SourceUnreadable(format!("{}", path.display())))?;
            return Ok(Self {
                sheets: vec![(name, path.to_path_buf())],
            });
        }

        if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| {
                ImportError::SourceUnreadable(format!("{}: {}", path.display(), e))
            })?;

            let mut sheets = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    ImportError::SourceUnreadable(format!("{}: {}", path.display(), e))
                })?;
                let file_path = entry.path();
                if file_path.extension().and_then(|e| e.to_str()) == Some("csv") {
                    if let Some(name) = sheet_name(&file_path) {
                        sheets.push((name, file_path));
                    }
                }
            }
            sheets.sort_by(|a, b| a.0.cmp(&b.0));

            if sheets.is_empty() {
                return Err(ImportError::SourceUnreadable(format!(
                    "{}: no .csv files in directory",
                    path.display()
                )));
            }
            return Ok(Self { sheets });
        }

        Err(ImportError::SourceUnreadable(format!(
            "{}: no such file or directory",
            path.display()
        )))
    }

    fn sheet_path(&self, sheet: &str) -> Option<&Path> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, path)| path.as_path())
    }
}

fn sheet_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

impl TabularSource for CsvSource {
    fn list_sheets(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_rows(&self, sheet: &str) -> Result<SheetRows, ImportError> {
        let path = self
            .sheet_path(sheet)
            .ok_or_else(|| ImportError::SheetNotFound(sheet.to_string()))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| ImportError::SourceUnreadable(format!("{}: {}", path.display(), e)))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ImportError::SourceUnreadable(format!("{}: {}", path.display(), e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let header_list = headers.clone();
        let rows = reader.into_records().map(move |result| match result {
            Ok(record) => {
                let mut row = RawRow::new();
                for (i, field) in record.iter().enumerate() {
                    if let Some(header) = header_list.get(i) {
                        row.insert(header.clone(), field.to_string());
                    }
                }
                Ok(row)
            }
            Err(e) => Err(e.to_string()),
        });

        Ok(SheetRows {
            headers,
            rows: Box::new(rows),
        })
    }
}
