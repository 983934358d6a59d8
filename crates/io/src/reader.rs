// Spreadsheet read path: rows into typed records (xlsx, xls, auto-detected)

use std::io::{Read, Seek};
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use sheetbind_core::coerce::coerce;
use sheetbind_core::{Direction, SheetRecord};

/// Result of a read operation: the records plus what happened on the way.
#[derive(Debug)]
pub struct ImportResult<R> {
    pub records: Vec<R>,
    pub sheets_read: usize,
    pub rows_read: usize,
    pub rows_skipped_blank: usize,
    /// Non-fatal conditions: dropped fields, unreadable sheets.
    pub warnings: Vec<String>,
    pub import_duration_ms: u128,
}

impl<R> ImportResult<R> {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!(
                "{} sheet{}",
                self.sheets_read,
                if self.sheets_read == 1 { "" } else { "s" }
            ),
            format!(
                "{} record{}",
                self.rows_read,
                if self.rows_read == 1 { "" } else { "s" }
            ),
        ];
        if self.rows_skipped_blank > 0 {
            parts.push(format!("{} blank rows skipped", self.rows_skipped_blank));
        }
        parts.join(" · ")
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Read records from a spreadsheet file, auto-detecting the format.
///
/// The path is checked up front; a missing file fails before any parsing.
pub fn read_path<R: SheetRecord>(path: &Path) -> Result<ImportResult<R>, String> {
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("failed to open spreadsheet: {}", e))?;
    read_workbook(&mut workbook)
}

/// Read records from an in-memory or streamed spreadsheet.
pub fn read_from<R: SheetRecord, RS: Read + Seek + Clone>(
    reader: RS,
) -> Result<ImportResult<R>, String> {
    let mut workbook = open_workbook_auto_from_rs(reader)
        .map_err(|e| format!("failed to open spreadsheet: {}", e))?;
    read_workbook(&mut workbook)
}

fn read_workbook<R: SheetRecord, RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
) -> Result<ImportResult<R>, String> {
    let start_time = Instant::now();

    let schema = R::schema();
    // Accessor resolution happens here, once per call, never per row
    let selection = schema.select_fields(Direction::Import);

    let mut records: Vec<R> = Vec::new();
    let mut warnings = selection.warnings.clone();
    let mut sheets_read = 0;
    let mut rows_skipped_blank = 0;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in &sheet_names {
        let range = match workbook.worksheet_range(sheet_name) {
            Ok(range) => range,
            Err(e) => {
                warnings.push(format!("skipping sheet '{}': {}", sheet_name, e));
                continue;
            }
        };
        sheets_read += 1;

        let Some((end_row, _)) = range.end() else {
            continue;
        };

        // Row 0 is the title row and is never parsed as data
        for row in 1..=end_row {
            if is_blank_row(&range, row) {
                rows_skipped_blank += 1;
                continue;
            }

            let mut record = R::default();
            for (col, binding) in selection.fields.iter().enumerate() {
                // Absent cell leaves the field unset
                let Some(cell) = range.get_value((row, col as u32)) else {
                    continue;
                };
                let raw = cell_text(cell);
                match coerce(&raw, binding.field_type) {
                    Ok(Some(value)) => binding.set(&mut record, value),
                    Ok(None) => {}
                    Err(e) => {
                        return Err(format!(
                            "sheet '{}' cell {}{} (field {}): {}",
                            sheet_name,
                            col_to_letter(col),
                            row + 1,
                            binding.name,
                            e
                        ));
                    }
                }
            }
            records.push(record);
        }
    }

    Ok(ImportResult {
        rows_read: records.len(),
        records,
        sheets_read,
        rows_skipped_blank,
        warnings,
        import_duration_ms: start_time.elapsed().as_millis(),
    })
}

/// A row is blank when its first cell is absent or empty. Only column 0 is
/// checked: a row with data only in later columns is dropped.
fn is_blank_row(range: &calamine::Range<Data>, row: u32) -> bool {
    match range.get_value((row, 0)) {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Raw text form of a cell, before coercion. Boolean cells render as their
/// TRUE/FALSE literals, numeric cells in plain decimal form (no scientific
/// notation), everything else as its literal text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without a decimal point, while f64 still holds them exactly
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            // Compact form so the length-based date coercion recognizes it
            Some(naive) => naive.format("%Y%m%d%H%M%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Convert column index to Excel column letter (0 = A, 25 = Z, 26 = AA, etc.)
fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
