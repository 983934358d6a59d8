// Spreadsheet write path: typed records into a single styled xlsx sheet

use std::path::Path;
use std::time::Instant;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use sheetbind_core::{Direction, SheetRecord};

/// Extra width added to a column on top of its widest content, in
/// character units.
const COLUMN_PADDING: f64 = 2.0;

/// Title and data rows share the same height.
const ROW_HEIGHT: f64 = 25.0;

/// Options controlling cosmetic output layout.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Widen each column to its content plus padding.
    pub autosize_columns: bool,
    /// Upper bound on column width, in character units.
    pub max_column_width: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            autosize_columns: true,
            max_column_width: 255.0,
        }
    }
}

/// Result of a render/export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    pub rows_written: usize,
    pub columns_written: usize,
    /// Non-fatal conditions: fields dropped for missing getters.
    pub warnings: Vec<String>,
    pub export_duration_ms: u128,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "{} row{} · {} column{}",
            self.rows_written,
            if self.rows_written == 1 { "" } else { "s" },
            self.columns_written,
            if self.columns_written == 1 { "" } else { "s" }
        )
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn header_format() -> Format {
    Format::new()
        .set_font_name("黑体")
        .set_font_size(14)
        .set_bold()
        .set_background_color(Color::RGB(0xFFFF00))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::Black)
}

fn data_format() -> Format {
    Format::new()
        .set_font_name("simsun")
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::Black)
}

/// Render records into a single-sheet workbook: a styled title row at
/// index 0, one data row per record from index 1. Any failure aborts the
/// render; no partial workbook is handed back.
pub fn render_workbook<R: SheetRecord>(
    records: &[R],
    options: &ExportOptions,
) -> Result<(Workbook, ExportResult), String> {
    let start_time = Instant::now();

    let schema = R::schema();
    let selection = schema.select_fields(Direction::Export);

    let mut result = ExportResult {
        warnings: selection.warnings.clone(),
        ..Default::default()
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Widest content per column, in characters, for the autosize pass
    let mut col_widths: Vec<usize> = Vec::with_capacity(selection.fields.len());

    let header = header_format();
    worksheet
        .set_row_height(0, ROW_HEIGHT)
        .map_err(|e| format!("failed to set title row height: {}", e))?;
    for (col, binding) in selection.fields.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, binding.title, &header)
            .map_err(|e| format!("failed to write title '{}': {}", binding.title, e))?;
        col_widths.push(binding.title.chars().count());
    }

    let data = data_format();
    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .set_row_height(row, ROW_HEIGHT)
            .map_err(|e| format!("failed to set row {} height: {}", row, e))?;
        for (col, binding) in selection.fields.iter().enumerate() {
            // None from the getter renders as an empty cell
            let text = binding.get(record).unwrap_or_default();
            worksheet
                .write_string_with_format(row, col as u16, &text, &data)
                .map_err(|e| format!("failed to write row {} field {}: {}", row, binding.name, e))?;
            if let Some(width) = col_widths.get_mut(col) {
                *width = (*width).max(text.chars().count());
            }
        }
    }

    if options.autosize_columns {
        for (col, chars) in col_widths.iter().enumerate() {
            let width = (*chars as f64 + COLUMN_PADDING).min(options.max_column_width);
            worksheet
                .set_column_width(col as u16, width)
                .map_err(|e| format!("failed to size column {}: {}", col, e))?;
        }
    }

    result.rows_written = records.len();
    result.columns_written = selection.fields.len();
    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok((workbook, result))
}

/// Render records and save them to a file.
pub fn export_path<R: SheetRecord>(
    records: &[R],
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportResult, String> {
    let (mut workbook, result) = render_workbook(records, options)?;
    workbook
        .save(path)
        .map_err(|e| format!("failed to save xlsx file: {}", e))?;
    Ok(result)
}
