// Browser download surface: response metadata plus the error payload contract
//
// Actual HTTP streaming belongs to the caller's server stack; this module
// models only the pieces of the response the export path touches, so any
// stack can adapt it behind `ResponseSink`.

use std::io::Write;

use serde::Serialize;
use sheetbind_core::SheetRecord;

use crate::writer::{render_workbook, ExportOptions, ExportResult};

const XLSX_CONTENT_TYPE: &str = "application/binary;charset=UTF-8";
const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Fixed-shape payload written when a download fails after the response
/// was already committed to binary output.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub data: String,
    pub message: String,
}

impl ErrorPayload {
    fn failed(detail: &str) -> Self {
        Self {
            code: "-1".to_string(),
            data: detail.to_string(),
            message: "操作失败".to_string(),
        }
    }
}

/// Minimal view of an HTTP response as the download path uses it.
pub trait ResponseSink {
    fn set_content_type(&mut self, value: &str);
    fn set_header(&mut self, name: &str, value: &str);
    /// Discard everything buffered so far, headers included.
    fn reset(&mut self);
    fn body(&mut self) -> &mut dyn Write;
}

/// Render `records` and stream them into `sink` as an xlsx download named
/// `<file_name>.xlsx` (percent-encoded for non-ASCII names).
///
/// On failure the response is reset and replaced with the JSON error
/// payload; the error is also returned so callers can react to it instead
/// of having it swallowed.
pub fn write_download<R: SheetRecord>(
    sink: &mut dyn ResponseSink,
    file_name: &str,
    records: &[R],
    options: &ExportOptions,
) -> Result<ExportResult, String> {
    sink.set_content_type(XLSX_CONTENT_TYPE);
    let encoded = urlencoding::encode(file_name);
    sink.set_header(
        "Content-Disposition",
        &format!("attachment;filename={}.xlsx", encoded),
    );

    match stream_workbook(sink, records, options) {
        Ok(result) => Ok(result),
        Err(e) => {
            sink.reset();
            sink.set_content_type(JSON_CONTENT_TYPE);
            let payload = ErrorPayload::failed(&e);
            match serde_json::to_string(&payload) {
                Ok(json) => {
                    if let Err(write_err) = writeln!(sink.body(), "{}", json) {
                        eprintln!("[export] failed to write error payload: {}", write_err);
                    }
                }
                Err(json_err) => {
                    eprintln!("[export] failed to serialize error payload: {}", json_err);
                }
            }
            Err(e)
        }
    }
}

fn stream_workbook<R: SheetRecord>(
    sink: &mut dyn ResponseSink,
    records: &[R],
    options: &ExportOptions,
) -> Result<ExportResult, String> {
    let (mut workbook, result) = render_workbook(records, options)?;
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| format!("failed to serialize workbook: {}", e))?;
    sink.body()
        .write_all(&bytes)
        .map_err(|e| format!("failed to stream workbook: {}", e))?;
    Ok(result)
}
