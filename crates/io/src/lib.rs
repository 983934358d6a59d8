// Spreadsheet import/export for typed records
//
// Import: xlsx/xls auto-detected via calamine, positional columns mapped
//         through a record schema's import-eligible bindings.
// Export: single-sheet styled xlsx via rust_xlsxwriter, plus a browser
//         download surface with the JSON error payload contract.

pub mod reader;
pub mod respond;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_records;
