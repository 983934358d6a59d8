// Record schemas, field bindings, and cell value coercion

pub mod coerce;
pub mod dates;
pub mod field;
pub mod schema;

pub use field::{FieldType, FieldValue};
pub use schema::{setters, Direction, FieldBinding, RecordSchema, SchemaBuilder, Selection, SheetRecord};
