// Record schemas: per-field bindings with registration-time accessors
//
// The source of truth for "which column is which field" is the declaration
// order of bindings in a record's schema. Accessors are registered once at
// schema build time and resolved once per (schema, direction) selection,
// never per row.

use crate::field::{FieldType, FieldValue};

/// Mapping direction: reading rows into records, or rendering records out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Import,
    Export,
}

pub type Getter<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;
pub type Setter<R> = Box<dyn Fn(&mut R, FieldValue) + Send + Sync>;

/// One mapped field of a record type.
pub struct FieldBinding<R> {
    pub name: &'static str,
    /// Export column header; the empty string is permitted.
    pub title: &'static str,
    pub field_type: FieldType,
    pub import_field: bool,
    pub export_field: bool,
    /// Reserved ordering hint; declaration order is what counts today.
    pub order: i32,
    getter: Option<Getter<R>>,
    setter: Option<Setter<R>>,
}

impl<R> FieldBinding<R> {
    pub fn new(name: &'static str, title: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            title,
            field_type,
            import_field: true,
            export_field: true,
            order: 0,
            getter: None,
            setter: None,
        }
    }

    pub fn import_field(mut self, flag: bool) -> Self {
        self.import_field = flag;
        self
    }

    pub fn export_field(mut self, flag: bool) -> Self {
        self.export_field = flag;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_getter(mut self, get: impl Fn(&R) -> Option<String> + Send + Sync + 'static) -> Self {
        self.getter = Some(Box::new(get));
        self
    }

    pub fn with_setter(mut self, set: Setter<R>) -> Self {
        self.setter = Some(set);
        self
    }

    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Invoke the getter; `None` renders as an empty cell.
    pub fn get(&self, record: &R) -> Option<String> {
        self.getter.as_ref().and_then(|get| get(record))
    }

    /// Apply a coerced value through the setter, if one is bound.
    pub fn set(&self, record: &mut R, value: FieldValue) {
        if let Some(set) = &self.setter {
            set(record, value);
        }
    }
}

/// Typed setter constructors. Each wraps a plain assignment closure and
/// unwraps the matching `FieldValue` variant; a mismatched variant is
/// ignored rather than panicking (the coercer always produces the variant
/// the binding's field type asked for).
pub mod setters {
    use super::Setter;
    use crate::field::FieldValue;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    pub fn text<R>(set: impl Fn(&mut R, String) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Text(v) = value {
                set(record, v)
            }
        })
    }

    pub fn int32<R>(set: impl Fn(&mut R, i32) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Int32(v) = value {
                set(record, v)
            }
        })
    }

    pub fn int64<R>(set: impl Fn(&mut R, i64) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Int64(v) = value {
                set(record, v)
            }
        })
    }

    pub fn float32<R>(set: impl Fn(&mut R, f32) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Float32(v) = value {
                set(record, v)
            }
        })
    }

    pub fn float64<R>(set: impl Fn(&mut R, f64) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Float64(v) = value {
                set(record, v)
            }
        })
    }

    pub fn decimal<R>(set: impl Fn(&mut R, Decimal) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Decimal(v) = value {
                set(record, v)
            }
        })
    }

    pub fn boolean<R>(set: impl Fn(&mut R, bool) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Bool(v) = value {
                set(record, v)
            }
        })
    }

    pub fn date<R>(set: impl Fn(&mut R, NaiveDateTime) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Date(v) = value {
                set(record, v)
            }
        })
    }

    pub fn timestamp<R>(set: impl Fn(&mut R, NaiveDateTime) + Send + Sync + 'static) -> Setter<R> {
        Box::new(move |record, value| {
            if let FieldValue::Timestamp(v) = value {
                set(record, v)
            }
        })
    }
}

/// A record type that maps to spreadsheet rows.
///
/// `Default` is the record factory: the read path builds one default
/// instance per non-blank row and populates it field by field.
pub trait SheetRecord: Default {
    fn schema() -> RecordSchema<Self>
    where
        Self: Sized;
}

/// Declaration-ordered field bindings for one record type.
///
/// Built fresh per read/write call via `SheetRecord::schema()`; there is no
/// cross-call cache. (Caching by type identity would be a behavior-neutral
/// optimization.)
pub struct RecordSchema<R> {
    type_name: &'static str,
    fields: Vec<FieldBinding<R>>,
}

impl<R> RecordSchema<R> {
    pub fn builder(type_name: &'static str) -> SchemaBuilder<R> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldBinding<R>] {
        &self.fields
    }

    /// Eligible bindings for one direction, in declaration order. Column
    /// position in the spreadsheet is implicitly the position in this list.
    ///
    /// A field whose direction flag is on but whose accessor is missing is
    /// excluded with a warning naming the type and field; it never fails
    /// the operation.
    pub fn select_fields(&self, direction: Direction) -> Selection<'_, R> {
        let mut fields = Vec::new();
        let mut warnings = Vec::new();
        for binding in &self.fields {
            match direction {
                Direction::Import => {
                    if !binding.import_field {
                        continue;
                    }
                    if !binding.has_setter() {
                        warnings.push(format!(
                            "{}.{}: no setter bound, field cannot be imported",
                            self.type_name, binding.name
                        ));
                        continue;
                    }
                }
                Direction::Export => {
                    if !binding.export_field {
                        continue;
                    }
                    if !binding.has_getter() {
                        warnings.push(format!(
                            "{}.{}: no getter bound, field cannot be exported",
                            self.type_name, binding.name
                        ));
                        continue;
                    }
                }
            }
            fields.push(binding);
        }
        Selection { fields, warnings }
    }
}

/// Result of eligibility selection: the fields that participate, plus
/// warnings for fields that were silently dropped.
pub struct Selection<'a, R> {
    pub fields: Vec<&'a FieldBinding<R>>,
    pub warnings: Vec<String>,
}

pub struct SchemaBuilder<R> {
    type_name: &'static str,
    fields: Vec<FieldBinding<R>>,
}

impl<R> SchemaBuilder<R> {
    pub fn field(mut self, binding: FieldBinding<R>) -> Self {
        self.fields.push(binding);
        self
    }

    pub fn build(self) -> RecordSchema<R> {
        RecordSchema {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}
