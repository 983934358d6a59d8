// Shared record fixture for reader/writer/respond tests

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sheetbind_core::{setters, FieldBinding, FieldType, RecordSchema, SheetRecord};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub age: Option<i32>,
    pub balance: Option<Decimal>,
    pub score: Option<f64>,
    pub active: Option<bool>,
    pub joined: Option<NaiveDateTime>,
    /// Never rendered: export_field is off.
    pub internal_note: String,
    /// Never populated on read: import_field is off.
    pub row_digest: String,
}

impl SheetRecord for Member {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::builder("Member")
            .field(
                FieldBinding::new("name", "姓名", FieldType::Text)
                    .with_getter(|m: &Member| Some(m.name.clone()))
                    .with_setter(setters::text(|m: &mut Member, v| m.name = v)),
            )
            .field(
                FieldBinding::new("age", "年龄", FieldType::Int32)
                    .with_getter(|m: &Member| m.age.map(|v| v.to_string()))
                    .with_setter(setters::int32(|m: &mut Member, v| m.age = Some(v))),
            )
            .field(
                FieldBinding::new("balance", "余额", FieldType::Decimal)
                    .with_getter(|m: &Member| m.balance.map(|v| v.to_string()))
                    .with_setter(setters::decimal(|m: &mut Member, v| m.balance = Some(v))),
            )
            .field(
                FieldBinding::new("score", "评分", FieldType::Float64)
                    .with_getter(|m: &Member| m.score.map(|v| v.to_string()))
                    .with_setter(setters::float64(|m: &mut Member, v| m.score = Some(v))),
            )
            .field(
                FieldBinding::new("active", "在籍", FieldType::Bool)
                    .with_getter(|m: &Member| m.active.map(|v| v.to_string()))
                    .with_setter(setters::boolean(|m: &mut Member, v| m.active = Some(v))),
            )
            .field(
                FieldBinding::new("joined", "入会时间", FieldType::Date)
                    .with_getter(|m: &Member| {
                        m.joined.map(|v| v.format("%Y%m%d%H%M%S").to_string())
                    })
                    .with_setter(setters::date(|m: &mut Member, v| m.joined = Some(v))),
            )
            .field(
                FieldBinding::new("internal_note", "内部备注", FieldType::Text)
                    .export_field(false)
                    .with_getter(|m: &Member| Some(m.internal_note.clone()))
                    .with_setter(setters::text(|m: &mut Member, v| m.internal_note = v)),
            )
            .field(
                FieldBinding::new("row_digest", "摘要", FieldType::Text)
                    .import_field(false)
                    .with_getter(|m: &Member| Some(m.row_digest.clone()))
                    .with_setter(setters::text(|m: &mut Member, v| m.row_digest = v)),
            )
            .build()
    }
}

pub fn sample_members() -> Vec<Member> {
    use chrono::NaiveDate;
    vec![
        Member {
            name: "张伟".to_string(),
            age: Some(34),
            balance: Some(Decimal::new(123450, 2)), // 1234.50
            score: Some(98.5),
            active: Some(true),
            joined: NaiveDate::from_ymd_opt(2023, 6, 15).map(|d| d.and_hms_opt(10, 30, 0)).flatten(),
            internal_note: "vip".to_string(),
            row_digest: "d41d8cd9".to_string(),
        },
        Member {
            name: "Li Na".to_string(),
            age: None,
            balance: None,
            score: Some(-0.125),
            active: Some(false),
            joined: None,
            internal_note: String::new(),
            row_digest: String::new(),
        },
    ]
}
