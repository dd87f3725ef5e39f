//! Type classifier: picks an input control for a declared column type and
//! parses what the user typed into the value stored in a draft row.
//!
//! Scalar type names go through a fixed lookup table; names that are not in
//! the table fall back to a plain text input and never fail. Lists become a
//! selector over their values, mappings a selector over their labels whose
//! stored value is the numeric code.

use thiserror::Error;

use crate::model::{CellValue, DeclaredType};

/// The input control used to edit a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
    Date,
    DateTime,
    Time,
    ChoiceList,
    ChoiceMapping,
}

impl InputKind {
    /// Value of the HTML `type` attribute for `<input>` controls.
    /// Choice kinds render as `<select>` and report `"select"`.
    pub fn html_type(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Checkbox => "checkbox",
            InputKind::Date => "date",
            InputKind::DateTime => "datetime-local",
            InputKind::Time => "time",
            InputKind::ChoiceList | InputKind::ChoiceMapping => "select",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, InputKind::ChoiceList | InputKind::ChoiceMapping)
    }
}

/// Scalar type names the backend uses, upper-cased.
const SCALAR_KINDS: &[(&str, InputKind)] = &[
    ("VARCHAR", InputKind::Text),
    ("CHAR", InputKind::Text),
    ("TEXT", InputKind::Text),
    ("STRING", InputKind::Text),
    ("STR", InputKind::Text),
    ("INTEGER", InputKind::Number),
    ("INT", InputKind::Number),
    ("BIGINT", InputKind::Number),
    ("SMALLINT", InputKind::Number),
    ("FLOAT", InputKind::Number),
    ("REAL", InputKind::Number),
    ("DOUBLE", InputKind::Number),
    ("NUMERIC", InputKind::Number),
    ("DECIMAL", InputKind::Number),
    ("BOOLEAN", InputKind::Checkbox),
    ("BOOL", InputKind::Checkbox),
    ("DATETIME", InputKind::DateTime),
    ("TIMESTAMP", InputKind::DateTime),
    ("DATE", InputKind::Date),
    ("TIME", InputKind::Time),
];

/// An input value that cannot be stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("`{value}` is not a number")]
    InvalidNumber { value: String },
    #[error("`{value}` is not a yes/no value")]
    InvalidBoolean { value: String },
    #[error("`{value}` is not one of the allowed values")]
    UnknownChoice { value: String },
    /// The control itself could not read what was typed, e.g. letters in a
    /// browser number input.
    #[error("input could not be read")]
    Unreadable,
    #[error("column `{0}` does not exist")]
    UnknownColumn(String),
    #[error("column `{0}` is not editable")]
    NotEditable(String),
}

/// Picks the input control for a column.
///
/// Scalar names are looked up by their upper-cased base name, so `VARCHAR`,
/// `varchar(30)` and the older Python spelling `str` all land on the same
/// control. A list type becomes a selector over the list; a mapping type
/// becomes a selector over its labels that stores codes.
///
/// # Arguments
/// * `dtype` - The column's declared type, as sent in `dtypes`.
///
/// # Returns
/// The control kind. Names missing from the lookup table fall back to
/// [`InputKind::Text`]; classification never fails.
pub fn classify(dtype: &DeclaredType) -> InputKind {
    match dtype {
        DeclaredType::Choices(_) => InputKind::ChoiceList,
        DeclaredType::Mapping(_) => InputKind::ChoiceMapping,
        DeclaredType::Scalar(_) => dtype
            .base_name()
            .and_then(|name| {
                SCALAR_KINDS
                    .iter()
                    .find(|(known, _)| *known == name)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(InputKind::Text),
    }
}

/// Parses raw input for a column of type `dtype`.
///
/// Blank input (empty or whitespace only) yields `Ok(None)`: the column is
/// left out of the draft rather than stored as an empty string. Numbers are
/// parsed as floating point, so `"3.5"` on an `INTEGER` column stays `3.5`;
/// anything that does not parse to a finite number is rejected.
///
/// # Arguments
/// * `dtype` - The column's declared type.
/// * `raw` - The control's text: typed text, the checkbox state as
///   `"true"`/`""`, or the selected option label.
///
/// # Returns
/// `Ok(Some(value))` with the value to store, `Ok(None)` for blank input, or
/// the [`FieldError`] explaining why `raw` cannot be stored.
pub fn parse_input(dtype: &DeclaredType, raw: &str) -> Result<Option<CellValue>, FieldError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value = match classify(dtype) {
        InputKind::Number => CellValue::Number(parse_number(raw)?),
        InputKind::Checkbox => CellValue::Number(parse_bool(raw)?),
        InputKind::ChoiceList => {
            if !dtype.options().iter().any(|o| o == raw) {
                return Err(FieldError::UnknownChoice {
                    value: raw.to_string(),
                });
            }
            CellValue::Text(raw.to_string())
        }
        InputKind::ChoiceMapping => {
            let code = dtype
                .code_for_label(raw)
                .ok_or_else(|| FieldError::UnknownChoice {
                    value: raw.to_string(),
                })?;
            CellValue::Number(code as f64)
        }
        InputKind::Text | InputKind::Date | InputKind::DateTime | InputKind::Time => {
            CellValue::Text(raw.to_string())
        }
    };
    Ok(Some(value))
}

fn parse_number(raw: &str) -> Result<f64, FieldError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldError::InvalidNumber {
            value: raw.to_string(),
        })
}

fn parse_bool(raw: &str) -> Result<f64, FieldError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(1.0),
        "off" | "false" | "0" | "no" => Ok(0.0),
        _ => Err(FieldError::InvalidBoolean {
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(name: &str) -> DeclaredType {
        DeclaredType::scalar(name)
    }

    #[test]
    fn recognized_vocabulary() {
        let expected = [
            ("VARCHAR", "text"),
            ("INTEGER", "number"),
            ("FLOAT", "number"),
            ("BOOLEAN", "checkbox"),
            ("DATETIME", "datetime-local"),
            ("DATE", "date"),
            ("TIME", "time"),
        ];
        for (name, html_type) in expected {
            assert_eq!(classify(&scalar(name)).html_type(), html_type, "{name}");
        }
    }

    #[test]
    fn python_names_and_parameters() {
        assert_eq!(classify(&scalar("int")), InputKind::Number);
        assert_eq!(classify(&scalar("float")), InputKind::Number);
        assert_eq!(classify(&scalar("str")), InputKind::Text);
        assert_eq!(classify(&scalar("bool")), InputKind::Checkbox);
        assert_eq!(classify(&scalar("VARCHAR(30)")), InputKind::Text);
        assert_eq!(classify(&scalar("NUMERIC(10, 2)")), InputKind::Number);
    }

    #[test]
    fn unknown_names_default_to_text() {
        for name in ["JSON", "", "UUID", "geometry"] {
            assert_eq!(classify(&scalar(name)), InputKind::Text);
        }
    }

    #[test]
    fn structural_kinds() {
        let list: DeclaredType = serde_json::from_value(json!(["KRW", "USD"])).unwrap();
        let mapping: DeclaredType = serde_json::from_value(json!({"Wallet": 7})).unwrap();
        assert_eq!(classify(&list), InputKind::ChoiceList);
        assert_eq!(classify(&mapping), InputKind::ChoiceMapping);
        assert!(classify(&mapping).is_choice());
    }

    #[test]
    fn integer_input_keeps_fraction() {
        assert_eq!(
            parse_input(&scalar("INTEGER"), "3.5"),
            Ok(Some(CellValue::Number(3.5)))
        );
        assert_eq!(
            parse_input(&scalar("FLOAT"), " 42 "),
            Ok(Some(CellValue::Number(42.0)))
        );
    }

    #[test]
    fn unparseable_numbers_are_rejected() {
        for raw in ["abc", "NaN", "inf", "1,000"] {
            assert_eq!(
                parse_input(&scalar("INTEGER"), raw),
                Err(FieldError::InvalidNumber {
                    value: raw.to_string()
                })
            );
        }
    }

    #[test]
    fn blank_input_is_omitted() {
        assert_eq!(parse_input(&scalar("VARCHAR"), ""), Ok(None));
        assert_eq!(parse_input(&scalar("INTEGER"), "   "), Ok(None));
    }

    #[test]
    fn text_passes_through_verbatim() {
        assert_eq!(
            parse_input(&scalar("VARCHAR"), " B "),
            Ok(Some(CellValue::Text(" B ".to_string())))
        );
        assert_eq!(
            parse_input(&scalar("DATETIME"), "2024-05-01T10:30"),
            Ok(Some(CellValue::Text("2024-05-01T10:30".to_string())))
        );
    }

    #[test]
    fn choices_are_closed() {
        let list: DeclaredType = serde_json::from_value(json!(["KRW", "USD"])).unwrap();
        assert_eq!(
            parse_input(&list, "USD"),
            Ok(Some(CellValue::Text("USD".to_string())))
        );
        assert!(matches!(
            parse_input(&list, "EUR"),
            Err(FieldError::UnknownChoice { .. })
        ));

        let mapping: DeclaredType =
            serde_json::from_value(json!({"Wallet": 7, "Bank": 9})).unwrap();
        assert_eq!(
            parse_input(&mapping, "Bank"),
            Ok(Some(CellValue::Number(9.0)))
        );
        assert!(parse_input(&mapping, "9").is_err());
    }

    #[test]
    fn checkbox_values() {
        assert_eq!(
            parse_input(&scalar("BOOLEAN"), "on"),
            Ok(Some(CellValue::Number(1.0)))
        );
        assert_eq!(
            parse_input(&scalar("BOOLEAN"), "false"),
            Ok(Some(CellValue::Number(0.0)))
        );
        assert!(parse_input(&scalar("BOOLEAN"), "maybe").is_err());
    }
}
