//! Declared column types, as reported by the backend in a table's `dtypes`.
//!
//! The backend emits three shapes for a column type:
//!
//! - a plain type name such as `"VARCHAR"`, `"INTEGER"` or `"VARCHAR(30)"`
//!   (older revisions send Python names like `"int"` or `"str"`);
//! - a list of strings for a SQL enum column (`["KRW", "USD"]`);
//! - an object mapping a display label to a numeric code for a foreign key
//!   column (`{"Household": 1, "Travel": 2}`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The declared type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredType {
    /// A scalar type name, kept verbatim as the backend sent it.
    Scalar(String),
    /// A closed list of allowed string values.
    Choices(Vec<String>),
    /// A closed set of labels, each standing for a numeric code.
    Mapping(BTreeMap<String, i64>),
}

impl DeclaredType {
    /// Builds a scalar type from its name.
    pub fn scalar(name: impl Into<String>) -> Self {
        DeclaredType::Scalar(name.into())
    }

    /// The upper-cased type name without parameters: `"varchar(30)"` gives
    /// `"VARCHAR"`. `None` for the structural kinds.
    pub fn base_name(&self) -> Option<String> {
        match self {
            DeclaredType::Scalar(name) => {
                let base = name.split('(').next().unwrap_or(name).trim();
                Some(base.to_ascii_uppercase())
            }
            _ => None,
        }
    }

    /// Label shown for a stored code of a mapping column.
    pub fn label_for_code(&self, code: i64) -> Option<&str> {
        match self {
            DeclaredType::Mapping(mapping) => mapping
                .iter()
                .find(|(_, value)| **value == code)
                .map(|(label, _)| label.as_str()),
            _ => None,
        }
    }

    /// Code stored for a label of a mapping column.
    pub fn code_for_label(&self, label: &str) -> Option<i64> {
        match self {
            DeclaredType::Mapping(mapping) => mapping.get(label).copied(),
            _ => None,
        }
    }

    /// The options a closed-choice selector offers, in display order.
    pub fn options(&self) -> Vec<String> {
        match self {
            DeclaredType::Scalar(_) => Vec::new(),
            DeclaredType::Choices(choices) => choices.clone(),
            DeclaredType::Mapping(mapping) => mapping.keys().cloned().collect(),
        }
    }

    /// Whether stored values of this column are numbers.
    pub fn stores_numbers(&self) -> bool {
        match self {
            DeclaredType::Mapping(_) => true,
            DeclaredType::Choices(_) => false,
            DeclaredType::Scalar(_) => matches!(
                crate::classify::classify(self),
                crate::classify::InputKind::Number
            ),
        }
    }
}
