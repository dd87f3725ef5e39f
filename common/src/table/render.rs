//! Projection of a loaded table into a display grid.
//!
//! [`project`] is a pure function of the table state and its configuration;
//! the frontend turns the resulting [`GridView`] into markup without making
//! any decisions of its own.

use num_format::{Locale, ToFormattedString};

use crate::classify::{classify, InputKind};
use crate::model::{CellValue, DeclaredType, RowId};

use super::{LoadedTable, TableConfig};

/// Locale used for thousands separators.
pub const DISPLAY_LOCALE: Locale = Locale::en;

const CHECK_MARK: &str = "✓";

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    /// Column headers, led by a blank cell for the checkbox column when the
    /// table is selectable.
    pub header: Vec<String>,
    pub rows: Vec<GridRow>,
    /// The new-row line, present when the table is editable.
    pub draft: Option<Vec<DraftCell>>,
    pub can_delete: bool,
    pub can_add: bool,
    /// A submit is in flight.
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub id: RowId,
    /// Checkbox state; `None` when the table is not selectable.
    pub selected: Option<bool>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftCell {
    Blank,
    Input(InputCell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputCell {
    pub column: String,
    pub kind: InputKind,
    /// Current raw text of the control.
    pub value: String,
    /// Choices for selector kinds, in display order.
    pub options: Vec<String>,
    pub error: Option<String>,
}

/// Projects a loaded table into the grid the page shows.
///
/// The projection is pure: it reads the snapshot, the selection and the
/// draft, and performs no I/O, so the whole layout is testable without a
/// browser.
///
/// # Arguments
/// * `table` - The loaded table with its selection, draft and field errors.
/// * `config` - Decides whether the checkbox column and the new-row line
///   appear, and which draft cells get an input.
///
/// # Returns
/// A [`GridView`] with one header cell per column (plus a blank one for the
/// checkbox column), one [`GridRow`] per data row with display text, and the
/// new-row line when the table is editable.
pub fn project(table: &LoadedTable, config: &TableConfig) -> GridView {
    let snapshot = table.snapshot();
    let columns = snapshot.columns();

    let mut header = Vec::with_capacity(columns.len() + 1);
    if config.selectable {
        header.push(String::new());
    }
    header.extend(columns.iter().map(|c| c.name.clone()));

    let rows = snapshot
        .rows()
        .iter()
        .map(|row| GridRow {
            id: row.id(),
            selected: config
                .selectable
                .then(|| table.selection().contains(row.id())),
            cells: columns
                .iter()
                .map(|column| {
                    row.get(&column.name)
                        .map(|value| format_cell(value, &column.dtype))
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect();

    let draft = config.editable.then(|| {
        let mut cells = Vec::with_capacity(columns.len() + 1);
        if config.selectable {
            cells.push(DraftCell::Blank);
        }
        cells.extend(columns.iter().map(|column| {
            if !config.is_editable(&column.name) {
                return DraftCell::Blank;
            }
            DraftCell::Input(InputCell {
                column: column.name.clone(),
                kind: classify(&column.dtype),
                value: table.raw_input(&column.name).unwrap_or_default().to_string(),
                options: column.dtype.options(),
                error: table.field_error(&column.name).map(|e| e.to_string()),
            })
        }));
        cells
    });

    GridView {
        header,
        rows,
        draft,
        can_delete: config.selectable && table.can_delete(),
        can_add: config.editable && table.can_add(),
        busy: table.pending().is_some(),
    }
}

/// Display text for a stored value.
///
/// Mapping codes show as `[code] label`, checkbox columns as a check mark,
/// other numbers with thousands separators.
pub fn format_cell(value: &CellValue, dtype: &DeclaredType) -> String {
    match (classify(dtype), value) {
        (InputKind::ChoiceMapping, CellValue::Number(code)) if code.fract() == 0.0 => {
            let code = *code as i64;
            match dtype.label_for_code(code) {
                Some(label) => format!("[{code}] {label}"),
                None => format_number(code as f64),
            }
        }
        (InputKind::Checkbox, CellValue::Number(n)) => {
            if *n != 0.0 {
                CHECK_MARK.to_string()
            } else {
                String::new()
            }
        }
        (_, CellValue::Number(n)) => format_number(*n),
        (_, CellValue::Text(s)) => s.clone(),
    }
}

/// `1234567.25` becomes `1,234,567.25`; the fraction is kept as stored.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() || n.abs() >= 9.0e15 {
        return n.to_string();
    }
    let sign = if n < 0.0 { "-" } else { "" };
    let magnitude = n.abs();
    let whole = (magnitude.trunc() as i64).to_formatted_string(&DISPLAY_LOCALE);
    let text = magnitude.to_string();
    match text.split_once('.') {
        Some((_, fraction)) => format!("{sign}{whole}.{fraction}"),
        None => format!("{sign}{whole}"),
    }
}
