pub mod dtype;
pub mod table;

pub use dtype::DeclaredType;
pub use table::{CellValue, ColumnDescriptor, Row, RowId, ShapeError, TableSnapshot, ID_FIELD};
