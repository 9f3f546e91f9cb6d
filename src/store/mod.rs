pub mod adapter;
pub mod sheet;

pub use adapter::{Record, RowStore, cell_text, number_value};
pub use sheet::Workbook;
