//! Tabular data and delimited-text parsing.

mod parser;
mod table;

pub use parser::{Parser, ParserConfig};
pub use table::{CODE_COLUMN, DataTable, ENTITY_COLUMN, TIME_COLUMN, VALUE_COLUMN, cell_at};
