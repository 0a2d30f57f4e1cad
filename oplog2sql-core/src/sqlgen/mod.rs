//! SQL statement generation.
//!
//! Pure string builders over name-sorted column sets; all catalog
//! decisions stay in the translator.

pub mod ddl;
pub mod dml;
mod types;
mod values;

pub use types::sql_type;
pub use values::format_value;

/// SQL literal for an absent or unset value.
pub const NULL_LITERAL: &str = "NULL";
