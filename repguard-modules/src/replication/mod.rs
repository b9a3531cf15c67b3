pub mod memory;
pub mod static_table;
