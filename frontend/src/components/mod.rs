pub mod account;
pub mod data_table;
pub mod page_frame;
