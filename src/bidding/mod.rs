pub mod commands;
pub mod filter_sort;
pub mod model;
pub mod ranking;
