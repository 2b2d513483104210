pub mod bounding_box;
pub mod config;
pub mod error;
pub mod filter;
pub mod select;
