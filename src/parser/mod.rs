// Listing title parsing

pub mod title_parser;

pub use title_parser::{cpu_type, TitleParser};
