// Where raw listings come from

pub mod file;
pub mod traits;

pub use file::JsonFileSource;
pub use traits::ListingSource;
