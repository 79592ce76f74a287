// Benchmark reference data: PassMark scores and idle power draw

pub mod loader;

pub use loader::ReferenceDataStore;
