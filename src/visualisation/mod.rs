pub mod overlay;
pub mod spectrum;
pub mod store;
