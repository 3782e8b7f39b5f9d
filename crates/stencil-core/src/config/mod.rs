//! Configuration defaults sourced from a pre-existing manifest

pub mod store;

pub use store::load_defaults;
