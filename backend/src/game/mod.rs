// Daily puzzle generation

pub mod selector;

pub use selector::{SelectError, Selector};
