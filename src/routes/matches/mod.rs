mod index;

pub mod detail;

pub use index::*;
