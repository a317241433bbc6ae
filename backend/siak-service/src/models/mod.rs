pub mod biodata;

pub use biodata::*;
