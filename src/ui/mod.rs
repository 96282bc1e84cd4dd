//! HTML page rendering

mod pages;

pub use pages::*;
