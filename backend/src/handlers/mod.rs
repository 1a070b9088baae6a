//! HTTP request handlers

mod dashboard;
mod document;
mod health;
mod inspection;
mod shop;

pub use dashboard::*;
pub use document::*;
pub use health::*;
pub use inspection::*;
pub use shop::*;
