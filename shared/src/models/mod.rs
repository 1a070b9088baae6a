//! Domain models for the Spaza Compliance Portal

mod activity;
mod document;
mod inspection;
mod questionnaire;
mod shop;

pub use activity::*;
pub use document::*;
pub use inspection::*;
pub use questionnaire::*;
pub use shop::*;
