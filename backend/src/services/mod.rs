//! Business logic services for the Spaza Compliance Portal

pub mod activity;
pub mod dashboard;
pub mod document;
pub mod inspection;
pub mod shop;

pub use activity::ActivityService;
pub use dashboard::DashboardService;
pub use document::DocumentService;
pub use inspection::InspectionService;
pub use shop::ShopService;
