pub mod listing;
pub mod navigation;
