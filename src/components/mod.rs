pub mod entry_list;
pub mod help;
pub mod preview;
pub mod search;
pub mod status_bar;
