pub mod capture;
pub mod completions;
pub mod config;
pub mod status;
