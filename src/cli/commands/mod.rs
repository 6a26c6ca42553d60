pub mod check;
pub mod config;
pub mod report;
pub mod serve;
