pub mod categories;
pub mod config;
pub mod fusion;
pub mod matcher;
pub mod output;
pub mod profiles;
pub mod results;
pub mod tables;
