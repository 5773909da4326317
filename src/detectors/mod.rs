pub mod rules;
pub mod tactics;
pub mod urls;
