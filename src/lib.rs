//! Fraud-risk scoring for SMS, chat messages, and call transcripts.
//!
//! `pipeline::analyze` is the main entry point: it runs the keyword rule
//! detector, the URL scanner, and the manipulation-tactic classifier,
//! applies the recipient profile, and fuses everything with an optional
//! external semantic verdict into a single 0-100 score.

pub mod detectors;
pub mod pipeline;
pub mod shared;
