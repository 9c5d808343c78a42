//! Storytree core library.
//!
//! Converts behaviour-driven stories (scenarios, steps, example tables and
//! given stories) into report trees made of suite and test nodes, before any
//! step runs. The entry point is [`report::ReportTreeBuilder`].

pub mod cli;
pub mod fixture;
pub mod hooks;
pub mod keywords;
pub mod label;
pub mod model;
pub mod report;
pub mod runner;
pub mod steps;
