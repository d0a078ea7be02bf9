// CollectLog - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, chrono, glob, walkdir, csv.
// Must NOT depend on: platform, app. Never opens log files directly.

pub mod discovery;
pub mod matcher;
pub mod model;
pub mod pattern;
pub mod report;
pub mod scanner;
pub mod window;
