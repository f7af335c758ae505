pub mod collector;
pub mod conf;
pub mod detectors;
pub mod reporter;
pub mod structures;
