mod fping_detector;
mod fping_output;

pub use fping_detector::{FpingDetector, FpingProcess, PROBE_FLAGS};
pub use fping_output::{parse_line, ParseError};
