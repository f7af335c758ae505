//! Parser for the per target summary lines fping prints on stderr in loop mode.
//!
//! A round looks like:
//!
//! ```text
//! [12:00:06]
//! host1 : xmt/rcv/%loss = 10/10/0%, min/avg/max = 1.1/2.2/3.3
//! host2 : xmt/rcv/%loss = 10/0/100%
//! ```
//!
//! Fields are located by position, so any change of fping's output layout
//! surfaces as a [`ParseError`] instead of an out of range index.

use crate::structures::{Measurement, Rtt};
use thiserror::Error;
use tracing::{info, warn};

const TARGET_FIELD: usize = 0;
const COUNTERS_FIELD: usize = 4;
const RTT_FIELD: usize = 7;
const COUNTERS_ONLY_FIELDS: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expect at least 5 fields, got {0}")]
    TooFewFields(usize),
    #[error("expect rtt stats at field 7, got {0} fields")]
    MissingRtt(usize),
    #[error("malformed xmt/rcv/%loss: {0:?}")]
    MalformedCounters(String),
    #[error("malformed min/avg/max: {0:?}")]
    MalformedRtt(String),
}

/// Parse one stderr line.
///
/// `Ok(None)` means the line carries no measurement: the bare timestamp fping
/// prints between rounds, or a blank line.
pub fn parse_line(line: &str) -> Result<Option<Measurement>, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() <= 1 {
        return Ok(None);
    }
    if fields.len() < COUNTERS_ONLY_FIELDS {
        return Err(ParseError::TooFewFields(fields.len()));
    }

    let raw = fields[COUNTERS_FIELD];
    let counters = split_slash(raw);
    if counters.len() < 3 {
        return Err(ParseError::MalformedCounters(raw.to_string()));
    }
    let loss = counters[2].trim_end_matches(|c: char| c == '%' || c == ',');

    let rtt = if fields.len() > COUNTERS_ONLY_FIELDS {
        let raw = fields
            .get(RTT_FIELD)
            .ok_or(ParseError::MissingRtt(fields.len()))?;
        let times = split_slash(raw);
        if times.len() < 3 {
            return Err(ParseError::MalformedRtt(raw.to_string()));
        }
        Some(Rtt {
            min: times[0].to_string(),
            avg: times[1].to_string(),
            max: times[2].to_string(),
        })
    } else {
        None
    };

    let measurement = Measurement {
        target: fields[TARGET_FIELD].to_string(),
        sent: count_or_zero(counters[0], "sent"),
        recv: count_or_zero(counters[1], "recv"),
        loss: count_or_zero(loss, "loss"),
        rtt,
    };
    info!("{}", measurement);

    Ok(Some(measurement))
}

/// Empty pieces are dropped, `a//b` yields two items.
fn split_slash(s: &str) -> Vec<&str> {
    s.split('/').filter(|p| !p.is_empty()).collect()
}

fn count_or_zero(raw: &str, name: &str) -> u32 {
    raw.parse().unwrap_or_else(|e| {
        warn!("Parse {} from {:?} fail, use 0, err:{}", name, raw, e);
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rtt(min: &str, avg: &str, max: &str) -> Option<Rtt> {
        Some(Rtt {
            min: min.to_string(),
            avg: avg.to_string(),
            max: max.to_string(),
        })
    }

    #[test]
    fn timestamp_header_is_ignored() {
        assert_eq!(parse_line("[12:00:06]"), Ok(None));
        assert_eq!(parse_line("  [12:00:06]  "), Ok(None));
        assert_eq!(parse_line(""), Ok(None));
    }

    #[test]
    fn line_with_rtt() {
        let m = parse_line("host1 : xmt/rcv/%loss = 10/10/0%, min/avg/max = 1.1/2.2/3.3")
            .unwrap()
            .unwrap();
        assert_eq!(
            m,
            Measurement {
                target: "host1".to_string(),
                sent: 10,
                recv: 10,
                loss: 0,
                rtt: rtt("1.1", "2.2", "3.3"),
            }
        );
    }

    #[test]
    fn rtt_is_assigned_by_position() {
        let m = parse_line("h : xmt/rcv/%loss = 3/3/0%, min/avg/max = 9.9/0.1/5.5")
            .unwrap()
            .unwrap();
        assert_eq!(m.rtt, rtt("9.9", "0.1", "5.5"));
    }

    #[test]
    fn line_without_rtt() {
        let m = parse_line("10.0.0.1 : xmt/rcv/%loss = 10/0/100%")
            .unwrap()
            .unwrap();
        assert_eq!(m.target, "10.0.0.1");
        assert_eq!((m.sent, m.recv, m.loss), (10, 0, 100));
        assert_eq!(m.rtt, None);
    }

    #[test]
    fn partial_loss() {
        let m = parse_line("b.example : xmt/rcv/%loss = 10/7/30%, min/avg/max = 0.51/0.62/0.99")
            .unwrap()
            .unwrap();
        assert_eq!((m.sent, m.recv, m.loss), (10, 7, 30));
        assert_eq!(m.rtt, rtt("0.51", "0.62", "0.99"));
    }

    #[test]
    fn bad_numbers_become_zero() {
        let m = parse_line("h : xmt/rcv/%loss = x/10/abc%")
            .unwrap()
            .unwrap();
        assert_eq!((m.sent, m.recv, m.loss), (0, 10, 0));

        let m = parse_line("h : xmt/rcv/%loss = -1/10/0%").unwrap().unwrap();
        assert_eq!(m.sent, 0);
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            parse_line("h : xmt/rcv/%loss"),
            Err(ParseError::TooFewFields(3))
        );
        assert_eq!(parse_line("h :"), Err(ParseError::TooFewFields(2)));
    }

    #[test]
    fn malformed_counters() {
        assert_eq!(
            parse_line("h : xmt/rcv/%loss = 10/10"),
            Err(ParseError::MalformedCounters("10/10".to_string()))
        );
    }

    #[test]
    fn missing_rtt_field() {
        assert_eq!(
            parse_line("h : xmt/rcv/%loss = 10/10/0%, min/avg/max"),
            Err(ParseError::MissingRtt(6))
        );
    }

    #[test]
    fn malformed_rtt() {
        assert_eq!(
            parse_line("h : xmt/rcv/%loss = 10/10/0%, min/avg/max = 1.1/2.2"),
            Err(ParseError::MalformedRtt("1.1/2.2".to_string()))
        );
    }

    #[test]
    fn split_drops_empty_pieces() {
        assert_eq!(split_slash("1//2/3"), vec!["1", "2", "3"]);
        assert_eq!(split_slash("/"), Vec::<&str>::new());
    }
}
