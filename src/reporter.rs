mod postgres;

pub use postgres::PgReporter;

use crate::structures::Measurement;
use tracing::warn;

pub const INSERT_WITH_RTT: &str = "INSERT INTO measurement_icmp (time, target, sent, recv, loss, min, avg, max) \
     VALUES (now(), $1, $2, $3, $4, $5, $6, $7)";

pub const INSERT_LOSS_ONLY: &str =
    "INSERT INTO measurement_icmp (time, target, sent, recv, loss) VALUES (now(), $1, $2, $3, $4)";

/// Destination of parsed measurements. An error is fatal to the collector.
#[allow(async_fn_in_trait)]
pub trait Sink {
    async fn write(&mut self, measurement: &Measurement) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
}

/// Bind values of one `measurement_icmp` row.
#[derive(Debug, Clone, PartialEq)]
pub enum Row<'a> {
    LossOnly {
        target: &'a str,
        sent: i64,
        recv: i64,
        loss: i64,
    },
    WithRtt {
        target: &'a str,
        sent: i64,
        recv: i64,
        loss: i64,
        min: f64,
        avg: f64,
        max: f64,
    },
}

impl<'a> Row<'a> {
    pub fn from_measurement(m: &'a Measurement) -> Self {
        let (target, sent, recv, loss) = (
            m.target.as_str(),
            i64::from(m.sent),
            i64::from(m.recv),
            i64::from(m.loss),
        );

        match &m.rtt {
            Some(rtt) if rtt.is_complete() => Row::WithRtt {
                target,
                sent,
                recv,
                loss,
                min: millis_or_zero(&rtt.min, "min"),
                avg: millis_or_zero(&rtt.avg, "avg"),
                max: millis_or_zero(&rtt.max, "max"),
            },
            _ => Row::LossOnly {
                target,
                sent,
                recv,
                loss,
            },
        }
    }

    /// Bind values for `$1..$n` of [`Row::sql`], in column order.
    pub fn values(&self) -> Vec<Value<'a>> {
        match *self {
            Row::LossOnly {
                target,
                sent,
                recv,
                loss,
            } => vec![
                Value::Text(target),
                Value::Int(sent),
                Value::Int(recv),
                Value::Int(loss),
            ],
            Row::WithRtt {
                target,
                sent,
                recv,
                loss,
                min,
                avg,
                max,
            } => vec![
                Value::Text(target),
                Value::Int(sent),
                Value::Int(recv),
                Value::Int(loss),
                Value::Float(min),
                Value::Float(avg),
                Value::Float(max),
            ],
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Row::LossOnly { .. } => INSERT_LOSS_ONLY,
            Row::WithRtt { .. } => INSERT_WITH_RTT,
        }
    }
}

fn millis_or_zero(raw: &str, name: &str) -> f64 {
    raw.parse().unwrap_or_else(|e| {
        warn!("Parse {} rtt from {:?} fail, use 0, err:{}", name, raw, e);
        0.0
    })
}
