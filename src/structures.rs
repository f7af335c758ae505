use std::fmt;

/// Round trip statistics of one probe round, kept as fping printed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rtt {
    pub min: String,
    pub avg: String,
    pub max: String,
}

impl Rtt {
    /// fping never reports partial stats, a row only carries rtt when all three are set.
    pub fn is_complete(&self) -> bool {
        !self.min.is_empty() && !self.avg.is_empty() && !self.max.is_empty()
    }
}

/// One summary line of fping for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub target: String,
    pub sent: u32,
    pub recv: u32,
    pub loss: u32,
    pub rtt: Option<Rtt>,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, avg, max) = match &self.rtt {
            Some(rtt) => (rtt.min.as_str(), rtt.avg.as_str(), rtt.max.as_str()),
            None => ("", "", ""),
        };
        write!(
            f,
            "target:{}, sent:{}, recv:{}, loss:{}, min:{}, avg:{}, max:{}",
            self.target, self.sent, self.recv, self.loss, min, avg, max
        )
    }
}
