use std::fmt;

/// Port coverage of a single ingress permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRange {
    /// The permission carries no port information (e.g. some ICMP or protocol-wide rules).
    NotApplicable,
    /// Every port (`from == -1`).
    All,
    Single(i32),
    /// Closed interval `[from, to]`.
    Span { from: i32, to: i32 },
}

impl PortRange {
    /// Normalizes the raw `from`/`to` pair of a permission.
    ///
    /// A missing `to` is read as equal to `from`.
    pub fn from_bounds(from: Option<i32>, to: Option<i32>) -> Self {
        match from {
            None => PortRange::NotApplicable,
            Some(-1) => PortRange::All,
            Some(from) => match to.unwrap_or(from) {
                to if to == from => PortRange::Single(from),
                to => PortRange::Span { from, to },
            },
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRange::NotApplicable => f.write_str("n/a"),
            PortRange::All => f.write_str("*"),
            PortRange::Single(port) => write!(f, "{port}"),
            PortRange::Span { from, to } => write!(f, "{from} - {to}"),
        }
    }
}
