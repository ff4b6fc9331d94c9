//! Traversal direction of a network segment.

/// Which way a segment may be travelled, relative to its coordinate order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Only from the first coordinate towards the last.
    Forward,
    /// Only from the last coordinate towards the first.
    Backward,
    /// Either way (two-way street).
    #[default]
    Both,
}

impl Direction {
    /// `true` if travel in coordinate order is allowed.
    #[inline]
    pub fn allows_forward(self) -> bool {
        matches!(self, Direction::Forward | Direction::Both)
    }

    /// `true` if travel against coordinate order is allowed.
    #[inline]
    pub fn allows_backward(self) -> bool {
        matches!(self, Direction::Backward | Direction::Both)
    }

    /// Parse a direction attribute value.
    ///
    /// Accepts the spelled-out names plus the common one-way tag values
    /// (`yes`/`1`/`true` → forward, `-1`/`reverse` → backward,
    /// `no`/`0`/`false` → both).  Matching is case-insensitive.  Returns
    /// `None` for anything else so the caller can fall back to its default.
    pub fn parse(value: &str) -> Option<Direction> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" | "yes" | "1" | "true" | "oneway" => Some(Direction::Forward),
            "backward" | "reverse" | "-1" => Some(Direction::Backward),
            "both" | "no" | "0" | "false" | "" => Some(Direction::Both),
            _ => None,
        }
    }

    /// Human-readable label, useful for CSV column values and log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward  => "forward",
            Direction::Backward => "backward",
            Direction::Both     => "both",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
