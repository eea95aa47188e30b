use std::fmt;
use std::str::FromStr;

/// Numeric identifier of a snapper snapshot directory. Always positive;
/// gaps in the sequence are normal after snapshot deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub fn new(value: u64) -> Self {
        SnapshotId(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl FromStr for SnapshotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid snapshot id {:?}; expected a positive integer", s))?;
        if value == 0 {
            return Err("snapshot id must be a positive integer".to_string());
        }
        Ok(SnapshotId(value))
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    pub dry_run: bool,
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_id() {
        let id: SnapshotId = "42".parse().expect("parse");
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!("0".parse::<SnapshotId>().is_err());
        assert!("-3".parse::<SnapshotId>().is_err());
        assert!("abc".parse::<SnapshotId>().is_err());
        assert!("".parse::<SnapshotId>().is_err());
    }
}
