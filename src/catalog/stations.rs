//! Preparation station types

use serde::{Deserialize, Serialize};

/// Kind of preparation station. A recipe step names the kind it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKind {
    Prep,
    Cook,
    Drink,
}

impl StationKind {
    pub const ALL: [StationKind; 3] = [StationKind::Prep, StationKind::Cook, StationKind::Drink];

    /// Stable string key used by commands, TOML and logs
    pub fn key(&self) -> &'static str {
        match self {
            StationKind::Prep => "prep",
            StationKind::Cook => "cook",
            StationKind::Drink => "drink",
        }
    }

    /// Parse a key case-insensitively
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "prep" => Some(StationKind::Prep),
            "cook" => Some(StationKind::Cook),
            "drink" => Some(StationKind::Drink),
            _ => None,
        }
    }
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Static description of a station on the line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationType {
    pub kind: StationKind,
    pub label: String,
    /// Slots before any capacity upgrade
    pub base_capacity: usize,
}

impl StationType {
    pub fn new(kind: StationKind, label: &str) -> Self {
        Self {
            kind,
            label: label.into(),
            base_capacity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_key_round_trip() {
        for kind in StationKind::ALL {
            assert_eq!(StationKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(StationKind::from_key("COOK"), Some(StationKind::Cook));
        assert_eq!(StationKind::from_key("grill"), None);
    }
}
