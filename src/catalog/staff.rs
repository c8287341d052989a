//! Employee archetypes available for hire

use serde::{Deserialize, Serialize};

use crate::catalog::stations::StationKind;

/// What a hired employee does all day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchetypeRole {
    /// Works one station: fetches tickets for it and runs its jobs
    Station(StationKind),
    /// Carries ready orders to customers
    Runner,
}

/// Hire template; each key can be hired at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeArchetype {
    pub key: String,
    pub name: String,
    pub cost: i64,
    pub role: ArchetypeRole,
    /// Base speed multiplier before leveling
    pub speed: f32,
    /// Base quality multiplier before leveling
    pub quality: f32,
}

/// The five archetypes of the original game
pub fn default_archetypes() -> Vec<EmployeeArchetype> {
    let station = |key: &str, name: &str, cost, kind, speed, quality| EmployeeArchetype {
        key: key.into(),
        name: name.into(),
        cost,
        role: ArchetypeRole::Station(kind),
        speed,
        quality,
    };
    vec![
        station("junior", "Junior", 60, StationKind::Prep, 0.8, 0.9),
        station("cook", "Cook", 120, StationKind::Cook, 1.0, 1.0),
        station("barista", "Barista", 90, StationKind::Drink, 1.1, 1.0),
        EmployeeArchetype {
            key: "runner".into(),
            name: "Runner".into(),
            cost: 80,
            role: ArchetypeRole::Runner,
            speed: 0.9,
            quality: 1.0,
        },
        station("pro", "Pro Chef", 220, StationKind::Cook, 1.35, 1.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archetype_keys_unique() {
        let archetypes = default_archetypes();
        let mut keys: Vec<_> = archetypes.iter().map(|a| a.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), archetypes.len());
    }

    #[test]
    fn test_only_runner_has_runner_role() {
        let runners: Vec<_> = default_archetypes()
            .into_iter()
            .filter(|a| a.role == ArchetypeRole::Runner)
            .collect();
        assert_eq!(runners.len(), 1);
        assert_eq!(runners[0].key, "runner");
    }
}
