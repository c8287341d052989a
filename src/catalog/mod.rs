//! Static game data: menu, station types and employee archetypes
//!
//! The catalog is read by every other component and never mutated while a
//! simulation runs. Defaults mirror the original game; a catalog can also be
//! loaded from TOML.

pub mod menu;
pub mod staff;
pub mod stations;

pub use menu::{MenuItem, RecipeStep};
pub use staff::{ArchetypeRole, EmployeeArchetype};
pub use stations::{StationKind, StationType};

use serde::Deserialize;
use thiserror::Error;

/// Catalog of all static game data
#[derive(Debug, Clone)]
pub struct Catalog {
    menu: Vec<MenuItem>,
    stations: Vec<StationType>,
    archetypes: Vec<EmployeeArchetype>,
}

impl Catalog {
    /// Catalog of the original game
    pub fn with_defaults() -> Self {
        Self {
            menu: menu::default_menu(),
            stations: vec![
                StationType::new(StationKind::Prep, "Prep"),
                StationType::new(StationKind::Cook, "Cook"),
                StationType::new(StationKind::Drink, "Drink"),
            ],
            archetypes: staff::default_archetypes(),
        }
    }

    /// Build a catalog from parts, checking cross references
    pub fn from_parts(
        menu: Vec<MenuItem>,
        stations: Vec<StationType>,
        archetypes: Vec<EmployeeArchetype>,
    ) -> Result<Self, CatalogLoadError> {
        if menu.is_empty() {
            return Err(CatalogLoadError::EmptyMenu);
        }
        for station in &stations {
            if stations.iter().filter(|s| s.kind == station.kind).count() > 1 {
                return Err(CatalogLoadError::DuplicateStation(station.kind.key().into()));
            }
        }
        for item in &menu {
            if item.recipe.is_empty() {
                return Err(CatalogLoadError::EmptyRecipe(item.name.clone()));
            }
            for step in &item.recipe {
                if !stations.iter().any(|s| s.kind == step.station) {
                    return Err(CatalogLoadError::MissingStation(step.station.key().into()));
                }
                if step.time_ms.is_nan() || step.time_ms <= 0.0 {
                    return Err(CatalogLoadError::InvalidStepTime {
                        item: item.name.clone(),
                        time_ms: step.time_ms,
                    });
                }
            }
        }
        for archetype in &archetypes {
            if let ArchetypeRole::Station(kind) = archetype.role {
                if !stations.iter().any(|s| s.kind == kind) {
                    return Err(CatalogLoadError::MissingStation(kind.key().into()));
                }
            }
            let stats_ok = archetype.speed > 0.0 && archetype.quality >= 0.0;
            if !stats_ok {
                return Err(CatalogLoadError::InvalidStats(archetype.key.clone()));
            }
            if archetypes.iter().filter(|a| a.key == archetype.key).count() > 1 {
                return Err(CatalogLoadError::DuplicateArchetype(archetype.key.clone()));
            }
        }
        Ok(Self {
            menu,
            stations,
            archetypes,
        })
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn menu_item(&self, index: usize) -> Option<&MenuItem> {
        self.menu.get(index)
    }

    /// Index of a menu item by name (case-insensitive)
    pub fn menu_index(&self, name: &str) -> Option<usize> {
        self.menu
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn stations(&self) -> &[StationType] {
        &self.stations
    }

    pub fn archetypes(&self) -> &[EmployeeArchetype] {
        &self.archetypes
    }

    pub fn archetype(&self, key: &str) -> Option<&EmployeeArchetype> {
        self.archetypes.iter().find(|a| a.key == key)
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, CatalogLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from TOML text
    pub fn parse_toml(content: &str) -> Result<Self, CatalogLoadError> {
        let data: TomlCatalog =
            toml::from_str(content).map_err(|e| CatalogLoadError::ParseError(e.to_string()))?;

        let stations = data
            .stations
            .into_iter()
            .map(TomlStation::into_station_type)
            .collect::<Result<Vec<_>, _>>()?;
        let menu = data
            .menu
            .into_iter()
            .map(TomlMenuItem::into_menu_item)
            .collect::<Result<Vec<_>, _>>()?;
        let archetypes = data
            .staff
            .into_iter()
            .map(TomlArchetype::into_archetype)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parts(menu, stations, archetypes)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Error type for catalog loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogLoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid station type: {0}")]
    InvalidStation(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Station referenced but not defined: {0}")]
    MissingStation(String),
    #[error("Menu item has no recipe: {0}")]
    EmptyRecipe(String),
    #[error("Duplicate archetype key: {0}")]
    DuplicateArchetype(String),
    #[error("Station defined twice: {0}")]
    DuplicateStation(String),
    #[error("Step of {item} must take positive time, got {time_ms}ms")]
    InvalidStepTime { item: String, time_ms: f64 },
    #[error("Archetype {0} needs positive speed and non-negative quality")]
    InvalidStats(String),
    #[error("Menu is empty")]
    EmptyMenu,
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    stations: Vec<TomlStation>,
    menu: Vec<TomlMenuItem>,
    #[serde(default)]
    staff: Vec<TomlArchetype>,
}

#[derive(Debug, Deserialize)]
struct TomlStation {
    key: String,
    label: String,
    #[serde(default = "default_base_capacity")]
    base_capacity: usize,
}

fn default_base_capacity() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct TomlMenuItem {
    name: String,
    price: i64,
    recipe: Vec<TomlStep>,
}

#[derive(Debug, Deserialize)]
struct TomlStep {
    station: String,
    time_ms: f64,
}

#[derive(Debug, Deserialize)]
struct TomlArchetype {
    key: String,
    name: String,
    cost: i64,
    role: String,
    #[serde(default)]
    station: Option<String>,
    speed: f32,
    #[serde(default = "default_quality")]
    quality: f32,
}

fn default_quality() -> f32 {
    1.0
}

fn parse_station(key: &str) -> Result<StationKind, CatalogLoadError> {
    StationKind::from_key(key).ok_or_else(|| CatalogLoadError::InvalidStation(key.into()))
}

impl TomlStation {
    fn into_station_type(self) -> Result<StationType, CatalogLoadError> {
        Ok(StationType {
            kind: parse_station(&self.key)?,
            label: self.label,
            base_capacity: self.base_capacity.max(1),
        })
    }
}

impl TomlMenuItem {
    fn into_menu_item(self) -> Result<MenuItem, CatalogLoadError> {
        let recipe = self
            .recipe
            .into_iter()
            .map(|s| Ok(RecipeStep::new(parse_station(&s.station)?, s.time_ms)))
            .collect::<Result<Vec<_>, CatalogLoadError>>()?;
        Ok(MenuItem {
            name: self.name,
            price: self.price,
            recipe,
        })
    }
}

impl TomlArchetype {
    fn into_archetype(self) -> Result<EmployeeArchetype, CatalogLoadError> {
        let role = match self.role.to_lowercase().as_str() {
            "runner" => ArchetypeRole::Runner,
            "station" => {
                let key = self
                    .station
                    .ok_or_else(|| CatalogLoadError::InvalidRole("station role needs a station".into()))?;
                ArchetypeRole::Station(parse_station(&key)?)
            }
            _ => return Err(CatalogLoadError::InvalidRole(self.role)),
        };
        Ok(EmployeeArchetype {
            key: self.key,
            name: self.name,
            cost: self.cost,
            role,
            speed: self.speed,
            quality: self.quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_defaults() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.stations().len(), 3);
        assert_eq!(catalog.menu().len(), 8);
        assert_eq!(catalog.archetypes().len(), 5);

        let junior = catalog.archetype("junior").expect("junior exists");
        assert_eq!(junior.cost, 60);
        assert_eq!(junior.role, ArchetypeRole::Station(StationKind::Prep));
        assert!(catalog.archetype("wizard").is_none());
    }

    #[test]
    fn test_menu_index_case_insensitive() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.menu_index("soup"), Some(0));
        assert_eq!(catalog.menu_index("BURGER"), Some(1));
        assert_eq!(catalog.menu_index("pizza"), None);
    }

    #[test]
    fn test_catalog_toml_parsing() {
        let toml_content = r#"
[[stations]]
key = "cook"
label = "Grill"
base_capacity = 2

[[menu]]
name = "Steak"
price = 20
recipe = [ { station = "cook", time_ms = 5000.0 } ]

[[staff]]
key = "griller"
name = "Griller"
cost = 100
role = "station"
station = "cook"
speed = 1.2
"#;

        let catalog = Catalog::parse_toml(toml_content).expect("Failed to parse TOML");
        assert_eq!(catalog.stations()[0].label, "Grill");
        assert_eq!(catalog.stations()[0].base_capacity, 2);
        assert_eq!(catalog.menu()[0].recipe[0].station, StationKind::Cook);
        let griller = catalog.archetype("griller").unwrap();
        assert_eq!(griller.role, ArchetypeRole::Station(StationKind::Cook));
        assert_eq!(griller.quality, 1.0, "quality defaults to 1.0");
    }

    #[test]
    fn test_catalog_toml_missing_station() {
        let toml_content = r#"
[[stations]]
key = "prep"
label = "Prep"

[[menu]]
name = "Coffee"
price = 4
recipe = [ { station = "drink", time_ms = 1500.0 } ]
"#;

        let result = Catalog::parse_toml(toml_content);
        assert_eq!(
            result.unwrap_err(),
            CatalogLoadError::MissingStation("drink".into())
        );
    }

    #[test]
    fn test_catalog_toml_invalid_station() {
        let toml_content = r#"
[[stations]]
key = "smoker"
label = "Smoker"

[[menu]]
name = "Ribs"
price = 15
recipe = [ { station = "smoker", time_ms = 9000.0 } ]
"#;

        match Catalog::parse_toml(toml_content).unwrap_err() {
            CatalogLoadError::InvalidStation(s) => assert_eq!(s, "smoker"),
            other => panic!("Expected InvalidStation, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_toml_invalid_role() {
        let toml_content = r#"
[[stations]]
key = "prep"
label = "Prep"

[[menu]]
name = "Salad"
price = 7
recipe = [ { station = "prep", time_ms = 2200.0 } ]

[[staff]]
key = "host"
name = "Host"
cost = 50
role = "greeter"
speed = 1.0
"#;

        match Catalog::parse_toml(toml_content).unwrap_err() {
            CatalogLoadError::InvalidRole(r) => assert_eq!(r, "greeter"),
            other => panic!("Expected InvalidRole, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_recipe_rejected() {
        let result = Catalog::from_parts(
            vec![MenuItem::new("Air", 1, vec![])],
            vec![StationType::new(StationKind::Prep, "Prep")],
            vec![],
        );
        assert_eq!(result.unwrap_err(), CatalogLoadError::EmptyRecipe("Air".into()));
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let result = Catalog::from_parts(
            vec![MenuItem::new("Tea", 3, vec![RecipeStep::new(StationKind::Drink, 1000.0)])],
            vec![
                StationType::new(StationKind::Drink, "Bar"),
                StationType::new(StationKind::Drink, "Second bar"),
            ],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            CatalogLoadError::DuplicateStation("drink".into())
        );
    }

    #[test]
    fn test_non_positive_step_time_rejected() {
        let toml_content = r#"
[[stations]]
key = "prep"
label = "Prep"

[[menu]]
name = "Instant"
price = 2
recipe = [ { station = "prep", time_ms = 0.0 } ]
"#;

        match Catalog::parse_toml(toml_content).unwrap_err() {
            CatalogLoadError::InvalidStepTime { item, .. } => assert_eq!(item, "Instant"),
            other => panic!("Expected InvalidStepTime, got {:?}", other),
        }

        let negative = Catalog::from_parts(
            vec![MenuItem::new("Backwards", 2, vec![RecipeStep::new(StationKind::Prep, -50.0)])],
            vec![StationType::new(StationKind::Prep, "Prep")],
            vec![],
        );
        assert!(matches!(
            negative,
            Err(CatalogLoadError::InvalidStepTime { .. })
        ));
    }

    #[test]
    fn test_non_positive_archetype_speed_rejected() {
        let toml_content = r#"
[[stations]]
key = "cook"
label = "Cook"

[[menu]]
name = "Steak"
price = 20
recipe = [ { station = "cook", time_ms = 5000.0 } ]

[[staff]]
key = "statue"
name = "Statue"
cost = 10
role = "station"
station = "cook"
speed = 0.0
"#;

        assert_eq!(
            Catalog::parse_toml(toml_content).unwrap_err(),
            CatalogLoadError::InvalidStats("statue".into())
        );
    }
}
