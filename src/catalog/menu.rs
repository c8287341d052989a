//! Menu items and their multi-step recipes

use serde::{Deserialize, Serialize};

use crate::catalog::stations::StationKind;
use crate::core::types::Millis;

/// One preparation step: which station, and for how long at speed 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub station: StationKind,
    pub time_ms: Millis,
}

impl RecipeStep {
    pub fn new(station: StationKind, time_ms: Millis) -> Self {
        Self { station, time_ms }
    }
}

/// A dish or drink customers can order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Base price in whole dollars
    pub price: i64,
    /// Ordered preparation steps; never empty in a loaded catalog
    pub recipe: Vec<RecipeStep>,
}

impl MenuItem {
    pub fn new(name: &str, price: i64, recipe: Vec<RecipeStep>) -> Self {
        Self {
            name: name.into(),
            price,
            recipe,
        }
    }

    /// Total station time at speed 1.0
    pub fn total_time_ms(&self) -> Millis {
        self.recipe.iter().map(|s| s.time_ms).sum()
    }

    /// Whether any step needs the given station
    pub fn uses(&self, station: StationKind) -> bool {
        self.recipe.iter().any(|s| s.station == station)
    }
}

/// The default menu of the original game, including the later drink list
pub fn default_menu() -> Vec<MenuItem> {
    use StationKind::*;
    vec![
        MenuItem::new("Soup", 8, vec![RecipeStep::new(Cook, 3_500.0)]),
        MenuItem::new(
            "Burger",
            12,
            vec![RecipeStep::new(Prep, 2_500.0), RecipeStep::new(Cook, 4_000.0)],
        ),
        MenuItem::new("Salad", 7, vec![RecipeStep::new(Prep, 2_200.0)]),
        MenuItem::new(
            "Pasta",
            11,
            vec![RecipeStep::new(Prep, 2_500.0), RecipeStep::new(Cook, 3_500.0)],
        ),
        MenuItem::new("Coffee", 4, vec![RecipeStep::new(Drink, 1_500.0)]),
        MenuItem::new("Coke", 3, vec![RecipeStep::new(Drink, 1_200.0)]),
        MenuItem::new("Fanta Orange", 3, vec![RecipeStep::new(Drink, 1_200.0)]),
        MenuItem::new("Gatorade Blue", 3, vec![RecipeStep::new(Drink, 1_200.0)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_recipes_not_empty() {
        for item in default_menu() {
            assert!(!item.recipe.is_empty(), "{} has no recipe", item.name);
            assert!(item.price > 0);
        }
    }

    #[test]
    fn test_burger_total_time() {
        let menu = default_menu();
        let burger = menu.iter().find(|m| m.name == "Burger").unwrap();
        assert_eq!(burger.total_time_ms(), 6_500.0);
        assert!(burger.uses(StationKind::Prep));
        assert!(burger.uses(StationKind::Cook));
        assert!(!burger.uses(StationKind::Drink));
    }
}
