//! Wheel item derivation
//!
//! Wheel items are recomputed from the catalog and the active filters on
//! every change, never edited in place.

use std::collections::{BTreeSet, HashSet};

use crate::catalog::{BuildEntry, ClassEntry, GameCatalog};
use crate::wheel::WheelItem;

/// User-controlled narrowing of the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub excluded_classes: HashSet<String>,
    pub excluded_builds: HashSet<String>,
    pub difficulty: Option<String>,
    pub playstyle: Option<String>,
}

impl Filters {
    pub fn is_class_excluded(&self, class_id: &str) -> bool {
        self.excluded_classes.contains(class_id)
    }

    pub fn is_build_excluded(&self, build_id: &str) -> bool {
        self.excluded_builds.contains(build_id)
    }

    /// Flip a class exclusion. Returns true when the class is now excluded.
    pub fn toggle_class(&mut self, class_id: &str) -> bool {
        toggle(&mut self.excluded_classes, class_id)
    }

    /// Flip a build exclusion. Returns true when the build is now excluded.
    pub fn toggle_build(&mut self, build_id: &str) -> bool {
        toggle(&mut self.excluded_builds, build_id)
    }

    /// A build passes when it is not excluded and matches both filters
    pub fn build_eligible(&self, build: &BuildEntry) -> bool {
        !self.is_build_excluded(&build.id)
            && field_matches(self.difficulty.as_deref(), build.difficulty.as_deref())
            && field_matches(self.playstyle.as_deref(), build.playstyle.as_deref())
    }

    /// Eligible builds of one class; empty when the class is excluded
    pub fn eligible_builds<'a>(&'a self, class: &'a ClassEntry) -> impl Iterator<Item = &'a BuildEntry> + 'a {
        let excluded = self.is_class_excluded(&class.id);
        class
            .skills
            .iter()
            .filter(move |b| !excluded && self.build_eligible(b))
    }

    pub fn class_eligible(&self, class: &ClassEntry) -> bool {
        self.eligible_builds(class).next().is_some()
    }

    /// Class wheel items: non-excluded classes with at least one eligible
    /// build, in catalog order
    pub fn class_items(&self, game: &GameCatalog) -> Vec<WheelItem> {
        game.classes
            .iter()
            .filter(|c| self.class_eligible(c))
            .map(class_item)
            .collect()
    }

    /// Build wheel items for one class
    pub fn build_items(&self, game: &GameCatalog, class_id: &str) -> Vec<WheelItem> {
        match game.class(class_id) {
            Some(class) => self
                .eligible_builds(class)
                .map(|b| build_item(class, b))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every eligible build across the game, shown before a class is chosen
    pub fn all_build_items(&self, game: &GameCatalog) -> Vec<WheelItem> {
        game.classes
            .iter()
            .flat_map(|c| self.eligible_builds(c).map(move |b| build_item(c, b)))
            .collect()
    }
}

pub fn class_item(class: &ClassEntry) -> WheelItem {
    WheelItem::new(&class.id, &class.name).with_color(class.rgb())
}

pub fn build_item(class: &ClassEntry, build: &BuildEntry) -> WheelItem {
    WheelItem::new(&build.id, &build.name)
        .with_color(class.rgb())
        .with_class(&class.id)
}

/// Distinct difficulty values in the game, sorted
pub fn difficulty_values(game: &GameCatalog) -> Vec<String> {
    distinct(game, |b| b.difficulty.as_deref())
}

/// Distinct playstyle values in the game, sorted
pub fn playstyle_values(game: &GameCatalog) -> Vec<String> {
    distinct(game, |b| b.playstyle.as_deref())
}

/// Step a filter through `None -> values[0] -> ... -> values[n-1] -> None`
pub fn cycle_value(current: Option<&str>, values: &[String]) -> Option<String> {
    let next = match current {
        None => 0,
        Some(value) => match values.iter().position(|v| v.eq_ignore_ascii_case(value)) {
            Some(index) => index + 1,
            None => 0,
        },
    };
    values.get(next).cloned()
}

fn field_matches(filter: Option<&str>, value: Option<&str>) -> bool {
    match (filter, value) {
        (None, _) => true,
        (Some(wanted), Some(value)) => wanted.eq_ignore_ascii_case(value),
        (Some(_), None) => false,
    }
}

fn toggle(set: &mut HashSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

fn distinct(game: &GameCatalog, field: impl Fn(&BuildEntry) -> Option<&str>) -> Vec<String> {
    game.all_builds()
        .filter_map(|(_, b)| field(b))
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(id: &str, difficulty: Option<&str>, playstyle: Option<&str>) -> BuildEntry {
        BuildEntry {
            difficulty: difficulty.map(str::to_string),
            playstyle: playstyle.map(str::to_string),
            ..BuildEntry::new(id, id.to_uppercase())
        }
    }

    fn make_game() -> GameCatalog {
        GameCatalog {
            id: "test".into(),
            name: "Test".into(),
            classes: vec![
                ClassEntry {
                    id: "mage".into(),
                    name: "Mage".into(),
                    color: Some("#0000ff".into()),
                    base_class: None,
                    skills: vec![
                        build("fireball", Some("Easy"), Some("Spell")),
                        build("blink", Some("Hard"), Some("Spell")),
                    ],
                },
                ClassEntry {
                    id: "warrior".into(),
                    name: "Warrior".into(),
                    color: Some("bogus".into()),
                    base_class: None,
                    skills: vec![
                        build("cleave", Some("easy"), Some("Melee")),
                        build("mystery", None, None),
                    ],
                },
                ClassEntry {
                    id: "empty".into(),
                    name: "Empty".into(),
                    color: None,
                    base_class: None,
                    skills: vec![],
                },
            ],
        }
    }

    fn ids(items: &[WheelItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_class_items_skip_classes_without_builds() {
        let game = make_game();
        let filters = Filters::default();
        let classes = filters.class_items(&game);
        assert_eq!(ids(&classes), vec!["mage", "warrior"]);
        assert_eq!(classes[0].color, Some((0, 0, 255)));
        // Invalid colors fall back to the wheel palette
        assert_eq!(classes[1].color, None);
    }

    #[test]
    fn test_exclusions() {
        let game = make_game();
        let mut filters = Filters::default();
        assert!(filters.toggle_class("warrior"));
        assert!(filters.toggle_build("blink"));

        assert_eq!(ids(&filters.class_items(&game)), vec!["mage"]);
        assert_eq!(ids(&filters.all_build_items(&game)), vec!["fireball"]);
        assert!(filters.build_items(&game, "warrior").is_empty());

        assert!(!filters.toggle_class("warrior"));
        assert_eq!(filters.class_items(&game).len(), 2);
    }

    #[test]
    fn test_excluding_every_build_drops_the_class() {
        let game = make_game();
        let mut filters = Filters::default();
        filters.toggle_build("fireball");
        filters.toggle_build("blink");
        assert_eq!(ids(&filters.class_items(&game)), vec!["warrior"]);
    }

    #[test]
    fn test_difficulty_filter_is_case_insensitive() {
        let game = make_game();
        let filters = Filters {
            difficulty: Some("EASY".into()),
            ..Filters::default()
        };
        // "mystery" has no difficulty and does not match
        assert_eq!(ids(&filters.all_build_items(&game)), vec!["fireball", "cleave"]);
    }

    #[test]
    fn test_build_items_carry_class() {
        let game = make_game();
        let builds = Filters::default().build_items(&game, "mage");
        assert!(builds.iter().all(|b| b.class_id.as_deref() == Some("mage")));
        assert!(builds.iter().all(|b| b.color == Some((0, 0, 255))));
        assert!(Filters::default().build_items(&game, "nobody").is_empty());
    }

    #[test]
    fn test_cycle_values() {
        let game = make_game();
        let values = playstyle_values(&game);
        assert_eq!(values, vec!["Melee".to_string(), "Spell".to_string()]);

        let first = cycle_value(None, &values);
        assert_eq!(first.as_deref(), Some("Melee"));
        let second = cycle_value(first.as_deref(), &values);
        assert_eq!(second.as_deref(), Some("Spell"));
        assert_eq!(cycle_value(second.as_deref(), &values), None);
        assert_eq!(cycle_value(Some("gone"), &values).as_deref(), Some("Melee"));
        assert_eq!(cycle_value(None, &[]), None);
    }

    #[test]
    fn test_difficulty_values_distinct() {
        // "Easy" and "easy" are distinct strings in the catalog
        assert_eq!(difficulty_values(&make_game()).len(), 3);
    }
}
