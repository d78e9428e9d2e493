//! Catalog data model
//!
//! Games, their classes and each class's builds. Everything beyond `id`
//! and `name` is display payload and has no effect on the wheels.

use serde::{Deserialize, Serialize};

/// All games known to the randomizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub games: Vec<GameCatalog>,
}

impl Catalog {
    pub fn game(&self, id: &str) -> Option<&GameCatalog> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn game_mut(&mut self, id: &str) -> Option<&mut GameCatalog> {
        self.games.iter_mut().find(|g| g.id == id)
    }

    /// Position of a game, used for cycling through games
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.games.iter().position(|g| g.id == id)
    }
}

/// One game and its classes, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCatalog {
    pub id: String,
    pub name: String,
    pub classes: Vec<ClassEntry>,
}

impl GameCatalog {
    pub fn class(&self, id: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn class_mut(&mut self, id: &str) -> Option<&mut ClassEntry> {
        self.classes.iter_mut().find(|c| c.id == id)
    }

    /// Find a build anywhere in the game, with its class
    pub fn find_build(&self, build_id: &str) -> Option<(&ClassEntry, &BuildEntry)> {
        self.classes
            .iter()
            .find_map(|c| c.build(build_id).map(|b| (c, b)))
    }

    pub fn build_count(&self) -> usize {
        self.classes.iter().map(|c| c.skills.len()).sum()
    }

    /// Every build with its class, in catalog order
    pub fn all_builds(&self) -> impl Iterator<Item = (&ClassEntry, &BuildEntry)> {
        self.classes
            .iter()
            .flat_map(|c| c.skills.iter().map(move |b| (c, b)))
    }
}

/// A playable class (or ascendancy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub id: String,
    pub name: String,
    /// `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub base_class: Option<String>,
    #[serde(default)]
    pub skills: Vec<BuildEntry>,
}

impl ClassEntry {
    pub fn build(&self, id: &str) -> Option<&BuildEntry> {
        self.skills.iter().find(|b| b.id == id)
    }

    pub fn build_mut(&mut self, id: &str) -> Option<&mut BuildEntry> {
        self.skills.iter_mut().find(|b| b.id == id)
    }

    /// Class color as RGB, `None` when missing or malformed
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        self.color.as_deref().and_then(parse_hex_color)
    }
}

/// A build (skill setup) belonging to one class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildEntry {
    pub id: String,
    pub name: String,
    pub tier: Option<String>,
    pub difficulty: Option<String>,
    pub playstyle: Option<String>,
    pub damage_type: Option<String>,
    pub tags: Vec<String>,
    pub popularity: Option<f32>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub league: Option<String>,
    pub guide_url: Option<String>,
    pub planner_url: Option<String>,
    /// Core skills of the build
    pub skills: Vec<String>,
    pub key_items: Vec<String>,
    pub keystones: Vec<String>,
    pub top_builds: Vec<TopBuild>,
}

impl BuildEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A highly ranked character running a build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopBuild {
    pub url: String,
    pub name: String,
    pub dps: Option<String>,
    pub life: Option<String>,
    pub es: Option<String>,
    pub items: Vec<String>,
}

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#c41e3a"), Some((196, 30, 58)));
        assert_eq!(parse_hex_color("FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn test_build_lookup() {
        let mut class = ClassEntry {
            id: "necromancer".into(),
            name: "Necromancer".into(),
            color: Some("#1eff00".into()),
            base_class: None,
            skills: vec![BuildEntry::new("blood-surge", "Blood Surge")],
        };
        assert!(class.build("blood-surge").is_some());
        assert!(class.build("bone-spear").is_none());
        class.build_mut("blood-surge").unwrap().tier = Some("S".into());

        let game = GameCatalog { id: "d4".into(), name: "D4".into(), classes: vec![class] };
        let (owner, build) = game.find_build("blood-surge").unwrap();
        assert_eq!(owner.id, "necromancer");
        assert_eq!(build.tier.as_deref(), Some("S"));
        assert_eq!(game.build_count(), 1);
    }

    #[test]
    fn test_camel_case_json() {
        let json = r#"{"id":"rf-chieftain","name":"Righteous Fire","damageType":"Fire","guideUrl":"https://example.com","plannerUrl":null}"#;
        let build: BuildEntry = serde_json::from_str(json).unwrap();
        assert_eq!(build.damage_type.as_deref(), Some("Fire"));
        assert!(build.planner_url.is_none());
        assert!(build.tags.is_empty());
    }
}
