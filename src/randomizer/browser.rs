//! Build browser
//!
//! A sortable, filterable table of every build in the current game. Builds
//! scraped from poe.ninja live on their own off-meta tab.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::{BuildEntry, ClassEntry, GameCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Class,
    Difficulty,
    Popularity,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Name => SortKey::Class,
            SortKey::Class => SortKey::Difficulty,
            SortKey::Difficulty => SortKey::Popularity,
            SortKey::Popularity => SortKey::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Class => "Class",
            SortKey::Difficulty => "Difficulty",
            SortKey::Popularity => "Popularity",
        }
    }
}

/// Source of the builds shown on the off-meta tab
pub const OFF_META_SOURCE: &str = "poe.ninja";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserTab {
    /// Curated guide builds
    #[default]
    Meta,
    OffMeta,
}

impl BrowserTab {
    pub fn label(self) -> &'static str {
        match self {
            BrowserTab::Meta => "Meta",
            BrowserTab::OffMeta => "Off-Meta",
        }
    }
}

/// Sort and filter settings of the browser
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowserState {
    pub sort: SortKey,
    pub descending: bool,
    pub tab: BrowserTab,
    /// Only show builds from this source. Meta tab only.
    pub source: Option<String>,
    /// Only show builds of this class id
    pub class: Option<String>,
    /// Only show builds of this tier. Meta tab only.
    pub tier: Option<String>,
    /// Case-insensitive substring of the build name
    pub query: String,
}

impl BrowserState {
    /// Select `key`, or flip the direction if it is already selected
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort == key {
            self.descending = !self.descending;
        } else {
            self.sort = key;
            self.descending = false;
        }
    }

    /// Step the source filter through the sources present in `game`
    pub fn cycle_source(&mut self, game: &GameCatalog) {
        let sources = sources(game);
        self.source = crate::session::cycle_value(self.source.as_deref(), &sources);
    }

    /// Step the class filter through the classes of `game`
    pub fn cycle_class(&mut self, game: &GameCatalog) {
        let ids: Vec<String> = game.classes.iter().map(|c| c.id.clone()).collect();
        self.class = crate::session::cycle_value(self.class.as_deref(), &ids);
    }

    /// Step the tier filter through the tiers present in `game`
    pub fn cycle_tier(&mut self, game: &GameCatalog) {
        let tiers = tiers(game);
        self.tier = crate::session::cycle_value(self.tier.as_deref(), &tiers);
    }

    /// Flip between the meta and off-meta tabs
    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            BrowserTab::Meta => BrowserTab::OffMeta,
            BrowserTab::OffMeta => BrowserTab::Meta,
        };
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
    }

    fn accepts(&self, class: &ClassEntry, build: &BuildEntry) -> bool {
        let off_meta = is_off_meta(build);
        let on_tab = match self.tab {
            BrowserTab::Meta => !off_meta,
            BrowserTab::OffMeta => off_meta,
        };
        if !on_tab {
            return false;
        }
        if self.class.as_deref().is_some_and(|id| id != class.id) {
            return false;
        }
        if self.tab == BrowserTab::Meta {
            if let Some(tier) = &self.tier {
                if !build.tier.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(tier)) {
                    return false;
                }
            }
            if let Some(source) = &self.source {
                if !build.source.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(source)) {
                    return false;
                }
            }
        }
        self.query.is_empty() || build.name.to_lowercase().contains(&self.query.to_lowercase())
    }

    /// Builds on the current tab passing every filter, in display order
    pub fn rows<'a>(&self, game: &'a GameCatalog) -> Vec<BrowserRow<'a>> {
        let mut rows: Vec<BrowserRow<'a>> = game
            .all_builds()
            .filter(|(class, build)| self.accepts(class, build))
            .map(|(class, build)| BrowserRow { class, build })
            .collect();

        // Stable sort keeps catalog order among equal keys
        rows.sort_by(|a, b| {
            let ordering = compare(self.sort, a, b);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        rows
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BrowserRow<'a> {
    pub class: &'a ClassEntry,
    pub build: &'a BuildEntry,
}

fn is_off_meta(build: &BuildEntry) -> bool {
    build.source.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(OFF_META_SOURCE))
}

/// Whether `game` has anything to show on the off-meta tab
pub fn has_off_meta(game: &GameCatalog) -> bool {
    game.all_builds().any(|(_, b)| is_off_meta(b))
}

/// Distinct meta build sources in the game, sorted
pub fn sources(game: &GameCatalog) -> Vec<String> {
    game.all_builds()
        .filter(|(_, b)| !is_off_meta(b))
        .filter_map(|(_, b)| b.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct build tiers in the game, best first
pub fn tiers(game: &GameCatalog) -> Vec<String> {
    let mut tiers: Vec<String> = game
        .all_builds()
        .filter_map(|(_, b)| b.tier.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    tiers.sort_by_key(|t| tier_rank(t));
    tiers
}

/// S < A < B < C < D, anything else after
fn tier_rank(tier: &str) -> usize {
    ["S", "A", "B", "C", "D"]
        .iter()
        .position(|t| t.eq_ignore_ascii_case(tier))
        .unwrap_or(5)
}

/// Easy < Medium < Hard, anything else after
fn difficulty_rank(difficulty: Option<&str>) -> u8 {
    match difficulty.map(str::to_ascii_lowercase).as_deref() {
        Some("easy") => 0,
        Some("medium") => 1,
        Some("hard") => 2,
        Some(_) => 3,
        None => 4,
    }
}

fn compare(key: SortKey, a: &BrowserRow, b: &BrowserRow) -> Ordering {
    let by_name = || a.build.name.to_lowercase().cmp(&b.build.name.to_lowercase());
    match key {
        SortKey::Name => by_name(),
        SortKey::Class => a
            .class
            .name
            .to_lowercase()
            .cmp(&b.class.name.to_lowercase())
            .then_with(by_name),
        SortKey::Difficulty => difficulty_rank(a.build.difficulty.as_deref())
            .cmp(&difficulty_rank(b.build.difficulty.as_deref()))
            .then_with(by_name),
        // Most popular first; builds without data last
        SortKey::Popularity => match (a.build.popularity, b.build.popularity) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(by_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, tier: &str, difficulty: &str, popularity: Option<f32>, source: &str) -> BuildEntry {
        BuildEntry {
            tier: Some(tier.into()),
            difficulty: Some(difficulty.into()),
            popularity,
            source: Some(source.into()),
            ..BuildEntry::new(id, id)
        }
    }

    fn make_game() -> GameCatalog {
        GameCatalog {
            id: "g".into(),
            name: "G".into(),
            classes: vec![
                ClassEntry {
                    id: "witch".into(),
                    name: "Witch".into(),
                    color: None,
                    base_class: None,
                    skills: vec![
                        entry("Bane", "A", "Medium", Some(2.5), "Maxroll"),
                        entry("arc", "S", "Hard", None, "Mobalytics"),
                        entry("Essence Drain", "B", "Easy", Some(4.0), "poe.ninja"),
                    ],
                },
                ClassEntry {
                    id: "duelist".into(),
                    name: "Duelist".into(),
                    color: None,
                    base_class: None,
                    skills: vec![
                        entry("Cyclone", "S", "Easy", Some(9.0), "Maxroll"),
                        entry("Boneshatter", "A", "Medium", Some(6.0), "POE.NINJA"),
                    ],
                },
            ],
        }
    }

    fn names(state: &BrowserState, game: &GameCatalog) -> Vec<String> {
        state.rows(game).iter().map(|r| r.build.name.clone()).collect()
    }

    #[test]
    fn test_sort_keys() {
        let game = make_game();
        let mut state = BrowserState::default();
        assert_eq!(names(&state, &game), vec!["arc", "Bane", "Cyclone"]);

        state.sort_by(SortKey::Name);
        assert!(state.descending);
        assert_eq!(names(&state, &game), vec!["Cyclone", "Bane", "arc"]);

        state.sort_by(SortKey::Class);
        assert_eq!(names(&state, &game), vec!["Cyclone", "arc", "Bane"]);

        state.sort_by(SortKey::Difficulty);
        assert_eq!(names(&state, &game), vec!["Cyclone", "Bane", "arc"]);

        state.sort_by(SortKey::Popularity);
        assert_eq!(names(&state, &game), vec!["Cyclone", "Bane", "arc"]);
    }

    #[test]
    fn test_source_filter() {
        let game = make_game();
        let mut state = BrowserState::default();
        assert_eq!(sources(&game), vec!["Maxroll".to_string(), "Mobalytics".to_string()]);

        state.cycle_source(&game);
        assert_eq!(names(&state, &game), vec!["Bane", "Cyclone"]);
        state.cycle_source(&game);
        assert_eq!(names(&state, &game), vec!["arc"]);
        state.cycle_source(&game);
        assert_eq!(state.source, None);
        assert_eq!(state.rows(&game).len(), 3);
    }

    #[test]
    fn test_off_meta_tab() {
        let game = make_game();
        let mut state = BrowserState::default();
        assert!(has_off_meta(&game));
        assert!(!names(&state, &game).contains(&"Boneshatter".to_string()));

        state.toggle_tab();
        assert_eq!(state.tab, BrowserTab::OffMeta);
        assert_eq!(names(&state, &game), vec!["Boneshatter", "Essence Drain"]);

        // Tier and source filters only narrow the meta tab
        state.tier = Some("S".into());
        state.source = Some("Maxroll".into());
        assert_eq!(state.rows(&game).len(), 2);

        state.toggle_tab();
        assert_eq!(names(&state, &game), vec!["Cyclone"]);
    }

    #[test]
    fn test_class_and_tier_filters() {
        let game = make_game();
        let mut state = BrowserState::default();
        assert_eq!(tiers(&game), vec!["S".to_string(), "A".to_string(), "B".to_string()]);

        state.cycle_class(&game);
        assert_eq!(state.class.as_deref(), Some("witch"));
        assert_eq!(names(&state, &game), vec!["arc", "Bane"]);

        state.cycle_tier(&game);
        assert_eq!(names(&state, &game), vec!["arc"]);

        state.cycle_class(&game);
        assert_eq!(names(&state, &game), vec!["Cyclone"]);

        state.cycle_class(&game);
        state.cycle_tier(&game);
        assert_eq!(state.tier.as_deref(), Some("A"));
        assert_eq!(names(&state, &game), vec!["Bane"]);
    }

    #[test]
    fn test_name_search_ignores_case() {
        let game = make_game();
        let mut state = BrowserState::default();
        for c in "NE".chars() {
            state.push_query(c);
        }
        assert_eq!(names(&state, &game), vec!["Bane", "Cyclone"]);

        state.toggle_tab();
        assert_eq!(names(&state, &game), vec!["Boneshatter"]);

        state.pop_query();
        state.pop_query();
        assert_eq!(state.rows(&game).len(), 2);
    }

    #[test]
    fn test_sort_key_cycle() {
        assert_eq!(SortKey::Popularity.next(), SortKey::Name);
        assert_eq!(SortKey::Name.next().label(), "Class");
    }
}
