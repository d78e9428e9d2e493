//! Wheel items
//!
//! A wheel item is one sector of a wheel. Items are rebuilt from the catalog
//! whenever filters change; they are never mutated in place.

use serde::{Deserialize, Serialize};

/// One selectable sector on a wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelItem {
    /// Stable id within the wheel's current item list
    pub id: String,
    /// Label text
    pub name: String,
    /// Explicit sector color. Falls back to an evenly spaced hue when absent.
    pub color: Option<(u8, u8, u8)>,
    /// Owning class for build items
    pub class_id: Option<String>,
}

impl WheelItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            class_id: None,
        }
    }

    pub fn with_color(mut self, color: Option<(u8, u8, u8)>) -> Self {
        self.color = color;
        self
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    /// Label shortened for display, ending in "…" when cut
    pub fn short_label(&self, max_len: usize) -> String {
        truncate_label(&self.name, max_len)
    }
}

/// Truncate a label to at most `max_len` characters
pub fn truncate_label(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len <= 1 {
        "…".to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Necromancer", 12), "Necromancer");
        assert_eq!(truncate_label("Blood Lance Necromancer", 12), "Blood Lance…");
        assert_eq!(truncate_label("Barbarian", 1), "…");
    }

    #[test]
    fn test_builder() {
        let item = WheelItem::new("hota", "Hammer of the Ancients")
            .with_color(Some((196, 30, 58)))
            .with_class("barbarian");
        assert_eq!(item.class_id.as_deref(), Some("barbarian"));
        assert_eq!(item.color, Some((196, 30, 58)));
    }
}
