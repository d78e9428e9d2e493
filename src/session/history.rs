//! Recent spin results

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub game_id: String,
    pub class_id: String,
    pub class_name: String,
    pub build_id: String,
    pub build_name: String,
    pub class_locked: bool,
    pub build_locked: bool,
}

impl SpinRecord {
    pub fn label(&self) -> String {
        format!("{} / {}", self.class_name, self.build_name)
    }
}

/// Bounded list, most recent first
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<SpinRecord>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: SpinRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&SpinRecord> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpinRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> SpinRecord {
        SpinRecord {
            game_id: "g".into(),
            class_id: format!("c{}", n),
            class_name: format!("Class {}", n),
            build_id: format!("b{}", n),
            build_name: format!("Build {}", n),
            class_locked: false,
            build_locked: false,
        }
    }

    #[test]
    fn test_most_recent_first_and_capped() {
        let mut history = History::new(3);
        for n in 0..5 {
            history.push(record(n));
        }
        assert_eq!(history.len(), 3);
        let ids: Vec<_> = history.iter().map(|r| r.build_id.as_str()).collect();
        assert_eq!(ids, vec!["b4", "b3", "b2"]);
        assert_eq!(history.latest().map(|r| r.label()), Some("Class 4 / Build 4".to_string()));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = History::new(0);
        history.push(record(1));
        history.push(record(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 1);
    }
}
