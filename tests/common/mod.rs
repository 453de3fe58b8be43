//! Shared test utilities for engine integration tests

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde_json::json;

use codequest::{
    ChallengeCatalogEntry, Clock, Difficulty, Subtopic, Topic,
};

/// Test clock whose date can be moved from the outside while the engine
/// holds it boxed.
pub struct TestClock {
    today: Rc<Cell<NaiveDate>>,
}

impl TestClock {
    pub fn new(today: NaiveDate) -> (Self, Rc<Cell<NaiveDate>>) {
        let shared = Rc::new(Cell::new(today));
        (
            Self {
                today: Rc::clone(&shared),
            },
            shared,
        )
    }
}

impl Clock for TestClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_ms(&self) -> i64 {
        // Midnight of the test day, milliseconds.
        self.today
            .get()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A small Python course: one topic, three ordered subtopics.
pub fn course() -> Vec<Topic> {
    vec![Topic {
        id: "python-basics".to_string(),
        title: "Python Basics".to_string(),
        subtopics: [
            ("variables", "Variables"),
            ("loops", "Loops"),
            ("functions", "Functions"),
        ]
        .iter()
        .map(|(id, title)| Subtopic {
            id: id.to_string(),
            title: title.to_string(),
        })
        .collect(),
    }]
}

/// A challenge bank with `beginner_count` beginner entries plus one
/// advanced entry.
pub fn challenge_bank(beginner_count: usize) -> Vec<ChallengeCatalogEntry> {
    let mut entries: Vec<ChallengeCatalogEntry> = (0..beginner_count)
        .map(|i| ChallengeCatalogEntry {
            id: format!("py-beg-{i}"),
            difficulty: Difficulty::Beginner,
            payload: json!({ "prompt": format!("beginner question {i}") }),
        })
        .collect();
    entries.push(ChallengeCatalogEntry {
        id: "py-adv-0".to_string(),
        difficulty: Difficulty::Advanced,
        payload: json!({ "prompt": "advanced question" }),
    });
    entries
}
