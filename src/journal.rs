//! Journal: dated free-text entries with a mood tag and a day streak.
//! The first entry of a day earns 25 points and advances the streak;
//! further entries that day still save but earn nothing extra.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::badges::{Activity, BadgeBook};
use crate::points::PointsLedger;
use crate::store::{self, KvStore};

const ENTRIES_KEY: &str = "mindgarden-journal-entries";
const STREAK_KEY: &str = "mindgarden-journal-streak";
const LAST_DATE_KEY: &str = "mindgarden-journal-last-date";

const ENTRY_POINTS: u64 = 25;
const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub label: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub mood: Mood,
    pub preview: String,
    pub full_text: String,
    pub word_count: usize,
}

/// Entries newest-first plus the streak counters
pub struct Journal {
    entries: Vec<JournalEntry>,
    streak: u32,
    last_entry: Option<DateTime<Utc>>,
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn preview_of(text: &str) -> String {
    if text.chars().count() > PREVIEW_LEN {
        let cut: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.num_days_from_ce() == b.num_days_from_ce()
}

impl Journal {
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            entries: store::get(store, ENTRIES_KEY).unwrap_or_default(),
            streak: store::get(store, STREAK_KEY).unwrap_or(0),
            last_entry: store::get(store, LAST_DATE_KEY),
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) {
        let last_date = match self.last_entry {
            Some(last) => store::set(store, LAST_DATE_KEY, &last),
            None => store.remove(LAST_DATE_KEY),
        };
        let writes = [
            store::set(store, ENTRIES_KEY, &self.entries),
            store::set(store, STREAK_KEY, &self.streak),
            last_date,
        ];
        for result in writes {
            if let Err(e) = result {
                log::warn!("failed to persist journal: {e}");
            }
        }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Save a new entry. Empty (whitespace-only) text is rejected.
    /// Returns the entry id on success.
    pub fn add_entry(
        &mut self,
        text: &str,
        mood: Mood,
        ledger: &mut PointsLedger,
        badges: &mut BadgeBook,
        now: DateTime<Utc>,
    ) -> Option<Uuid> {
        if text.trim().is_empty() {
            return None;
        }

        let entry = JournalEntry {
            id: Uuid::new_v4(),
            time: now,
            mood,
            preview: preview_of(text),
            full_text: text.to_string(),
            word_count: word_count(text),
        };
        let id = entry.id;
        self.entries.insert(0, entry);
        badges.update_progress(Activity::Journal);

        let first_today = !self.last_entry.is_some_and(|last| same_day(last, now));
        if first_today {
            ledger.add_points(ENTRY_POINTS, "Journal entry saved", now);
            let continues = self
                .last_entry
                .is_some_and(|last| same_day(last + Duration::days(1), now));
            self.streak = if continues { self.streak + 1 } else { 1 };
            self.last_entry = Some(now);
        }
        Some(id)
    }

    /// Rewrite an entry's text, refreshing preview and word count
    pub fn edit_entry(&mut self, id: Uuid, text: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.full_text = text.to_string();
                entry.preview = preview_of(text);
                entry.word_count = word_count(text);
                true
            },
            None => false,
        }
    }

    pub fn delete_entry(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}
