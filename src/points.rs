//! Points ledger: the in-app currency earned from activities and spent in
//! the shop. Every change carries a human-readable reason so the history
//! screen can show where points came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{self, KvStore};

const KEY: &str = "sage-points";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEvent {
    /// Positive for earnings, negative for purchases
    pub amount: i64,
    pub reason: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsLedger {
    points: u64,
    history: Vec<PointEvent>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger, falling back to an empty one
    pub fn load(store: &dyn KvStore) -> Self {
        store::get(store, KEY).unwrap_or_default()
    }

    pub fn save(&self, store: &mut dyn KvStore) {
        if let Err(e) = store::set(store, KEY, self) {
            log::warn!("failed to persist points ledger: {e}");
        }
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn history(&self) -> &[PointEvent] {
        &self.history
    }

    pub fn add_points(&mut self, amount: u64, reason: &str, now: DateTime<Utc>) {
        self.points += amount;
        self.history.push(PointEvent {
            amount: amount as i64,
            reason: reason.to_string(),
            time: now,
        });
        log::debug!("+{amount} points: {reason}");
    }

    /// Deduct points if the balance covers the price.
    /// Returns false (and changes nothing) when it doesn't.
    pub fn spend_points(&mut self, amount: u64, reason: &str, now: DateTime<Utc>) -> bool {
        if self.points < amount {
            return false;
        }
        self.points -= amount;
        self.history.push(PointEvent {
            amount: -(amount as i64),
            reason: reason.to_string(),
            time: now,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_add_and_spend() {
        let mut ledger = PointsLedger::new();
        ledger.add_points(150, "Mood check-in (Streak: 1)", t0());
        assert!(ledger.spend_points(100, "Bought Clay Pot", t0()));
        assert_eq!(ledger.points(), 50);
        assert_eq!(ledger.history().len(), 2);
        assert_eq!(ledger.history()[1].amount, -100);
    }

    #[test]
    fn test_overspend_is_rejected() {
        let mut ledger = PointsLedger::new();
        ledger.add_points(30, "Breathing session completed", t0());
        assert!(!ledger.spend_points(100, "Bought Mandala Pack", t0()));
        assert_eq!(ledger.points(), 30);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut store = MemoryStore::new();
        let mut ledger = PointsLedger::new();
        ledger.add_points(25, "Journal entry saved", t0());
        ledger.save(&mut store);

        let loaded = PointsLedger::load(&store);
        assert_eq!(loaded.points(), 25);
        assert_eq!(loaded.history()[0].reason, "Journal entry saved");
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        let ledger = PointsLedger::load(&store);
        assert_eq!(ledger.points(), 0);
        assert!(ledger.history().is_empty());
    }
}
