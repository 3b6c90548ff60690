//! Mood garden: emotion seeds planted in pots that grow over real time.
//! Boosters shorten the remaining grow time; the shop converts points into
//! inventory. All growth math takes an injected `now` so it stays
//! deterministic under test.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::badges::{Activity, BadgeBook};
use crate::points::PointsLedger;
use crate::store::{self, KvStore};

const INVENTORY_KEY: &str = "moodGardenInventory";
const PLANTS_KEY: &str = "moodGardenPlants";

const MATURITY_HOURS: i64 = 24;
const SUNLIGHT_BOOST_HOURS: i64 = 2;
const BASIC_FERTILIZER_HOURS: i64 = 4;
const ADVANCED_FERTILIZER_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedKind {
    Hopeful,
    Grateful,
    Joyful,
    Resilient,
    Peaceful,
}

impl SeedKind {
    pub const ALL: [SeedKind; 5] = [
        SeedKind::Hopeful,
        SeedKind::Grateful,
        SeedKind::Joyful,
        SeedKind::Resilient,
        SeedKind::Peaceful,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FertilizerGrade {
    Basic,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Seed,
    Sprout,
    Mature,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCounts {
    pub hopeful: u32,
    pub grateful: u32,
    pub joyful: u32,
    pub resilient: u32,
    pub peaceful: u32,
}

impl SeedCounts {
    fn slot(&mut self, kind: SeedKind) -> &mut u32 {
        match kind {
            SeedKind::Hopeful => &mut self.hopeful,
            SeedKind::Grateful => &mut self.grateful,
            SeedKind::Joyful => &mut self.joyful,
            SeedKind::Resilient => &mut self.resilient,
            SeedKind::Peaceful => &mut self.peaceful,
        }
    }

    pub fn count(&self, kind: SeedKind) -> u32 {
        match kind {
            SeedKind::Hopeful => self.hopeful,
            SeedKind::Grateful => self.grateful,
            SeedKind::Joyful => self.joyful,
            SeedKind::Resilient => self.resilient,
            SeedKind::Peaceful => self.peaceful,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerCounts {
    pub basic: u32,
    pub advanced: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub pots: u32,
    pub seeds: SeedCounts,
    pub water: u32,
    pub sunlight: u32,
    pub fertilizer: FertilizerCounts,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            pots: 3,
            seeds: SeedCounts::default(),
            water: 0,
            sunlight: 0,
            fertilizer: FertilizerCounts::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    pub kind: SeedKind,
    pub stage: Stage,
    pub planted_at: DateTime<Utc>,
    pub slot: u32,
    pub maturity_hours: i64,
}

/// What a shop purchase puts in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    /// +1 pot
    Pot,
    /// +3 seeds of the kind
    Seeds(SeedKind),
    /// +5 water
    Water,
    /// +3 sunlight
    Sunlight,
    /// +1 fertilizer of the grade
    Fertilizer(FertilizerGrade),
}

pub struct Garden {
    inventory: Inventory,
    plants: Vec<Plant>,
}

impl Garden {
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            inventory: store::get(store, INVENTORY_KEY).unwrap_or_default(),
            plants: store::get(store, PLANTS_KEY).unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) {
        let writes = [
            store::set(store, INVENTORY_KEY, &self.inventory),
            store::set(store, PLANTS_KEY, &self.plants),
        ];
        for result in writes {
            if let Err(e) = result {
                log::warn!("failed to persist garden: {e}");
            }
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Buy a shop item, deducting its price from the ledger first.
    /// Returns false without changes when points don't cover the price.
    pub fn purchase(
        &mut self,
        item: ShopItem,
        price: u64,
        name: &str,
        ledger: &mut PointsLedger,
        now: DateTime<Utc>,
    ) -> bool {
        if !ledger.spend_points(price, &format!("Bought {name}"), now) {
            return false;
        }
        match item {
            ShopItem::Pot => self.inventory.pots += 1,
            ShopItem::Seeds(kind) => *self.inventory.seeds.slot(kind) += 3,
            ShopItem::Water => self.inventory.water += 5,
            ShopItem::Sunlight => self.inventory.sunlight += 3,
            ShopItem::Fertilizer(FertilizerGrade::Basic) => self.inventory.fertilizer.basic += 1,
            ShopItem::Fertilizer(FertilizerGrade::Advanced) => self.inventory.fertilizer.advanced += 1,
        }
        true
    }

    /// Plant a seed in a pot slot. Needs a seed of that kind in the
    /// inventory and a free slot below the pot count.
    pub fn plant_seed(&mut self, kind: SeedKind, slot: u32, now: DateTime<Utc>) -> Option<Uuid> {
        if slot >= self.inventory.pots || self.plants.iter().any(|p| p.slot == slot) {
            return None;
        }
        let seeds = self.inventory.seeds.slot(kind);
        if *seeds == 0 {
            return None;
        }
        *seeds -= 1;

        let plant = Plant {
            id: Uuid::new_v4(),
            kind,
            stage: Stage::Seed,
            planted_at: now,
            slot,
            maturity_hours: MATURITY_HOURS,
        };
        let id = plant.id;
        self.plants.push(plant);
        Some(id)
    }

    /// Advance every plant's stage from elapsed time. Sprout at half the
    /// maturity window, mature at the full window; badge progress is
    /// recorded once per plant as it matures.
    pub fn tick_growth(&mut self, badges: &mut BadgeBook, now: DateTime<Utc>) {
        for plant in &mut self.plants {
            if plant.stage == Stage::Mature {
                continue;
            }
            let elapsed = now - plant.planted_at;
            let maturity = Duration::hours(plant.maturity_hours);
            if elapsed >= maturity {
                plant.stage = Stage::Mature;
                badges.update_progress(Activity::Plant);
            } else if elapsed >= maturity / 2 {
                plant.stage = Stage::Sprout;
            }
        }
    }

    /// Water a plant. Purely cosmetic, consumes one water.
    pub fn water_plant(&mut self, id: Uuid) -> bool {
        if self.inventory.water == 0 || !self.plants.iter().any(|p| p.id == id) {
            return false;
        }
        self.inventory.water -= 1;
        true
    }

    /// Sunlight takes 2 hours off the remaining grow time
    pub fn apply_sunlight(&mut self, id: Uuid, badges: &mut BadgeBook, now: DateTime<Utc>) -> bool {
        if self.inventory.sunlight == 0 {
            return false;
        }
        if !self.boost(id, Duration::hours(SUNLIGHT_BOOST_HOURS), badges, now) {
            return false;
        }
        self.inventory.sunlight -= 1;
        true
    }

    /// Fertilizer takes 4 (basic) or 12 (advanced) hours off
    pub fn apply_fertilizer(
        &mut self,
        id: Uuid,
        grade: FertilizerGrade,
        badges: &mut BadgeBook,
        now: DateTime<Utc>,
    ) -> bool {
        let (count, hours) = match grade {
            FertilizerGrade::Basic => (self.inventory.fertilizer.basic, BASIC_FERTILIZER_HOURS),
            FertilizerGrade::Advanced => (self.inventory.fertilizer.advanced, ADVANCED_FERTILIZER_HOURS),
        };
        if count == 0 {
            return false;
        }
        if !self.boost(id, Duration::hours(hours), badges, now) {
            return false;
        }
        match grade {
            FertilizerGrade::Basic => self.inventory.fertilizer.basic -= 1,
            FertilizerGrade::Advanced => self.inventory.fertilizer.advanced -= 1,
        }
        true
    }

    /// Shift `planted_at` back by `boost` and re-evaluate the stage.
    /// Mature plants can't be boosted.
    fn boost(&mut self, id: Uuid, boost: Duration, badges: &mut BadgeBook, now: DateTime<Utc>) -> bool {
        let Some(plant) = self.plants.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if plant.stage == Stage::Mature {
            return false;
        }
        plant.planted_at -= boost;

        let elapsed = now - plant.planted_at;
        let maturity = Duration::hours(plant.maturity_hours);
        if elapsed >= maturity {
            plant.stage = Stage::Mature;
            badges.update_progress(Activity::Plant);
        } else if elapsed >= maturity / 2 {
            plant.stage = Stage::Sprout;
        }
        true
    }
}
