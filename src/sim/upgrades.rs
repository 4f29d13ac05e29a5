//! Upgrade catalog and the selection flow
//!
//! Each level-up owes the player one upgrade. While any are owed the run
//! pauses and three distinct options from the catalog are put on offer; the
//! adapter answers with one id. Several owed upgrades are handed out one
//! offer at a time.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, SimParams};
use crate::consts::*;
use crate::error::SimError;

/// Identifier for each catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    Damage,
    ExtraBall,
    ProjectileSpeed,
    Pierce,
    BurstTempo,
    SlowDescent,
}

/// Presentation data for an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub title: &'static str,
    pub description: &'static str,
}

/// The fixed upgrade table
pub const CATALOG: [Upgrade; 6] = [
    Upgrade {
        id: UpgradeId::Damage,
        title: "Heavy Rounds",
        description: "+1 projectile damage",
    },
    Upgrade {
        id: UpgradeId::ExtraBall,
        title: "Extra Ball",
        description: "+1 projectile per shot",
    },
    Upgrade {
        id: UpgradeId::ProjectileSpeed,
        title: "Muzzle Velocity",
        description: "+15% projectile speed",
    },
    Upgrade {
        id: UpgradeId::Pierce,
        title: "Piercing",
        description: "Projectiles pass through one more block",
    },
    Upgrade {
        id: UpgradeId::BurstTempo,
        title: "Burst Tempo",
        description: "Shots within a burst come 20% faster",
    },
    Upgrade {
        id: UpgradeId::SlowDescent,
        title: "Headwind",
        description: "Blocks fall 10% slower",
    },
];

impl UpgradeId {
    pub const ALL: [UpgradeId; 6] = [
        UpgradeId::Damage,
        UpgradeId::ExtraBall,
        UpgradeId::ProjectileSpeed,
        UpgradeId::Pierce,
        UpgradeId::BurstTempo,
        UpgradeId::SlowDescent,
    ];

    /// Catalog entry for this id
    pub fn info(self) -> &'static Upgrade {
        let index = match self {
            UpgradeId::Damage => 0,
            UpgradeId::ExtraBall => 1,
            UpgradeId::ProjectileSpeed => 2,
            UpgradeId::Pierce => 3,
            UpgradeId::BurstTempo => 4,
            UpgradeId::SlowDescent => 5,
        };
        &CATALOG[index]
    }

    /// Apply the effect once
    pub fn apply(self, params: &mut SimParams) {
        match self {
            UpgradeId::Damage => params.projectile_damage += 1,
            UpgradeId::ExtraBall => params.ball_count += 1,
            UpgradeId::ProjectileSpeed => params.projectile_speed *= 1.15,
            UpgradeId::Pierce => params.pierce += 1,
            UpgradeId::BurstTempo => {
                params.burst_interval = (params.burst_interval * 0.8).max(MIN_BURST_INTERVAL)
            }
            UpgradeId::SlowDescent => {
                params.descent_speed = (params.descent_speed * 0.9).max(MIN_DESCENT_SPEED)
            }
        }
    }
}

/// Three distinct upgrades currently on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub options: [UpgradeId; UPGRADE_CHOICES],
}

impl UpgradeOffer {
    /// Shuffle the catalog and take the first three
    pub fn roll(rng: &mut impl Rng) -> Self {
        let mut ids = UpgradeId::ALL;
        ids.shuffle(rng);
        Self {
            options: [ids[0], ids[1], ids[2]],
        }
    }

    pub fn contains(&self, id: UpgradeId) -> bool {
        self.options.contains(&id)
    }

    /// Title/description for each option, in offer order
    pub fn entries(&self) -> impl Iterator<Item = &'static Upgrade> + '_ {
        self.options.iter().map(|id| id.info())
    }
}

/// Open a selection if upgrades are owed and none is open; pauses the run
pub fn open_selection(state: &mut GameState) {
    if state.upgrade_offer.is_some() || state.progression.pending_upgrades == 0 {
        return;
    }
    let offer = UpgradeOffer::roll(&mut state.rng);
    state.upgrade_offer = Some(offer);
    state.paused = true;
    log::debug!("Upgrade offer: {:?}", offer.options);
    state.push_event(GameEvent::UpgradeOffered {
        options: offer.options,
    });
}

/// Apply the chosen upgrade and move on to the next owed one, if any
pub fn apply_upgrade(state: &mut GameState, id: UpgradeId) -> Result<(), SimError> {
    let offer = state.upgrade_offer.ok_or(SimError::NoUpgradePending)?;
    if !offer.contains(id) {
        return Err(SimError::UpgradeNotOffered(id));
    }

    id.apply(&mut state.params);
    state.progression.pending_upgrades = state.progression.pending_upgrades.saturating_sub(1);
    state.upgrade_offer = None;
    state.paused = false;
    log::info!("Upgrade applied: {}", id.info().title);
    state.push_event(GameEvent::UpgradeApplied { id });

    open_selection(state);
    Ok(())
}
