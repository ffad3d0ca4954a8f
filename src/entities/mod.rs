//! Loot sources and interactable props
//!
//! Entities never touch a scene. They answer an interaction with a list of
//! `WorldCommand`s that the presentation layer carries out.

pub mod chests;
pub mod enemies;
pub mod props;

pub use chests::Chest;
pub use enemies::Enemy;
pub use props::{Breakable, Door};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::items::{ItemId, LootProfiles, LootRoller};
use crate::world::{GridCoord, TileId};

/// Sound effects the presentation layer may play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    ChestOpen,
    DoorOpen,
    DoorClose,
    Break,
    EnemyDeath,
}

/// Side effect requested by an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldCommand {
    SpawnDrop { at: GridCoord, item: ItemId, item_level: i32 },
    PlaySound { at: GridCoord, cue: SoundCue },
    SetTile { at: GridCoord, tile: TileId },
    Remove { at: GridCoord },
}

/// Shared state an interaction may need
pub struct InteractContext<'a> {
    pub roller: LootRoller<'a>,
    pub profiles: &'a LootProfiles,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> InteractContext<'a> {
    pub fn new(roller: LootRoller<'a>, profiles: &'a LootProfiles, rng: &'a mut dyn RngCore) -> Self {
        Self { roller, profiles, rng }
    }
}

/// Something the player can use
pub trait Interactable {
    fn position(&self) -> GridCoord;

    /// Check if interacting would do anything
    fn can_interact(&self) -> bool {
        true
    }

    fn interact(&mut self, ctx: &mut InteractContext<'_>) -> Vec<WorldCommand>;
}

/// Something that drops loot
pub trait LootSource {
    /// Profile name to roll with, or `None` for nothing
    fn loot_profile(&self) -> Option<&str>;

    /// Level the roll targets before profile scaling
    fn loot_level(&self) -> i32;

    /// Where drops land
    fn drop_point(&self) -> GridCoord;

    /// Roll this source's loot into spawn commands. A missing profile is
    /// logged and produces no drops.
    fn roll_drops(&self, ctx: &mut InteractContext<'_>) -> Vec<WorldCommand> {
        let Some(name) = self.loot_profile() else {
            return Vec::new();
        };
        let Some(profile) = ctx.profiles.find(name) else {
            log::warn!("Unknown loot profile '{}', no drops", name);
            return Vec::new();
        };

        let at = self.drop_point();
        ctx.roller
            .generate_loot(self.loot_level(), profile, &mut ctx.rng)
            .into_iter()
            .map(|drop| WorldCommand::SpawnDrop {
                at,
                item: drop.item.id.clone(),
                item_level: drop.item_level,
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::items::{ItemCatalog, ItemDefinition, LootProfile, LootProfiles};

    pub fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            ItemDefinition::new("rusty_sword", "Rusty Sword", 3),
            ItemDefinition::new("bone_charm", "Bone Charm", 4).with_tags(["charm"]),
        ])
    }

    pub fn profiles() -> LootProfiles {
        LootProfiles {
            profiles: vec![
                LootProfile {
                    min_drops: 2,
                    max_drops: 2,
                    ..LootProfile::named("chest")
                },
                LootProfile {
                    drop_chance: 0.0,
                    ..LootProfile::named("empty")
                },
            ],
        }
    }
}
