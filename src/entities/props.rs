//! Doors and breakable props

use serde::{Deserialize, Serialize};

use super::{InteractContext, Interactable, LootSource, SoundCue, WorldCommand};
use crate::world::{GridCoord, TileId};

/// A door that swaps between two tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub position: GridCoord,
    pub closed_tile: TileId,
    pub open_tile: TileId,
    pub open: bool,
}

impl Door {
    pub fn new(position: GridCoord, closed_tile: TileId, open_tile: TileId) -> Self {
        Self {
            position,
            closed_tile,
            open_tile,
            open: false,
        }
    }
}

impl Interactable for Door {
    fn position(&self) -> GridCoord {
        self.position
    }

    fn interact(&mut self, _ctx: &mut InteractContext<'_>) -> Vec<WorldCommand> {
        self.open = !self.open;
        let (tile, cue) = if self.open {
            (self.open_tile, SoundCue::DoorOpen)
        } else {
            (self.closed_tile, SoundCue::DoorClose)
        };
        vec![
            WorldCommand::SetTile { at: self.position, tile },
            WorldCommand::PlaySound { at: self.position, cue },
        ]
    }
}

/// Crates, barrels and urns: take a few hits, then break and maybe drop loot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakable {
    pub position: GridCoord,
    pub durability: u32,
    pub level: i32,
    pub loot_profile: Option<String>,
}

impl Breakable {
    pub fn new(position: GridCoord, durability: u32, level: i32) -> Self {
        Self {
            position,
            durability,
            level,
            loot_profile: None,
        }
    }

    pub fn with_loot(mut self, profile: impl Into<String>) -> Self {
        self.loot_profile = Some(profile.into());
        self
    }

    pub fn is_broken(&self) -> bool {
        self.durability == 0
    }
}

impl Interactable for Breakable {
    fn position(&self) -> GridCoord {
        self.position
    }

    fn can_interact(&self) -> bool {
        !self.is_broken()
    }

    fn interact(&mut self, ctx: &mut InteractContext<'_>) -> Vec<WorldCommand> {
        if self.is_broken() {
            return Vec::new();
        }
        self.durability -= 1;
        if !self.is_broken() {
            return Vec::new();
        }

        let mut commands = vec![
            WorldCommand::PlaySound {
                at: self.position,
                cue: SoundCue::Break,
            },
            WorldCommand::Remove { at: self.position },
        ];
        commands.extend(self.roll_drops(ctx));
        commands
    }
}

impl LootSource for Breakable {
    fn loot_profile(&self) -> Option<&str> {
        self.loot_profile.as_deref()
    }

    fn loot_level(&self) -> i32 {
        self.level
    }

    fn drop_point(&self) -> GridCoord {
        self.position
    }
}
