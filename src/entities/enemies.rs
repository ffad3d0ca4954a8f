//! Enemies as loot sources

use serde::{Deserialize, Serialize};

use super::{InteractContext, LootSource, SoundCue, WorldCommand};
use crate::world::GridCoord;

/// A hostile creature that drops loot when it dies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub position: GridCoord,
    pub level: i32,
    pub health: i32,
    pub loot_profile: Option<String>,
}

impl Enemy {
    pub fn new(name: impl Into<String>, position: GridCoord, level: i32, health: i32) -> Self {
        Self {
            name: name.into(),
            position,
            level,
            health,
            loot_profile: None,
        }
    }

    pub fn with_loot(mut self, profile: impl Into<String>) -> Self {
        self.loot_profile = Some(profile.into());
        self
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage. The blow that kills the enemy also removes it and rolls its loot.
    pub fn take_damage(&mut self, amount: i32, ctx: &mut InteractContext<'_>) -> Vec<WorldCommand> {
        if self.is_dead() {
            return Vec::new();
        }
        self.health -= amount.max(0);
        if !self.is_dead() {
            return Vec::new();
        }

        log::debug!("{} died at {}", self.name, self.position);
        let mut commands = vec![
            WorldCommand::PlaySound {
                at: self.position,
                cue: SoundCue::EnemyDeath,
            },
            WorldCommand::Remove { at: self.position },
        ];
        commands.extend(self.roll_drops(ctx));
        commands
    }
}

impl LootSource for Enemy {
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
