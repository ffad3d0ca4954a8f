//! Chests
//!
//! A chest opens once and rolls its loot profile at the level it was placed for.

use serde::{Deserialize, Serialize};

use super::{InteractContext, Interactable, LootSource, SoundCue, WorldCommand};
use crate::world::GridCoord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub position: GridCoord,
    pub loot_profile: String,
    pub level: i32,
    pub opened: bool,
}

impl Chest {
    pub fn new(position: GridCoord, loot_profile: impl Into<String>, level: i32) -> Self {
        Self {
            position,
            loot_profile: loot_profile.into(),
            level,
            opened: false,
        }
    }
}

impl Interactable for Chest {
    fn position(&self) -> GridCoord {
        self.position
    }

    fn can_interact(&self) -> bool {
        !self.opened
    }

    /// Open the chest and spill its loot; an opened chest does nothing
    fn interact(&mut self, ctx: &mut InteractContext<'_>) -> Vec<WorldCommand> {
        if self.opened {
            return Vec::new();
        }
        self.opened = true;

        let mut commands = vec![WorldCommand::PlaySound {
            at: self.position,
            cue: SoundCue::ChestOpen,
        }];
        commands.extend(self.roll_drops(ctx));
        commands
    }
}

impl LootSource for Chest {
    fn loot_profile(&self) -> Option<&str> {
        Some(&self.loot_profile)
    }

    fn loot_level(&self) -> i32 {
        self.level
    }

    fn drop_point(&self) -> GridCoord {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::{catalog, profiles};
    use crate::items::LootRoller;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_chest_opens_once() {
        let catalog = catalog();
        let profiles = profiles();
        let mut rng = StdRng::seed_from_u64(11);
        let mut ctx = InteractContext::new(LootRoller::new(&catalog), &profiles, &mut rng);

        let mut chest = Chest::new(GridCoord::new(4, 0, 4), "chest", 3);
        assert!(chest.can_interact());

        let first = chest.interact(&mut ctx);
        assert_eq!(first.len(), 3);
        assert!(matches!(first[0], WorldCommand::PlaySound { cue: SoundCue::ChestOpen, .. }));
        assert!(!chest.can_interact());

        assert!(chest.interact(&mut ctx).is_empty());
    }
}
