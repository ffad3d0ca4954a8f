//! Dungeon Dresser - Entry Point
//!
//! Generates a level, dresses its walls and floors, opens the loot sources
//! it spawns and packs the drops into an inventory.
//!
//! Usage: `dungeon-dresser [seed] [--json]`

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use dungeon_dresser::data::DataManager;
use dungeon_dresser::dress_level;
use dungeon_dresser::entities::{Breakable, Chest, Door, Enemy, InteractContext, Interactable, WorldCommand};
use dungeon_dresser::items::{Inventory, LootRoller};
use dungeon_dresser::world::generation::{generate_level, Level};
use dungeon_dresser::world::GridCoord;

const DEFAULT_SEED: u64 = 0xD0D6E;

struct Args {
    seed: u64,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        seed: DEFAULT_SEED,
        json: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            other if other.starts_with('-') => bail!("unknown flag {other}"),
            other => args.seed = other.parse().with_context(|| format!("invalid seed {other:?}"))?,
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    log::info!("Starting Dungeon Dresser v{} (seed {})", env!("CARGO_PKG_VERSION"), args.seed);

    let data = DataManager::new();
    let tiles = data.tile_config();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let level = generate_level(&mut rng, &tiles.level, &tiles.palette);
    let dressed = dress_level(tiles, &level);

    let commands = open_everything(&data, &level, &mut rng);
    let mut inventory = Inventory::default();
    let mut left_behind = 0;
    for command in &commands {
        let WorldCommand::SpawnDrop { item, item_level, .. } = command else { continue };
        let Some(definition) = data.catalog().find(item) else {
            log::warn!("Drop references unknown item '{}'", item);
            continue;
        };
        if let Err(e) = inventory.add_leveled(definition, *item_level, 1) {
            log::info!("Left {} behind: {}", definition.name, e);
            left_behind += 1;
        }
    }

    log::info!(
        "Inventory: {} stacks, {:.1}/{:.1} weight, worth {} gold ({} drops left behind)",
        inventory.stack_count(),
        inventory.total_weight(),
        inventory.max_weight(),
        inventory.total_value(),
        left_behind
    );
    for stack in inventory.stacks() {
        log::info!("  {} x{} (level {})", stack.item_id, stack.quantity, stack.item_level);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&dressed.floor_plan).context("failed to serialize floor plan")?;
        println!("{json}");
    }

    Ok(())
}

/// Spawn a chest per loot spot, an enemy in every room but the first and a
/// door per doorway, then use all of them once
fn open_everything(data: &DataManager, level: &Level, rng: &mut StdRng) -> Vec<WorldCommand> {
    let tiles = data.tile_config();
    let y = tiles.level.plane_y;

    let mut props: Vec<Box<dyn Interactable>> = Vec::new();
    for (i, spot) in level.loot_spots(y).into_iter().enumerate() {
        let room_level = 1 + i as i32 * 3;
        props.push(Box::new(Chest::new(spot, "chest", room_level)));
        props.push(Box::new(
            Breakable::new(spot.offset(1, 0), 1, room_level).with_loot("urn"),
        ));
    }
    for door in &level.doors {
        props.push(Box::new(Door::new(*door, tiles.palette.door, tiles.open_door_tile)));
    }

    let last_room = level.rooms.len().saturating_sub(1);
    let mut enemies: Vec<Enemy> = level
        .rooms
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, room)| {
            let (x, z) = room.center();
            let profile = if i == last_room { "fire_elite" } else { "enemy" };
            Enemy::new("Ghoul", GridCoord::plane(x, z + 1, y), 2 + i as i32 * 3, 12).with_loot(profile)
        })
        .collect();

    let roller = LootRoller::new(data.catalog());
    let mut ctx = InteractContext::new(roller, data.profiles(), rng);

    let mut commands = Vec::new();
    for prop in props.iter_mut().filter(|p| p.can_interact()) {
        commands.extend(prop.interact(&mut ctx));
    }
    for enemy in &mut enemies {
        while !enemy.is_dead() {
            commands.extend(enemy.take_damage(5, &mut ctx));
        }
    }

    log::info!(
        "Used {} props, defeated {} enemies: {} world commands",
        props.len(),
        enemies.len(),
        commands.len()
    );
    commands
}
