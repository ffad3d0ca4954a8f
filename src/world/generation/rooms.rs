//! Room and corridor level generator
//!
//! Rectangular walled rooms connected by corridors. Walls are carved with
//! the generic wall id; wall connection and floor compositing run later.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::world::grid::{GridCoord, SparseGrid};
use crate::world::tile::TileId;
use crate::world::walls::Room;

/// Tile ids the generator writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPalette {
    pub wall: TileId,
    pub door: TileId,
    pub corridor: TileId,
    /// Room floor tiles; each room picks one
    pub room_floors: Vec<TileId>,
    /// Tiles painted as patches inside rooms
    #[serde(default)]
    pub patch_floors: Vec<TileId>,
}

/// Size limits for a generated level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub width: i32,
    pub depth: i32,
    pub max_rooms: usize,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub plane_y: i32,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            width: 48,
            depth: 32,
            max_rooms: 8,
            min_room_size: 5,
            max_room_size: 9,
            plane_y: 0,
        }
    }
}

/// A generated level
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub grid: SparseGrid,
    pub rooms: Vec<Room>,
    pub doors: Vec<GridCoord>,
    pub start: GridCoord,
}

impl Level {
    /// Center of every room except the first, where loot containers go
    pub fn loot_spots(&self, y: i32) -> Vec<GridCoord> {
        self.rooms
            .iter()
            .skip(1)
            .map(|room| {
                let (x, z) = room.center();
                GridCoord::plane(x, z, y)
            })
            .collect()
    }
}

/// Generate a level with rooms and corridors
pub fn generate_level(rng: &mut impl Rng, params: &LevelParams, palette: &LevelPalette) -> Level {
    let mut level = Level::default();
    let y = params.plane_y;

    let min_size = params.min_room_size.max(3);
    let max_size = params.max_room_size.max(min_size);
    if params.width <= max_size + 2 || params.depth <= max_size + 2 {
        log::warn!("Level {}x{} too small for rooms up to {}", params.width, params.depth, max_size);
        return level;
    }

    for _ in 0..100 {
        // Try up to 100 times to place rooms
        if level.rooms.len() >= params.max_rooms {
            break;
        }

        let w = rng.gen_range(min_size..=max_size);
        let d = rng.gen_range(min_size..=max_size);
        let x = rng.gen_range(1..params.width - w - 1);
        let z = rng.gen_range(1..params.depth - d - 1);
        let room = Room::new(x, z, w, d);

        // Keep a gap so wall rings never touch
        let padded = Room::new(x - 1, z - 1, w + 2, d + 2);
        if level.rooms.iter().any(|r| padded.intersects(r)) {
            continue;
        }

        let floor = palette.room_floors.choose(rng).copied().unwrap_or(palette.corridor);
        carve_room(&mut level.grid, &room, y, palette.wall, floor);
        if let Some(patch) = palette.patch_floors.choose(rng) {
            if rng.gen_bool(0.5) {
                paint_patch(rng, &mut level.grid, &room, y, *patch);
            }
        }
        level.rooms.push(room);
    }

    let rooms = level.rooms.clone();
    for pair in rooms.windows(2) {
        let (from, to) = (pair[0].center(), pair[1].center());
        if rng.gen_bool(0.5) {
            carve_h_corridor(&mut level, &rooms, (from.0, to.0), from.1, y, palette);
            carve_v_corridor(&mut level, &rooms, (from.1, to.1), to.0, y, palette);
        } else {
            carve_v_corridor(&mut level, &rooms, (from.1, to.1), from.0, y, palette);
            carve_h_corridor(&mut level, &rooms, (from.0, to.0), to.1, y, palette);
        }
    }

    if let Some(first) = level.rooms.first() {
        let (x, z) = first.center();
        level.start = GridCoord::plane(x, z, y);
    }

    level.doors.sort();
    level.doors.dedup();
    log::debug!(
        "Generated level: {} rooms, {} doors, {} cells",
        level.rooms.len(),
        level.doors.len(),
        level.grid.len()
    );
    level
}

/// Wall ring plus floor
fn carve_room(grid: &mut SparseGrid, room: &Room, y: i32, wall: TileId, floor: TileId) {
    for coord in room.perimeter(y) {
        grid.set_tile(coord, wall);
    }
    for coord in room.interior(y) {
        grid.set_tile(coord, floor);
    }
}

/// Paint a smaller rectangle of a second floor type inside a room
fn paint_patch(rng: &mut impl Rng, grid: &mut SparseGrid, room: &Room, y: i32, tile: TileId) {
    let (inner_w, inner_d) = (room.x2 - room.x1 - 1, room.z2 - room.z1 - 1);
    if inner_w < 2 || inner_d < 2 {
        return;
    }
    let w = rng.gen_range(1..=inner_w - 1);
    let d = rng.gen_range(1..=inner_d - 1);
    let x = rng.gen_range(room.x1 + 1..=room.x2 - w);
    let z = rng.gen_range(room.z1 + 1..=room.z2 - d);
    grid.fill_rect((x, z), (x + w - 1, z + d - 1), y, tile);
}

/// One corridor cell. Wall cells become doors, room floors are left alone.
fn carve_corridor_cell(level: &mut Level, rooms: &[Room], coord: GridCoord, palette: &LevelPalette) {
    if rooms.iter().any(|r| r.is_perimeter(coord.x, coord.z)) {
        level.grid.set_tile(coord, palette.door);
        level.doors.push(coord);
    } else if level.grid.get(coord).is_none() {
        level.grid.set_tile(coord, palette.corridor);
    }
}

/// Carve a horizontal corridor
fn carve_h_corridor(level: &mut Level, rooms: &[Room], (x1, x2): (i32, i32), z: i32, y: i32, palette: &LevelPalette) {
    for x in x1.min(x2)..=x1.max(x2) {
        carve_corridor_cell(level, rooms, GridCoord::plane(x, z, y), palette);
    }
}

/// Carve a vertical corridor
fn carve_v_corridor(level: &mut Level, rooms: &[Room], (z1, z2): (i32, i32), x: i32, y: i32, palette: &LevelPalette) {
    for z in z1.min(z2)..=z1.max(z2) {
        carve_corridor_cell(level, rooms, GridCoord::plane(x, z, y), palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::GridSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn palette() -> LevelPalette {
        LevelPalette {
            wall: 1,
            door: 2,
            corridor: 3,
            room_floors: vec![4, 5],
            patch_floors: vec![6],
        }
    }

    #[test]
    fn test_rooms_do_not_touch() {
        let mut rng = StdRng::seed_from_u64(42);
        let level = generate_level(&mut rng, &LevelParams::default(), &palette());
        assert!(level.rooms.len() >= 2);

        for (i, a) in level.rooms.iter().enumerate() {
            let padded = Room::new(a.x1 - 1, a.z1 - 1, a.x2 - a.x1 + 3, a.z2 - a.z1 + 3);
            for b in level.rooms.iter().skip(i + 1) {
                assert!(!padded.intersects(b));
            }
        }
    }

    #[test]
    fn test_rooms_are_walled() {
        let mut rng = StdRng::seed_from_u64(3);
        let pal = palette();
        let level = generate_level(&mut rng, &LevelParams::default(), &pal);

        for room in &level.rooms {
            for coord in room.perimeter(0) {
                let tile = level.grid.get_cell(coord);
                assert!(tile == Some(pal.wall) || tile == Some(pal.door), "{coord} is {tile:?}");
            }
        }
        for door in &level.doors {
            assert_eq!(level.grid.get_cell(*door), Some(pal.door));
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let params = LevelParams::default();
        let a = generate_level(&mut StdRng::seed_from_u64(9), &params, &palette());
        let b = generate_level(&mut StdRng::seed_from_u64(9), &params, &palette());
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.loot_spots(0).len(), a.rooms.len() - 1);
    }

    #[test]
    fn test_too_small_level_is_empty() {
        let params = LevelParams {
            width: 8,
            depth: 8,
            ..LevelParams::default()
        };
        let level = generate_level(&mut StdRng::seed_from_u64(1), &params, &palette());
        assert!(level.rooms.is_empty());
        assert!(level.grid.is_empty());
    }
}
