//! The dungeon map: entity storage plus per-tile occupancy lists.
//!
//! [`GameMap`] owns every [`MapObject`] in a dense table indexed by
//! [`EntityId`]. Each tile holds an ordered list of ids; a tile may hold
//! several (floor + chest, floor + player), and the shared floor and abyss
//! objects appear on many tiles at once. Ids are never reused while the map
//! lives.
//!
//! Three coordinate systems are in play: tile coordinates, pixel
//! coordinates (`tile * tile_size`) and the linear tile index (row-major).
//! The `is_*_on_map` checks must be used before the unchecked transforms.

use cairn_core::{Point, Range};

use crate::entity::{EntityId, EventKind, Kind, MapObject};

/// An event waiting to be resolved: which object raised it, and what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub origin: EntityId,
    pub kind: EventKind,
}

/// A single dungeon level.
#[derive(Debug, Clone)]
pub struct GameMap {
    map_size: Point,
    tile_size: i32,
    storage: Vec<Option<MapObject>>,
    tiles: Vec<Vec<EntityId>>,
    abyss: EntityId,
    floor: EntityId,
}

impl GameMap {
    /// A map of `map_size` tiles where every tile is abyss.
    pub fn new(map_size: Point, tile_size: i32) -> Self {
        debug_assert!(map_size.x > 0 && map_size.y > 0);
        let mut map = Self {
            map_size,
            tile_size: tile_size.max(1),
            storage: Vec::new(),
            tiles: Vec::new(),
            abyss: 0,
            floor: 0,
        };
        map.abyss = map.add_object(MapObject::abyss());
        map.floor = map.add_object(MapObject::floor());
        let n = (map_size.x.max(0) as usize).saturating_mul(map_size.y.max(0) as usize);
        map.tiles = vec![vec![map.abyss]; n];
        map
    }

    pub fn map_size(&self) -> Point {
        self.map_size
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tile-space bounds of the map.
    pub fn range(&self) -> Range {
        Range::with_size(Point::ZERO, self.map_size)
    }

    /// Id of the shared abyss object.
    pub fn abyss_id(&self) -> EntityId {
        self.abyss
    }

    /// Id of the shared floor object.
    pub fn floor_id(&self) -> EntityId {
        self.floor
    }

    // -----------------------------------------------------------------------
    // Storage
    // -----------------------------------------------------------------------

    /// Store `obj` and return its fresh id. The object is not on any tile.
    pub fn add_object(&mut self, obj: MapObject) -> EntityId {
        self.storage.push(Some(obj));
        self.storage.len() - 1
    }

    /// Append `id` to the tile's content list.
    pub fn place_object(&mut self, tile: usize, id: EntityId) {
        debug_assert!(self.is_index_on_map(tile), "tile {tile} off map");
        debug_assert!(id < self.storage.len(), "unknown id {id}");
        self.tiles[tile].push(id);
    }

    pub fn add_and_place(&mut self, tile: usize, obj: MapObject) -> EntityId {
        let id = self.add_object(obj);
        self.place_object(tile, id);
        id
    }

    /// Move the id at `index` in `from`'s list to the end of `to`'s list.
    /// `index` must come from [`GameMap::find_object_in_tile`].
    pub fn move_object(&mut self, from: usize, index: usize, to: usize) -> EntityId {
        debug_assert!(index < self.tiles[from].len(), "index {index} not in tile {from}");
        let id = self.tiles[from].remove(index);
        self.tiles[to].push(id);
        id
    }

    /// Remove the id at `index` from the tile's list, and from storage too
    /// when `delete_from_storage` is set. Returns the removed object in that
    /// case.
    pub fn delete_object(
        &mut self,
        tile: usize,
        index: usize,
        delete_from_storage: bool,
    ) -> Option<MapObject> {
        debug_assert!(index < self.tiles[tile].len(), "index {index} not in tile {tile}");
        let id = self.tiles[tile].remove(index);
        if !delete_from_storage {
            return None;
        }
        debug_assert!(id != self.abyss && id != self.floor, "shared filler deleted");
        self.storage.get_mut(id).and_then(Option::take)
    }

    /// Position of `id` in the tile's list.
    pub fn find_object_in_tile(&self, tile: usize, id: EntityId) -> Option<usize> {
        self.tiles.get(tile)?.iter().position(|&i| i == id)
    }

    /// Empty a tile's list. Used while building a map; a tile must not be
    /// left empty.
    pub(crate) fn clear_tile(&mut self, tile: usize) {
        self.tiles[tile].clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&MapObject> {
        self.storage.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut MapObject> {
        self.storage.get_mut(id).and_then(Option::as_mut)
    }

    /// Ids on the tile at `index`, in insertion order.
    pub fn tile_ids(&self, index: usize) -> &[EntityId] {
        self.tiles.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Objects on a tile, in insertion order. Empty off the map.
    pub fn objects_at(&self, tile: Point) -> impl Iterator<Item = (EntityId, &MapObject)> + '_ {
        let ids = if self.is_tile_on_map(tile) {
            self.tile_ids(self.tile_to_index(tile))
        } else {
            &[]
        };
        ids.iter()
            .filter_map(move |&id| self.get(id).map(|o| (id, o)))
    }

    /// The last object on a tile that has a sprite, which is what gets drawn.
    pub fn top_object(&self, tile: Point) -> Option<&MapObject> {
        self.objects_at(tile)
            .filter(|(_, o)| o.sprite().is_some())
            .last()
            .map(|(_, o)| o)
    }

    /// First tile holding an object of `kind`, with that object's id.
    pub fn find_kind(&self, kind: Kind) -> Option<(usize, EntityId)> {
        self.tiles.iter().enumerate().find_map(|(i, ids)| {
            ids.iter()
                .copied()
                .find(|&id| self.get(id).is_some_and(|o| o.kind() == kind))
                .map(|id| (i, id))
        })
    }

    // -----------------------------------------------------------------------
    // Coordinate transforms
    // -----------------------------------------------------------------------

    pub fn is_tile_on_map(&self, tile: Point) -> bool {
        self.range().contains(tile)
    }

    pub fn is_pixel_on_map(&self, pixel: Point) -> bool {
        Range::with_size(Point::ZERO, self.map_size * self.tile_size).contains(pixel)
    }

    pub fn is_index_on_map(&self, index: usize) -> bool {
        index < self.tiles.len()
    }

    /// Linear index of an on-map tile.
    #[inline]
    pub fn tile_to_index(&self, tile: Point) -> usize {
        debug_assert!(self.is_tile_on_map(tile), "tile {tile} off map");
        (tile.y * self.map_size.x + tile.x) as usize
    }

    #[inline]
    pub fn index_to_tile(&self, index: usize) -> Point {
        debug_assert!(self.is_index_on_map(index), "index {index} off map");
        let i = index as i32;
        Point::new(i % self.map_size.x, i / self.map_size.x)
    }

    /// Top-left pixel of a tile.
    #[inline]
    pub fn tile_to_pixel(&self, tile: Point) -> Point {
        debug_assert!(self.is_tile_on_map(tile), "tile {tile} off map");
        tile * self.tile_size
    }

    #[inline]
    pub fn pixel_to_tile(&self, pixel: Point) -> Point {
        debug_assert!(self.is_pixel_on_map(pixel), "pixel {pixel} off map");
        pixel / self.tile_size
    }

    #[inline]
    pub fn pixel_to_index(&self, pixel: Point) -> usize {
        self.tile_to_index(self.pixel_to_tile(pixel))
    }

    #[inline]
    pub fn index_to_pixel(&self, index: usize) -> Point {
        self.tile_to_pixel(self.index_to_tile(index))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Off the map, or some object on the tile is an obstacle.
    pub fn is_tile_blocked(&self, tile: Point) -> bool {
        if !self.is_tile_on_map(tile) {
            return true;
        }
        self.objects_at(tile).any(|(_, o)| o.is_obstacle())
    }

    /// Events the player triggers by entering `tile`, in tile-list order.
    pub fn player_events(&self, tile: Point) -> Vec<ScheduledEvent> {
        self.objects_at(tile)
            .filter_map(|(origin, o)| {
                o.player_collision_event()
                    .map(|kind| ScheduledEvent { origin, kind })
            })
            .collect()
    }

    /// Events an enemy triggers by entering `tile`, in tile-list order.
    pub fn enemy_events(&self, tile: Point) -> Vec<ScheduledEvent> {
        self.objects_at(tile)
            .filter_map(|(origin, o)| {
                o.enemy_collision_event()
                    .map(|kind| ScheduledEvent { origin, kind })
            })
            .collect()
    }

    /// Descriptions of everything on the tile, one per line.
    pub fn tile_descriptions(&self, tile: Point) -> String {
        self.objects_at(tile)
            .map(|(_, o)| o.describe())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Mark every object on the tile as inspected. The shared fillers are
    /// left alone.
    pub fn inspect_tile(&mut self, tile: Point) {
        if !self.is_tile_on_map(tile) {
            return;
        }
        let index = self.tile_to_index(tile);
        for i in 0..self.tiles[index].len() {
            let id = self.tiles[index][i];
            if id == self.abyss || id == self.floor {
                continue;
            }
            if let Some(obj) = self.get_mut(id) {
                obj.inspect();
            }
        }
    }

    /// Entity-kind ids of every tile's content, in tile-list order.
    pub fn layout(&self) -> Vec<Vec<i32>> {
        self.tiles
            .iter()
            .map(|ids| {
                ids.iter()
                    .filter_map(|&id| self.get(id).map(|o| o.kind().id()))
                    .collect()
            })
            .collect()
    }
}
