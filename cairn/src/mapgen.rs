//! Building a [`GameMap`] from a pixel image or a tile-id matrix.
//!
//! Both entry points funnel into the same builder: each tile lists the
//! entity-kind ids stacked on it, filler kinds reuse the map's shared floor
//! and abyss objects, and everything else is spawned fresh with stats and
//! rewards scaled by the dungeon level.

use cairn_core::Point;
use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::entity::{Category, EntityId, Kind, MapObject};
use crate::error::MapError;
use crate::map::GameMap;

/// A freshly built level: the map and where the player stands.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub map: GameMap,
    pub player: EntityId,
    pub player_tile: Point,
}

const COLOR_TABLE: [([u8; 3], Kind); 11] = [
    ([255, 255, 255], Kind::Floor),
    ([0, 255, 0], Kind::Entrance),
    ([0, 0, 255], Kind::Exit),
    ([128, 0, 128], Kind::Trap),
    ([0, 255, 255], Kind::Fountain),
    ([0, 128, 0], Kind::Merchant),
    ([255, 128, 0], Kind::Chest),
    ([255, 215, 0], Kind::Gold),
    ([255, 0, 0], Kind::Enemy),
    ([128, 0, 0], Kind::Boss),
    ([255, 255, 0], Kind::Player),
];

/// Kind encoded by a pixel. Transparent and unknown colors are abyss.
pub fn kind_for_color(px: Rgba<u8>) -> Kind {
    let [r, g, b, a] = px.0;
    if a == 0 {
        return Kind::Abyss;
    }
    COLOR_TABLE
        .iter()
        .find(|(rgb, _)| *rgb == [r, g, b])
        .map_or(Kind::Abyss, |&(_, kind)| kind)
}

/// The color that encodes `kind`, if it has one.
pub fn color_for_kind(kind: Kind) -> Option<Rgba<u8>> {
    COLOR_TABLE
        .iter()
        .find(|&&(_, k)| k == kind)
        .map(|&([r, g, b], _)| Rgba([r, g, b, 255]))
}

/// Tile contents for a single-kind pixel: most objects stand on floor.
fn stack_for(kind: Kind) -> Vec<i32> {
    match kind {
        Kind::Abyss | Kind::Floor | Kind::Entrance | Kind::Exit => vec![kind.id()],
        _ => vec![Kind::Floor.id(), kind.id()],
    }
}

/// Decode a color-coded image into a tile layout and its size.
pub fn image_layout(img: &RgbaImage) -> (Vec<Vec<i32>>, Point) {
    let (w, h) = img.dimensions();
    let layout = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| stack_for(kind_for_color(*img.get_pixel(x, y))))
        .collect();
    (layout, Point::new(w as i32, h as i32))
}

/// Build a level from a color-coded image, one pixel per tile.
pub fn from_image(
    img: &RgbaImage,
    level: i32,
    tile_size: i32,
    rng: &mut impl Rng,
) -> Result<Dungeon, MapError> {
    let (layout, size) = image_layout(img);
    from_layout(&layout, size, level, tile_size, rng)
}

/// Build a level from per-tile lists of entity-kind ids (row-major).
///
/// An empty list leaves the tile as abyss. The first player marker wins;
/// without one the player starts on the first entrance.
pub fn from_layout(
    layout: &[Vec<i32>],
    size: Point,
    level: i32,
    tile_size: i32,
    rng: &mut impl Rng,
) -> Result<Dungeon, MapError> {
    if layout.is_empty() || size.x <= 0 || size.y <= 0 {
        return Err(MapError::EmptyLayout);
    }
    // u64: the product of two i32 sizes cannot overflow.
    let expected = size.x as u64 * size.y as u64;
    if layout.len() as u64 != expected {
        return Err(MapError::LayoutSize {
            width: size.x,
            height: size.y,
            expected,
            found: layout.len(),
        });
    }

    let mut map = GameMap::new(size, tile_size);
    let mut player: Option<(usize, EntityId)> = None;
    let mut entrance: Option<usize> = None;
    let (mut creatures, mut treasure) = (0, 0);

    for (tile, ids) in layout.iter().enumerate() {
        if ids.is_empty() {
            continue;
        }
        map.clear_tile(tile);
        for &raw in ids {
            let kind = Kind::from_id(raw).unwrap_or_else(|| {
                log::warn!("unknown entity id {raw} at tile {tile}, using abyss");
                Kind::Abyss
            });
            match kind {
                Kind::Abyss => map.place_object(tile, map.abyss_id()),
                Kind::Floor => map.place_object(tile, map.floor_id()),
                Kind::Player => {
                    if player.is_some() {
                        log::warn!("extra player marker at tile {tile} ignored");
                        continue;
                    }
                    let id = map.add_and_place(tile, MapObject::player());
                    player = Some((tile, id));
                }
                Kind::Entrance => {
                    entrance.get_or_insert(tile);
                    map.add_and_place(tile, MapObject::entrance());
                }
                other => {
                    match other.category() {
                        Category::Creature => creatures += 1,
                        Category::Treasure => treasure += 1,
                        Category::Structure => {}
                    }
                    map.add_and_place(tile, MapObject::spawn(other, rng, level));
                }
            }
        }
        // A list of only ignored markers would leave the tile empty.
        if map.tile_ids(tile).is_empty() {
            map.place_object(tile, map.floor_id());
        }
    }

    let (tile, player) = match (player, entrance) {
        (Some(found), _) => found,
        (None, Some(tile)) => (tile, map.add_and_place(tile, MapObject::player())),
        (None, None) => return Err(MapError::NoPlayerStart),
    };
    let player_tile = map.index_to_tile(tile);
    log::info!(
        "built {}x{} map for dungeon level {level}: {creatures} creatures, {treasure} treasure, player at {player_tile}",
        size.x,
        size.y
    );
    Ok(Dungeon {
        map,
        player,
        player_tile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EID_ENEMY, EID_ENTRANCE, EID_EXIT, EID_FLOOR, EID_PLAYER, EventKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn missing_start_is_fatal() {
        let layout = vec![vec![EID_FLOOR]; 4];
        let err = from_layout(&layout, Point::new(2, 2), 1, 16, &mut rng()).unwrap_err();
        assert!(matches!(err, MapError::NoPlayerStart));
    }

    #[test]
    fn layout_size_is_checked() {
        let layout = vec![vec![EID_FLOOR]; 3];
        let err = from_layout(&layout, Point::new(2, 2), 1, 16, &mut rng()).unwrap_err();
        assert!(matches!(err, MapError::LayoutSize { expected: 4, found: 3, .. }));
        let err = from_layout(&[], Point::new(0, 0), 1, 16, &mut rng()).unwrap_err();
        assert!(matches!(err, MapError::EmptyLayout));
    }

    #[test]
    fn player_starts_on_entrance() {
        let mut layout = vec![vec![EID_FLOOR]; 6];
        layout[4] = vec![EID_ENTRANCE];
        let d = from_layout(&layout, Point::new(3, 2), 1, 16, &mut rng()).unwrap();
        assert_eq!(d.player_tile, Point::new(1, 1));
        assert_eq!(d.map.layout()[4], vec![EID_ENTRANCE, EID_PLAYER]);
    }

    #[test]
    fn first_player_marker_wins() {
        let mut layout = vec![vec![EID_FLOOR]; 3];
        layout[1] = vec![EID_FLOOR, EID_PLAYER];
        layout[2] = vec![EID_PLAYER];
        let d = from_layout(&layout, Point::new(3, 1), 1, 16, &mut rng()).unwrap();
        assert_eq!(d.player_tile, Point::new(1, 0));
        assert_eq!(d.map.layout()[2], vec![EID_FLOOR]);
    }

    #[test]
    fn fillers_are_shared() {
        let mut layout = vec![vec![EID_FLOOR]; 4];
        layout[0] = vec![EID_FLOOR, EID_PLAYER];
        layout[3] = vec![];
        let d = from_layout(&layout, Point::new(2, 2), 1, 16, &mut rng()).unwrap();
        let floor = d.map.floor_id();
        for i in 0..3 {
            assert_eq!(d.map.tile_ids(i)[0], floor);
        }
        assert_eq!(d.map.tile_ids(3), &[d.map.abyss_id()]);
    }

    #[test]
    fn unknown_ids_become_abyss() {
        let layout = vec![vec![EID_PLAYER], vec![77]];
        let d = from_layout(&layout, Point::new(2, 1), 1, 16, &mut rng()).unwrap();
        assert!(d.map.is_tile_blocked(Point::new(1, 0)));
    }

    #[test]
    fn image_decodes_color_table() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, color_for_kind(Kind::Entrance).unwrap());
        img.put_pixel(2, 0, color_for_kind(Kind::Exit).unwrap());
        img.put_pixel(1, 1, color_for_kind(Kind::Enemy).unwrap());
        img.put_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 1, Rgba([12, 34, 56, 255]));

        let d = from_image(&img, 2, 16, &mut rng()).unwrap();
        let layout = d.map.layout();
        assert_eq!(layout[0], vec![EID_ENTRANCE, EID_PLAYER]);
        assert_eq!(layout[2], vec![EID_EXIT]);
        assert_eq!(layout[4], vec![EID_FLOOR, EID_ENEMY]);
        assert!(d.map.is_tile_blocked(Point::new(2, 1)));
        assert!(d.map.is_tile_blocked(Point::new(0, 1)));
        assert_eq!(
            d.map.player_events(Point::new(2, 0))[0].kind,
            EventKind::ExitMap
        );
    }

    #[test]
    fn color_table_is_a_bijection() {
        for &(rgb, kind) in &COLOR_TABLE {
            let px = Rgba([rgb[0], rgb[1], rgb[2], 255]);
            assert_eq!(kind_for_color(px), kind);
            assert_eq!(color_for_kind(kind), Some(px));
        }
        assert_eq!(color_for_kind(Kind::Abyss), None);
    }
}
