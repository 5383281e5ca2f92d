//! The model driven by terminal messages, with maps and saves on disk.

use std::path::Path;

use cairn::model::Scene;
use cairn::{AppContext, CairnModel};
use cairn_core::{Effect, Grid, Key, Model, Msg, Point};
use image::{Rgba, RgbaImage};

/// Player, floor, exit in a row.
fn write_map(dir: &Path) {
    let maps = dir.join("maps");
    std::fs::create_dir_all(&maps).unwrap();
    let colors = [[255, 255, 0, 255], [255, 255, 255, 255], [0, 0, 255, 255]];
    let img = RgbaImage::from_fn(3, 1, |x, _| Rgba(colors[x as usize]));
    img.save(maps.join("corridor.png")).unwrap();
}

fn press(model: &mut CairnModel, key: Key) -> Option<Effect> {
    model.update(Msg::key(key));
    model.update(Msg::tick(1.0))
}

fn started(dir: &Path) -> CairnModel {
    let mut model = CairnModel::new(AppContext::in_dir(dir));
    assert_eq!(model.update(Msg::Init), None);
    model
}

#[test]
fn missing_maps_fail_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = started(dir.path());
    assert!(matches!(model.scene(), Scene::Failed(_)));
    let mut grid = Grid::new(60, 20);
    model.draw(&mut grid);
    assert_eq!(press(&mut model, Key::Enter), Some(Effect::End));
}

#[test]
fn save_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    write_map(dir.path());

    let mut model = started(dir.path());
    assert_eq!(model.level().unwrap().player_tile(), Point::ZERO);
    press(&mut model, Key::ArrowRight);
    assert_eq!(model.level().unwrap().player_tile(), Point::new(1, 0));

    let mut grid = Grid::new(40, 16);
    model.draw(&mut grid);

    press(&mut model, Key::Escape);
    assert!(model.level().unwrap().is_paused());
    press(&mut model, Key::ArrowUp);
    assert_eq!(press(&mut model, Key::Enter), Some(Effect::End));
    assert!(dir.path().join("data").join("savefile.json").exists());

    let model = started(dir.path());
    assert_eq!(model.level().unwrap().player_tile(), Point::new(1, 0));
}

#[test]
fn reaching_the_exit_loads_the_next_level() {
    let dir = tempfile::tempdir().unwrap();
    write_map(dir.path());
    let mut model = started(dir.path());
    press(&mut model, Key::ArrowRight);
    press(&mut model, Key::ArrowRight);
    assert!(model.level().unwrap().current_screen().is_some());
    press(&mut model, Key::Enter);
    let level = model.level().unwrap();
    assert_eq!(level.stats().level, 2);
    assert_eq!(level.player_tile(), Point::ZERO);
}

#[test]
fn quitting_saves_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_map(dir.path());
    let mut model = started(dir.path());
    press(&mut model, Key::ArrowRight);
    assert_eq!(model.update(Msg::Quit), Some(Effect::End));
    let saved = model.context().saves.current().unwrap();
    assert_eq!(saved.map_layout.len(), 3);
    assert_eq!(saved.dungeon_stat("level"), Some(1));
}
