//! Map image files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::MapSourceError;

pub const MAP_EXTENSION: &str = "png";

/// A directory of map images, served by index or as a shuffled bag.
#[derive(Debug, Clone)]
pub struct MapSource {
    files: Vec<PathBuf>,
    bag: Vec<usize>,
}

impl MapSource {
    /// Every file in `dir` with extension `ext` (case-insensitive), sorted by
    /// name.
    pub fn scan(dir: &Path, ext: &str) -> Result<Self, MapSourceError> {
        let io_err = |source| MapSourceError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(MapSourceError::Empty {
                dir: dir.to_path_buf(),
                ext: ext.to_string(),
            });
        }
        files.sort();
        log::info!("found {} maps in {}", files.len(), dir.display());
        Ok(Self {
            files,
            bag: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn load(&self, index: usize) -> Result<RgbaImage, MapSourceError> {
        let path = self.files.get(index).ok_or(MapSourceError::BadIndex {
            index,
            len: self.files.len(),
        })?;
        let img = image::open(path).map_err(|source| MapSourceError::Decode {
            path: path.clone(),
            source,
        })?;
        log::debug!("loaded map {}", path.display());
        Ok(img.to_rgba8())
    }

    /// Next index from the bag. Every map is drawn once before any repeats;
    /// the bag is reshuffled when it runs dry.
    pub fn next_index(&mut self, rng: &mut impl Rng) -> usize {
        if self.bag.is_empty() {
            self.bag = (0..self.files.len()).collect();
            self.bag.shuffle(rng);
        }
        self.bag.pop().unwrap_or(0)
    }

    pub fn load_random(&mut self, rng: &mut impl Rng) -> Result<RgbaImage, MapSourceError> {
        let index = self.next_index(rng);
        self.load(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn dir_with_maps(n: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..n {
            let img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
            img.save(dir.path().join(format!("map{i}.png"))).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not a map").unwrap();
        dir
    }

    #[test]
    fn scan_filters_by_extension() {
        let dir = dir_with_maps(3);
        let src = MapSource::scan(dir.path(), "PNG").unwrap();
        assert_eq!(src.len(), 3);
        assert_eq!(src.load(1).unwrap().dimensions(), (2, 2));
        assert!(matches!(
            src.load(3),
            Err(MapSourceError::BadIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn empty_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MapSource::scan(dir.path(), "png"),
            Err(MapSourceError::Empty { .. })
        ));
        assert!(matches!(
            MapSource::scan(&dir.path().join("missing"), "png"),
            Err(MapSourceError::Io { .. })
        ));
    }

    #[test]
    fn bag_cycles_without_repeats() {
        let dir = dir_with_maps(4);
        let mut src = MapSource::scan(dir.path(), "png").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..3 {
            let round: HashSet<usize> = (0..4).map(|_| src.next_index(&mut rng)).collect();
            assert_eq!(round.len(), 4);
        }
    }
}
