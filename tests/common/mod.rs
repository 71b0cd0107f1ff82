#![allow(dead_code)]

pub mod mock_recognizer;
pub mod mock_tts;

use image::{Rgb, RgbImage};
use picwords::catalog::Catalog;
use picwords::picture::ImageLoader;
use picwords::practice::Collaborators;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub use mock_recognizer::MockRecognizer;
pub use mock_tts::MockTts;

pub const PLANETS: [&str; 8] = [
    "Mercury",
    "Venus",
    "Earth",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
];

/// Asset tree in a temp dir with real pictures
pub struct TestAssets {
    pub temp_dir: TempDir,
    pub catalog: Catalog,
}

impl TestAssets {
    /// Planets holds eight decodable JPEGs; Fruits is empty; Animals has no folder
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let planets = root.join("planetimages");
        std::fs::create_dir_all(&planets).expect("Failed to create planets dir");
        for (i, name) in PLANETS.iter().enumerate() {
            write_picture(&planets.join(format!("{}.jpg", name)), i as u8 * 30);
        }
        std::fs::write(planets.join("credits.txt"), "NASA").expect("Failed to write credits");

        std::fs::create_dir_all(root.join("fruitimages")).expect("Failed to create fruits dir");

        let catalog = Catalog::new(
            root,
            BTreeMap::from([
                ("Planets".to_string(), "planetimages".to_string()),
                ("Fruits".to_string(), "fruitimages".to_string()),
                ("Animals".to_string(), "animalimages".to_string()),
            ]),
        );
        Self { temp_dir, catalog }
    }

    /// Replace a planet picture with bytes that do not decode
    pub fn corrupt(&self, name: &str) {
        let path = self.temp_dir.path().join("planetimages").join(format!("{}.jpg", name));
        std::fs::write(path, b"not a jpeg").expect("Failed to corrupt picture");
    }

    pub fn collaborators(&self, tts: &MockTts, recognizer: &MockRecognizer) -> Collaborators {
        Collaborators {
            loader: Arc::new(ImageLoader::new(24, 16)),
            tts: Arc::new(tts.clone()),
            recognizer: Arc::new(recognizer.clone()),
        }
    }
}

pub fn write_picture(path: &Path, shade: u8) {
    RgbImage::from_pixel(32, 20, Rgb([shade, 128, 255 - shade]))
        .save(path)
        .expect("Failed to write picture");
}
