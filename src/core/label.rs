//! Label Normalization
//!
//! Turns an image file name into the answer the child is expected to give.

use std::path::Path;

/// Expected answer for an image file
///
/// Strips the directory and the last extension, trims surrounding
/// whitespace and lowercases: `"planets/Mercury.JPG"` → `"mercury"`.
pub fn normalize(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.trim().to_lowercase()
}

/// Title-cased caption for a label
pub fn display_name(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Letter-by-letter spelling drill: each letter, then the whole word
pub fn spell_out(label: &str) -> Vec<String> {
    let word = label.trim().to_uppercase();
    let mut sequence: Vec<String> = word
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_string())
        .collect();
    if !word.is_empty() {
        sequence.push(word);
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Mercury.JPG"), "mercury");
        assert_eq!(normalize("planetimages/Earth.png"), "earth");
        assert_eq!(normalize("  Passion Fruit .jpeg"), "passion fruit");
    }

    #[test]
    fn test_normalize_strips_only_last_extension() {
        assert_eq!(normalize("star.fruit.png"), "star.fruit");
        assert_eq!(normalize("Kiwi"), "kiwi");
    }

    #[test]
    fn test_normalize_idempotent() {
        for name in ["Mercury.JPG", " Saturn .png", "dir/Big Apple.jpeg", "NEPTUNE.Png"] {
            let once = normalize(name);
            let again = normalize(&format!("{}.jpg", once));
            assert_eq!(once, again, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("earth"), "Earth");
        assert_eq!(display_name("passion fruit"), "Passion Fruit");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_spell_out() {
        assert_eq!(spell_out("mars"), vec!["M", "A", "R", "S", "MARS"]);
        assert_eq!(
            spell_out("ice cream"),
            vec!["I", "C", "E", "C", "R", "E", "A", "M", "ICE CREAM"]
        );
        assert!(spell_out("   ").is_empty());
    }
}
