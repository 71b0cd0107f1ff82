//! Asset Catalog
//!
//! Maps category names to image folders and lists the pictures eligible
//! for practice.

use crate::config::Config;
use crate::core::label;
use crate::error::{PracticeError, PracticeResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Accepted image extensions (compared case-insensitively)
pub const VALID_EXTS: &[&str] = &["jpg", "jpeg", "png"];

/// One picture and the answer it expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeItem {
    pub file_name: String,
    pub path: PathBuf,
    pub label: String,
}

impl PracticeItem {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            path: dir.join(file_name),
            label: label::normalize(file_name),
        }
    }

    pub fn display_name(&self) -> String {
        label::display_name(&self.label)
    }
}

/// Raw result of a folder scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Eligible file names, sorted
    pub files: Vec<String>,
    /// Resolved folder, `None` when the category is not configured
    pub dir: Option<PathBuf>,
}

/// Immutable category → folder mapping rooted at one assets directory
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    categories: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>, categories: BTreeMap<String, String>) -> Self {
        Self {
            root: root.into(),
            categories,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.assets_dir, config.categories.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured category names
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Folder configured for a category (case-insensitive name lookup)
    pub fn resolve(&self, category: &str) -> Option<PathBuf> {
        self.lookup(category).map(|(_, folder)| self.root.join(folder))
    }

    /// Canonical spelling of a configured category name
    pub fn canonical_name(&self, category: &str) -> Option<&str> {
        self.lookup(category).map(|(name, _)| name)
    }

    fn lookup(&self, category: &str) -> Option<(&str, &str)> {
        self.categories
            .get_key_value(category)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(category))
            })
            .map(|(name, folder)| (name.as_str(), folder.as_str()))
    }

    /// Every eligible file directly inside the category folder
    ///
    /// Unknown categories and missing folders give an empty listing; the
    /// resolved folder is still reported when the category is configured.
    pub fn list_items(&self, category: &str) -> Listing {
        let Some(dir) = self.resolve(category) else {
            debug!("Category '{}' is not configured", category);
            return Listing::default();
        };

        if !dir.is_dir() {
            debug!("Folder for '{}' missing: {}", category, dir.display());
            return Listing {
                files: Vec::new(),
                dir: Some(dir),
            };
        }

        let files = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| match entry.file_name().to_str() {
                Some(name) => Some(name.to_string()),
                None => {
                    debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                    None
                }
            })
            .filter(|name| has_valid_extension(name))
            .collect();

        Listing {
            files,
            dir: Some(dir),
        }
    }

    /// Practice items for a category, or why there are none
    pub fn load(&self, category: &str) -> PracticeResult<Vec<PracticeItem>> {
        let listing = self.list_items(category);
        let Some(dir) = listing.dir else {
            return Err(PracticeError::UnknownCategory(category.to_string()));
        };
        if !dir.is_dir() {
            return Err(PracticeError::MissingFolder {
                category: category.to_string(),
                dir,
            });
        }
        if listing.files.is_empty() {
            return Err(PracticeError::NoImages { dir });
        }

        info!(
            "🖼️ Category '{}': {} pictures in {}",
            category,
            listing.files.len(),
            dir.display()
        );
        Ok(listing
            .files
            .iter()
            .map(|file| PracticeItem::new(&dir, file))
            .collect())
    }
}

/// Whether a file name carries one of [`VALID_EXTS`]
pub fn has_valid_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VALID_EXTS.iter().any(|valid| ext.eq_ignore_ascii_case(valid)))
        .unwrap_or(false)
}
