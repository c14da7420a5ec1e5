// ABOUTME: Image selector that picks photos from the hotel media library for a brief
// ABOUTME: Keyword-matches the brief to a category and samples without replacement

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use elbitat_core::{CampaignRequest, Goal, Platform};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

const SUNSET_KEYWORDS: &[&str] = &["sunset", "romantic", "evening", "view", "panorama", "vista"];

const PROPERTY_KEYWORDS: &[&str] = &[
    "yoga",
    "wellness",
    "spa",
    "relaxation",
    "meditation",
    "retreat",
    "hotel",
    "room",
    "property",
    "facility",
    "amenity",
    "pool",
    "terrace",
    "restaurant",
    "suite",
];

/// Library subfolder an image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Sunset,
    Property,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 2] = [ImageCategory::Sunset, ImageCategory::Property];

    pub fn folder_name(&self) -> &'static str {
        match self {
            ImageCategory::Sunset => "Sunset",
            ImageCategory::Property => "Elbitat",
        }
    }

    pub fn other(&self) -> ImageCategory {
        match self {
            ImageCategory::Sunset => ImageCategory::Property,
            ImageCategory::Property => ImageCategory::Sunset,
        }
    }

    /// Category suggested by the brief; sunset words take precedence
    pub fn detect(brief: &str) -> Option<ImageCategory> {
        let brief = brief.to_lowercase();
        if SUNSET_KEYWORDS.iter().any(|k| brief.contains(k)) {
            Some(ImageCategory::Sunset)
        } else if PROPERTY_KEYWORDS.iter().any(|k| brief.contains(k)) {
            Some(ImageCategory::Property)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for ImageCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunset" => Ok(ImageCategory::Sunset),
            "elbitat" | "property" | "hotel" => Ok(ImageCategory::Property),
            other => Err(format!("Unknown image category: {}", other)),
        }
    }
}

/// Number of images a request gets
pub fn image_count_for(request: &CampaignRequest) -> usize {
    if request.has_platform(Platform::Instagram) || request.has_platform(Platform::Facebook) {
        4
    } else {
        3
    }
}

pub struct ImageSelector {
    library: PathBuf,
}

impl ImageSelector {
    pub fn new(library: impl Into<PathBuf>) -> Self {
        Self {
            library: library.into(),
        }
    }

    pub fn library(&self) -> &Path {
        &self.library
    }

    /// Sorted image files of one category, or of every category when `None`
    pub fn list_images(&self, category: Option<ImageCategory>) -> Vec<PathBuf> {
        let categories: Vec<ImageCategory> = match category {
            Some(c) => vec![c],
            None => ImageCategory::ALL.to_vec(),
        };

        let mut images = Vec::new();
        for category in categories {
            let dir = self.library.join(category.folder_name());
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let is_image = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false);
                if is_image && path.is_file() {
                    images.push(path);
                }
            }
        }

        images.sort();
        images
    }

    /// Pick up to `count` images for a brief using the thread-local RNG
    pub fn select_images(
        &self,
        brief: &str,
        goal: Goal,
        count: usize,
        prefer: Option<ImageCategory>,
    ) -> Vec<PathBuf> {
        self.select_with_rng(brief, goal, count, prefer, &mut rand::thread_rng())
    }

    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        brief: &str,
        goal: Goal,
        count: usize,
        prefer: Option<ImageCategory>,
        rng: &mut R,
    ) -> Vec<PathBuf> {
        if count == 0 {
            return Vec::new();
        }

        let primary = prefer.or_else(|| ImageCategory::detect(brief));
        debug!(
            "Selecting {} images (goal: {}, category: {:?})",
            count, goal, primary
        );

        let mut selected: Vec<PathBuf> = match primary {
            Some(category) => {
                let primary_images = self.list_images(Some(category));
                let other_images = self.list_images(Some(category.other()));

                // Mostly the matching category, at least one from the other for variety
                let primary_count = (count - 1).max(count * 3 / 4);
                let mut picked: Vec<PathBuf> = primary_images
                    .choose_multiple(rng, primary_count)
                    .cloned()
                    .collect();
                let other_count = count.saturating_sub(picked.len());
                picked.extend(other_images.choose_multiple(rng, other_count).cloned());
                picked
            }
            None => self
                .list_images(None)
                .choose_multiple(rng, count)
                .cloned()
                .collect(),
        };

        // Top up from anything left when a category ran short
        if selected.len() < count {
            let remaining: Vec<PathBuf> = self
                .list_images(None)
                .into_iter()
                .filter(|p| !selected.contains(p))
                .collect();
            let missing = count - selected.len();
            selected.extend(remaining.choose_multiple(rng, missing).cloned());
        }

        if selected.is_empty() {
            warn!("No images found in media library {:?}", self.library);
        }
        selected
    }

    /// Images for a request, as stored on the draft
    pub fn select_for_request(&self, request: &CampaignRequest) -> Vec<String> {
        self.select_images(&request.brief, request.goal, image_count_for(request), None)
            .into_iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::TempDir;

    fn library(sunset: usize, property: usize) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (folder, n) in [("Sunset", sunset), ("Elbitat", property)] {
            fs::create_dir_all(dir.path().join(folder)).unwrap();
            for i in 0..n {
                fs::write(dir.path().join(folder).join(format!("img{}.jpg", i)), b"x").unwrap();
            }
        }
        fs::write(dir.path().join("Sunset").join("clip.MOV"), b"x").unwrap();
        dir
    }

    fn count_in(selected: &[PathBuf], folder: &str) -> usize {
        selected
            .iter()
            .filter(|p| p.parent().and_then(|d| d.file_name()).and_then(|n| n.to_str()) == Some(folder))
            .count()
    }

    #[test]
    fn test_detect_category() {
        assert_eq!(
            ImageCategory::detect("Relaxing sunset views and spa"),
            Some(ImageCategory::Sunset)
        );
        assert_eq!(
            ImageCategory::detect("Morning YOGA on the terrace"),
            Some(ImageCategory::Property)
        );
        assert_eq!(ImageCategory::detect("Ferry timetable update"), None);
    }

    #[test]
    fn test_list_images_filters_extensions() {
        let lib = library(2, 3);
        let selector = ImageSelector::new(lib.path());

        assert_eq!(selector.list_images(Some(ImageCategory::Sunset)).len(), 2);
        assert_eq!(selector.list_images(None).len(), 5);
    }

    #[test]
    fn test_sunset_brief_prefers_sunset_images() {
        let lib = library(10, 10);
        let selector = ImageSelector::new(lib.path());
        let mut rng = StdRng::seed_from_u64(7);

        let selected = selector.select_with_rng(
            "Relaxing sunset views and spa",
            Goal::Awareness,
            4,
            None,
            &mut rng,
        );

        assert_eq!(selected.len(), 4);
        assert_eq!(count_in(&selected, "Sunset"), 3);
        assert_eq!(count_in(&selected, "Elbitat"), 1);
    }

    #[test]
    fn test_preferred_category_overrides_keywords() {
        let lib = library(10, 10);
        let selector = ImageSelector::new(lib.path());
        let mut rng = StdRng::seed_from_u64(1);

        let selected = selector.select_with_rng(
            "sunset sunset sunset",
            Goal::Bookings,
            4,
            Some(ImageCategory::Property),
            &mut rng,
        );
        assert_eq!(count_in(&selected, "Elbitat"), 3);
    }

    #[test]
    fn test_short_inventory_returns_everything_available() {
        let lib = library(1, 1);
        let selector = ImageSelector::new(lib.path());

        let selected = selector.select_images("sunset", Goal::Awareness, 4, None);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_category_shortfall_is_topped_up() {
        let lib = library(1, 6);
        let selector = ImageSelector::new(lib.path());

        let selected = selector.select_images("sunset dinner", Goal::Awareness, 4, None);
        assert_eq!(selected.len(), 4);
        let mut unique = selected.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_empty_library_returns_nothing() {
        let dir = TempDir::new().unwrap();
        let selector = ImageSelector::new(dir.path().join("missing"));
        assert!(selector
            .select_images("anything", Goal::Awareness, 3, None)
            .is_empty());
    }

    #[test]
    fn test_image_count_for_request() {
        let ig = CampaignRequest::new("a", "b", vec![Platform::Instagram]);
        let tt = CampaignRequest::new("a", "b", vec![Platform::TikTok]);
        assert_eq!(image_count_for(&ig), 4);
        assert_eq!(image_count_for(&tt), 3);
    }
}
