//! The on-disk asset layout, in one place.
//!
//! Every path the game reads or writes under the asset root is named here;
//! no other module concatenates asset path segments.

use std::path::{Path, PathBuf};

/// Side length of one sprite-sheet or atlas cell, in pixels. Sheet and
/// atlas dimensions are always integer multiples of this.
pub const CELL_SIZE: u32 = 48;

/// The tile atlas is a fixed 4x4 grid of `CELL_SIZE` cells.
pub const ATLAS_GRID: u32 = 4;

/// Directories ensured at startup, relative to the asset root. Order is
/// parent-first so the list doubles as creation order.
pub const ASSET_DIRS: [&str; 11] = [
    "images",
    "images/characters",
    "images/effects",
    "images/ui",
    "images/tiles",
    "sounds",
    "sounds/music",
    "sounds/sfx",
    "fonts",
    "maps",
    "saves",
];

pub fn character_sheet(root: &Path, name: &str) -> PathBuf {
    root.join("images")
        .join("characters")
        .join(format!("{name}_spritesheet.png"))
}

pub fn effect_sheet(root: &Path, name: &str) -> PathBuf {
    root.join("images")
        .join("effects")
        .join(format!("{name}_spritesheet.png"))
}

pub fn ui_element(root: &Path, name: &str) -> PathBuf {
    root.join("images").join("ui").join(format!("{name}.png"))
}

pub fn tileset(root: &Path) -> PathBuf {
    root.join("images").join("tiles").join("tileset.png")
}

/// Pre-namespacing location of the player sheet. Consulted once for
/// migration, never written.
pub fn legacy_player_sheet(root: &Path) -> PathBuf {
    root.join("images").join("player_spritesheet.png")
}

pub fn legacy_fireball_sheet(root: &Path) -> PathBuf {
    root.join("images").join("fireball_spritesheet.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_sheet_is_namespaced() {
        let path = character_sheet(Path::new("assets"), "fire_mage");
        assert_eq!(
            path,
            Path::new("assets/images/characters/fire_mage_spritesheet.png")
        );
    }

    #[test]
    fn legacy_paths_are_flat_under_images() {
        let root = Path::new("assets");
        assert_eq!(
            legacy_player_sheet(root),
            Path::new("assets/images/player_spritesheet.png")
        );
        assert_eq!(
            legacy_fireball_sheet(root),
            Path::new("assets/images/fireball_spritesheet.png")
        );
    }

    #[test]
    fn every_asset_dir_is_covered_by_the_list() {
        // All generated paths must land inside a directory the
        // bootstrapper creates.
        let root = Path::new("r");
        for path in [
            character_sheet(root, "slime"),
            effect_sheet(root, "fireball"),
            ui_element(root, "button"),
            tileset(root),
        ] {
            let parent = path.parent().unwrap().strip_prefix(root).unwrap();
            assert!(
                ASSET_DIRS.contains(&parent.to_str().unwrap()),
                "{} not covered",
                parent.display()
            );
        }
    }
}
