//! Placeholder asset synthesis.
//!
//! Each operation is idempotent (an existing target file is left untouched)
//! and atomic (the image is encoded to a `.tmp` sibling, then renamed into
//! place, so a crash mid-write never leaves a corrupt file at the final path).
//!
//! Legacy migration runs before synthesis: art that still lives under the
//! old flat `images/` layout is byte-copied to its namespaced path, so
//! hand-authored sheets always win over procedural placeholders.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use rand::Rng;

use fma_core::config::Rgb;

use crate::draw;
use crate::error::AssetError;
use crate::layout::{self, ATLAS_GRID, CELL_SIZE};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pixels trimmed from each side of a sheet cell before the fill.
const CELL_INSET: u32 = 5;
/// Radius of the white identification disc at each cell center.
const MARKER_RADIUS: i64 = 10;
const UI_CORNER_RADIUS: i64 = 8;
const UI_BORDER_THICKNESS: i64 = 2;
/// Added to every channel of a tile's base color to get its detail color.
const DETAIL_BOOST: u8 = 50;

/// Base colors of the 16 atlas cells, row-major. Entry order is the tile
/// index order maps and the renderer agree on.
pub const TILE_PALETTE: [Rgb; 16] = [
    [50, 50, 50],    // floor
    [100, 100, 100], // wall
    [0, 100, 200],   // water
    [0, 150, 0],     // grass
    [200, 200, 0],   // decoration
    [150, 75, 0],    // dirt
    [150, 150, 150], // stone
    [100, 0, 0],     // lava
    [200, 100, 0],   // sand
    [100, 50, 0],    // wood
    [50, 150, 200],  // ice
    [150, 0, 150],   // magic
    [50, 50, 150],   // crystal
    [200, 150, 100], // brick
    [0, 100, 0],     // bush
    [100, 100, 50],  // path
];

/// Enemy archetypes that need a placeholder sheet, with their identifying
/// fill color.
const ENEMY_ARCHETYPES: [(&str, Rgb); 3] = [
    ("slime", [255, 0, 0]),
    ("skeleton", [200, 200, 200]),
    ("golem", [150, 75, 0]),
];

/// UI chrome elements: name, canvas size, fill color.
const UI_ELEMENTS: [(&str, u32, u32, Rgb); 6] = [
    ("button", 200, 60, [80, 80, 100]),
    ("panel", 300, 200, [60, 60, 80]),
    ("frame", 100, 100, [100, 100, 120]),
    ("icon_health", 48, 48, [220, 50, 50]),
    ("icon_mana", 48, 48, [50, 100, 220]),
    ("icon_exp", 48, 48, [50, 200, 50]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Character,
    Effect,
    Ui,
    Tile,
}

/// One placeholder to guarantee on disk. Transient: built per synthesis
/// run, discarded once the file is settled.
struct AssetSpec {
    kind: AssetKind,
    path: PathBuf,
    width: u32,
    height: u32,
    color: Rgb,
}

/// What a synthesis run actually did, per file. A second run over the same
/// root reports zero writes and zero migrations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SynthReport {
    pub written: usize,
    pub migrated: usize,
    pub skipped: usize,
}

/// Guarantee every expected image exists under `root`: migrate legacy art
/// first, then synthesize whatever is still missing.
pub fn synthesize_all(root: &Path) -> Result<SynthReport, AssetError> {
    let mut report = SynthReport::default();

    migrate_legacy(
        &layout::legacy_player_sheet(root),
        &layout::character_sheet(root, "fire_mage"),
        &mut report,
    )?;
    migrate_legacy(
        &layout::legacy_fireball_sheet(root),
        &layout::effect_sheet(root, "fireball"),
        &mut report,
    )?;

    for spec in placeholder_specs(root) {
        ensure_spec(&spec, &mut report)?;
    }

    log::info!(
        "Placeholder synthesis done: {} written, {} migrated, {} already present",
        report.written,
        report.migrated,
        report.skipped
    );
    Ok(report)
}

fn placeholder_specs(root: &Path) -> Vec<AssetSpec> {
    let mut specs = vec![
        AssetSpec {
            kind: AssetKind::Character,
            path: layout::character_sheet(root, "fire_mage"),
            width: 192,
            height: 144,
            color: [255, 0, 0],
        },
        AssetSpec {
            kind: AssetKind::Effect,
            path: layout::effect_sheet(root, "fireball"),
            width: 192,
            height: 48,
            color: [255, 128, 0],
        },
    ];
    for (name, color) in ENEMY_ARCHETYPES {
        specs.push(AssetSpec {
            kind: AssetKind::Character,
            path: layout::character_sheet(root, name),
            width: 192,
            height: 48,
            color,
        });
    }
    for (name, width, height, color) in UI_ELEMENTS {
        specs.push(AssetSpec {
            kind: AssetKind::Ui,
            path: layout::ui_element(root, name),
            width,
            height,
            color,
        });
    }
    specs.push(AssetSpec {
        kind: AssetKind::Tile,
        path: layout::tileset(root),
        width: CELL_SIZE * ATLAS_GRID,
        height: CELL_SIZE * ATLAS_GRID,
        color: [0, 0, 0], // atlas cells take their colors from TILE_PALETTE
    });
    specs
}

fn ensure_spec(spec: &AssetSpec, report: &mut SynthReport) -> Result<(), AssetError> {
    if spec.path.exists() {
        report.skipped += 1;
        return Ok(());
    }
    match spec.kind {
        AssetKind::Character | AssetKind::Effect => {
            generate_sprite_sheet(&spec.path, spec.width, spec.height, spec.color)?
        }
        AssetKind::Ui => generate_ui_chrome(&spec.path, spec.width, spec.height, spec.color)?,
        AssetKind::Tile => generate_tile_atlas(&spec.path)?,
    }
    report.written += 1;
    Ok(())
}

/// Copy a legacy flat-layout file to its namespaced location. Runs only
/// when the legacy file exists and the target does not; the copy is
/// byte-for-byte, no decoding involved.
fn migrate_legacy(legacy: &Path, target: &Path, report: &mut SynthReport) -> Result<(), AssetError> {
    if !legacy.exists() || target.exists() {
        return Ok(());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
    }
    fs::copy(legacy, target).map_err(|e| AssetError::io(target, e))?;
    report.migrated += 1;
    log::info!(
        "Migrated legacy asset '{}' -> '{}'",
        legacy.display(),
        target.display()
    );
    Ok(())
}

/// Synthesize a sprite sheet placeholder and write it to `path`.
pub fn generate_sprite_sheet(
    path: &Path,
    width: u32,
    height: u32,
    color: Rgb,
) -> Result<(), AssetError> {
    write_png(path, &render_sprite_sheet(width, height, color))
}

pub fn generate_ui_chrome(
    path: &Path,
    width: u32,
    height: u32,
    color: Rgb,
) -> Result<(), AssetError> {
    write_png(path, &render_ui_chrome(width, height, color))
}

pub fn generate_tile_atlas(path: &Path) -> Result<(), AssetError> {
    write_png(path, &render_tile_atlas())
}

/// Transparent canvas partitioned into `CELL_SIZE` cells; each cell gets an
/// inset color fill, a 1px white outline on the inset rectangle, and a
/// white disc marker at the cell center.
pub fn render_sprite_sheet(width: u32, height: u32, color: Rgb) -> RgbaImage {
    debug_assert_eq!(width % CELL_SIZE, 0);
    debug_assert_eq!(height % CELL_SIZE, 0);

    let mut canvas = RgbaImage::new(width, height);
    let fill = opaque(color);
    let inset_side = CELL_SIZE - 2 * CELL_INSET;

    for row in 0..height / CELL_SIZE {
        for col in 0..width / CELL_SIZE {
            let x = (col * CELL_SIZE) as i64;
            let y = (row * CELL_SIZE) as i64;
            let inset = CELL_INSET as i64;
            draw::fill_rect(
                &mut canvas,
                x + inset,
                y + inset,
                inset_side,
                inset_side,
                fill,
            );
            draw::outline_rect(
                &mut canvas,
                x + inset,
                y + inset,
                inset_side,
                inset_side,
                WHITE,
            );
            let half = CELL_SIZE as i64 / 2;
            draw::fill_circle(&mut canvas, x + half, y + half, MARKER_RADIUS, WHITE);
        }
    }
    canvas
}

/// Filled rounded rectangle over the full canvas with a white rounded
/// border. Buttons, panels, frames and status icons all share this shape.
pub fn render_ui_chrome(width: u32, height: u32, color: Rgb) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    draw::fill_rounded_rect(&mut canvas, UI_CORNER_RADIUS, opaque(color));
    draw::outline_rounded_rect(&mut canvas, UI_CORNER_RADIUS, UI_BORDER_THICKNESS, WHITE);
    canvas
}

/// The 4x4 tile atlas. Cells take their base color from `TILE_PALETTE` by
/// index; an index past the palette (only possible for a larger grid) takes
/// a random color. The floor tile is speckled and the wall tile hatched in
/// a brightened detail color; every cell gets a 1px black border.
pub fn render_tile_atlas() -> RgbaImage {
    let size = CELL_SIZE * ATLAS_GRID;
    let mut canvas = RgbaImage::new(size, size);
    let mut rng = rand::thread_rng();
    let cell = CELL_SIZE as i64;

    for row in 0..ATLAS_GRID {
        for col in 0..ATLAS_GRID {
            let index = (row * ATLAS_GRID + col) as usize;
            let base: Rgb = if index < TILE_PALETTE.len() {
                TILE_PALETTE[index]
            } else {
                [rng.gen(), rng.gen(), rng.gen()]
            };
            let x = (col * CELL_SIZE) as i64;
            let y = (row * CELL_SIZE) as i64;
            draw::fill_rect(&mut canvas, x, y, CELL_SIZE, CELL_SIZE, opaque(base));
            draw::outline_rect(&mut canvas, x, y, CELL_SIZE, CELL_SIZE, BLACK);

            let detail = opaque(brighten(base));
            match index {
                // floor: scattered speckles
                0 => {
                    for _ in 0..5 {
                        let dx = rng.gen_range(5..=cell - 10);
                        let dy = rng.gen_range(5..=cell - 10);
                        draw::fill_circle(&mut canvas, x + dx, y + dy, 2, detail);
                    }
                }
                // wall: three horizontal mortar lines
                1 => {
                    for i in 0..3 {
                        draw::hline(&mut canvas, x + 5, x + cell - 5, y + 10 + i * 12, 2, detail);
                    }
                }
                _ => {}
            }
        }
    }
    canvas
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

fn brighten(color: Rgb) -> Rgb {
    [
        color[0].saturating_add(DETAIL_BOOST),
        color[1].saturating_add(DETAIL_BOOST),
        color[2].saturating_add(DETAIL_BOOST),
    ]
}

/// Encode to a `.tmp` sibling, then rename into place. The parent directory
/// is created if missing, so each generate operation stands alone.
fn write_png(path: &Path, canvas: &RgbaImage) -> Result<(), AssetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
    }
    let tmp = temporary_output_path(path);
    canvas
        .save_with_format(&tmp, image::ImageFormat::Png)
        .map_err(|e| AssetError::image(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| AssetError::io(path, e))?;
    log::info!(
        "Synthesized placeholder '{}' ({}x{})",
        path.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(())
}

fn temporary_output_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{file_name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::ensure_directories;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn test_temp_root(hint: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("fma_synth_test_{}_{}", hint, nanos))
    }

    // ---- Pure rendering ----

    #[test]
    fn sprite_sheet_cells_carry_fill_outline_and_marker() {
        let canvas = render_sprite_sheet(96, 48, [255, 0, 0]);
        // Outside the inset rectangle: transparent.
        assert_eq!(*canvas.get_pixel(0, 0), CLEAR);
        // Inset rectangle corner: white outline.
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
        // Just inside the outline: the sheet color.
        assert_eq!(*canvas.get_pixel(7, 7), Rgba([255, 0, 0, 255]));
        // Cell centers of both cells: white marker disc.
        assert_eq!(*canvas.get_pixel(24, 24), WHITE);
        assert_eq!(*canvas.get_pixel(72, 24), WHITE);
    }

    #[test]
    fn ui_chrome_is_rounded_and_bordered() {
        let canvas = render_ui_chrome(100, 100, [80, 80, 100]);
        assert_eq!(*canvas.get_pixel(0, 0), CLEAR);
        assert_eq!(*canvas.get_pixel(99, 99), CLEAR);
        assert_eq!(*canvas.get_pixel(50, 0), WHITE);
        assert_eq!(*canvas.get_pixel(50, 1), WHITE);
        assert_eq!(*canvas.get_pixel(50, 2), Rgba([80, 80, 100, 255]));
        assert_eq!(*canvas.get_pixel(50, 50), Rgba([80, 80, 100, 255]));
    }

    #[test]
    fn tile_atlas_has_fixed_shape_and_palette() {
        let canvas = render_tile_atlas();
        assert_eq!(canvas.dimensions(), (192, 192));
        // Cell borders are black.
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.get_pixel(47, 47), BLACK);
        // Floor cell interior near the border: base color (speckle centers
        // start at offset 5 with radius 2, so (2,2) is never speckled).
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([50, 50, 50, 255]));
        // Wall cell: base color off the mortar lines, detail color on them.
        assert_eq!(*canvas.get_pixel(50, 2), Rgba([100, 100, 100, 255]));
        assert_eq!(*canvas.get_pixel(60, 10), Rgba([150, 150, 150, 255]));
        assert_eq!(*canvas.get_pixel(60, 22), Rgba([150, 150, 150, 255]));
        assert_eq!(*canvas.get_pixel(60, 34), Rgba([150, 150, 150, 255]));
        // A decoration-free cell is pure base color inside the border.
        assert_eq!(*canvas.get_pixel(100, 2), Rgba([0, 100, 200, 255]));
    }

    // ---- Filesystem behavior ----

    #[test]
    fn fresh_root_gets_the_full_placeholder_set() {
        let root = test_temp_root("fresh");
        ensure_directories(&root).expect("bootstrap");
        let report = synthesize_all(&root).expect("synthesis");

        // player + fireball + 3 enemies + 6 ui + tileset
        assert_eq!(report.written, 12);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.skipped, 0);

        let player = layout::character_sheet(&root, "fire_mage");
        assert_eq!(image::image_dimensions(&player).expect("dims"), (192, 144));
        let atlas = layout::tileset(&root);
        assert_eq!(image::image_dimensions(&atlas).expect("dims"), (192, 192));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn second_run_performs_zero_writes() {
        let root = test_temp_root("idempotent");
        ensure_directories(&root).expect("bootstrap");
        synthesize_all(&root).expect("first run");

        let player = layout::character_sheet(&root, "fire_mage");
        let atlas = layout::tileset(&root);
        let player_bytes = fs::read(&player).expect("player bytes");
        let atlas_bytes = fs::read(&atlas).expect("atlas bytes");

        let report = synthesize_all(&root).expect("second run");
        assert_eq!(report.written, 0);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.skipped, 12);
        assert_eq!(fs::read(&player).expect("player again"), player_bytes);
        assert_eq!(fs::read(&atlas).expect("atlas again"), atlas_bytes);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn legacy_sheet_is_preserved_verbatim() {
        let root = test_temp_root("legacy");
        ensure_directories(&root).expect("bootstrap");
        // Arbitrary bytes: migration must copy without decoding.
        let legacy_bytes = b"hand-authored art, trust me".to_vec();
        fs::write(layout::legacy_player_sheet(&root), &legacy_bytes).expect("legacy");

        let report = synthesize_all(&root).expect("synthesis");
        assert_eq!(report.migrated, 1);
        // fire_mage was settled by migration, so it is skipped, not drawn.
        assert_eq!(report.skipped, 1);
        assert_eq!(report.written, 11);

        let target = layout::character_sheet(&root, "fire_mage");
        assert_eq!(fs::read(&target).expect("target"), legacy_bytes);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn migration_skipped_when_target_already_exists() {
        let root = test_temp_root("no_clobber");
        ensure_directories(&root).expect("bootstrap");
        let target = layout::character_sheet(&root, "fire_mage");
        synthesize_all(&root).expect("first run");
        let synthesized_bytes = fs::read(&target).expect("target bytes");

        fs::write(layout::legacy_player_sheet(&root), b"late arrival").expect("legacy");
        let report = synthesize_all(&root).expect("second run");
        assert_eq!(report.migrated, 0);
        assert_eq!(fs::read(&target).expect("target intact"), synthesized_bytes);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn generate_creates_missing_parent_directories() {
        let root = test_temp_root("no_bootstrap");
        let path = root.join("deep").join("nested").join("sheet.png");
        generate_sprite_sheet(&path, 48, 48, [10, 20, 30]).expect("generate");
        assert_eq!(image::image_dimensions(&path).expect("dims"), (48, 48));
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn no_temporary_files_survive_a_run() {
        let root = test_temp_root("tmp_clean");
        ensure_directories(&root).expect("bootstrap");
        synthesize_all(&root).expect("synthesis");

        let mut pending = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("read_dir") {
                let path = entry.expect("entry").path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    assert_ne!(
                        path.extension().and_then(|e| e.to_str()),
                        Some("tmp"),
                        "stray temp file {}",
                        path.display()
                    );
                }
            }
        }

        fs::remove_dir_all(&root).ok();
    }
}
