use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::info;

use crate::biomes::classify;
use crate::context::{Action, TerrainContext};
use crate::tilemap::TileGrid;

/// Key bindings, in the order they are announced at startup.
const BINDINGS: [(Key, Action, &str); 7] = [
    (Key::R, Action::RandomizePlatform, "R: randomize (platform)"),
    (Key::M, Action::RandomizeUniform, "M: randomize (uniform)"),
    (Key::P, Action::RandomizeNoise, "P: randomize (perlin)"),
    (Key::L, Action::RandomizeLehmer, "L: randomize (lehmer)"),
    (Key::N, Action::Normalize, "N: normalize"),
    (Key::G, Action::LayeredGenerate, "G: layered generation (Shift: keep current map)"),
    (Key::Key1, Action::Reset, "1: reset"),
];

pub fn action_for_key(key: Key) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|(bound, _, _)| *bound == key)
        .map(|&(_, action, _)| action)
}

/// Run the interactive tilemap viewer.
/// Hold Shift with a randomize key to blend instead of overwrite.
pub fn run_viewer(mut ctx: TerrainContext, scale: usize) -> Result<(), minifb::Error> {
    let scale = scale.max(1);
    let window_width = ctx.width() * scale;
    let window_height = ctx.height() * scale;

    let mut window = Window::new(
        "Tilemap - R/M/P/L: Randomize, N: Normalize, G: Generate, 1: Reset, Esc: Exit",
        window_width,
        window_height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;

    // Limit to ~60fps
    window.set_target_fps(60);

    info!("Viewer started. Controls:");
    for (_, _, help) in BINDINGS.iter() {
        info!("  {}", help);
    }
    info!("  Hold Shift to layer (multiply) the random values");
    info!("  Esc: Exit");

    let mut buffer = vec![0u32; window_width * window_height];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let modifier = window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);

        if let Some(action) = window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .find_map(action_for_key)
        {
            ctx.apply(action, modifier);
        }

        render_frame(&ctx.read_grid(), scale, &mut buffer);

        window.update_with_buffer(&buffer, window_width, window_height)?;
    }

    Ok(())
}

/// Paint every tile as a `scale`×`scale` block of its biome color.
pub fn render_frame(grid: &TileGrid, scale: usize, buffer: &mut [u32]) {
    let row_stride = grid.width() * scale;
    for (x, y, &value) in grid.iter() {
        let color = classify(value).packed_color();
        for dy in 0..scale {
            let row = (y * scale + dy) * row_stride;
            let start = row + x * scale;
            buffer[start..start + scale].fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;

    #[test]
    fn test_every_action_has_one_key() {
        let actions = [
            Action::Reset,
            Action::RandomizePlatform,
            Action::RandomizeUniform,
            Action::RandomizeNoise,
            Action::RandomizeLehmer,
            Action::Normalize,
            Action::LayeredGenerate,
        ];
        for action in actions {
            let bound = BINDINGS.iter().filter(|(_, a, _)| *a == action).count();
            assert_eq!(bound, 1, "{:?}", action);
        }
        assert_eq!(action_for_key(Key::G), Some(Action::LayeredGenerate));
        assert_eq!(action_for_key(Key::Q), None);
    }

    #[test]
    fn test_render_frame_scales_tiles() {
        let mut grid = TileGrid::new(2, 1).unwrap();
        grid.set(0, 0, 0.0);
        grid.set(1, 0, 1.0);

        let mut buffer = vec![0u32; 4 * 2];
        render_frame(&grid, 2, &mut buffer);

        let water = Biome::DeepWater.packed_color();
        let peaks = Biome::HighMountains.packed_color();
        assert_eq!(buffer, vec![water, water, peaks, peaks, water, water, peaks, peaks]);
    }
}
