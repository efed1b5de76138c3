use noise::{NoiseFn, Simplex};

use super::biome::{self, NOISE_ORDER};
use super::location::Location;

pub const CENTER_ICON: &str = "🟨";
pub const SURROUNDING_ICON: &str = "🟦";

/// Strategy that lays out the cells of a new grid.
///
/// Implementations must return exactly `rows` rows of `cols` locations,
/// each carrying its own `(row, col)` coordinates.
pub trait MapGenerator {
    fn generate(&self, rows: usize, cols: usize) -> Vec<Vec<Location>>;
}

/// A plain world: one marked center cell surrounded by open water.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGenerator;

impl MapGenerator for FlatGenerator {
    fn generate(&self, rows: usize, cols: usize) -> Vec<Vec<Location>> {
        let center = (rows / 2, cols / 2);
        (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        if (row, col) == center {
                            Location::new("Center", "The center of the world", center)
                                .with_icon(CENTER_ICON)
                        } else {
                            Location::new("Surrounding", "The surrounding world", (row, col))
                                .with_icon(SURROUNDING_ICON)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Assigns a biome to every cell from simplex noise.
///
/// Noise value thresholds, after shifting by +0.5 and scaling by the number
/// of biomes, pick a slot in [`NOISE_ORDER`]; out-of-range values clamp to
/// the nearest end.
#[derive(Debug, Clone, Copy)]
pub struct NoiseGenerator {
    pub seed: u32,
    /// Controls terrain feature size
    pub scale: f64,
}

impl NoiseGenerator {
    pub fn new(seed: u32) -> Self {
        Self { seed, scale: 0.2 }
    }
}

impl MapGenerator for NoiseGenerator {
    fn generate(&self, rows: usize, cols: usize) -> Vec<Vec<Location>> {
        let noise_fn = Simplex::new(self.seed);
        let slots = NOISE_ORDER.len() as f64;

        (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let value = noise_fn.get([row as f64 * self.scale, col as f64 * self.scale]) + 0.5;
                        let slot = (value * slots).floor().clamp(0.0, slots - 1.0) as usize;
                        let biome = biome::biome_at(slot).unwrap_or(biome::MEADOWS);
                        Location::with_biome(biome, (row, col))
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_map_marks_the_center() {
        let cells = FlatGenerator.generate(5, 5);
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|row| row.len() == 5));
        assert_eq!(cells[2][2].name, "Center");
        assert_eq!(cells[2][2].map_icon, CENTER_ICON);
        assert_eq!(cells[0][4].name, "Surrounding");
        assert_eq!(cells[0][4].coordinates, (0, 4));
    }

    #[test]
    fn noise_generation_is_deterministic() {
        let a = NoiseGenerator::new(42).generate(8, 6);
        let b = NoiseGenerator::new(42).generate(8, 6);
        for row in 0..8 {
            for col in 0..6 {
                assert_eq!(a[row][col].biome, b[row][col].biome);
                assert_eq!(a[row][col].coordinates, (row, col));
            }
        }
    }

    #[test]
    fn noise_cells_always_have_a_biome() {
        let cells = NoiseGenerator::new(7).generate(10, 10);
        for row in &cells {
            for location in row {
                let biome = location.biome.expect("every noise cell has a biome");
                assert_eq!(location.name, biome.name);
                assert_eq!(location.map_icon, biome.icon);
            }
        }
    }
}
