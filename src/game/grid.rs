use hecs::World;
use rand::Rng;

use super::location::Location;
use super::terrain::MapGenerator;

/// Glyph for cells outside the grid.
pub const OUT_OF_BOUNDS: &str = "⬛";

/// The world map: `rows × cols` locations plus a cached icon per cell.
///
/// The icon cache is only rebuilt by [`Grid::update_map_icons`]; between a
/// mutation and the next refresh it may be stale.
pub struct Grid {
    cells: Vec<Vec<Location>>,
    icons: Vec<Vec<String>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn create(size: (usize, usize), generator: &dyn MapGenerator) -> Self {
        let (rows, cols) = size;
        let cells = generator.generate(rows, cols);
        let icons = cells
            .iter()
            .map(|row| row.iter().map(|l| l.map_icon.clone()).collect())
            .collect();
        Self {
            cells,
            icons,
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn location(&self, (row, col): (usize, usize)) -> Option<&Location> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn location_mut(&mut self, (row, col): (usize, usize)) -> Option<&mut Location> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.cells.iter().flatten()
    }

    pub fn random_cell(&self, rng: &mut impl Rng) -> (usize, usize) {
        (rng.gen_range(0..self.rows), rng.gen_range(0..self.cols))
    }

    /// Recompute every cell's map icon from its current contents.
    pub fn update_map_icons(&mut self, world: &World) {
        for row in self.cells.iter_mut() {
            for location in row.iter_mut() {
                location.map_icon = location.resolve_icon(world);
            }
        }
        self.icons = self
            .cells
            .iter()
            .map(|row| row.iter().map(|l| l.map_icon.clone()).collect())
            .collect();
    }

    /// Cached icon at `(row, col)`; [`OUT_OF_BOUNDS`] outside the grid.
    pub fn icon_at(&self, row: i64, col: i64) -> &str {
        if !self.in_bounds(row, col) {
            return OUT_OF_BOUNDS;
        }
        self.icons
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .map(String::as_str)
            .unwrap_or(OUT_OF_BOUNDS)
    }

    /// One line per row, icons joined by spaces.
    pub fn map_string(&self) -> String {
        let mut map_str = String::new();
        for row in &self.icons {
            map_str.push_str(&row.join(" "));
            map_str.push('\n');
        }
        map_str
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Enemy, Species};
    use crate::ecs::items::Gear;
    use crate::game::location::Content;
    use crate::game::terrain::{FlatGenerator, CENTER_ICON, SURROUNDING_ICON};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn create_builds_rows_by_cols() {
        let grid = Grid::create((3, 4), &FlatGenerator);
        assert_eq!(grid.size(), (3, 4));
        assert_eq!(grid.locations().count(), 12);
        assert_eq!(grid.location((2, 3)).unwrap().coordinates, (2, 3));
        assert!(grid.location((3, 0)).is_none());
    }

    #[test]
    fn bounds_check_rejects_edges() {
        let grid = Grid::create((5, 5), &FlatGenerator);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(4, 4));
        assert!(!grid.in_bounds(-1, 2));
        assert!(!grid.in_bounds(2, 5));
        assert_eq!(grid.icon_at(-1, 0), OUT_OF_BOUNDS);
    }

    #[test]
    fn map_string_renders_one_line_per_row() {
        let grid = Grid::create((3, 3), &FlatGenerator);
        let expected = format!(
            "{s} {s} {s}\n{s} {c} {s}\n{s} {s} {s}\n",
            s = SURROUNDING_ICON,
            c = CENTER_ICON
        );
        assert_eq!(grid.map_string(), expected);
    }

    #[test]
    fn icons_are_stale_until_refreshed() {
        let mut world = World::new();
        let troll = world.spawn((Enemy::new(Species::Troll, "Troll", "🧟", 5, 3),));
        let mut grid = Grid::create((3, 3), &FlatGenerator);
        let location = grid.location_mut((0, 0)).unwrap();
        location.add_content(Content::Gear(Gear::new("Dagger", "").with_icon("🗡️")));
        location.add_content(Content::Enemy(troll));

        assert_eq!(grid.icon_at(0, 0), SURROUNDING_ICON);
        grid.update_map_icons(&world);
        assert_eq!(grid.icon_at(0, 0), "🧟");
        assert!(grid.map_string().starts_with("🧟 "));
    }

    #[test]
    fn random_cell_stays_inside() {
        let grid = Grid::create((4, 2), &FlatGenerator);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let (row, col) = grid.random_cell(&mut rng);
            assert!(row < 4 && col < 2);
        }
    }
}
