use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::ecs::components::Enemy;
use crate::game::grid::Grid;
use crate::game::location::Content;

/// Step one axis by `delta`, staying put on that axis if it would leave the grid.
fn step_axis(current: usize, delta: i64, len: usize) -> usize {
    let next = current as i64 + delta;
    if next < 0 || next >= len as i64 {
        current
    } else {
        next as usize
    }
}

/// Runs the enemy wander system for a single tick.
///
/// Each enemy in `roster` rolls `move_chance` to step to a random
/// neighbouring cell. Axes are bounded independently, so an enemy on the
/// edge can still slide along it. Enemies never attack during a tick.
/// Returns the number of enemies that changed cell.
pub fn enemy_wander_system(
    world: &World,
    grid: &mut Grid,
    roster: &[Entity],
    rng: &mut StdRng,
    move_chance: f64,
) -> usize {
    let (rows, cols) = grid.size();
    let move_chance = move_chance.clamp(0.0, 1.0);
    let mut moved = 0;

    for &entity in roster {
        if !rng.gen_bool(move_chance) {
            continue;
        }
        let dx: i64 = rng.gen_range(-1..=1);
        let dy: i64 = rng.gen_range(-1..=1);

        let Ok(mut enemy) = world.get::<&mut Enemy>(entity) else {
            continue;
        };
        let (x, y) = enemy.cell;
        let target = (step_axis(x, dx, rows), step_axis(y, dy, cols));
        if target == (x, y) {
            continue;
        }

        if let Some(old) = grid.location_mut((x, y)) {
            old.remove_entity(entity);
        }
        if let Some(new) = grid.location_mut(target) {
            new.add_content(Content::Enemy(entity));
        }
        enemy.cell = target;
        moved += 1;
        debug!("{} moved to {:?}", enemy.name, target);
    }

    moved
}
