use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::ai::enemy_ai::enemy_wander_system;
use crate::ecs::components::{Enemy, Species};
use crate::ecs::systems::spawn::spawn_enemy;
use crate::game::grid::Grid;
use crate::game::location::Content;

pub const DEFAULT_MOVE_CHANCE: f64 = 0.10;

/// Per-species kill counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillCounts {
    pub goblin: u32,
    pub orc: u32,
    pub troll: u32,
    pub dragon: u32,
}

impl KillCounts {
    pub fn record(&mut self, species: Species) {
        match species {
            Species::Goblin => self.goblin += 1,
            Species::Orc => self.orc += 1,
            Species::Troll => self.troll += 1,
            Species::Dragon => self.dragon += 1,
        }
    }

    pub fn get(&self, species: Species) -> u32 {
        match species {
            Species::Goblin => self.goblin,
            Species::Orc => self.orc,
            Species::Troll => self.troll,
            Species::Dragon => self.dragon,
        }
    }
}

/// Owns the enemy roster, kill tallies and the randomness that drives
/// spawning, wandering and loot.
pub struct EnemyManager {
    roster: Vec<Entity>,
    kills: KillCounts,
    rng: StdRng,
    move_chance: f64,
}

impl EnemyManager {
    pub fn new(move_chance: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), move_chance)
    }

    pub fn seeded(seed: u64, move_chance: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), move_chance)
    }

    fn with_rng(rng: StdRng, move_chance: f64) -> Self {
        Self {
            roster: Vec::new(),
            kills: KillCounts::default(),
            rng,
            move_chance,
        }
    }

    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    pub fn kills(&self) -> KillCounts {
        self.kills
    }

    /// Spawn an enemy into `cell` and enlist it on the roster.
    pub fn spawn(&mut self, world: &mut World, grid: &mut Grid, species: Species, cell: (usize, usize)) -> Entity {
        let entity = spawn_enemy(world, species, cell);
        if let Some(location) = grid.location_mut(cell) {
            location.add_content(Content::Enemy(entity));
        }
        self.roster.push(entity);
        entity
    }

    /// Opening placement: goblin at the center, orc top-left, troll
    /// bottom-right and a dragon somewhere random.
    pub fn initial_seed(&mut self, world: &mut World, grid: &mut Grid) {
        let (rows, cols) = grid.size();
        let center = grid.center();
        self.spawn(world, grid, Species::Goblin, center);
        self.spawn(world, grid, Species::Orc, (0, 0));
        self.spawn(world, grid, Species::Troll, (rows - 1, cols - 1));
        let lair = grid.random_cell(&mut self.rng);
        self.spawn(world, grid, Species::Dragon, lair);
        info!("Seeded {} enemies; dragon lair at {:?}", self.roster.len(), lair);
    }

    /// Advance every enemy by one tick. Returns how many changed cell.
    pub fn update(&mut self, world: &World, grid: &mut Grid) -> usize {
        enemy_wander_system(world, grid, &self.roster, &mut self.rng, self.move_chance)
    }

    /// Retire a slain enemy: drop it from the roster and the grid, count the
    /// kill, respawn its species somewhere random and leave one of its drops
    /// where it fell.
    pub fn handle_death(&mut self, world: &mut World, grid: &mut Grid, entity: Entity) -> String {
        let Ok(enemy) = world.get::<&Enemy>(entity).map(|e| (*e).clone()) else {
            return String::new();
        };

        self.roster.retain(|&e| e != entity);
        if let Some(location) = grid.location_mut(enemy.cell) {
            location.remove_entity(entity);
        }
        let _ = world.despawn(entity);
        self.kills.record(enemy.species);

        let respawn_cell = grid.random_cell(&mut self.rng);
        self.spawn(world, grid, enemy.species, respawn_cell);
        info!(
            "{} slain at {:?}; respawned at {:?} ({} {} kills)",
            enemy.name,
            enemy.cell,
            respawn_cell,
            self.kills.get(enemy.species),
            enemy.species.as_str()
        );

        let mut msg = format!("💀{} has been defeated\n", enemy.name);
        if let Some(loot) = enemy.drops.choose(&mut self.rng) {
            msg.push_str(&format!("{} drops {}.\n", enemy.name, loot.name));
            if let Some(location) = grid.location_mut(enemy.cell) {
                location.add_content(Content::Gear(loot.clone()));
            }
        }
        msg
    }
}
