use hecs::{Entity, World};
use tracing::info;

use crate::game::enemies::EnemyManager;
use crate::game::grid::Grid;
use crate::game::location::Content;
use crate::game::terrain::MapGenerator;
use crate::protocol::OutboundMessage;

use super::components::{Character, Player};

/// Everything the simulation mutates: entities, the map, the active
/// player roster and the enemy manager.
pub struct GameWorld {
    pub ecs: World,
    pub grid: Grid,
    /// Joined players in join order, keyed by name.
    pub players: Vec<(String, Entity)>,
    pub enemies: EnemyManager,
}

/// Creates a new world with a generated map and the opening enemy roster.
pub fn create_world(size: (usize, usize), generator: &dyn MapGenerator, enemies: EnemyManager) -> GameWorld {
    let mut world = GameWorld::new(Grid::create(size, generator), enemies);

    // ── Seed enemies ─────────────────────────────────────────────────
    let GameWorld { ecs, grid, enemies, .. } = &mut world;
    enemies.initial_seed(ecs, grid);

    world.refresh_map();
    world
}

impl GameWorld {
    /// A world with no players and no enemies placed yet.
    pub fn new(grid: Grid, enemies: EnemyManager) -> Self {
        Self {
            ecs: World::new(),
            grid,
            players: Vec::new(),
            enemies,
        }
    }

    pub fn player_entity(&self, name: &str) -> Option<Entity> {
        self.players
            .iter()
            .find(|(player_name, _)| player_name == name)
            .map(|(_, entity)| *entity)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Spawn a fresh player at the center of the map and enlist it.
    pub fn spawn_player(&mut self, name: &str) -> Entity {
        let center = self.grid.center();
        let entity = self.ecs.spawn((Player, Character::new_player(name, center)));
        if let Some(location) = self.grid.location_mut(center) {
            location.add_content(Content::Player(entity));
        }
        self.players.push((name.to_string(), entity));
        info!("Player {} joined at {:?}", name, center);
        entity
    }

    /// Remove a slain player from the roster, the map and the world.
    pub fn handle_player_death(&mut self, entity: Entity) -> String {
        let Ok((name, position)) = self.ecs.get::<&Character>(entity).map(|c| (c.name.clone(), c.position)) else {
            return String::new();
        };

        self.players.retain(|(_, e)| *e != entity);
        let death_msg = format!("{} has died! 💀", name);
        if let Some(location) = self.grid.location_mut(position) {
            location.remove_entity(entity);
            location.send_message_to_contents(&self.ecs, &death_msg);
        }
        let _ = self.ecs.despawn(entity);
        info!("Player {} died at {:?}", name, position);

        format!("{}\n", death_msg)
    }

    /// Rebuild the map icon cache from current contents.
    pub fn refresh_map(&mut self) {
        self.grid.update_map_icons(&self.ecs);
    }

    /// Collect every message players received since the last drain.
    pub fn drain_mail(&mut self) -> Vec<OutboundMessage> {
        let mut mail = Vec::new();
        for (_entity, (_player, character)) in self.ecs.query_mut::<(&Player, &mut Character)>() {
            for text in character.take_mail() {
                mail.push(OutboundMessage {
                    player: character.name.clone(),
                    text,
                });
            }
        }
        mail
    }
}
