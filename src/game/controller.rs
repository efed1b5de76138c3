use hecs::Entity;
use tracing::{debug, info};

use crate::commands::CommandManager;
use crate::config::{GameConfig, TerrainKind};
use crate::ecs::components::Character;
use crate::ecs::systems::{combat, inventory, movement, status};
use crate::ecs::world::{create_world, GameWorld};
use crate::game::enemies::{EnemyManager, KillCounts};
use crate::game::terrain::{FlatGenerator, MapGenerator, NoiseGenerator};
use crate::protocol::{player_not_found, InboundCommand, OutboundMessage, CHEAT_PREFIX, NOT_AUTHORIZED};

/// Words that join the game instead of running a command.
pub const JOIN_KEYWORDS: [&str; 3] = ["join", "play", "playgame"];

/// The game controller: owns the world, resolves player names and routes
/// their input to the command dispatcher or the cheat path.
pub struct Game {
    pub name: String,
    world: GameWorld,
    commands: CommandManager,
    cheat_allow_list: Vec<String>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        info!("Initializing game {}", config.name);
        let enemies = match config.seed {
            Some(seed) => EnemyManager::seeded(seed, config.enemy_move_chance),
            None => EnemyManager::new(config.enemy_move_chance),
        };
        let generator: Box<dyn MapGenerator> = match config.terrain {
            TerrainKind::Flat => Box::new(FlatGenerator),
            TerrainKind::Noise => {
                let seed = config.seed.map(|s| s as u32).unwrap_or_else(rand::random);
                Box::new(NoiseGenerator::new(seed))
            }
        };
        let world = create_world(config.map_size(), generator.as_ref(), enemies);
        info!("Game {} initialized successfully! 🎮", config.name);
        Self::from_world(&config.name, world, config.cheat_allow_list.clone())
    }

    pub fn from_world(name: &str, world: GameWorld, cheat_allow_list: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            world,
            commands: CommandManager::new(),
            cheat_allow_list,
        }
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    // ── Players ──────────────────────────────────────────────────────

    pub fn is_playing(&self, name: &str) -> bool {
        self.world.player_entity(name).is_some()
    }

    pub fn player_names(&self) -> Vec<String> {
        self.world.player_names()
    }

    /// Add `name` to the game. Joining twice is harmless.
    pub fn join(&mut self, name: &str) -> String {
        if self.is_playing(name) {
            return format!("{} is already playing.", name);
        }
        let entity = self.world.spawn_player(name);
        self.world.refresh_map();

        let names = self.player_names();
        format!(
            "Welcome to the game! 🎮 Let's play!\n Players Online ({}):\n{}\nHere's the map:\n{}",
            names.len(),
            names.join("\n"),
            status::show_surroundings(&self.world, entity)
        )
    }

    fn with_player(&mut self, name: &str, f: impl FnOnce(&mut GameWorld, Entity) -> String) -> String {
        let Some(entity) = self.world.player_entity(name) else {
            return player_not_found(name);
        };
        let response = f(&mut self.world, entity);
        self.world.refresh_map();
        response
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Handle one raw `"<player> <command>"` line. `None` when there is
    /// nothing to say back (blank input or an ignored cheat).
    pub fn handle_input(&mut self, raw: &str) -> Option<OutboundMessage> {
        let inbound = InboundCommand::parse(raw)?;
        let keyword = inbound
            .text
            .trim_start_matches(CHEAT_PREFIX)
            .split_whitespace()
            .next()
            .unwrap_or_default();

        let response = if JOIN_KEYWORDS.contains(&keyword) {
            Some(self.join(&inbound.player))
        } else if inbound.is_cheat() {
            self.cheat(&inbound.player, &inbound.text)
        } else {
            Some(self.execute(&inbound.player, &inbound.text))
        };
        response.map(|text| OutboundMessage::new(&inbound.player, text))
    }

    /// Run a dispatcher command for `player`.
    pub fn execute(&mut self, player: &str, text: &str) -> String {
        debug!("{} > {}", player, text);
        let commands = &self.commands;
        let Some(entity) = self.world.player_entity(player) else {
            return player_not_found(player);
        };
        let response = commands.execute_command(&mut self.world, entity, text);
        self.world.refresh_map();
        response
    }

    /// Test-only commands behind the `!` prefix, limited to the allow-list.
    /// Unknown cheats are ignored.
    pub fn cheat(&mut self, player: &str, text: &str) -> Option<String> {
        if !self.cheat_allow_list.iter().any(|name| name == player) {
            return Some(NOT_AUTHORIZED.to_string());
        }
        let keyword = text.trim_start_matches(CHEAT_PREFIX).split_whitespace().next()?;
        match keyword {
            "heal" => Some(self.with_player(player, |world, entity| {
                match world.ecs.get::<&mut Character>(entity) {
                    Ok(mut character) => {
                        let missing = character.max_health - character.health;
                        combat::heal(&mut character, missing)
                    }
                    Err(_) => String::new(),
                }
            })),
            _ => {
                debug!("Ignoring unknown cheat {} from {}", keyword, player);
                None
            }
        }
    }

    // ── Simulation ───────────────────────────────────────────────────

    /// One background tick: enemies wander, then the map is redrawn.
    pub fn tick(&mut self) {
        let GameWorld { ecs, grid, enemies, .. } = &mut self.world;
        let moved = enemies.update(ecs, grid);
        if moved > 0 {
            debug!("Tick moved {} enemies", moved);
        }
        self.world.refresh_map();
    }

    pub fn map_string(&self) -> String {
        self.world.grid.map_string()
    }

    pub fn kill_counts(&self) -> KillCounts {
        self.world.enemies.kills()
    }

    /// Broadcasts players received since the last call.
    pub fn drain_outbound(&mut self) -> Vec<OutboundMessage> {
        self.world.drain_mail()
    }

    // ── Adapter wrappers ─────────────────────────────────────────────

    pub fn move_player(&mut self, player: &str, direction: &str) -> String {
        self.with_player(player, |world, entity| movement::move_character(world, entity, direction))
    }

    pub fn attack_enemy(&mut self, player: &str, target_name: &str) -> String {
        self.with_player(player, |world, entity| combat::attack(world, entity, target_name))
    }

    pub fn show_player_surroundings(&mut self, player: &str) -> String {
        self.with_player(player, |world, entity| status::show_surroundings(world, entity))
    }

    pub fn show_player_stats(&mut self, player: &str) -> String {
        self.with_player(player, |world, entity| {
            world
                .ecs
                .get::<&Character>(entity)
                .map(|c| status::stats_string(&c))
                .unwrap_or_default()
        })
    }

    pub fn show_player_inventory(&mut self, player: &str) -> String {
        self.with_player(player, |world, entity| {
            world
                .ecs
                .get::<&Character>(entity)
                .map(|c| status::inventory_string(&c))
                .unwrap_or_default()
        })
    }

    /// `{icon} {name} {hearts}` line for prompts.
    pub fn show_player_prompt(&mut self, player: &str) -> String {
        self.with_player(player, |world, entity| {
            world
                .ecs
                .get::<&Character>(entity)
                .map(|c| status::prompt_status(&c))
                .unwrap_or_default()
        })
    }

    pub fn take_item(&mut self, player: &str, item_name: &str) -> String {
        self.with_player(player, |world, entity| inventory::take_item(world, entity, item_name))
    }

    pub fn use_consumable(&mut self, player: &str, consumable_name: &str) -> String {
        self.with_player(player, |world, entity| match world.ecs.get::<&mut Character>(entity) {
            Ok(mut character) => inventory::use_consumable(&mut character, consumable_name),
            Err(_) => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Enemy, Species};
    use crate::ecs::items::Consumable;
    use crate::game::grid::Grid;
    use crate::game::location::Content;

    fn game() -> Game {
        let config = GameConfig {
            seed: Some(3),
            enemy_move_chance: 0.0,
            ..GameConfig::default()
        };
        Game::new(&config)
    }

    fn empty_game() -> Game {
        let world = GameWorld::new(Grid::create((5, 5), &FlatGenerator), EnemyManager::seeded(3, 0.0));
        Game::from_world("Test", world, vec!["blacklabel".to_string()])
    }

    fn character(game: &Game, name: &str) -> Character {
        let entity = game.world().player_entity(name).unwrap();
        (*game.world().ecs.get::<&Character>(entity).unwrap()).clone()
    }

    #[test]
    fn join_lists_online_players() {
        let mut game = game();
        game.join("Alice");
        let reply = game.join("Bob");
        assert!(reply.starts_with("Welcome to the game!"));
        assert!(reply.contains(" Players Online (2):\nAlice\nBob\n"));
        assert!(game.is_playing("Bob"));
    }

    #[test]
    fn rejoining_is_a_no_op() {
        let mut game = game();
        game.join("Tester");
        assert_eq!(game.join("Tester"), "Tester is already playing.");
        assert_eq!(game.player_names(), vec!["Tester".to_string()]);
    }

    #[test]
    fn commands_require_joining() {
        let mut game = game();
        let reply = game.handle_input("Ghost look").unwrap();
        assert_eq!(reply.player, "Ghost");
        assert_eq!(reply.text, player_not_found("Ghost"));
        assert_eq!(game.move_player("Ghost", "north"), player_not_found("Ghost"));
    }

    #[test]
    fn handle_input_routes_join_and_commands() {
        let mut game = empty_game();
        let joined = game.handle_input("Tester playgame").unwrap();
        assert!(joined.text.contains("Players Online (1)"));

        let moved = game.handle_input("Tester n").unwrap();
        assert_eq!(moved.text, "You move north.\n");
        assert_eq!(character(&game, "Tester").position, (1, 2));

        let unknown = game.handle_input("Tester dance").unwrap();
        assert_eq!(unknown.text, "Command not found");
    }

    #[test]
    fn walking_north_stops_at_the_edge() {
        let mut game = empty_game();
        game.join("Tester");
        assert_eq!(character(&game, "Tester").position, (2, 2));
        game.move_player("Tester", "north");
        assert_eq!(character(&game, "Tester").position, (1, 2));
        game.move_player("Tester", "north");
        let blocked = game.move_player("Tester", "north");
        assert!(blocked.starts_with("You cannot move north"));
        assert_eq!(character(&game, "Tester").position, (0, 2));
    }

    #[test]
    fn killing_the_goblin_drops_its_dagger() {
        let mut game = game();
        game.join("Tester");

        let msg = game.attack_enemy("Tester", "goblin");

        assert!(msg.contains("You attack Goblin with your bare hands! 💪"));
        assert!(msg.contains("Goblin attacks Tester 🫵!"));
        assert!(msg.contains("💀Goblin has been defeated"));
        assert_eq!(character(&game, "Tester").health, 2);
        assert_eq!(game.kill_counts().goblin, 1);

        let world = game.world();
        let goblins = world
            .enemies
            .roster()
            .iter()
            .filter(|&&e| world.ecs.get::<&Enemy>(e).map(|en| en.species == Species::Goblin).unwrap_or(false))
            .count();
        assert_eq!(goblins, 1);

        let took = game.take_item("Tester", "dagger");
        assert_eq!(took, "You pick up Rusty Gobbo Dagger.\n");
        assert!(game.show_player_inventory("Tester").contains("Rusty Gobbo Dagger"));
    }

    #[test]
    fn map_shows_strongest_enemy() {
        let game = game();
        let map = game.map_string();
        assert_eq!(map.lines().count(), 5);
        assert!(map.contains("👺"));
        assert!(map.contains("🐉"));
    }

    #[test]
    fn cheats_are_restricted_to_the_allow_list() {
        let mut game = empty_game();
        game.join("Tester");
        game.join("blacklabel");

        let denied = game.handle_input("Tester !heal").unwrap();
        assert_eq!(denied.text, NOT_AUTHORIZED);

        let entity = game.world().player_entity("blacklabel").unwrap();
        game.world_mut().ecs.get::<&mut Character>(entity).unwrap().health = 1;
        let healed = game.handle_input("blacklabel !heal").unwrap();
        assert_eq!(healed.text, "🩹 blacklabel heals 2 health (0 overhealed)! ❤️\n");
        assert_eq!(character(&game, "blacklabel").health, 3);

        assert!(game.handle_input("blacklabel !godmode").is_none());
    }

    #[test]
    fn use_consumable_through_the_controller() {
        let mut game = empty_game();
        game.join("Tester");
        let entity = game.world().player_entity("Tester").unwrap();
        {
            let mut tester = game.world_mut().ecs.get::<&mut Character>(entity).unwrap();
            tester.health = 1;
            tester.consumables.push(Consumable::health_potion("Health Potion", "Heals 2 health", 2));
        }
        assert_eq!(game.show_player_prompt("Tester"), "🧙‍♂️ Tester ❤️🩶🩶\n");
        let msg = game.use_consumable("Tester", "health");
        assert_eq!(msg, "You used 🍺 Health Potion and restored 2 health points.");
        assert_eq!(character(&game, "Tester").health, 3);
    }

    #[test]
    fn neighbours_hear_arrivals() {
        let mut game = empty_game();
        game.join("Alice");
        game.move_player("Alice", "east");
        game.join("Bob");
        game.drain_outbound();

        game.move_player("Bob", "east");

        let mail = game.drain_outbound();
        assert_eq!(mail, vec![OutboundMessage::new("Alice", "Bob arrives from the west.")]);
    }

    #[test]
    fn dead_players_leave_and_can_rejoin() {
        let mut game = empty_game();
        game.join("Tester");
        let entity = game.world().player_entity("Tester").unwrap();
        game.world_mut().ecs.get::<&mut Character>(entity).unwrap().health = 1;
        {
            let world = game.world_mut();
            let dragon = world.enemies.spawn(&mut world.ecs, &mut world.grid, Species::Dragon, (2, 2));
            assert!(world.grid.location((2, 2)).unwrap().contents.contains(&Content::Enemy(dragon)));
        }

        let msg = game.attack_enemy("Tester", "dragon");

        assert!(msg.contains("Tester has died! 💀"));
        assert!(!game.is_playing("Tester"));
        assert_eq!(game.show_player_stats("Tester"), player_not_found("Tester"));

        game.join("Tester");
        assert_eq!(character(&game, "Tester").health, 3);
    }

    #[test]
    fn tick_keeps_enemies_on_the_roster() {
        let config = GameConfig {
            seed: Some(8),
            enemy_move_chance: 1.0,
            ..GameConfig::default()
        };
        let mut game = Game::new(&config);
        for _ in 0..20 {
            game.tick();
        }
        assert_eq!(game.world().enemies.roster().len(), 4);
        assert_eq!(game.map_string().lines().count(), 5);
    }
}
