use hecs::{Entity, World};

use crate::ecs::components::{Character, Enemy};
use crate::ecs::items::{Consumable, Gear};
use crate::game::biome::Biome;

pub const DEFAULT_ICON: &str = "🟦";

/// Anything that can be placed in a [`Location`].
pub trait LocationContent {
    fn name(&self) -> &str;
    fn icon(&self) -> &str;
    fn description(&self) -> &str;

    fn location_display(&self) -> String {
        format!("{} {} is here. {}", self.icon(), self.name(), self.description())
    }

    /// Hook for broadcasts to everything in a location. No-op by default.
    fn receive_message(&mut self, _msg: &str) {}
}

/// One entry in a location's contents.
///
/// Characters and enemies live in the ECS world and are referenced by
/// entity; items are owned by the location directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Player(Entity),
    Enemy(Entity),
    Gear(Gear),
    Consumable(Consumable),
}

impl Content {
    /// Run `f` against the content's `LocationContent` view. Returns `None`
    /// when the referenced entity no longer exists.
    pub fn with_view<R>(&self, world: &World, f: impl FnOnce(&dyn LocationContent) -> R) -> Option<R> {
        match self {
            Content::Player(entity) => world.get::<&Character>(*entity).ok().map(|c| f(&*c)),
            Content::Enemy(entity) => world.get::<&Enemy>(*entity).ok().map(|e| f(&*e)),
            Content::Gear(gear) => Some(f(gear)),
            Content::Consumable(item) => Some(f(item)),
        }
    }

    pub fn name(&self, world: &World) -> Option<String> {
        self.with_view(world, |c| c.name().to_string())
    }

    pub fn entity(&self) -> Option<Entity> {
        match self {
            Content::Player(entity) | Content::Enemy(entity) => Some(*entity),
            Content::Gear(_) | Content::Consumable(_) => None,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Content::Gear(_) | Content::Consumable(_))
    }
}

/// One addressable cell of the world grid.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: String,
    pub description: String,
    pub coordinates: (usize, usize),
    pub default_icon: String,
    pub map_icon: String,
    pub biome: Option<Biome>,
    /// Arrival order is preserved.
    pub contents: Vec<Content>,
}

impl Location {
    pub fn new(name: &str, description: &str, coordinates: (usize, usize)) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            coordinates,
            default_icon: DEFAULT_ICON.to_string(),
            map_icon: DEFAULT_ICON.to_string(),
            biome: None,
            contents: Vec::new(),
        }
    }

    pub fn with_biome(biome: Biome, coordinates: (usize, usize)) -> Self {
        let mut location = Self::new(biome.name, biome.description, coordinates);
        location.biome = Some(biome);
        location.map_icon = biome.icon.to_string();
        location
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.default_icon = icon.to_string();
        self.map_icon = icon.to_string();
        self
    }

    /// Icon shown when nothing occupies the cell.
    pub fn base_icon(&self) -> &str {
        match &self.biome {
            Some(biome) => biome.icon,
            None => &self.default_icon,
        }
    }

    pub fn add_content(&mut self, content: Content) {
        self.contents.push(content);
    }

    /// Remove the first content whose name equals `name`.
    ///
    /// Identity is by name, not instance: with two identically named items
    /// the earlier arrival is the one removed.
    pub fn remove_content(&mut self, world: &World, name: &str) -> Option<Content> {
        let index = self
            .contents
            .iter()
            .position(|c| c.name(world).as_deref() == Some(name))?;
        Some(self.contents.remove(index))
    }

    /// Remove a character or enemy by its entity handle.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        match self.contents.iter().position(|c| c.entity() == Some(entity)) {
            Some(index) => {
                self.contents.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_enemies(&self) -> bool {
        self.contents.iter().any(|c| matches!(c, Content::Enemy(_)))
    }

    pub fn enemies(&self) -> Vec<Entity> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                Content::Enemy(entity) => Some(*entity),
                _ => None,
            })
            .collect()
    }

    /// Every content's `location_display()`, one per line.
    pub fn build_content_string(&self, world: &World) -> String {
        let mut content_str = String::new();
        for content in &self.contents {
            if let Some(line) = content.with_view(world, |c| c.location_display()) {
                content_str.push_str(&line);
                content_str.push('\n');
            }
        }
        content_str
    }

    /// Deliver `msg` to every content's `receive_message` hook.
    pub fn send_message_to_contents(&mut self, world: &World, msg: &str) {
        for content in &mut self.contents {
            match content {
                Content::Player(entity) => {
                    if let Ok(mut character) = world.get::<&mut Character>(*entity) {
                        character.receive_message(msg);
                    }
                }
                Content::Enemy(entity) => {
                    if let Ok(mut enemy) = world.get::<&mut Enemy>(*entity) {
                        enemy.receive_message(msg);
                    }
                }
                Content::Gear(gear) => gear.receive_message(msg),
                Content::Consumable(item) => item.receive_message(msg),
            }
        }
    }

    /// Pick the icon that represents this cell on the map.
    ///
    /// The strongest enemy by fitness wins (first one on ties), then the
    /// first content in arrival order, then the base icon.
    pub fn resolve_icon(&self, world: &World) -> String {
        let mut best: Option<(i32, String)> = None;
        for entity in self.enemies() {
            let Ok(enemy) = world.get::<&Enemy>(entity) else {
                continue;
            };
            let fitness = enemy.fitness();
            match &best {
                Some((top, _)) if *top >= fitness => {}
                _ => best = Some((fitness, enemy.icon.clone())),
            }
        }
        if let Some((_, icon)) = best {
            return icon;
        }

        self.contents
            .first()
            .and_then(|first| first.with_view(world, |c| c.icon().to_string()))
            .unwrap_or_else(|| self.base_icon().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Player, Species};
    use crate::game::biome;

    fn spawn_enemy(world: &mut World, name: &str, icon: &str, health: i32, power: i32) -> Entity {
        world.spawn((Enemy::new(Species::Goblin, name, icon, health, power),))
    }

    #[test]
    fn add_content_preserves_arrival_order() {
        let world = World::new();
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Gear(Gear::new("First", "")));
        location.add_content(Content::Gear(Gear::new("Second", "")));
        assert_eq!(location.contents[0].name(&world).as_deref(), Some("First"));
        assert_eq!(location.contents[1].name(&world).as_deref(), Some("Second"));
    }

    #[test]
    fn remove_content_takes_first_name_match() {
        let world = World::new();
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Gear(Gear::new("Dagger", "old").with_stats(1, 0)));
        location.add_content(Content::Gear(Gear::new("Dagger", "new").with_stats(2, 0)));

        let removed = location.remove_content(&world, "Dagger");
        match removed {
            Some(Content::Gear(gear)) => assert_eq!(gear.description, "old"),
            other => panic!("unexpected removal: {:?}", other),
        }
        assert_eq!(location.contents.len(), 1);
    }

    #[test]
    fn remove_content_without_match_is_noop() {
        let world = World::new();
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Gear(Gear::new("Dagger", "")));
        assert!(location.remove_content(&world, "Sword").is_none());
        assert_eq!(location.contents.len(), 1);
    }

    #[test]
    fn enemies_are_filtered_by_variant() {
        let mut world = World::new();
        let goblin = spawn_enemy(&mut world, "Goblin", "👺", 1, 1);
        let mut location = Location::new("Test", "A test place", (0, 0));
        assert!(!location.has_enemies());
        location.add_content(Content::Gear(Gear::new("Dagger", "")));
        location.add_content(Content::Enemy(goblin));
        assert!(location.has_enemies());
        assert_eq!(location.enemies(), vec![goblin]);
    }

    #[test]
    fn content_string_lists_every_display() {
        let world = World::new();
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Gear(Gear::new("Dagger", "Pointy")));
        location.add_content(Content::Consumable(Consumable::new("Apple", "Crunchy")));
        assert_eq!(
            location.build_content_string(&world),
            "🛡️ Dagger is here. Pointy\n🍎 Apple is here. Crunchy\n"
        );
    }

    #[test]
    fn broadcast_reaches_players_only() {
        let mut world = World::new();
        let player = world.spawn((Player, Character::new_player("Tester", (0, 0))));
        let goblin = spawn_enemy(&mut world, "Goblin", "👺", 1, 1);
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Player(player));
        location.add_content(Content::Enemy(goblin));
        location.add_content(Content::Gear(Gear::new("Dagger", "")));

        location.send_message_to_contents(&world, "A cold wind blows.");

        let character = world.get::<&Character>(player).unwrap();
        assert_eq!(character.mailbox, vec!["A cold wind blows.".to_string()]);
    }

    #[test]
    fn icon_prefers_fittest_enemy_over_items() {
        let mut world = World::new();
        let weak = spawn_enemy(&mut world, "Goblin", "👺", 1, 1);
        let strong = spawn_enemy(&mut world, "Troll", "🧟", 5, 3);
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Gear(Gear::new("Dagger", "").with_icon("🗡️")));
        location.add_content(Content::Enemy(weak));
        location.add_content(Content::Enemy(strong));
        assert_eq!(location.resolve_icon(&world), "🧟");
    }

    #[test]
    fn icon_tie_keeps_first_enemy() {
        let mut world = World::new();
        let first = spawn_enemy(&mut world, "Goblin", "👺", 2, 1);
        let second = spawn_enemy(&mut world, "Imp", "😈", 1, 2);
        let mut location = Location::new("Test", "A test place", (0, 0));
        location.add_content(Content::Enemy(first));
        location.add_content(Content::Enemy(second));
        assert_eq!(location.resolve_icon(&world), "👺");
    }

    #[test]
    fn icon_falls_back_to_first_content_then_biome() {
        let world = World::new();
        let mut location = Location::with_biome(biome::FOREST, (0, 0));
        assert_eq!(location.resolve_icon(&world), "🌲");
        location.add_content(Content::Gear(Gear::new("Dagger", "").with_icon("🗡️")));
        location.add_content(Content::Consumable(Consumable::new("Apple", "")));
        assert_eq!(location.resolve_icon(&world), "🗡️");
    }
}
