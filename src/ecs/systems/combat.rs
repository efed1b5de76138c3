use hecs::Entity;

use crate::ecs::components::{Character, Enemy};
use crate::ecs::world::GameWorld;
use crate::game::location::Content;

/// Something that can take damage and die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combatant {
    Player(Entity),
    Enemy(Entity),
}

impl Combatant {
    pub fn from_content(content: &Content) -> Option<Self> {
        match content {
            Content::Player(entity) => Some(Combatant::Player(*entity)),
            Content::Enemy(entity) => Some(Combatant::Enemy(*entity)),
            Content::Gear(_) | Content::Consumable(_) => None,
        }
    }

    pub fn entity(self) -> Entity {
        match self {
            Combatant::Player(entity) | Combatant::Enemy(entity) => entity,
        }
    }

    /// Apply `amount` damage dealt by `source`.
    ///
    /// Enemies always strike back at `source` before their own death is
    /// checked, so a killing blow still costs the attacker a hit.
    pub fn receive_damage(self, world: &mut GameWorld, source: Entity, amount: i32) -> String {
        match self {
            Combatant::Player(entity) => player_receive_damage(world, entity, amount),
            Combatant::Enemy(entity) => enemy_receive_damage(world, entity, source, amount),
        }
    }

    fn on_death(self, world: &mut GameWorld) -> String {
        match self {
            Combatant::Player(entity) => world.handle_player_death(entity),
            Combatant::Enemy(entity) => {
                let GameWorld { ecs, grid, enemies, .. } = world;
                enemies.handle_death(ecs, grid, entity)
            }
        }
    }
}

fn player_receive_damage(world: &mut GameWorld, entity: Entity, amount: i32) -> String {
    let (name, dead) = {
        let Ok(mut character) = world.ecs.get::<&mut Character>(entity) else {
            return String::new();
        };
        character.health = (character.health - amount).max(0);
        (character.name.clone(), !character.is_alive())
    };

    if dead {
        return Combatant::Player(entity).on_death(world);
    }
    format!("🫵 {} takes {} damage! 💥\n", name, amount)
}

fn enemy_receive_damage(world: &mut GameWorld, entity: Entity, source: Entity, amount: i32) -> String {
    let (name, power, health) = {
        let Ok(mut enemy) = world.ecs.get::<&mut Enemy>(entity) else {
            return String::new();
        };
        enemy.health = (enemy.health - amount).max(0);
        enemy.build_description();
        (enemy.name.clone(), enemy.power, enemy.health)
    };

    let mut msg = format!("{} receives {} damage 💥!\n", name, amount);

    // ── Counter-attack ───────────────────────────────────────────────
    let source_name = world.ecs.get::<&Character>(source).map(|c| c.name.clone());
    if let Ok(source_name) = source_name {
        msg.push_str(&format!("{} attacks {} 🫵!\n", name, source_name));
        msg.push_str(&Combatant::Player(source).receive_damage(world, entity, power));
    }

    if health == 0 {
        msg.push_str(&Combatant::Enemy(entity).on_death(world));
    } else {
        msg.push_str(&format!("❤️{} has {} health remaining\n", name, health));
    }
    msg
}

/// Heal by `amount`, clamped to max health. Reports the overheal, which is
/// negative when the heal fell short of max health.
pub fn heal(character: &mut Character, amount: i32) -> String {
    let raised = character.health + amount;
    let overheal = raised - character.max_health;
    character.health = raised.min(character.max_health);
    format!("🩹 {} heals {} health ({} overhealed)! ❤️\n", character.name, amount, overheal)
}

/// `attacker` strikes the first thing in its cell whose name contains
/// `target_name`, case-insensitively.
pub fn attack(world: &mut GameWorld, attacker: Entity, target_name: &str) -> String {
    let Ok((position, damage, bare_handed)) = world
        .ecs
        .get::<&Character>(attacker)
        .map(|c| (c.position, c.attack_damage(), c.gear.is_empty()))
    else {
        return String::new();
    };

    let needle = target_name.trim().to_lowercase();
    let not_found = format!("No enemy named {} found here", needle);
    if needle.is_empty() {
        return not_found;
    }
    let Some(location) = world.grid.location(position) else {
        return not_found;
    };

    let target = location
        .contents
        .iter()
        .filter(|c| c.entity() != Some(attacker))
        .find_map(|content| {
            let name = content.name(&world.ecs)?;
            name.to_lowercase()
                .contains(&needle)
                .then(|| (Combatant::from_content(content), name))
        });

    let (combatant, name) = match target {
        None => return not_found,
        Some((None, name)) => return format!("{} cannot be attacked", name),
        Some((Some(combatant), name)) => (combatant, name),
    };

    let mut msg = String::new();
    if bare_handed {
        msg.push_str(&format!("You attack {} with your bare hands! 💪\n", name));
    }
    msg.push_str(&combatant.receive_damage(world, attacker, damage));
    msg
}
