use hecs::Entity;

use crate::ecs::components::{Character, StatusEffect};
use crate::ecs::items::{Consumable, ConsumableEffect, Gear};
use crate::ecs::world::GameWorld;
use crate::game::location::Content;

/// Heal granted by the potion a duplicate piece of gear turns into.
pub const DUPLICATE_GEAR_HEAL: i32 = 2;

fn article(name: &str) -> &'static str {
    match name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Equip `gear`, applying its stats.
///
/// Gear whose name is already held is never equipped twice; it turns into
/// a Health Potion instead and the character's stats stay as they were.
pub fn acquire_gear(character: &mut Character, gear: Gear) -> String {
    let mut msg = format!("You pick up {}.\n", gear.name);

    if character.gear.iter().any(|held| held.name == gear.name) {
        msg.push_str(&format!(
            "{} glows brightly then transforms in a flash, in its place is a Health Potion ❤️\n",
            gear.name
        ));
        acquire_consumable(
            character,
            Consumable::health_potion("Health Potion", "Heals 2 health", DUPLICATE_GEAR_HEAL),
        );
        return msg;
    }

    character.base_attack += gear.offense;
    character.max_health += gear.defense;
    character.gear.push(gear);
    character.refresh_gear_descriptor();
    msg
}

/// Unequip the first gear whose name matches `gear_name`, preferring an
/// exact case-insensitive match over a partial one, and reverse its stats.
pub fn relinquish_gear(character: &mut Character, gear_name: &str) -> Result<Gear, String> {
    let needle = gear_name.trim().to_lowercase();
    let not_found = || format!("No gear named {} found in your inventory", gear_name.trim());
    if needle.is_empty() {
        return Err(not_found());
    }

    let index = character
        .gear
        .iter()
        .position(|g| g.name.to_lowercase() == needle)
        .or_else(|| character.gear.iter().position(|g| g.name.to_lowercase().contains(&needle)))
        .ok_or_else(not_found)?;

    let gear = character.gear.remove(index);
    character.base_attack -= gear.offense;
    character.max_health -= gear.defense;
    character.health = character.health.min(character.max_health);
    character.refresh_gear_descriptor();
    Ok(gear)
}

pub fn acquire_consumable(character: &mut Character, consumable: Consumable) -> String {
    let msg = format!("You acquire {} {}", article(&consumable.name), consumable.name);
    character.consumables.push(consumable);
    msg
}

/// Use the first consumable whose name contains `consumable_name`.
/// The item spends one charge and leaves the inventory when none remain.
pub fn use_consumable(character: &mut Character, consumable_name: &str) -> String {
    let needle = consumable_name.trim().to_lowercase();
    let Some(index) = character
        .consumables
        .iter()
        .position(|c| !needle.is_empty() && c.name.to_lowercase().contains(&needle))
    else {
        return format!("No consumable named {} found in your inventory", consumable_name.trim());
    };

    let (name, icon, effect) = {
        let item = &character.consumables[index];
        (item.name.clone(), item.icon.clone(), item.effect)
    };

    let msg = match effect {
        ConsumableEffect::Heal(points) => {
            character.health = (character.health + points).min(character.max_health);
            format!("You used {} {} and restored {} health points.", icon, name, points)
        }
        ConsumableEffect::BarkSkin(points) => {
            character.max_health += points;
            character.status_effects.push(StatusEffect {
                name: name.clone(),
                defense: points,
            });
            format!("You used {} {} and gained {} defense points.", icon, name, points)
        }
        ConsumableEffect::Inert => format!("You used {} {}...... Talk to a dev.", icon, name),
    };

    let item = &mut character.consumables[index];
    item.charges = item.charges.saturating_sub(1);
    if item.charges == 0 {
        character.consumables.remove(index);
    }
    msg
}

/// Pick up the first item in the character's cell whose name contains `item_name`.
/// Characters and enemies never match as items.
pub fn take_item(world: &mut GameWorld, entity: Entity, item_name: &str) -> String {
    let needle = item_name.trim().to_lowercase();
    let not_found = format!("No item named {} found here", item_name.trim());
    let Ok(position) = world.ecs.get::<&Character>(entity).map(|c| c.position) else {
        return String::new();
    };
    if needle.is_empty() {
        return not_found;
    }
    let Some(location) = world.grid.location_mut(position) else {
        return not_found;
    };

    let matches = |content: &Content| {
        content.entity() != Some(entity)
            && content
                .name(&world.ecs)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
    };
    let Some(name) = location
        .contents
        .iter()
        .find(|c| c.is_item() && matches(c))
        .and_then(|c| c.name(&world.ecs))
    else {
        return match location.contents.iter().find(|c| matches(c)).and_then(|c| c.name(&world.ecs)) {
            Some(name) => format!("You cannot take {}", name),
            None => not_found,
        };
    };

    let Some(item) = location.remove_content(&world.ecs, &name) else {
        return not_found;
    };
    let Ok(mut character) = world.ecs.get::<&mut Character>(entity) else {
        return String::new();
    };
    match item {
        Content::Gear(gear) => acquire_gear(&mut character, gear),
        Content::Consumable(consumable) => format!("{}\n", acquire_consumable(&mut character, consumable)),
        Content::Player(_) | Content::Enemy(_) => not_found,
    }
}

/// Unequip gear and leave it lying in the character's cell.
pub fn drop_gear(world: &mut GameWorld, entity: Entity, gear_name: &str) -> String {
    let (gear, position) = {
        let Ok(mut character) = world.ecs.get::<&mut Character>(entity) else {
            return String::new();
        };
        match relinquish_gear(&mut character, gear_name) {
            Ok(gear) => (gear, character.position),
            Err(msg) => return msg,
        }
    };

    let msg = format!("You drop {}.\n", gear.name);
    if let Some(location) = world.grid.location_mut(position) {
        location.add_content(Content::Gear(gear));
    }
    msg
}
