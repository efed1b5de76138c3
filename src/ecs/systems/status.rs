use hecs::Entity;

use crate::ecs::components::Character;
use crate::ecs::world::GameWorld;
use crate::game::grid::OUT_OF_BOUNDS;

/// Side length of the window `show_surroundings` renders around a player.
pub const VIEW_SIZE: usize = 5;

fn hearts(character: &Character) -> String {
    let missing = (character.max_health - character.health).max(0) as usize;
    format!("{}{}", "❤️".repeat(character.health.max(0) as usize), "🩶".repeat(missing))
}

/// Render the 5x5 window around the player followed by a description of
/// the cell they stand in and everything in it.
pub fn show_surroundings(world: &GameWorld, entity: Entity) -> String {
    let Ok(character) = world.ecs.get::<&Character>(entity) else {
        return String::new();
    };
    let (row, col) = (character.position.0 as i64, character.position.1 as i64);
    let lower = (VIEW_SIZE / 2) as i64;
    let upper = VIEW_SIZE.div_ceil(2) as i64;

    let mut surroundings = String::new();
    for r in (row - lower)..(row + upper) {
        for c in (col - lower)..(col + upper) {
            if !world.grid.in_bounds(r, c) {
                surroundings.push_str(OUT_OF_BOUNDS);
            } else if r == row && c == col {
                surroundings.push_str(&character.icon);
            } else {
                surroundings.push_str(world.grid.icon_at(r, c));
            }
        }
        surroundings.push('\n');
    }

    if let Some(location) = world.grid.location(character.position) {
        surroundings.push_str(&format!("You are at {}. {}\n", location.name, location.description));
        surroundings.push_str(&location.build_content_string(&world.ecs));
    }
    surroundings
}

pub fn stats_string(character: &Character) -> String {
    let mut gear = String::from("[Gear]\n");
    for item in &character.gear {
        gear.push_str(&format!("{} {} - {}\n", item.icon, item.name, item.description));
    }

    let mut stats = [
        format!("Player: {}", character.name),
        format!("Description: {}", character.description),
        format!("Attack: {}", "⚔️".repeat(character.attack_damage().max(0) as usize)),
        format!("Health: {}", hearts(character)),
        gear,
    ]
    .join("\n");

    stats.push_str("[Consumables]\n");
    for item in &character.consumables {
        stats.push_str(&format!("{} {} - {}\n", item.icon, item.name, item.description));
    }
    stats
}

pub fn inventory_string(character: &Character) -> String {
    character
        .gear
        .iter()
        .map(|g| format!("{} {} - {}\n", g.icon, g.name, g.description))
        .collect()
}

/// One-line status shown ahead of a player's prompt.
pub fn prompt_status(character: &Character) -> String {
    format!("{} {} {}\n", character.icon, character.name, hearts(character))
}
