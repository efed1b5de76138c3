use std::fmt;

use hecs::Entity;

use crate::ecs::components::Character;
use crate::ecs::world::GameWorld;
use crate::game::location::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "south" | "s" => Some(Direction::South),
            "east" | "e" => Some(Direction::East),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }

    /// `(row, col)` offset. North is toward row 0.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step a character one cell in `direction`.
///
/// Out-of-bounds moves leave everything untouched. On success the old
/// cell hears the departure, the new cell hears the arrival, and the
/// character's position is re-read from the destination location.
pub fn move_character(world: &mut GameWorld, entity: Entity, direction: &str) -> String {
    let Some(dir) = Direction::parse(direction) else {
        return format!(
            "{} is not a direction. Try north, south, east or west.\n",
            direction.trim()
        );
    };
    let Ok((name, (row, col))) = world.ecs.get::<&Character>(entity).map(|c| (c.name.clone(), c.position)) else {
        return String::new();
    };

    let (dr, dc) = dir.offset();
    let (next_row, next_col) = (row as i64 + dr, col as i64 + dc);
    if !world.grid.in_bounds(next_row, next_col) {
        return format!("You cannot move {}, the edge of the world blocks your path.\n", dir);
    }
    let target = (next_row as usize, next_col as usize);

    if let Some(old) = world.grid.location_mut((row, col)) {
        old.remove_entity(entity);
        old.send_message_to_contents(&world.ecs, &format!("{} leaves to the {}.", name, dir));
    }
    let Some(new) = world.grid.location_mut(target) else {
        return String::new();
    };
    new.send_message_to_contents(&world.ecs, &format!("{} arrives from the {}.", name, dir.opposite()));
    new.add_content(Content::Player(entity));
    let coordinates = new.coordinates;

    if let Ok(mut character) = world.ecs.get::<&mut Character>(entity) {
        character.position = coordinates;
    }
    format!("You move {}.\n", dir)
}
