use crate::ecs::items::{Consumable, Gear};
use crate::game::location::LocationContent;

pub const CHARACTER_ICON: &str = "👤";
pub const PLAYER_ICON: &str = "🧙‍♂️";
pub const PLAYER_HEALTH: i32 = 3;
pub const PLAYER_ATTACK: i32 = 1;
pub const GEAR_SLOTS: usize = 3;

// ── Marker Components ────────────────────────────────────────────────

/// Marks a `Character` entity as a joined player.
#[derive(Debug, Clone)]
pub struct Player;

// ── Characters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub name: String,
    pub defense: i32,
}

/// A combatant with health, attack, gear and consumables.
///
/// `position` is `(row, col)` on the grid and always mirrors the
/// coordinates of the location that holds the character.
#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub max_health: i32,
    pub health: i32,
    pub base_attack: i32,
    pub gear: Vec<Gear>,
    pub consumables: Vec<Consumable>,
    pub status_effects: Vec<StatusEffect>,
    pub position: (usize, usize),
    /// Messages delivered through `receive_message`, flushed by the controller.
    pub mailbox: Vec<String>,
}

impl Character {
    pub fn new(name: &str, description: &str, health: i32, attack_power: i32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            icon: CHARACTER_ICON.to_string(),
            max_health: health,
            health,
            base_attack: attack_power,
            gear: Vec::new(),
            consumables: Vec::new(),
            status_effects: Vec::new(),
            position: (0, 0),
            mailbox: Vec::new(),
        }
    }

    /// A fresh player with default stats, standing at `position`.
    pub fn new_player(name: &str, position: (usize, usize)) -> Self {
        let mut character = Self::new(name, "", PLAYER_HEALTH, PLAYER_ATTACK);
        character.icon = PLAYER_ICON.to_string();
        character.position = position;
        character.refresh_gear_descriptor();
        character
    }

    /// Base attack plus the offense of every equipped piece of gear.
    pub fn attack_damage(&self) -> i32 {
        self.base_attack + self.gear.iter().map(|g| g.offense).sum::<i32>()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Rebuild the inventory fullness glyphs: one 💎 per held gear, 💩 for the rest.
    pub fn refresh_gear_descriptor(&mut self) {
        let filled = self.gear.len().min(GEAR_SLOTS);
        let empty = GEAR_SLOTS - filled;
        self.description = format!("{}{}", "💎".repeat(filled), "💩".repeat(empty));
    }

    pub fn take_mail(&mut self) -> Vec<String> {
        std::mem::take(&mut self.mailbox)
    }
}

impl LocationContent for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn receive_message(&mut self, msg: &str) {
        self.mailbox.push(msg.to_string());
    }
}

// ── Enemies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Goblin,
    Orc,
    Troll,
    Dragon,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::Goblin, Species::Orc, Species::Troll, Species::Dragon];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Goblin => "goblin",
            Species::Orc => "orc",
            Species::Troll => "troll",
            Species::Dragon => "dragon",
        }
    }
}

/// A roaming enemy. `cell` is the grid location that currently holds it.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub species: Species,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub power: i32,
    pub health: i32,
    pub drops: Vec<Gear>,
    pub cell: (usize, usize),
}

impl Enemy {
    pub fn new(species: Species, name: &str, icon: &str, health: i32, power: i32) -> Self {
        let mut enemy = Self {
            species,
            name: name.to_string(),
            icon: icon.to_string(),
            description: String::new(),
            power,
            health,
            drops: Vec::new(),
            cell: (0, 0),
        };
        enemy.build_description();
        enemy
    }

    /// Score used to pick which enemy represents a crowded cell on the map.
    pub fn fitness(&self) -> i32 {
        self.power + self.health
    }

    pub fn build_description(&mut self) {
        self.description = format!("(❤️{} 💪{})", self.health, self.power);
    }
}

impl LocationContent for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn description(&self) -> &str {
        &self.description
    }
}
