use crate::game::location::LocationContent;

pub const GEAR_ICON: &str = "🛡️";
pub const CONSUMABLE_ICON: &str = "🍎";
pub const HEALTH_POTION_ICON: &str = "🍺";
pub const BARK_SKIN_ICON: &str = "🌿";

// ── Gear ─────────────────────────────────────────────────────────────

/// Equippable item. `offense` adds to base attack, `defense` to max health.
#[derive(Debug, Clone, PartialEq)]
pub struct Gear {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub offense: i32,
    pub defense: i32,
}

impl Gear {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            icon: GEAR_ICON.to_string(),
            offense: 0,
            defense: 0,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn with_stats(mut self, offense: i32, defense: i32) -> Self {
        self.offense = offense;
        self.defense = defense;
        self
    }
}

impl LocationContent for Gear {
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

// ── Consumables ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumableEffect {
    /// No effect beyond spending a charge.
    Inert,
    /// Restores health, clamped to max health.
    Heal(i32),
    /// Raises max health for the rest of the character's life.
    BarkSkin(i32),
}

/// Limited-charge item with an on-use effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumable {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub charges: u32,
    pub max_charges: u32,
    pub effect: ConsumableEffect,
}

impl Consumable {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            icon: CONSUMABLE_ICON.to_string(),
            charges: 1,
            max_charges: 1,
            effect: ConsumableEffect::Inert,
        }
    }

    pub fn health_potion(name: &str, description: &str, health_points: i32) -> Self {
        Self {
            icon: HEALTH_POTION_ICON.to_string(),
            effect: ConsumableEffect::Heal(health_points),
            ..Self::new(name, description)
        }
    }

    pub fn bark_skin_potion(name: &str, description: &str, defense_points: i32) -> Self {
        Self {
            icon: BARK_SKIN_ICON.to_string(),
            effect: ConsumableEffect::BarkSkin(defense_points),
            ..Self::new(name, description)
        }
    }

    pub fn with_charges(mut self, charges: u32) -> Self {
        self.charges = charges;
        self.max_charges = charges;
        self
    }
}

impl LocationContent for Consumable {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_defaults_to_shield_icon_and_no_stats() {
        let gear = Gear::new("Test Gear", "A test gear item");
        assert_eq!(gear.icon, GEAR_ICON);
        assert_eq!(gear.offense, 0);
        assert_eq!(gear.defense, 0);
    }

    #[test]
    fn health_potion_has_single_charge() {
        let potion = Consumable::health_potion("Health Potion", "Heals 2 health", 2);
        assert_eq!(potion.charges, 1);
        assert_eq!(potion.max_charges, 1);
        assert_eq!(potion.icon, HEALTH_POTION_ICON);
        assert_eq!(potion.effect, ConsumableEffect::Heal(2));
    }

    #[test]
    fn location_display_includes_icon_name_and_description() {
        let potion = Consumable::bark_skin_potion("Bark Skin", "Tough as oak", 1);
        assert_eq!(potion.location_display(), "🌿 Bark Skin is here. Tough as oak");
    }
}
