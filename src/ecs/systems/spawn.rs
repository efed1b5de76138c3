use hecs::{Entity, World};

use crate::ecs::components::{Enemy, Species};
use crate::ecs::items::Gear;

/// Build a fresh enemy of `species` standing in `cell`, carrying its loot table.
pub fn build_enemy(species: Species, cell: (usize, usize)) -> Enemy {
    // ── Stats by species ──────────────────────────────────────────────
    let (name, icon, health, power) = match species {
        Species::Goblin => ("Goblin", "👺", 1, 1),
        Species::Orc => ("Orc", "👹", 3, 2),
        Species::Troll => ("Troll", "🧟", 5, 3),
        Species::Dragon => ("Dragon", "🐉", 20, 10),
    };

    // ── Guaranteed drop ───────────────────────────────────────────────
    let drop = match species {
        Species::Goblin => Gear::new("Rusty Gobbo Dagger", "A rusty dagger that goblins use")
            .with_icon("🗡️")
            .with_stats(1, 0),
        Species::Orc => Gear::new("Orcish Armor", "Armor made from the hides of slain orcs")
            .with_icon("🛡️")
            .with_stats(0, 1),
        Species::Troll => Gear::new(
            "Troll Magic Circlet",
            "A circlet that enhances the magical abilities of trolls",
        )
        .with_icon("🔮")
        .with_stats(5, 3),
        Species::Dragon => Gear::new("Dragon Scales", "Armor made from the scales of a dragon")
            .with_icon("🐲")
            .with_stats(0, 5),
    };

    let mut enemy = Enemy::new(species, name, icon, health, power);
    enemy.drops.push(drop);
    enemy.cell = cell;
    enemy
}

/// Spawn an enemy entity. The caller places it on the grid and roster.
pub fn spawn_enemy(world: &mut World, species: Species, cell: (usize, usize)) -> Entity {
    world.spawn((build_enemy(species, cell),))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goblin_carries_the_rusty_dagger() {
        let goblin = build_enemy(Species::Goblin, (2, 2));
        assert_eq!(goblin.health, 1);
        assert_eq!(goblin.power, 1);
        assert_eq!(goblin.cell, (2, 2));
        assert_eq!(goblin.drops.len(), 1);
        assert_eq!(goblin.drops[0].name, "Rusty Gobbo Dagger");
        assert_eq!(goblin.drops[0].offense, 1);
    }

    #[test]
    fn every_species_has_exactly_one_drop() {
        for species in Species::ALL {
            let enemy = build_enemy(species, (0, 0));
            assert_eq!(enemy.drops.len(), 1, "{:?}", species);
            assert_eq!(enemy.species, species);
        }
    }

    #[test]
    fn dragon_is_the_boss() {
        let dragon = build_enemy(Species::Dragon, (0, 0));
        assert_eq!(dragon.fitness(), 30);
        assert_eq!(dragon.drops[0].defense, 5);
    }

    #[test]
    fn spawn_enemy_adds_entity() {
        let mut world = World::new();
        let entity = spawn_enemy(&mut world, Species::Troll, (1, 1));
        let troll = world.get::<&Enemy>(entity).unwrap();
        assert_eq!(troll.name, "Troll");
        assert_eq!(troll.cell, (1, 1));
    }
}
