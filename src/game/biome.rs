/// A terrain kind used to decorate locations. Biomes carry no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Biome {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub index: u8,
}

// ── Catalog ──────────────────────────────────────────────────────────

pub const MEADOWS: Biome = Biome {
    name: "Meadows",
    icon: "🌾",
    description: "A gentle, rolling meadow.",
    index: 1,
};

pub const FOREST: Biome = Biome {
    name: "Forest",
    icon: "🌲",
    description: "A dense forest of trees.",
    index: 2,
};

pub const DESERT: Biome = Biome {
    name: "Desert",
    icon: "🟨",
    description: "A parched sea of sand.",
    index: 3,
};

pub const MOUNTAIN: Biome = Biome {
    name: "Mountain",
    icon: "⛰️",
    description: "A towering mountain range.",
    index: 4,
};

pub const OCEAN: Biome = Biome {
    name: "Ocean",
    icon: "🌊",
    description: "A vast, open ocean.",
    index: 5,
};

/// Order in which noise values map onto biomes, low to high.
pub const NOISE_ORDER: [Biome; 5] = [DESERT, MEADOWS, OCEAN, FOREST, MOUNTAIN];

/// Look up a biome by its slot in [`NOISE_ORDER`].
pub fn biome_at(slot: usize) -> Option<Biome> {
    NOISE_ORDER.get(slot).copied()
}
