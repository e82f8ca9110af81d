//! Areas, equipment and characters
//!
//! This is the data the pet/progression layer owns and hands to a run. The
//! engine only reads it; nothing here changes during a run.

use serde::{Deserialize, Serialize};

use crate::sim::ProjectileKind;

/// Pet attribute that an area's monsters can be weak against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Speed,
    Wisdom,
    Strength,
    Clarity,
}

/// Base attributes trained by the pet layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub speed: u32,
    pub wisdom: u32,
    pub strength: u32,
    pub clarity: u32,
}

impl Attributes {
    pub fn get(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Speed => self.speed,
            Attribute::Wisdom => self.wisdom,
            Attribute::Strength => self.strength,
            Attribute::Clarity => self.clarity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Relative drop weight; higher difficulty moves weight off Common
    pub fn weight(&self, difficulty: u32) -> u32 {
        let d = difficulty;
        match self {
            Rarity::Common => 50 + 30u32.saturating_sub(d * 5),
            Rarity::Uncommon => 30,
            Rarity::Rare => 15 + d,
            Rarity::Epic => 4 + d,
            Rarity::Legendary => 1 + d / 3,
        }
    }
}

/// Flat bonuses granted by a piece of equipment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonuses {
    pub speed: u32,
    pub wisdom: u32,
    pub strength: u32,
    pub clarity: u32,
    pub attack_power: u32,
    pub defense: u32,
}

impl EquipmentBonuses {
    pub fn attribute(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Speed => self.speed,
            Attribute::Wisdom => self.wisdom,
            Attribute::Strength => self.strength,
            Attribute::Clarity => self.clarity,
        }
    }

    fn add(&mut self, other: &EquipmentBonuses) {
        self.speed = self.speed.saturating_add(other.speed);
        self.wisdom = self.wisdom.saturating_add(other.wisdom);
        self.strength = self.strength.saturating_add(other.strength);
        self.clarity = self.clarity.saturating_add(other.clarity);
        self.attack_power = self.attack_power.saturating_add(other.attack_power);
        self.defense = self.defense.saturating_add(other.defense);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub rarity: Rarity,
    pub bonuses: EquipmentBonuses,
}

/// The three equipment slots of a pet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedItems {
    pub weapon: Option<Equipment>,
    pub armor: Option<Equipment>,
    pub accessory: Option<Equipment>,
}

impl EquippedItems {
    /// Sum of all equipped bonuses
    pub fn bonuses(&self) -> EquipmentBonuses {
        let mut total = EquipmentBonuses::default();
        for item in [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .flatten()
        {
            total.add(&item.bonuses);
        }
        total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Scrapyard,
    Forest,
    Mountain,
    Ocean,
}

/// Scripted boss behaviour, fixed per area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossArchetype {
    /// Immune until enough charged hits break the shield, then briefly vulnerable
    Shielded,
    /// Charged hits summon minion waves; each cleared wave costs it a third of its health
    Summoner,
    /// Locks down behind a large minion wave at a health threshold
    WaveGated,
    /// No script; any hit damages it
    Brute,
}

impl BossArchetype {
    pub fn for_area_kind(kind: AreaKind) -> Self {
        match kind {
            AreaKind::Scrapyard => BossArchetype::Shielded,
            AreaKind::Forest => BossArchetype::Summoner,
            AreaKind::Mountain => BossArchetype::WaveGated,
            AreaKind::Ocean => BossArchetype::Brute,
        }
    }
}

/// Area metadata a run is played in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub kind: AreaKind,
    /// Attribute the area's monsters are weak against
    pub weakness: Attribute,
    /// 1-10
    pub difficulty: u32,
    pub boss: BossArchetype,
}

impl Area {
    pub fn new(id: &str, name: &str, kind: AreaKind, difficulty: u32) -> Self {
        let weakness = match kind {
            AreaKind::Scrapyard => Attribute::Clarity,
            AreaKind::Forest => Attribute::Speed,
            AreaKind::Mountain => Attribute::Strength,
            AreaKind::Ocean => Attribute::Wisdom,
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            weakness,
            difficulty,
            boss: BossArchetype::for_area_kind(kind),
        }
    }
}

/// All playable areas, four tiers per kind
pub fn areas() -> Vec<Area> {
    use AreaKind::*;
    [
        ("scrapyard_1", "Scrapyard", Scrapyard, 1),
        ("scrapyard_2", "Robot Factory", Scrapyard, 3),
        ("scrapyard_3", "Cyber Wasteland", Scrapyard, 5),
        ("scrapyard_4", "AI Core", Scrapyard, 8),
        ("forest_1", "Enchanted Forest", Forest, 1),
        ("forest_2", "Dark Woods", Forest, 3),
        ("forest_3", "Ancient Grove", Forest, 5),
        ("forest_4", "World Tree", Forest, 8),
        ("mountain_1", "Rocky Hills", Mountain, 1),
        ("mountain_2", "Caverns", Mountain, 3),
        ("mountain_3", "Frozen Peak", Mountain, 5),
        ("mountain_4", "Dragon's Lair", Mountain, 8),
        ("ocean_1", "Shallow Waters", Ocean, 1),
        ("ocean_2", "Coral Reef", Ocean, 3),
        ("ocean_3", "Deep Abyss", Ocean, 5),
        ("ocean_4", "Atlantis", Ocean, 8),
    ]
    .into_iter()
    .map(|(id, name, kind, difficulty)| Area::new(id, name, kind, difficulty))
    .collect()
}

pub fn find_area(id: &str) -> Option<Area> {
    areas().into_iter().find(|a| a.id == id)
}

/// Equipment that can drop from a run
pub fn equipment_pool() -> Vec<Equipment> {
    use EquipmentSlot::*;
    use Rarity::*;

    fn item(id: &str, name: &str, slot: EquipmentSlot, rarity: Rarity, bonuses: EquipmentBonuses) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: name.to_string(),
            slot,
            rarity,
            bonuses,
        }
    }
    let b = EquipmentBonuses::default();

    vec![
        item("wooden_sword", "Wooden Sword", Weapon, Common, EquipmentBonuses { attack_power: 5, ..b }),
        item("iron_sword", "Iron Sword", Weapon, Uncommon, EquipmentBonuses { attack_power: 10, strength: 2, ..b }),
        item("fiery_sword", "Fiery Sword", Weapon, Rare, EquipmentBonuses { attack_power: 20, strength: 5, ..b }),
        item("lightning_blade", "Lightning Blade", Weapon, Epic, EquipmentBonuses { attack_power: 35, speed: 10, ..b }),
        item("excalibur", "Excalibur", Weapon, Legendary, EquipmentBonuses { attack_power: 50, strength: 15, clarity: 10, ..b }),
        item("leather_armor", "Leather Armor", Armor, Common, EquipmentBonuses { defense: 5, ..b }),
        item("chainmail", "Chainmail", Armor, Uncommon, EquipmentBonuses { defense: 10, strength: 2, ..b }),
        item("golden_armor", "Golden Armor", Armor, Rare, EquipmentBonuses { defense: 20, clarity: 5, ..b }),
        item("dragon_armor", "Dragon Armor", Armor, Epic, EquipmentBonuses { defense: 35, strength: 8, wisdom: 5, ..b }),
        item("cosmic_armor", "Cosmic Armor", Armor, Legendary, EquipmentBonuses { defense: 50, speed: 10, wisdom: 10, clarity: 10, ..b }),
        item("lucky_charm", "Lucky Charm", Accessory, Common, EquipmentBonuses { speed: 3, ..b }),
        item("wisdom_ring", "Wisdom Ring", Accessory, Uncommon, EquipmentBonuses { wisdom: 8, clarity: 4, ..b }),
        item("power_amulet", "Power Amulet", Accessory, Rare, EquipmentBonuses { strength: 12, attack_power: 8, ..b }),
        item("speed_boots", "Speed Boots", Accessory, Epic, EquipmentBonuses { speed: 20, attack_power: 5, ..b }),
        item("crown_champions", "Crown of Champions", Accessory, Legendary, EquipmentBonuses { speed: 15, wisdom: 15, strength: 15, clarity: 15, ..b }),
    ]
}

/// A pet species and the projectile it throws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub projectile: ProjectileKind,
}

pub fn characters() -> Vec<Character> {
    [
        ("tralalero", "Shark with Legs", ProjectileKind::Default),
        ("bombardiro", "Bomber Crocodile", ProjectileKind::Waterball),
        ("tungtung", "Spoon Creature", ProjectileKind::Default),
        ("brrpatapim", "Cold Bird", ProjectileKind::Acorn),
        ("lirili", "Cat Fish", ProjectileKind::Default),
        ("capuchino", "Coffee Monkey", ProjectileKind::Banana),
        ("bombombini", "Explosive Penguin", ProjectileKind::Boomerang),
        ("trippatroppa", "Dancing Elephant", ProjectileKind::Default),
    ]
    .into_iter()
    .map(|(id, name, projectile)| Character {
        id: id.to_string(),
        name: name.to_string(),
        projectile,
    })
    .collect()
}

/// Projectile kind for a character id; unknown or missing ids throw the default shot
pub fn projectile_for_character(id: Option<&str>) -> ProjectileKind {
    id.and_then(|id| characters().into_iter().find(|c| c.id == id))
        .map(|c| c.projectile)
        .unwrap_or_default()
}
