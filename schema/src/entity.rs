use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The six base stats, named the way the upstream catalog names them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    pub fn get(&self, stat: StatName) -> u32 {
        match stat {
            StatName::Hp => self.hp,
            StatName::Attack => self.attack,
            StatName::Defense => self.defense,
            StatName::SpecialAttack => self.sp_attack,
            StatName::SpecialDefense => self.sp_defense,
            StatName::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: StatName, value: u32) {
        let slot = match stat {
            StatName::Hp => &mut self.hp,
            StatName::Attack => &mut self.attack,
            StatName::Defense => &mut self.defense,
            StatName::SpecialAttack => &mut self.sp_attack,
            StatName::SpecialDefense => &mut self.sp_defense,
            StatName::Speed => &mut self.speed,
        };
        *slot = value;
    }

    /// Stats in canonical order (HP first, Speed last).
    pub fn iter(&self) -> impl Iterator<Item = (StatName, u32)> + '_ {
        StatName::iter().map(move |stat| (stat, self.get(stat)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, value)| value).sum()
    }
}

/// Lightweight pointer to a move, resolved lazily into a `MoveDetail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRef {
    pub name: String,
    pub detail_url: String,
}

/// Canonical species record. `id` is the catalog-wide key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub base_stats: BaseStats,
    pub height: u32, // Decimetres (tenths of a metre)
    pub weight: u32, // Hectograms (tenths of a kilogram)
    pub move_refs: Vec<MoveRef>,
    pub image_urls: Vec<String>, // Primary artwork first
}

impl Entity {
    pub fn attack(&self) -> u32 {
        self.base_stats.attack
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(type_name))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03} {} ({})", self.id, self.name, self.types.join(" / "))
    }
}
