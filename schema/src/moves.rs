use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully resolved move.
///
/// `power` and `accuracy` are `None` for moves the upstream catalog lists without
/// a value (status moves, fixed-damage moves and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDetail {
    pub name: String,
    pub move_type: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: u32,
    pub generation_label: String, // Roman numeral, e.g. "I", "IV"
}

impl MoveDetail {
    /// Name with hyphens replaced by spaces ("vine-whip" -> "vine whip").
    pub fn display_name(&self) -> String {
        self.name.replace('-', " ")
    }
}

impl fmt::Display for MoveDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = self.power.map_or_else(|| "-".to_string(), |p| p.to_string());
        let accuracy = self
            .accuracy
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        write!(
            f,
            "{} [{}] Pow: {} Acc: {} PP: {} Gen: {}",
            self.display_name(),
            self.move_type,
            power,
            accuracy,
            self.pp,
            self.generation_label
        )
    }
}
