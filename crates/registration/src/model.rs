use std::fmt;
use std::str::FromStr;

use net::EquipmentCode;
use serde::{Deserialize, Serialize};

use crate::error::EntryError;

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Primary key of a persisted player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(i32);

impl PlayerId {
    /// Parse operator input; only ASCII digits are accepted.
    pub fn parse(text: &str) -> Result<Self, EntryError> {
        let text = text.trim();
        if !all_digits(text) {
            return Err(EntryError::InvalidPlayerId);
        }
        match text.parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(EntryError::PlayerIdOutOfRange),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an equipment id typed by the operator.
pub fn parse_equipment(text: &str) -> Result<EquipmentCode, EntryError> {
    let text = text.trim();
    if !all_digits(text) {
        return Err(EntryError::InvalidEquipmentId);
    }
    text.parse::<u32>()
        .map(EquipmentCode)
        .map_err(|_| EntryError::EquipmentIdOutOfRange)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Green,
    Red,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Green, Team::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Green => "green",
            Team::Red => "red",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Team::Green => "Green Team",
            Team::Red => "Red Team",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(Team::Green),
            "red" => Ok(Team::Red),
            _ => Err(EntryError::InvalidTeam),
        }
    }
}
