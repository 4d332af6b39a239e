//! Content entities
//!
//! The closed set of content categories, each mapped to one table.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Services,
    Regions,
    News,
    Schedule,
    CompanyInfo,
}

/// Returned when the `entity` selector names no known table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntity(pub String);

impl Entity {
    /// Every entity, in aggregate-read order
    pub const ALL: [Entity; 5] = [
        Entity::Services,
        Entity::Regions,
        Entity::News,
        Entity::Schedule,
        Entity::CompanyInfo,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Entity::Services => "services",
            Entity::Regions => "regions",
            Entity::News => "news",
            Entity::Schedule => "schedule",
            Entity::CompanyInfo => "company_info",
        }
    }

    /// Column identifying a single row
    pub fn key_column(self) -> &'static str {
        match self {
            Entity::CompanyInfo => "key",
            _ => "id",
        }
    }

    /// `company_info` holds a fixed key set: no inserts, no deletes
    pub fn is_fixed(self) -> bool {
        matches!(self, Entity::CompanyInfo)
    }

    /// Parse the raw query selector; empty or unknown means "no entity"
    pub fn from_selector(selector: &str) -> Option<Entity> {
        selector.parse().ok()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Entity {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.table() == s)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}
