use std::collections::BTreeMap;

use crate::error::{FlagdeckError, FlagdeckResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Geographic region a batch is selected from.
pub enum RegionId {
    /// African countries.
    Africa,
    /// Asian countries.
    Asia,
    /// European countries.
    Europe,
    /// North American and Caribbean countries.
    NorthAmerica,
    /// South American countries.
    SouthAmerica,
    /// Australia, Oceania and the Pacific islands.
    Oceania,
}

impl RegionId {
    /// All known regions, in catalog order.
    pub const ALL: [RegionId; 6] = [
        RegionId::Africa,
        RegionId::Asia,
        RegionId::Europe,
        RegionId::NorthAmerica,
        RegionId::SouthAmerica,
        RegionId::Oceania,
    ];

    /// Stable token used in archive file names and serialized data.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionId::Africa => "africa",
            RegionId::Asia => "asia",
            RegionId::Europe => "europe",
            RegionId::NorthAmerica => "north_america",
            RegionId::SouthAmerica => "south_america",
            RegionId::Oceania => "oceania",
        }
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One country in the catalog.
///
/// `country_id` is the ISO 3166-1 alpha-2 code the flag CDN is keyed by and
/// doubles as the entry's identity within a batch.
pub struct FlagEntry {
    /// Lowercase ISO 3166-1 alpha-2 code.
    pub country_id: String,
    /// Country name as printed on the card.
    pub display_name: String,
    /// Capital name as printed on the card.
    pub capital_name: String,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Static region-to-countries lookup table.
///
/// The catalog is read-only input to the pipeline; the built-in table is
/// embedded at compile time.
pub struct Catalog {
    regions: BTreeMap<RegionId, Vec<FlagEntry>>,
}

impl Catalog {
    /// Parse the catalog embedded in the crate.
    pub fn builtin() -> FlagdeckResult<Catalog> {
        Self::from_json(include_str!("../data/countries.json"))
    }

    /// Parse a catalog from its JSON form: a map of region token to entries.
    pub fn from_json(json: &str) -> FlagdeckResult<Catalog> {
        serde_json::from_str(json)
            .map_err(|e| FlagdeckError::validation(format!("parse country catalog: {e}")))
    }

    /// Countries listed for `region`; empty when the region has no entries.
    pub fn list_countries(&self, region: RegionId) -> &[FlagEntry] {
        self.regions.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Regions present in this catalog.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
