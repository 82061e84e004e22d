use serde::Serialize;

// ───────────────────────────── Facility types ─────────────────────────────

/// Kind of place implied by the words around a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Airport,
    MilitaryBase,
    Base,
    Depot,
    Warehouse,
    Factory,
    PowerPlant,
    AirDefense,
    City,    // produced only by the keyword pass
    Generic, // no facility term near the mention
}

impl FacilityType {
    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airport => "airport",
            Self::MilitaryBase => "military_base",
            Self::Base => "base",
            Self::Depot => "depot",
            Self::Warehouse => "warehouse",
            Self::Factory => "factory",
            Self::PowerPlant => "power_plant",
            Self::AirDefense => "air_defense",
            Self::City => "city",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
