use std::fmt;

use serde::Serialize;

use crate::model::{FamilyRecord, TableRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    Unlimited,
    Available,
    Full,
}

impl OccupancyStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unlimited => "Ilimitada",
            Self::Available => "Disponible",
            Self::Full => "Completa",
        }
    }

    /// Accepts the published labels in Spanish or English.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ilimitada" | "ilimitado" | "unlimited" => Some(Self::Unlimited),
            "disponible" | "available" => Some(Self::Available),
            "completa" | "completo" | "full" => Some(Self::Full),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Success,
    Danger,
    Warning,
    Neutral,
}

impl Badge {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "bg-success",
            Self::Danger => "bg-danger",
            Self::Warning => "bg-warning",
            Self::Neutral => "bg-secondary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FreeSlots {
    Unbounded,
    Count(u32),
}

impl fmt::Display for FreeSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "∞"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

pub fn derive_status(capacity: u32, occupied: u32) -> OccupancyStatus {
    if capacity == 0 {
        OccupancyStatus::Unlimited
    } else if capacity > occupied {
        OccupancyStatus::Available
    } else {
        OccupancyStatus::Full
    }
}

pub fn free_slots(capacity: u32, occupied: u32) -> FreeSlots {
    if capacity == 0 {
        FreeSlots::Unbounded
    } else {
        FreeSlots::Count(capacity.saturating_sub(occupied))
    }
}

fn badge_for(status: Option<OccupancyStatus>) -> Badge {
    match status {
        Some(OccupancyStatus::Available) => Badge::Success,
        Some(OccupancyStatus::Full) => Badge::Danger,
        Some(OccupancyStatus::Unlimited) | None => Badge::Neutral,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub derived: OccupancyStatus,
    pub label: String,
    pub badge: Badge,
    pub free: FreeSlots,
}

/// The `estado` override only changes the label and badge; free slots are
/// always computed from capacity and occupants.
pub fn table_occupancy(table: &TableRecord) -> Occupancy {
    let derived = derive_status(table.capacity, table.occupied);
    let free = free_slots(table.capacity, table.occupied);
    match table
        .status_override
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(text) => Occupancy {
            derived,
            label: text.to_string(),
            badge: badge_for(OccupancyStatus::parse(text)),
            free,
        },
        None => Occupancy {
            derived,
            label: derived.label().to_string(),
            badge: badge_for(Some(derived)),
            free,
        },
    }
}

/// Floor-plan colour from the table's `status` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableLight {
    Available,
    Occupied,
    Reserved,
    OutOfService,
}

impl TableLight {
    pub fn from_status(status: Option<&str>) -> Self {
        match status.unwrap_or("").trim().to_lowercase().as_str() {
            "occupied" => Self::Occupied,
            "reserved" => Self::Reserved,
            "out-of-service" => Self::OutOfService,
            _ => Self::Available,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Available => "table-available",
            Self::Occupied => "table-occupied",
            Self::Reserved => "table-reserved",
            Self::OutOfService => "table-out-of-service",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FamilyOccupancy {
    pub percent: u32,
    pub band: Badge,
    /// `None` when the family published no capacity and no availability.
    pub available: Option<u32>,
}

pub fn family_percent(capacity: u32, occupied: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    let pct = (f64::from(occupied) * 100.0 / f64::from(capacity)).round();
    pct.min(100.0) as u32
}

pub fn family_occupancy(family: &FamilyRecord) -> FamilyOccupancy {
    let percent = family_percent(family.capacity, family.occupied);
    let band = if percent >= 100 {
        Badge::Danger
    } else if percent >= 70 {
        Badge::Warning
    } else {
        Badge::Success
    };
    let available = family.available.or_else(|| {
        (family.capacity > 0).then(|| family.capacity.saturating_sub(family.occupied))
    });
    FamilyOccupancy {
        percent,
        band,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(capacity: u32, occupied: u32, status_override: Option<&str>) -> TableRecord {
        TableRecord {
            capacity,
            occupied,
            status_override: status_override.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn zero_capacity_is_unlimited_regardless_of_occupants() {
        for occupied in [0, 3, 500] {
            let occ = table_occupancy(&table(0, occupied, None));
            assert_eq!(occ.derived, OccupancyStatus::Unlimited);
            assert_eq!(occ.free, FreeSlots::Unbounded);
            assert_eq!(occ.badge, Badge::Neutral);
            assert_eq!(occ.free.to_string(), "∞");
        }
    }

    #[test]
    fn full_and_available_tables() {
        let full = table_occupancy(&table(5, 5, None));
        assert_eq!(full.derived, OccupancyStatus::Full);
        assert_eq!(full.free, FreeSlots::Count(0));
        assert_eq!(full.label, "Completa");

        let open = table_occupancy(&table(5, 3, None));
        assert_eq!(open.derived, OccupancyStatus::Available);
        assert_eq!(open.free, FreeSlots::Count(2));
        assert_eq!(open.badge, Badge::Success);
    }

    #[test]
    fn overbooked_table_has_no_negative_slots() {
        let occ = table_occupancy(&table(4, 6, None));
        assert_eq!(occ.derived, OccupancyStatus::Full);
        assert_eq!(occ.free, FreeSlots::Count(0));
    }

    #[test]
    fn override_changes_label_but_not_free_slots() {
        let occ = table_occupancy(&table(5, 3, Some("Completa")));
        assert_eq!(occ.derived, OccupancyStatus::Available);
        assert_eq!(occ.label, "Completa");
        assert_eq!(occ.badge, Badge::Danger);
        assert_eq!(occ.free, FreeSlots::Count(2));
    }

    #[test]
    fn unknown_override_is_neutral_and_blank_override_is_ignored() {
        let occ = table_occupancy(&table(5, 3, Some("Reservada")));
        assert_eq!(occ.label, "Reservada");
        assert_eq!(occ.badge, Badge::Neutral);

        let occ = table_occupancy(&table(5, 3, Some("  ")));
        assert_eq!(occ.label, "Disponible");
    }

    #[test]
    fn table_light_defaults_to_available() {
        assert_eq!(TableLight::from_status(None), TableLight::Available);
        assert_eq!(
            TableLight::from_status(Some("Out-Of-Service")),
            TableLight::OutOfService
        );
        assert_eq!(TableLight::from_status(Some("?")), TableLight::Available);
    }

    #[test]
    fn family_bands_follow_percentage() {
        let fam = |capacity, occupied| FamilyRecord {
            capacity,
            occupied,
            ..Default::default()
        };
        assert_eq!(family_occupancy(&fam(10, 10)).band, Badge::Danger);
        assert_eq!(family_occupancy(&fam(10, 7)).band, Badge::Warning);
        assert_eq!(family_occupancy(&fam(10, 6)).band, Badge::Success);
        assert_eq!(family_occupancy(&fam(4, 9)).percent, 100);
        assert_eq!(family_occupancy(&fam(3, 2)).percent, 67);
        assert_eq!(family_occupancy(&fam(0, 2)).percent, 0);
        assert_eq!(family_occupancy(&fam(0, 2)).available, None);
        assert_eq!(family_occupancy(&fam(6, 2)).available, Some(4));
    }
}
