//! Label/value series handed to the charting front-end.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{FamilyRecord, TableRecord, Totals, VisitorRecord};

pub const MISSING_LABEL: &str = "(Sin dato)";
pub const CAPACITY_CHART_LIMIT: usize = 10;
pub const CHURCH_CHART_LIMIT: usize = 12;
pub const ROLE_CHART_LIMIT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorField {
    Name,
    Church,
    Family,
    HostFamily,
    Table,
    Role,
}

impl VisitorField {
    pub fn get(self, v: &VisitorRecord) -> Option<&str> {
        match self {
            Self::Name => v.name.as_deref(),
            Self::Church => v.church.as_deref(),
            Self::Family => v.family.as_deref(),
            Self::HostFamily => v.host_family.as_deref(),
            Self::Table => v.table.as_deref(),
            Self::Role => v.role.as_deref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StackedSeries {
    pub labels: Vec<String>,
    pub occupied: Vec<u64>,
    pub available: Vec<u64>,
}

/// Most frequent values of `field`, highest count first. Ties keep the order
/// in which the values were first seen.
pub fn top_n_counts(visitors: &[VisitorRecord], field: VisitorField, n: usize) -> Series {
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for v in visitors {
        let value = field.get(v).map(str::trim).unwrap_or("");
        let key = if value.is_empty() {
            MISSING_LABEL.to_string()
        } else {
            value.to_string()
        };
        match index.get(&key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(n);
    Series {
        labels: order.iter().map(|(k, _)| k.clone()).collect(),
        values: order.iter().map(|(_, c)| *c).collect(),
    }
}

pub fn family_capacity_series(families: &[FamilyRecord]) -> StackedSeries {
    let mut rows: Vec<&FamilyRecord> = families.iter().collect();
    rows.sort_by(|a, b| b.capacity.cmp(&a.capacity));
    rows.truncate(CAPACITY_CHART_LIMIT);
    StackedSeries {
        labels: rows
            .iter()
            .map(|f| f.name.clone().unwrap_or_default())
            .collect(),
        occupied: rows.iter().map(|f| u64::from(f.occupied)).collect(),
        available: rows
            .iter()
            .map(|f| u64::from(f.capacity.saturating_sub(f.occupied)))
            .collect(),
    }
}

/// Unlimited tables contribute no "available" stack.
pub fn table_capacity_series(tables: &[TableRecord]) -> StackedSeries {
    let mut rows: Vec<&TableRecord> = tables.iter().collect();
    rows.sort_by(|a, b| b.capacity.cmp(&a.capacity));
    rows.truncate(CAPACITY_CHART_LIMIT);
    StackedSeries {
        labels: rows
            .iter()
            .map(|t| t.label_or_empty().to_string())
            .collect(),
        occupied: rows.iter().map(|t| u64::from(t.occupied)).collect(),
        available: rows
            .iter()
            .map(|t| u64::from(t.capacity.saturating_sub(t.occupied)))
            .collect(),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OccupancySplit {
    pub capacity: u64,
    pub occupied: u64,
    pub free: u64,
}

impl OccupancySplit {
    pub fn percent_of_capacity(&self, value: u64) -> u64 {
        if self.capacity == 0 {
            return 0;
        }
        ((value as f64 / self.capacity as f64) * 100.0).round() as u64
    }
}

pub fn family_occupancy_split(totals: &Totals) -> OccupancySplit {
    let capacity = totals.family_capacity.unwrap_or(0);
    let occupied = totals.family_occupied.unwrap_or(0);
    OccupancySplit {
        capacity,
        occupied,
        free: capacity.saturating_sub(occupied),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChartSet {
    pub family_occupancy: OccupancySplit,
    pub family_capacity: StackedSeries,
    pub churches: Series,
    pub roles: Series,
    pub table_capacity: StackedSeries,
}

pub fn build_charts(
    totals: &Totals,
    families: &[FamilyRecord],
    tables: &[TableRecord],
    visitors: &[VisitorRecord],
) -> ChartSet {
    ChartSet {
        family_occupancy: family_occupancy_split(totals),
        family_capacity: family_capacity_series(families),
        churches: top_n_counts(visitors, VisitorField::Church, CHURCH_CHART_LIMIT),
        roles: top_n_counts(visitors, VisitorField::Role, ROLE_CHART_LIMIT),
        table_capacity: table_capacity_series(tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_church(church: Option<&str>) -> VisitorRecord {
        VisitorRecord {
            church: church.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn top_n_groups_blanks_and_keeps_first_seen_ties() {
        let visitors = vec![
            with_church(Some("Pica")),
            with_church(Some("Iquique")),
            with_church(None),
            with_church(Some(" Iquique ")),
            with_church(Some("  ")),
            with_church(Some("Arica")),
        ];
        let series = top_n_counts(&visitors, VisitorField::Church, 10);
        assert_eq!(series.labels, vec!["Iquique", MISSING_LABEL, "Pica", "Arica"]);
        assert_eq!(series.values, vec![2, 2, 1, 1]);
    }

    #[test]
    fn top_n_truncates() {
        let visitors: Vec<_> = (0..20)
            .map(|i| with_church(Some(&format!("Iglesia {i}"))))
            .collect();
        let series = top_n_counts(&visitors, VisitorField::Church, CHURCH_CHART_LIMIT);
        assert_eq!(series.labels.len(), 12);
    }

    #[test]
    fn table_series_skips_available_for_unlimited() {
        let tables = vec![
            TableRecord {
                label: Some("Libre".to_string()),
                capacity: 0,
                occupied: 9,
                ..Default::default()
            },
            TableRecord {
                label: Some("Grande".to_string()),
                capacity: 12,
                occupied: 4,
                ..Default::default()
            },
        ];
        let series = table_capacity_series(&tables);
        assert_eq!(series.labels, vec!["Grande", "Libre"]);
        assert_eq!(series.occupied, vec![4, 9]);
        assert_eq!(series.available, vec![8, 0]);
    }

    #[test]
    fn family_split_never_goes_negative() {
        let totals = Totals {
            family_capacity: Some(10),
            family_occupied: Some(14),
            ..Default::default()
        };
        let split = family_occupancy_split(&totals);
        assert_eq!(split.free, 0);
        assert_eq!(split.percent_of_capacity(split.occupied), 140);
    }
}
