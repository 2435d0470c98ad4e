//! Tables sectioned by floor and area, plus seat layout for each card.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;

use crate::model::{TableRecord, VisitorRecord};

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

fn primary_key(value: &str) -> Vec<char> {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}

/// Dictionary-style ordering: accents and case only break ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableGroup {
    pub floor: i64,
    pub area: String,
    pub tables: Vec<TableRecord>,
}

impl TableGroup {
    pub fn title(&self) -> String {
        format!("Piso {} — {}", self.floor, self.area)
    }
}

/// Ordered floor/area sections. Iterating does not consume the groups, so
/// the sequence can be walked any number of times.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableGroups(Vec<TableGroup>);

impl TableGroups {
    pub fn iter(&self) -> std::slice::Iter<'_, TableGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<(i64, &str)> {
        self.0.iter().map(|g| (g.floor, g.area.as_str())).collect()
    }
}

impl<'a> IntoIterator for &'a TableGroups {
    type Item = &'a TableGroup;
    type IntoIter = std::slice::Iter<'a, TableGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Groups by `(floor, area)`, sorts sections by floor then area and the
/// tables inside each section by label. Sorting is stable, so tables with the
/// same label keep their input order.
pub fn group_tables(tables: &[TableRecord]) -> TableGroups {
    let mut groups: Vec<TableGroup> = Vec::new();
    for table in tables {
        let area = table.area_or_default();
        match groups
            .iter_mut()
            .find(|g| g.floor == table.floor && g.area == area)
        {
            Some(group) => group.tables.push(table.clone()),
            None => groups.push(TableGroup {
                floor: table.floor,
                area,
                tables: vec![table.clone()],
            }),
        }
    }

    let groups = groups
        .into_iter()
        .sorted_by(|a, b| {
            a.floor
                .cmp(&b.floor)
                .then_with(|| locale_compare(&a.area, &b.area))
        })
        .map(|mut group| {
            group
                .tables
                .sort_by(|a, b| locale_compare(a.label_or_empty(), b.label_or_empty()));
            group
        })
        .collect();
    TableGroups(groups)
}

/// Tables on `floor`; when that floor has none, every table.
pub fn select_floor(tables: &[TableRecord], floor: i64) -> Vec<TableRecord> {
    let on_floor: Vec<TableRecord> = tables
        .iter()
        .filter(|t| t.floor == floor)
        .cloned()
        .collect();
    if on_floor.is_empty() {
        tables.to_vec()
    } else {
        on_floor
    }
}

pub fn floors(tables: &[TableRecord]) -> Vec<i64> {
    tables.iter().map(|t| t.floor).sorted().dedup().collect()
}

pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = match words.next().and_then(|w| w.chars().next()) {
        Some(c) => c,
        None => return "—".to_string(),
    };
    let mut out: String = first.to_uppercase().collect();
    if let Some(second) = words.next().and_then(|w| w.chars().next()) {
        out.extend(second.to_uppercase());
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub number: usize,
    pub occupant: Option<String>,
    pub initials: String,
}

impl Seat {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn display_name(&self) -> &str {
        self.occupant.as_deref().unwrap_or("Libre")
    }
}

fn seat_for(member: Option<&VisitorRecord>, index: usize) -> Seat {
    let occupant = member
        .and_then(|m| m.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let initials = occupant
        .as_deref()
        .map(initials)
        .unwrap_or_else(|| "—".to_string());
    Seat {
        number: index + 1,
        occupant,
        initials,
    }
}

/// One seat per unit of capacity, or per member when the table is
/// overbooked.
pub fn seat_layout(table: &TableRecord) -> Vec<Seat> {
    let count = (table.capacity as usize).max(table.members.len());
    (0..count)
        .map(|i| seat_for(table.members.get(i), i))
        .collect()
}
