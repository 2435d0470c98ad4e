//! Snapshot of everything the report shows, computed from the loaded
//! documents without touching the network.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::countdown::Countdown;
use crate::grouping::{self, Seat};
use crate::model::{Church, DashboardDoc, FamilyRecord, FullDump, Organizer, TableRecord, VisitorList};
use crate::occupancy::{self, FamilyOccupancy, Occupancy, TableLight};
use crate::stats::{self, ChartSet};
use crate::visitors::{PageView, PaginationState};

/// Documents as returned by the loader; `None` means no source had the file.
#[derive(Clone, Debug, Default)]
pub struct LoadedData {
    pub dashboard: Option<DashboardDoc>,
    pub visitors: Option<VisitorList>,
    pub full: Option<FullDump>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub dashboard: bool,
    pub visitors: bool,
    pub contacts: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub updated_at: Option<String>,
    pub attendees: Option<u64>,
    pub families: Option<u64>,
    pub family_capacity: u64,
    pub family_free: u64,
    pub family_occupied: u64,
    pub churches: Option<u64>,
    pub organizers: u64,
    pub confirmed: u64,
    pub tables: Option<u64>,
    pub table_capacity: u64,
    pub table_occupied: u64,
    pub table_free: u64,
}

fn build_kpis(doc: Option<&DashboardDoc>, full: Option<&FullDump>) -> Kpis {
    let t = doc.map(|d| d.totals.clone()).unwrap_or_default();
    let organizers = match full.and_then(|f| f.organizers.as_ref()) {
        Some(list) => list.len() as u64,
        None => t.organizers.unwrap_or(0),
    };
    Kpis {
        updated_at: doc.and_then(|d| d.updated_at.clone()),
        attendees: t.attendees,
        families: t.families,
        family_capacity: t.family_capacity.unwrap_or(0),
        family_free: t.family_free.unwrap_or(0),
        family_occupied: t.family_occupied.unwrap_or(0),
        churches: t.churches,
        organizers,
        confirmed: t.family_occupied.unwrap_or(0),
        tables: t.tables,
        table_capacity: t.table_capacity.unwrap_or(0),
        table_occupied: t.table_occupied.unwrap_or(0),
        table_free: t.table_free.unwrap_or(0),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FamilyCard {
    pub name: String,
    pub capacity: u32,
    pub occupied: u32,
    pub status: Option<String>,
    pub occupancy: FamilyOccupancy,
}

fn family_card(f: &FamilyRecord) -> FamilyCard {
    FamilyCard {
        name: f.name.clone().unwrap_or_default(),
        capacity: f.capacity,
        occupied: f.occupied,
        status: f.status.clone(),
        occupancy: occupancy::family_occupancy(f),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableCard {
    pub table: TableRecord,
    pub occupancy: Occupancy,
    pub light: TableLight,
    pub seats: Vec<Seat>,
}

fn table_card(t: &TableRecord) -> TableCard {
    TableCard {
        table: t.clone(),
        occupancy: occupancy::table_occupancy(t),
        light: TableLight::from_status(t.status.as_deref()),
        seats: grouping::seat_layout(t),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FloorSection {
    pub floor: i64,
    pub area: String,
    pub title: String,
    pub cards: Vec<TableCard>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub query: String,
    pub page: usize,
    pub floor: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Local>,
    pub countdown: Option<Countdown>,
    pub availability: Availability,
    pub kpis: Kpis,
    pub pagination: PaginationState,
    pub visitor_count: usize,
    pub visitors: PageView,
    pub families: Vec<FamilyCard>,
    pub floors: Vec<i64>,
    pub selected_floor: Option<i64>,
    pub table_sections: Vec<FloorSection>,
    pub organizers: Vec<Organizer>,
    pub churches: Vec<Church>,
    pub charts: ChartSet,
}

pub fn build_dashboard(
    data: &LoadedData,
    view: &ViewOptions,
    event_start: Option<DateTime<Local>>,
    now: DateTime<Local>,
) -> Dashboard {
    let doc = data.dashboard.as_ref();
    let empty_visitors = VisitorList::default();
    let visitors = &data.visitors.as_ref().unwrap_or(&empty_visitors).0;
    let families: &[FamilyRecord] = doc.map(|d| d.families.as_slice()).unwrap_or(&[]);
    let tables: &[TableRecord] = doc.map(|d| d.tables.as_slice()).unwrap_or(&[]);

    let mut pagination = PaginationState::new(view.query.clone(), view.page);
    let visitor_view = pagination.view(visitors);

    let shown_tables = match view.floor {
        Some(floor) => grouping::select_floor(tables, floor),
        None => tables.to_vec(),
    };
    let table_sections = grouping::group_tables(&shown_tables)
        .iter()
        .map(|g| FloorSection {
            floor: g.floor,
            area: g.area.clone(),
            title: g.title(),
            cards: g.tables.iter().map(table_card).collect(),
        })
        .collect();

    let totals = doc.map(|d| d.totals.clone()).unwrap_or_default();

    Dashboard {
        generated_at: now,
        countdown: event_start.map(|start| Countdown::until(&start, &now)),
        availability: Availability {
            dashboard: data.dashboard.is_some(),
            visitors: data.visitors.is_some(),
            contacts: data.full.is_some(),
        },
        kpis: build_kpis(doc, data.full.as_ref()),
        pagination,
        visitor_count: visitors.len(),
        visitors: visitor_view,
        families: families.iter().map(family_card).collect(),
        floors: grouping::floors(tables),
        selected_floor: view.floor,
        table_sections,
        organizers: data
            .full
            .as_ref()
            .and_then(|f| f.organizers.clone())
            .unwrap_or_default(),
        churches: data
            .full
            .as_ref()
            .map(|f| f.churches.clone())
            .unwrap_or_default(),
        charts: stats::build_charts(&totals, families, tables, visitors),
    }
}
