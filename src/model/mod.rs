//! Documents published under the event's `data/` folder.
//!
//! Field names follow the JSON files as published (Spanish keys). Every
//! field is optional on the wire: numbers may arrive as JSON numbers or
//! numeric strings, and anything unusable falls back to a default instead of
//! failing the whole document.

pub(crate) mod lenient;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FLOOR: i64 = 1;
pub const DEFAULT_AREA: &str = "Salón";

pub const DASHBOARD_FILE: &str = "dashboard.json";
pub const VISITORS_FILE: &str = "personas.json";
pub const FULL_DUMP_FILE: &str = "full_dump.json";

fn default_floor() -> i64 {
    DEFAULT_FLOOR
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VisitorRecord {
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "iglesia", default, deserialize_with = "lenient::text")]
    pub church: Option<String>,
    #[serde(rename = "familia", default, deserialize_with = "lenient::text")]
    pub family: Option<String>,
    #[serde(rename = "familia_alojadora", default, deserialize_with = "lenient::text")]
    pub host_family: Option<String>,
    #[serde(rename = "mesa", default, deserialize_with = "lenient::text")]
    pub table: Option<String>,
    #[serde(rename = "cargo", default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
}

impl VisitorRecord {
    /// Family shown in the directory: own family, else the hosting family.
    pub fn display_family(&self) -> Option<&str> {
        self.family.as_deref().or(self.host_family.as_deref())
    }
}

/// `personas.json`: a bare array of visitors.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VisitorList(#[serde(deserialize_with = "lenient::list")] pub Vec<VisitorRecord>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(rename = "mesa", default, deserialize_with = "lenient::text")]
    pub label: Option<String>,
    #[serde(rename = "capacidad", default, deserialize_with = "lenient::count")]
    pub capacity: u32,
    #[serde(rename = "ocupados", default, deserialize_with = "lenient::count")]
    pub occupied: u32,
    #[serde(rename = "estado", default, deserialize_with = "lenient::text")]
    pub status_override: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub shape: Option<String>,
    #[serde(rename = "responsable", default, deserialize_with = "lenient::text")]
    pub host: Option<String>,
    #[serde(
        rename = "piso",
        default = "default_floor",
        deserialize_with = "lenient::floor"
    )]
    pub floor: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub area: Option<String>,
    #[serde(rename = "miembros", default, deserialize_with = "lenient::list")]
    pub members: Vec<VisitorRecord>,
}

impl TableRecord {
    pub fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// CSS modifier for the table glyph; square tables need none.
    pub fn shape_class(&self) -> &'static str {
        match self.shape.as_deref().map(|s| s.trim().to_lowercase()).as_deref() {
            Some("round") => "round",
            Some("rectangle") => "rectangle",
            _ => "",
        }
    }

    /// Area with surrounding whitespace removed; blank areas use the hall.
    pub fn area_or_default(&self) -> String {
        match self.area.as_deref().map(str::trim) {
            Some(area) if !area.is_empty() => area.to_string(),
            _ => DEFAULT_AREA.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FamilyRecord {
    #[serde(rename = "familia", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "capacidad", default, deserialize_with = "lenient::count")]
    pub capacity: u32,
    #[serde(rename = "ocupados", default, deserialize_with = "lenient::count")]
    pub occupied: u32,
    #[serde(
        rename = "disponibles",
        default,
        deserialize_with = "lenient::optional_count"
    )]
    pub available: Option<u32>,
    #[serde(rename = "estado", default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Totals {
    #[serde(rename = "asistentes", default, deserialize_with = "lenient::optional_u64")]
    pub attendees: Option<u64>,
    #[serde(rename = "familias", default, deserialize_with = "lenient::optional_u64")]
    pub families: Option<u64>,
    #[serde(
        rename = "capacidad_total_familias",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub family_capacity: Option<u64>,
    #[serde(
        rename = "cupos_libres_total_familias",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub family_free: Option<u64>,
    #[serde(
        rename = "ocupacion_total_familias",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub family_occupied: Option<u64>,
    #[serde(rename = "iglesias", default, deserialize_with = "lenient::optional_u64")]
    pub churches: Option<u64>,
    #[serde(
        rename = "organizadores",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub organizers: Option<u64>,
    #[serde(rename = "mesas", default, deserialize_with = "lenient::optional_u64")]
    pub tables: Option<u64>,
    #[serde(
        rename = "capacidad_total_mesas",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub table_capacity: Option<u64>,
    #[serde(
        rename = "ocupacion_total_mesas",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub table_occupied: Option<u64>,
    #[serde(
        rename = "cupos_libres_total_mesas",
        default,
        deserialize_with = "lenient::optional_u64"
    )]
    pub table_free: Option<u64>,
}

/// `dashboard.json`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DashboardDoc {
    #[serde(default, deserialize_with = "lenient::text")]
    pub updated_at: Option<String>,
    #[serde(rename = "totales", default, deserialize_with = "lenient::object_or_default")]
    pub totals: Totals,
    #[serde(rename = "familias", default, deserialize_with = "lenient::list")]
    pub families: Vec<FamilyRecord>,
    #[serde(rename = "mesas", default, deserialize_with = "lenient::list")]
    pub tables: Vec<TableRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Organizer {
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "rol", default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(rename = "iglesia", default, deserialize_with = "lenient::text")]
    pub church: Option<String>,
    #[serde(rename = "contacto", default, deserialize_with = "lenient::text")]
    pub contact: Option<String>,
    #[serde(rename = "turno", default, deserialize_with = "lenient::text")]
    pub shift: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Church {
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "contacto", default, deserialize_with = "lenient::text")]
    pub contact: Option<String>,
    #[serde(rename = "telefono", default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
}

/// `full_dump.json`: contact lists.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FullDump {
    /// `None` when the file carries no organizer list at all.
    #[serde(
        rename = "organizadores",
        default,
        deserialize_with = "lenient::optional_list"
    )]
    pub organizers: Option<Vec<Organizer>>,
    #[serde(rename = "iglesias", default, deserialize_with = "lenient::list")]
    pub churches: Vec<Church>,
}
