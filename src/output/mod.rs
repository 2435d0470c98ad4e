pub mod report;

use colored::{ColoredString, Colorize};

use crate::dashboard::{Dashboard, FamilyCard, TableCard};
use crate::occupancy::Badge;
use crate::stats::{Series, StackedSeries};
use crate::utils::{count_or_dash, or_dash};
use crate::visitors::{ControlKind, PageView};

pub const EMPTY_PLACEHOLDER: &str = "(sin datos)";
pub const NO_RECORDS: &str = "No hay registros";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Visitors,
    Families,
    Tables,
    Contacts,
    Charts,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Summary,
        Section::Visitors,
        Section::Families,
        Section::Tables,
        Section::Contacts,
        Section::Charts,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "summary" | "kpis" => Some(Self::Summary),
            "visitors" | "visitantes" => Some(Self::Visitors),
            "families" | "familias" | "lodging" => Some(Self::Families),
            "tables" | "mesas" | "seating" => Some(Self::Tables),
            "contacts" | "contactos" => Some(Self::Contacts),
            "charts" | "graficos" => Some(Self::Charts),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Summary => "Resumen",
            Self::Visitors => "Visitantes",
            Self::Families => "Hospedajes",
            Self::Tables => "Mesas",
            Self::Contacts => "Contactos",
            Self::Charts => "Gráficos",
        }
    }
}

pub fn render(dashboard: &Dashboard, sections: &[Section], format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(dashboard, sections),
        OutputFormat::Json => render_json(dashboard),
        OutputFormat::Html => report::render_html(dashboard, sections),
    }
}

pub fn render_json(dashboard: &Dashboard) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(dashboard).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

fn paint(text: &str, badge: Badge) -> ColoredString {
    match badge {
        Badge::Success => text.green(),
        Badge::Danger => text.red(),
        Badge::Warning => text.yellow(),
        Badge::Neutral => text.dimmed(),
    }
}

fn kv_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<22}: {}\n", label, value));
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&format!("{}\n", format!("== {title} ==").bold()));
}

/// Fits `value` into a `width`-char column followed by one space of gutter.
fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len > width {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        return format!("{cut}… ");
    }
    format!("{value}{} ", " ".repeat(width - len))
}

fn render_summary(out: &mut String, d: &Dashboard) {
    let k = &d.kpis;
    heading(out, Section::Summary.title());
    kv_line(out, "Asistentes", &count_or_dash(k.attendees));
    kv_line(out, "Familias", &count_or_dash(k.families));
    kv_line(out, "Capacidad familias", &k.family_capacity.to_string());
    kv_line(out, "Cupos libres familias", &k.family_free.to_string());
    kv_line(out, "Ocupación familias", &k.family_occupied.to_string());
    kv_line(out, "Iglesias", &count_or_dash(k.churches));
    kv_line(out, "Organizadores", &k.organizers.to_string());
    kv_line(out, "Confirmados", &k.confirmed.to_string());
    kv_line(out, "Mesas", &count_or_dash(k.tables));
    kv_line(out, "Capacidad mesas", &k.table_capacity.to_string());
    kv_line(out, "Ocupación mesas", &k.table_occupied.to_string());
    kv_line(out, "Cupos libres mesas", &k.table_free.to_string());
}

fn render_visitors(out: &mut String, d: &Dashboard) {
    heading(out, Section::Visitors.title());
    if !d.pagination.query.trim().is_empty() {
        kv_line(out, "Búsqueda", d.pagination.query.trim());
    }
    let page = match &d.visitors {
        PageView::Empty => {
            out.push_str(&format!("{}\n", NO_RECORDS.dimmed()));
            return;
        }
        PageView::Page(page) => page,
    };
    out.push_str(&format!(
        "{}\n",
        format!(
            "{}{}{}{}{}",
            pad("Nombre", 28),
            pad("Iglesia", 22),
            pad("Familia", 20),
            pad("Mesa", 8),
            "Cargo"
        )
        .bold()
    ));
    for v in page.items.iter() {
        out.push_str(&format!(
            "{}{}{}{}{}\n",
            pad(v.name.as_deref().unwrap_or(""), 28),
            pad(v.church.as_deref().unwrap_or(""), 22),
            pad(v.display_family().unwrap_or(""), 20),
            pad(v.table.as_deref().unwrap_or(""), 8),
            v.role.as_deref().unwrap_or("")
        ));
    }
    out.push_str(&format!("{}\n", page.range_label().dimmed()));
    if page.show_controls {
        let strip: Vec<String> = page
            .controls
            .iter()
            .map(|c| match (c.kind, c.active, c.disabled) {
                (ControlKind::Page, true, _) => format!("[{}]", c.label).bold().to_string(),
                (_, _, true) => c.label.dimmed().to_string(),
                _ => c.label.clone(),
            })
            .collect();
        out.push_str(&format!("{}\n", strip.join(" ")));
    }
}

fn family_line(f: &FamilyCard) -> String {
    let available = f
        .occupancy
        .available
        .map(|a| a.to_string())
        .unwrap_or_else(|| "—".to_string());
    format!(
        "{}Capacidad: {}  Ocupados: {}  Disponibles: {}  {}  Estado: {}",
        pad(&f.name, 24),
        f.capacity,
        f.occupied,
        available,
        paint(&format!("{}% ocupado", f.occupancy.percent), f.occupancy.band),
        or_dash(f.status.as_deref())
    )
}

fn render_families(out: &mut String, d: &Dashboard) {
    heading(out, Section::Families.title());
    if d.families.is_empty() {
        out.push_str(&format!("{}\n", "No hay familias aún.".dimmed()));
        return;
    }
    for f in d.families.iter() {
        out.push_str(&family_line(f));
        out.push('\n');
    }
}

fn capacity_text(capacity: u32) -> String {
    if capacity == 0 {
        "∞".to_string()
    } else {
        capacity.to_string()
    }
}

fn table_lines(out: &mut String, card: &TableCard) {
    let t = &card.table;
    out.push_str(&format!(
        "  {} {}  ID: {}  Capacidad: {}  Ocupados: {}  Disponibles: {}\n",
        t.label_or_empty().bold(),
        paint(&format!("[{}]", card.occupancy.label), card.occupancy.badge),
        or_dash(t.id.as_deref()),
        capacity_text(t.capacity),
        t.occupied,
        card.occupancy.free
    ));
    if let Some(host) = t.host.as_deref().filter(|h| !h.trim().is_empty()) {
        out.push_str(&format!("    Responsable: {}\n", host.trim()));
    }
    if card.seats.is_empty() {
        out.push_str(&format!("    {}\n", "— Sin sillas definidas —".dimmed()));
        return;
    }
    let seats: Vec<String> = card
        .seats
        .iter()
        .map(|s| {
            let text = format!("{}:{}", s.number, s.display_name());
            if s.is_free() {
                text.dimmed().to_string()
            } else {
                text
            }
        })
        .collect();
    out.push_str(&format!("    Sillas: {}\n", seats.join(", ")));
}

fn render_tables(out: &mut String, d: &Dashboard) {
    heading(out, Section::Tables.title());
    if let Some(floor) = d.selected_floor {
        kv_line(out, "Piso seleccionado", &floor.to_string());
    }
    if d.table_sections.is_empty() {
        out.push_str(&format!("{}\n", "No hay mesas aún.".dimmed()));
        return;
    }
    for section in d.table_sections.iter() {
        out.push_str(&format!(
            "{} {}\n",
            section.title.bold(),
            format!("({} mesa(s))", section.cards.len()).dimmed()
        ));
        for card in section.cards.iter() {
            table_lines(out, card);
        }
    }
}

fn render_contacts(out: &mut String, d: &Dashboard) {
    heading(out, "Organizadores");
    if d.organizers.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_PLACEHOLDER.dimmed()));
    }
    for o in d.organizers.iter() {
        out.push_str(&format!(
            "{}{}{}{}{}\n",
            pad(or_dash(o.name.as_deref()), 26),
            pad(or_dash(o.role.as_deref()), 18),
            pad(or_dash(o.church.as_deref()), 22),
            pad(or_dash(o.contact.as_deref()), 18),
            or_dash(o.shift.as_deref())
        ));
    }
    heading(out, "Iglesias");
    if d.churches.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_PLACEHOLDER.dimmed()));
    }
    for c in d.churches.iter() {
        out.push_str(&format!(
            "{}{}{}{}\n",
            pad(or_dash(c.name.as_deref()), 26),
            pad(or_dash(c.contact.as_deref()), 22),
            pad(or_dash(c.phone.as_deref()), 16),
            or_dash(c.address.as_deref())
        ));
    }
}

fn series_lines(out: &mut String, title: &str, series: &Series) {
    out.push_str(&format!("{}\n", title.bold()));
    if series.labels.is_empty() {
        out.push_str(&format!("  {}\n", EMPTY_PLACEHOLDER.dimmed()));
    }
    for (label, value) in series.labels.iter().zip(series.values.iter()) {
        out.push_str(&format!("  {}{}\n", pad(label, 28), value));
    }
}

fn stacked_lines(out: &mut String, title: &str, series: &StackedSeries) {
    out.push_str(&format!("{}\n", title.bold()));
    if series.labels.is_empty() {
        out.push_str(&format!("  {}\n", EMPTY_PLACEHOLDER.dimmed()));
    }
    for ((label, occupied), available) in series
        .labels
        .iter()
        .zip(series.occupied.iter())
        .zip(series.available.iter())
    {
        out.push_str(&format!(
            "  {}ocupados={} disponibles={}\n",
            pad(label, 28),
            occupied,
            available
        ));
    }
}

fn render_charts(out: &mut String, d: &Dashboard) {
    heading(out, Section::Charts.title());
    let split = &d.charts.family_occupancy;
    out.push_str(&format!(
        "{}\n  Ocupados: {} ({}%)\n  Libres: {} ({}%)\n",
        "Ocupación de familias".bold(),
        split.occupied,
        split.percent_of_capacity(split.occupied),
        split.free,
        split.percent_of_capacity(split.free)
    ));
    stacked_lines(out, "Capacidad por familia (Top 10)", &d.charts.family_capacity);
    series_lines(out, "Asistentes por iglesia", &d.charts.churches);
    series_lines(out, "Distribución por cargo", &d.charts.roles);
    stacked_lines(out, "Capacidad por mesa (Top 10)", &d.charts.table_capacity);
}

pub fn render_text(dashboard: &Dashboard, sections: &[Section]) -> Vec<u8> {
    let mut out = String::new();
    if let Some(updated_at) = dashboard.kpis.updated_at.as_deref() {
        kv_line(&mut out, "Actualizado", updated_at);
    }
    if let Some(countdown) = dashboard.countdown {
        kv_line(&mut out, "Cuenta regresiva", &countdown.to_string());
    }
    for section in sections {
        match section {
            Section::Summary => render_summary(&mut out, dashboard),
            Section::Visitors => render_visitors(&mut out, dashboard),
            Section::Families => render_families(&mut out, dashboard),
            Section::Tables => render_tables(&mut out, dashboard),
            Section::Contacts => render_contacts(&mut out, dashboard),
            Section::Charts => render_charts(&mut out, dashboard),
        }
    }
    out.into_bytes()
}
