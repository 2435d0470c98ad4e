use super::{Section, EMPTY_PLACEHOLDER, NO_RECORDS};
use crate::dashboard::{Dashboard, FamilyCard, FloorSection, TableCard};
use crate::stats::{Series, StackedSeries};
use crate::utils::{count_or_dash, or_dash};
use crate::visitors::PageView;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn td(value: &str) -> String {
    format!("<td>{}</td>", escape_html(value))
}

fn empty_row(cols: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{cols}" class="text-secondary">{}</td></tr>"#,
        escape_html(message)
    )
}

fn kpi(label: &str, value: &str) -> String {
    format!(
        r#"<div class="col-6 col-md-3"><div class="card p-3 shadow-sm h-100"><div class="fw-bold fs-4">{}</div><div class="text-muted small">{}</div></div></div>"#,
        escape_html(value),
        escape_html(label)
    )
}

fn summary_html(d: &Dashboard) -> String {
    let k = &d.kpis;
    let cards = [
        kpi("Asistentes", &count_or_dash(k.attendees)),
        kpi("Familias", &count_or_dash(k.families)),
        kpi("Capacidad familias", &k.family_capacity.to_string()),
        kpi("Cupos libres", &k.family_free.to_string()),
        kpi("Ocupación", &k.family_occupied.to_string()),
        kpi("Iglesias", &count_or_dash(k.churches)),
        kpi("Organizadores", &k.organizers.to_string()),
        kpi("Confirmados", &k.confirmed.to_string()),
        kpi("Mesas", &count_or_dash(k.tables)),
        kpi("Capacidad mesas", &k.table_capacity.to_string()),
        kpi("Ocupación mesas", &k.table_occupied.to_string()),
        kpi("Cupos libres mesas", &k.table_free.to_string()),
    ];
    format!(r#"<div class="row g-3">{}</div>"#, cards.join(""))
}

fn visitors_html(d: &Dashboard) -> String {
    let mut rows = String::new();
    let mut footer = String::new();
    match &d.visitors {
        PageView::Empty => rows.push_str(&empty_row(5, NO_RECORDS)),
        PageView::Page(page) => {
            for v in page.items.iter() {
                rows.push_str("<tr>");
                rows.push_str(&td(v.name.as_deref().unwrap_or("")));
                rows.push_str(&td(v.church.as_deref().unwrap_or("")));
                rows.push_str(&td(v.display_family().unwrap_or("")));
                rows.push_str(&td(v.table.as_deref().unwrap_or("")));
                rows.push_str(&td(v.role.as_deref().unwrap_or("")));
                rows.push_str("</tr>");
            }
            footer.push_str(&format!(
                r#"<div class="small text-muted">{}</div>"#,
                escape_html(&page.range_label())
            ));
            if page.show_controls {
                footer.push_str(r#"<ul class="pagination mb-0">"#);
                for c in page.controls.iter() {
                    let mut class = String::from("page-item");
                    if c.disabled {
                        class.push_str(" disabled");
                    }
                    if c.active {
                        class.push_str(" active");
                    }
                    footer.push_str(&format!(
                        r#"<li class="{class}"><span class="page-link" data-page="{}">{}</span></li>"#,
                        c.target,
                        escape_html(&c.label)
                    ));
                }
                footer.push_str("</ul>");
            }
        }
    }
    format!(
        r#"<table class="table table-sm"><thead><tr><th>Nombre</th><th>Iglesia</th><th>Familia</th><th>Mesa</th><th>Cargo</th></tr></thead><tbody>{rows}</tbody></table><div class="d-flex justify-content-between align-items-center">{footer}</div>"#
    )
}

fn family_html(f: &FamilyCard) -> String {
    let available = f
        .occupancy
        .available
        .map(|a| a.to_string())
        .unwrap_or_else(|| "—".to_string());
    format!(
        r#"<div class="col-md-4"><div class="card p-3 shadow-sm h-100"><h5 class="mb-2">{name}</h5><div class="d-flex flex-wrap gap-2 mb-2"><span class="badge bg-primary">Capacidad: {cap}</span><span class="badge bg-danger">Ocupados: {occ}</span><span class="badge bg-success">Disponibles: {available}</span></div><div class="progress mb-2"><div class="progress-bar {band}" style="width:{pct}%"></div></div><small class="text-muted">{pct}% ocupado — Estado: {status}</small></div></div>"#,
        name = escape_html(&f.name),
        cap = f.capacity,
        occ = f.occupied,
        available = escape_html(&available),
        band = f.occupancy.band.css_class(),
        pct = f.occupancy.percent,
        status = escape_html(or_dash(f.status.as_deref())),
    )
}

fn families_html(d: &Dashboard) -> String {
    if d.families.is_empty() {
        return r#"<div class="text-secondary">No hay familias aún.</div>"#.to_string();
    }
    let cards: Vec<String> = d.families.iter().map(family_html).collect();
    format!(r#"<div class="row g-3">{}</div>"#, cards.join(""))
}

fn seats_html(card: &TableCard) -> String {
    if card.seats.is_empty() {
        return r#"<div class="text-muted small">— Sin sillas definidas —</div>"#.to_string();
    }
    let seats: Vec<String> = card
        .seats
        .iter()
        .map(|s| {
            let class = if s.is_free() {
                "chair-detail empty"
            } else {
                "chair-detail otros"
            };
            format!(
                r#"<div class="text-center" style="width:72px"><div class="{class}" title="{name}">{ini}<div class="chair-number">{n}</div></div><div class="seat-name">{name}</div></div>"#,
                name = escape_html(s.display_name()),
                ini = escape_html(&s.initials),
                n = s.number,
            )
        })
        .collect();
    format!(
        r#"<div class="d-grid" style="grid-template-columns: repeat(auto-fill, minmax(72px, 1fr)); gap: 10px;">{}</div>"#,
        seats.join("")
    )
}

fn table_html(card: &TableCard) -> String {
    let t = &card.table;
    let capacity = if t.capacity == 0 {
        "∞".to_string()
    } else {
        t.capacity.to_string()
    };
    let host = t
        .host
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .map(|h| format!(r#"<span class="badge bg-primary">{}</span>"#, escape_html(h.trim())))
        .unwrap_or_default();
    format!(
        r#"<div class="col-12 col-md-6 col-lg-4"><div class="card shadow-sm h-100"><div class="card-body"><div class="d-flex justify-content-between align-items-start"><div><h5 class="card-title mb-1">{label}</h5><div class="small text-muted">ID: {id}</div></div><div class="table-shape {light} {shape}">{capacity}</div></div><div class="row text-center mt-3"><div class="col"><div class="fw-bold">{capacity}</div><div class="small text-muted">Capacidad</div></div><div class="col"><div class="fw-bold">{occ}</div><div class="small text-muted">Ocupados</div></div><div class="col"><div class="fw-bold">{free}</div><div class="small text-muted">Disponibles</div></div></div><div class="mt-3 d-flex flex-wrap gap-1"><span class="badge {badge}">{status}</span>{host}</div><hr class="my-3"/><h6>Sillas <small class="text-muted">{seat_count} total</small></h6>{seats}</div></div></div>"#,
        label = escape_html(t.label_or_empty()),
        id = escape_html(or_dash(t.id.as_deref())),
        light = card.light.css_class(),
        shape = t.shape_class(),
        capacity = capacity,
        occ = t.occupied,
        free = card.occupancy.free,
        badge = card.occupancy.badge.css_class(),
        status = escape_html(&card.occupancy.label),
        host = host,
        seat_count = card.seats.len(),
        seats = seats_html(card),
    )
}

fn section_html(section: &FloorSection) -> String {
    let cards: Vec<String> = section.cards.iter().map(table_html).collect();
    format!(
        r#"<section class="bg-white rounded-3 p-3 border mb-3"><div class="d-flex align-items-center justify-content-between mb-2"><h5 class="mb-0">{}</h5><small class="text-muted">{} mesa(s)</small></div><div class="row g-3">{}</div></section>"#,
        escape_html(&section.title),
        section.cards.len(),
        cards.join("")
    )
}

fn tables_html(d: &Dashboard) -> String {
    if d.table_sections.is_empty() {
        return r#"<div class="text-secondary">No hay mesas aún.</div>"#.to_string();
    }
    d.table_sections.iter().map(section_html).collect()
}

fn contacts_html(d: &Dashboard) -> String {
    let mut organizers = String::new();
    if d.organizers.is_empty() {
        organizers.push_str(&empty_row(5, EMPTY_PLACEHOLDER));
    }
    for o in d.organizers.iter() {
        organizers.push_str("<tr>");
        for field in [&o.name, &o.role, &o.church, &o.contact, &o.shift] {
            organizers.push_str(&td(field.as_deref().unwrap_or("")));
        }
        organizers.push_str("</tr>");
    }
    let mut churches = String::new();
    if d.churches.is_empty() {
        churches.push_str(&empty_row(4, EMPTY_PLACEHOLDER));
    }
    for c in d.churches.iter() {
        churches.push_str("<tr>");
        for field in [&c.name, &c.contact, &c.phone, &c.address] {
            churches.push_str(&td(field.as_deref().unwrap_or("")));
        }
        churches.push_str("</tr>");
    }
    format!(
        r#"<h3 class="h5">Organizadores</h3><table class="table table-sm"><thead><tr><th>Nombre</th><th>Rol</th><th>Iglesia</th><th>Contacto</th><th>Turno</th></tr></thead><tbody>{organizers}</tbody></table><h3 class="h5">Iglesias</h3><table class="table table-sm"><thead><tr><th>Nombre</th><th>Contacto</th><th>Teléfono</th><th>Dirección</th></tr></thead><tbody>{churches}</tbody></table>"#
    )
}

fn series_table(title: &str, series: &Series) -> String {
    let mut rows = String::new();
    if series.labels.is_empty() {
        rows.push_str(&empty_row(2, EMPTY_PLACEHOLDER));
    }
    for (label, value) in series.labels.iter().zip(series.values.iter()) {
        rows.push_str(&format!("<tr>{}<td>{value}</td></tr>", td(label)));
    }
    format!(
        r#"<div class="col-md-6"><h3 class="h6">{}</h3><table class="table table-sm"><tbody>{rows}</tbody></table></div>"#,
        escape_html(title)
    )
}

fn stacked_table(title: &str, series: &StackedSeries) -> String {
    let mut rows = String::new();
    if series.labels.is_empty() {
        rows.push_str(&empty_row(3, EMPTY_PLACEHOLDER));
    }
    for ((label, occupied), available) in series
        .labels
        .iter()
        .zip(series.occupied.iter())
        .zip(series.available.iter())
    {
        rows.push_str(&format!(
            "<tr>{}<td>{occupied}</td><td>{available}</td></tr>",
            td(label)
        ));
    }
    format!(
        r#"<div class="col-md-6"><h3 class="h6">{}</h3><table class="table table-sm"><thead><tr><th></th><th>Ocupados</th><th>Disponibles</th></tr></thead><tbody>{rows}</tbody></table></div>"#,
        escape_html(title)
    )
}

fn charts_html(d: &Dashboard) -> String {
    let split = &d.charts.family_occupancy;
    let occupancy = format!(
        r#"<div class="col-md-6"><h3 class="h6">Ocupación de familias</h3><p>Ocupados: {} ({}%) · Libres: {} ({}%)</p></div>"#,
        split.occupied,
        split.percent_of_capacity(split.occupied),
        split.free,
        split.percent_of_capacity(split.free)
    );
    format!(
        r#"<div class="row g-3">{occupancy}{}{}{}{}</div>"#,
        stacked_table("Capacidad por familia (Top 10)", &d.charts.family_capacity),
        series_table("Asistentes por iglesia", &d.charts.churches),
        series_table("Distribución por cargo", &d.charts.roles),
        stacked_table("Capacidad por mesa (Top 10)", &d.charts.table_capacity),
    )
}

pub fn render_html(d: &Dashboard, sections: &[Section]) -> Vec<u8> {
    let json = serde_json::to_string(d).unwrap_or_else(|_| "{}".to_string());
    let json = json_for_script_tag(&json);

    let mut body = String::new();
    for section in sections {
        let inner = match section {
            Section::Summary => summary_html(d),
            Section::Visitors => visitors_html(d),
            Section::Families => families_html(d),
            Section::Tables => tables_html(d),
            Section::Contacts => contacts_html(d),
            Section::Charts => charts_html(d),
        };
        body.push_str(&format!(
            r#"<section class="mb-5"><h2 class="h4 mb-3">{}</h2>{inner}</section>"#,
            escape_html(section.title())
        ));
    }

    let updated = d
        .kpis
        .updated_at
        .as_deref()
        .map(|u| format!("Actualizado: {}", escape_html(u)))
        .unwrap_or_default();
    let countdown = d
        .countdown
        .map(|c| escape_html(&c.to_string()))
        .unwrap_or_default();

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Panel del evento</title>
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet"/>
</head>
<body class="bg-light">
  <script type="application/json" id="dashboard-data">{json}</script>
  <main class="container py-4">
    <header class="d-flex justify-content-between align-items-end mb-4">
      <h1 class="h3 mb-0">Panel del evento</h1>
      <div class="text-end">
        <div id="countdown" class="fw-bold">{countdown}</div>
        <div id="updated_at" class="small text-muted">{updated}</div>
      </div>
    </header>
    {body}
  </main>
</body>
</html>
"####
    );
    html.into_bytes()
}
