use std::path::Path;

use proptest::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::loader::{self, CacheBust, DataSource, SourceResolver};
use crate::model::{DashboardDoc, VisitorList, VisitorRecord, DASHBOARD_FILE, VISITORS_FILE};
use crate::runner::{Options, Runner};
use crate::visitors::{self, PageView, PAGE_SIZE};

const BUST: &str = "1700000000000";

fn resolver(sources: &[String]) -> SourceResolver {
    let client = loader::build_client(2).unwrap();
    SourceResolver::new(
        client,
        sources.iter().map(|s| DataSource::parse(s)).collect(),
        CacheBust::fixed(BUST),
    )
}

fn write_file(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

fn visitor(name: &str) -> VisitorRecord {
    VisitorRecord {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn loader_falls_through_to_second_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary/dashboard.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/backup/dashboard.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"totales":{"mesas":2}}"#))
        .mount(&server)
        .await;

    let r = resolver(&[
        format!("{}/primary", server.uri()),
        format!("{}/backup/", server.uri()),
    ]);
    let doc: Option<DashboardDoc> = r.fetch(DASHBOARD_FILE).await;
    assert_eq!(doc.unwrap().totals.tables, Some(2));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.url.query() == Some(BUST)));
}

#[tokio::test]
async fn loader_skips_unparseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/dashboard.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b/dashboard.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"updated_at":"hoy"}"#))
        .mount(&server)
        .await;

    let r = resolver(&[format!("{}/a/", server.uri()), format!("{}/b/", server.uri())]);
    let doc: Option<DashboardDoc> = r.fetch(DASHBOARD_FILE).await;
    assert_eq!(doc.unwrap().updated_at.as_deref(), Some("hoy"));
}

#[tokio::test]
async fn loader_returns_none_when_every_source_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let r = resolver(&[
        dir.path().to_string_lossy().to_string(),
        format!("{}/data/", server.uri()),
        "http://127.0.0.1:1/data/".to_string(),
    ]);
    let doc: Option<DashboardDoc> = r.fetch(DASHBOARD_FILE).await;
    assert!(doc.is_none());
}

#[tokio::test]
async fn loader_reads_directory_source_first() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        VISITORS_FILE,
        r#"[{"nombre":"Ana Rojas","iglesia":"Central"}, 7]"#,
    );

    let r = resolver(&[
        dir.path().to_string_lossy().to_string(),
        format!("{}/data/", server.uri()),
    ]);
    let list: Option<VisitorList> = r.fetch(VISITORS_FILE).await;
    let list = list.unwrap();
    assert_eq!(list.0.len(), 1);
    assert_eq!(list.0[0].name.as_deref(), Some("Ana Rojas"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn runner_builds_dashboard_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        DASHBOARD_FILE,
        r#"{
            "updated_at": "2025-10-20 18:00",
            "totales": {"mesas": 2, "organizadores": 4},
            "familias": [{"familia": "Rojas", "capacidad": 4, "ocupados": 4}],
            "mesas": [
                {"id": "b", "mesa": "Mesa B", "capacidad": 4, "ocupados": 1, "piso": "2"},
                {"id": "a", "mesa": "Mesa A", "capacidad": 4, "ocupados": 4, "piso": 1, "area": "  "}
            ]
        }"#,
    );
    let people: Vec<String> = (1..=25)
        .map(|i| format!(r#"{{"nombre":"Persona {i:02}","iglesia":"Central"}}"#))
        .collect();
    write_file(dir.path(), VISITORS_FILE, &format!("[{}]", people.join(",")));

    let options = Options {
        sources: vec![dir.path().to_string_lossy().to_string()],
        page: 3,
        ..Default::default()
    };
    let runner = Runner::with_cache_bust(options, CacheBust::fixed(BUST)).unwrap();
    let d = runner.run().await;

    assert!(d.availability.dashboard);
    assert!(d.availability.visitors);
    assert!(!d.availability.contacts);
    assert_eq!(d.kpis.organizers, 4);

    let page = d.visitors.page().unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].name.as_deref(), Some("Persona 21"));
    assert_eq!(page.range_label(), "Mostrando 21–25 de 25");

    let titles: Vec<&str> = d.table_sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Piso 1 — Salón", "Piso 2 — Salón"]);
    assert_eq!(d.table_sections[0].cards[0].occupancy.label, "Completa");
    assert_eq!(d.charts.churches.labels, vec!["Central"]);
    assert_eq!(d.charts.churches.values, vec![25]);
}

#[tokio::test]
async fn runner_survives_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        sources: vec![dir.path().to_string_lossy().to_string()],
        ..Default::default()
    };
    let runner = Runner::with_cache_bust(options, CacheBust::fixed(BUST)).unwrap();
    let d = runner.run().await;
    assert_eq!(d.visitors, PageView::Empty);
    assert!(d.families.is_empty());
    assert!(d.table_sections.is_empty());
}

#[test]
fn runner_rejects_empty_sources() {
    let options = Options {
        sources: vec!["  ".to_string()],
        ..Default::default()
    };
    assert!(Runner::new(options).is_err());
}

#[test]
fn rendered_reports_show_placeholders_without_data() {
    let d = crate::dashboard::build_dashboard(
        &Default::default(),
        &Default::default(),
        None,
        chrono::Local::now(),
    );
    let text = String::from_utf8(crate::output::render_text(
        &d,
        &crate::output::Section::ALL,
    ))
    .unwrap();
    assert!(text.contains(crate::output::NO_RECORDS));

    let html = String::from_utf8(crate::output::report::render_html(
        &d,
        &crate::output::Section::ALL,
    ))
    .unwrap();
    assert!(html.contains("id=\"dashboard-data\""));
    assert!(html.contains(crate::output::NO_RECORDS));

    let json: serde_json::Value =
        serde_json::from_slice(&crate::output::render_json(&d)).unwrap();
    assert_eq!(json["visitors"]["state"], "empty");
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-zÁÉÍÓÚáéíóúñ ]{0,10}", 0..45)
}

proptest! {
    #[test]
    fn filtering_is_idempotent_and_shrinks(names in names(), query in "[a-zA-Zá ]{0,3}") {
        let all: Vec<VisitorRecord> = names.iter().map(|n| visitor(n)).collect();
        let once: Vec<VisitorRecord> = visitors::filter_visitors(&all, &query)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<VisitorRecord> = visitors::filter_visitors(&once, &query)
            .into_iter()
            .cloned()
            .collect();
        prop_assert!(once.len() <= all.len());
        prop_assert_eq!(&twice, &once);
        prop_assert!(once.iter().all(|v| all.contains(v)));
    }

    #[test]
    fn blank_query_keeps_everything_in_order(names in names(), blanks in " {0,3}") {
        let all: Vec<VisitorRecord> = names.iter().map(|n| visitor(n)).collect();
        let kept: Vec<&VisitorRecord> = visitors::filter_visitors(&all, &blanks);
        let expected: Vec<&VisitorRecord> = all.iter().collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn pages_stay_in_bounds(count in 0usize..60, requested in 1usize..20) {
        let all: Vec<VisitorRecord> = (0..count).map(|i| visitor(&format!("P{i}"))).collect();
        let refs: Vec<&VisitorRecord> = all.iter().collect();
        match visitors::paginate(&refs, requested) {
            PageView::Empty => prop_assert_eq!(count, 0),
            PageView::Page(page) => {
                prop_assert!(page.page >= 1 && page.page <= page.total_pages);
                prop_assert!(page.items.len() <= PAGE_SIZE);
                prop_assert!(!page.items.is_empty());
                prop_assert_eq!(page.total_pages, visitors::total_pages(count));
                let window = visitors::page_window(page.page, page.total_pages);
                prop_assert!(window.contains(&page.page));
                prop_assert!(window.end() - window.start() < visitors::PAGE_WINDOW);
            }
        }
    }
}
