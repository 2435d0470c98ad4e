use std::collections::HashSet;

use crate::output::Section;

pub fn parse_sections_csv(value: &str) -> Result<Vec<Section>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("sections list is empty".to_string());
    }
    let mut out: Vec<Section> = Vec::new();
    let mut seen: HashSet<Section> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if item.eq_ignore_ascii_case("all") {
            for section in Section::ALL {
                if seen.insert(section) {
                    out.push(section);
                }
            }
            continue;
        }
        let section = Section::parse(item).ok_or_else(|| format!("unknown section '{item}'"))?;
        if seen.insert(section) {
            out.push(section);
        }
    }
    if out.is_empty() {
        return Err("sections list is empty".to_string());
    }
    Ok(out)
}

/// Merges repeated `--section` values; an empty input means every section.
pub fn collect_sections(values: &[String]) -> Result<Vec<Section>, String> {
    if values.is_empty() {
        return Ok(Section::ALL.to_vec());
    }
    let joined = values.join(",");
    parse_sections_csv(&joined)
}

pub fn clean_sources(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        let item = v.trim();
        if item.is_empty() || out.iter().any(|o| o == item) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

pub fn or_dash(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "—",
    }
}

pub fn count_or_dash(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sections_csv_parses_and_dedupes() {
        let out = parse_sections_csv("tables, Visitors,tables").unwrap();
        assert_eq!(out, vec![Section::Tables, Section::Visitors]);
    }

    #[test]
    fn parse_sections_csv_rejects_unknown() {
        assert!(parse_sections_csv("tables,gallery").is_err());
        assert!(parse_sections_csv(" , ").is_err());
    }

    #[test]
    fn collect_sections_defaults_to_all() {
        assert_eq!(collect_sections(&[]).unwrap(), Section::ALL.to_vec());
        let out = collect_sections(&["charts".to_string(), "summary".to_string()]).unwrap();
        assert_eq!(out, vec![Section::Charts, Section::Summary]);
    }

    #[test]
    fn clean_sources_trims_and_dedupes_in_order() {
        let out = clean_sources(vec![
            " ./data/ ".to_string(),
            "".to_string(),
            "https://x/data/".to_string(),
            "./data/".to_string(),
        ]);
        assert_eq!(out, vec!["./data/", "https://x/data/"]);
    }

    #[test]
    fn or_dash_handles_blank() {
        assert_eq!(or_dash(Some("  ")), "—");
        assert_eq!(or_dash(None), "—");
        assert_eq!(or_dash(Some("x")), "x");
        assert_eq!(count_or_dash(None), "—");
    }
}
