use boost_emblems::pipeline::{self, ScrapeConfig};
use boost_emblems::distribution::SET_SIZE;
use boost_emblems::{Catalog, Grade, Optimizer, OutputFormat, PageSource, Pool, Result, ScrapeError, Targets, read_document};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// In-memory page that serves one fragment for one selector
struct MockPage {
    selector: &'static str,
    fragment: Option<String>,
    loaded: RefCell<Vec<String>>,
}

impl MockPage {
    fn serving(fragment: &str) -> Self {
        Self {
            selector: "section.content > div:first-child",
            fragment: Some(fragment.to_string()),
            loaded: RefCell::new(Vec::new()),
        }
    }

    fn empty() -> Self {
        Self { selector: "section.content > div:first-child", fragment: None, loaded: RefCell::new(Vec::new()) }
    }
}

impl PageSource for MockPage {
    fn load(&self, url: &str) -> Result<()> {
        self.loaded.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn inner_html(&self, selector: &str, _timeout: Duration) -> Result<String> {
        match &self.fragment {
            Some(fragment) if selector == self.selector => Ok(fragment.clone()),
            _ => Err(ScrapeError::ElementNotFound(format!("Element '{}' not found", selector))),
        }
    }
}

fn config_in(dir: &Path) -> ScrapeConfig {
    ScrapeConfig::default().output(dir.join("data.json"))
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("output file should exist");
    serde_json::from_str(&content).expect("output file should contain valid JSON")
}

#[test]
fn test_object_fragment_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let page = MockPage::serving(r#"{"emblems":[{"id":1,"name":"Boost"}]}"#);

    let report = pipeline::run(&page, &config).unwrap();

    assert_eq!(read_json(&config.output), json!({"emblems": [{"id": 1, "name": "Boost"}]}));
    assert_eq!(report.document, json!({"emblems": [{"id": 1, "name": "Boost"}]}));
    assert_eq!(report.fragment_len, 37);
    assert_eq!(page.loaded.borrow().as_slice(), ["https://unite-db.com/boost-emblems"]);
}

#[test]
fn test_empty_array_fragment_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    pipeline::run(&MockPage::serving("[]"), &config).unwrap();

    assert_eq!(read_json(&config.output), json!([]));
}

#[test]
fn test_malformed_fragment_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = pipeline::run(&MockPage::serving("{invalid"), &config);

    assert!(matches!(result, Err(ScrapeError::MalformedJson { .. })));
    assert!(!config.output.exists());
}

#[test]
fn test_missing_element_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = pipeline::run(&MockPage::empty(), &config);

    assert!(matches!(result, Err(ScrapeError::ElementNotFound(_))));
    assert!(!config.output.exists());
}

#[test]
fn test_wrong_selector_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).selector("#emblems");

    let result = pipeline::run(&MockPage::serving("[]"), &config);

    assert!(result.unwrap_err().is_lookup_failure());
    assert!(!config.output.exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    pipeline::run(&MockPage::serving("[1]"), &config).unwrap();
    assert!(pipeline::run(&MockPage::serving("[1,"), &config).is_err());

    assert_eq!(read_json(&config.output), json!([1]));
}

#[test]
fn test_second_run_overwrites_first() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    pipeline::run(&MockPage::serving(r#"{"emblems":[{"id":1},{"id":2},{"id":3}]}"#), &config).unwrap();
    pipeline::run(&MockPage::serving("[]"), &config).unwrap();

    assert_eq!(std::fs::read_to_string(&config.output).unwrap(), "[]");
}

#[test]
fn test_round_trip_preserves_value() {
    let fragments = [
        r#"{"a": 1, "b": [true, false, null], "c": {"d": "e"}}"#,
        r#"[1.5, -2, 3e10, "é\n", {}]"#,
        r#""just a string""#,
        "null",
        r#"  {"padded": "   with whitespace   "}  "#,
    ];

    for fragment in fragments {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        pipeline::run(&MockPage::serving(fragment), &config).unwrap();

        let expected: Value = serde_json::from_str(fragment).unwrap();
        assert_eq!(read_json(&config.output), expected, "fragment: {}", fragment);
    }
}

#[test]
fn test_pretty_output_decodes_to_same_value() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).format(OutputFormat::Pretty);

    pipeline::run(&MockPage::serving(r#"{"emblems":[{"id":1}]}"#), &config).unwrap();

    let content = std::fs::read_to_string(&config.output).unwrap();
    assert!(content.contains('\n'));
    assert_eq!(read_json(&config.output), json!({"emblems": [{"id": 1}]}));
}

#[test]
fn test_emblem_page_summary() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let page = MockPage::serving(
        r#"[
            {"name": "bulbasaur", "display_name": "Bulbasaur", "grade": "A", "color1": "Green",
             "stats": [{"hp": 120, "sp_attack": 2.4}]},
            {"name": "charmander", "display_name": "Charmander", "grade": "B", "color1": "Red", "color2": "Yellow",
             "stats": [{"attack": 1.2}]}
        ]"#,
    );

    let report = pipeline::run(&page, &config).unwrap();
    let catalog = Catalog::from_document(&report.document).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.summary().total, 2);
    assert_eq!(catalog.emblems[0].stats().hp, 120.0);
}

#[test]
fn test_saved_catalogue_can_be_optimized() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let emblems: Vec<Value> = (0..14)
        .map(|i| {
            json!({
                "display_name": format!("Pokemon {}", i),
                "grade": if i < 12 { "A" } else { "C" },
                "color1": if i % 2 == 0 { "White" } else { "Yellow" },
                "stats": if i == 3 { Value::Null } else { json!([{"hp": i * 15, "speed": i}]) }
            })
        })
        .collect();

    pipeline::run(&MockPage::serving(&Value::Array(emblems).to_string()), &config).unwrap();

    let catalog = Catalog::from_document(&read_document(&config.output).unwrap()).unwrap();
    assert_eq!(catalog.by_grade(Grade::Gold).count(), 12);

    let optimizer = Optimizer::new(Pool::gold(&catalog), Targets::default()).generations(10);
    let best = optimizer.run(&mut StdRng::seed_from_u64(9)).unwrap();

    assert_eq!(best.emblems.len(), SET_SIZE);
    assert!(best.emblems.iter().all(|e| e.grade() == Grade::Gold));
}
