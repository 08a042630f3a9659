//! End-to-end extraction against a saved Goodreads book page.

use chrono::{Local, TimeZone};
use serde_json::json;
use shelfcopy::{
    BookInfoExtractor, DateAddedFormat, DateFormat, FileStore, FixedClock, HtmlDocument,
    MemoryStore, SettingsStore,
};

const PAGE: &str = include_str!("fixtures/goodreads_book.html");
const URL: &str = "https://www.goodreads.com/book/show/68429.The_Well_of_Ascension";

fn clock() -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(2025, 11, 2, 9, 15, 0).unwrap())
}

fn columns(row: &str) -> Vec<&str> {
    row.split('\t').collect()
}

#[test]
fn test_fixture_default_row() {
    let doc = HtmlDocument::parse(PAGE, URL);
    let store = SettingsStore::open(MemoryStore::new());
    let clock = clock();
    let row = BookInfoExtractor::new(&doc, store.settings())
        .with_clock(&clock)
        .get_book_info()
        .unwrap();

    assert_eq!(
        columns(&row),
        vec![
            "The Well of Ascension",
            "Mistborn",
            "2",
            "Novel",
            "590",
            "",
            "4.39",
            "Sanderson, Brandon",
            "",
            "August 21, 2007",
            "",
            "99",
            "2 Nov 2025",
            "",
            URL,
        ]
    );
}

#[test]
fn test_format_settings_change_output() {
    let doc = HtmlDocument::parse(PAGE, URL);
    let mut store = SettingsStore::open(MemoryStore::new());
    store.set("authorFormat", json!("full")).unwrap();
    store.set("dateFormat", json!("iso")).unwrap();
    store.set("dateAddedFormat", json!("us")).unwrap();
    store
        .set(
            "fieldOrder",
            json!(["author", "publishDate", "dateAdded"]),
        )
        .unwrap();
    store.set("separator", json!(",")).unwrap();

    assert_eq!(store.settings().date_format, DateFormat::Iso);
    assert_eq!(store.settings().date_added_format, DateAddedFormat::Us);

    let clock = clock();
    let row = BookInfoExtractor::new(&doc, store.settings())
        .with_clock(&clock)
        .get_book_info()
        .unwrap();
    assert_eq!(row, "Brandon Sanderson,2007-08-21,Nov 2, 2025");
}

#[test]
fn test_year_only_publish_date() {
    let doc = HtmlDocument::parse(PAGE, URL);
    let mut store = SettingsStore::open(MemoryStore::new());
    store.set("dateFormat", json!("yearOnly")).unwrap();
    store.set("fieldOrder", json!(["title", "publishDate"])).unwrap();
    let row = BookInfoExtractor::new(&doc, store.settings())
        .get_book_info()
        .unwrap();
    assert_eq!(row, "The Well of Ascension\t2007");
}

#[test]
fn test_custom_field_round_trip() {
    let doc = HtmlDocument::parse(PAGE, URL);
    let mut store = SettingsStore::open(MemoryStore::new());
    let clock = clock();

    let before = BookInfoExtractor::new(&doc, store.settings())
        .with_clock(&clock)
        .get_book_info()
        .unwrap();

    let id = store.add_custom_empty_field("Shelf").unwrap();
    let mut order = store.settings().field_order.clone();
    order.insert(3, id.clone());
    store.set_field_order(order).unwrap();

    let after = BookInfoExtractor::new(&doc, store.settings())
        .with_clock(&clock)
        .get_book_info()
        .unwrap();

    let mut expected = columns(&before);
    expected.insert(3, "");
    assert_eq!(columns(&after), expected);

    store.remove_custom_empty_field(&id).unwrap();
    assert!(!store.settings().field_order.contains(&id));
    assert!(store.settings().custom_empty_fields.is_empty());

    let restored = BookInfoExtractor::new(&doc, store.settings())
        .with_clock(&clock)
        .get_book_info()
        .unwrap();
    assert_eq!(restored, before);
}

#[test]
fn test_idempotent_except_date_added() {
    let doc = HtmlDocument::parse(PAGE, URL);
    let mut store = SettingsStore::open(MemoryStore::new());
    let order: Vec<String> = store
        .settings()
        .field_order
        .iter()
        .filter(|k| k.as_str() != "dateAdded")
        .cloned()
        .collect();
    store.set_field_order(order).unwrap();

    let extractor = BookInfoExtractor::new(&doc, store.settings());
    let first = extractor.get_book_info().unwrap();
    let second = extractor.get_book_info().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_settings_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileStore::for_origin(dir.path(), "https://www.goodreads.com");
    let path = backend.path().to_path_buf();

    let mut store = SettingsStore::open(backend);
    store.set("separator", json!(";")).unwrap();
    let id = store.add_custom_empty_field("Format").unwrap();

    let reopened = SettingsStore::open(FileStore::open(&path));
    assert_eq!(reopened.settings().separator, ";");
    assert!(reopened.settings().has_custom_field(&id));
}
