mod common;

use common::RouteWiseTest;
use serde_json::json;

const TWO_SAVED: &str = r#"{"version":1,"destinations":[
    {"id":"CPAR","name":"PARIS","country":"FRANCE","city":"PARIS","cityCode":"PAR"},
    {"id":"CROM","name":"ROME","country":"ITALY","city":"ROME","cityCode":"ROM"}
]}"#;

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_itinerary_empty_without_storage() {
    let rw = RouteWiseTest::new();

    let output = rw.run_success(&["itinerary"]);
    assert!(output.contains("My Itinerary"));
    assert!(output.contains("Your itinerary is empty"));
    assert!(output.contains("[Explore Destinations]"));
    assert!(!rw.itinerary_path().exists());
}

#[test]
fn test_itinerary_ls_lists_saved_entries() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    let output = rw.run_success(&["itinerary", "ls"]);
    assert!(output.contains("You have 2 destinations saved"));
    assert!(output.contains("PARIS"));
    assert!(output.contains("ROME"));
    assert!(output.contains("ITALY"));
}

#[test]
fn test_itinerary_ls_json() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["page"], "itinerary");
    assert_eq!(json["route"], "/itinerary");
    assert_eq!(json["count"], 2);
    assert_eq!(json["destinations"][0]["id"], "CPAR");
    assert_eq!(json["destinations"][1]["cityCode"], "ROM");

    let labels: Vec<&str> = json["actions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["label"].as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "View Details CPAR",
            "Remove CPAR",
            "View Details CROM",
            "Remove CROM",
            "Clear All"
        ]
    );
    assert_eq!(json["actions"][0]["route"], "/destination/PAR");
    assert_eq!(json["actions"][0]["state"]["destination"]["id"], "CPAR");
}

#[test]
fn test_itinerary_single_entry_uses_singular() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(r#"{"version":1,"destinations":[{"id":"PAR","cityCode":"PAR"}]}"#);

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["message"], "You have 1 destination saved");
}

// ============================================================================
// Stored layout
// ============================================================================

#[test]
fn test_malformed_storage_loads_empty() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary("{not json");

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["count"], 0);
    assert_eq!(json["message"], "Your itinerary is empty");
}

#[test]
fn test_unsupported_version_loads_empty() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(r#"{"version":99,"destinations":[{"id":"PAR"}]}"#);

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["count"], 0);
}

#[test]
fn test_legacy_array_layout_is_migrated_on_write() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(r#"[{"id":"PAR","name":"Paris","cityCode":"PAR"},{"id":"ROM"}]"#);

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["count"], 2);

    rw.run_success(&["itinerary", "remove", "ROM"]);
    let stored = rw.read_itinerary().unwrap();
    assert_eq!(stored["version"], 1);
    assert_eq!(
        stored["destinations"],
        json!([{"id":"PAR","name":"Paris","cityCode":"PAR"}])
    );
}

// ============================================================================
// Remove / clear
// ============================================================================

#[test]
fn test_remove_persists() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    let output = rw.run_success(&["itinerary", "remove", "CPAR"]);
    assert!(output.contains("Removed"));
    assert_eq!(rw.saved_ids(), vec!["CROM"]);

    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["count"], 1);
}

#[test]
fn test_remove_missing_id_is_not_an_error() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    let json = rw.run_json(&["itinerary", "remove", "NOPE"]);
    assert_eq!(json["removed"], false);
    assert_eq!(json["count"], 2);
    assert_eq!(rw.saved_ids(), vec!["CPAR", "CROM"]);
}

#[test]
fn test_remove_alias() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    rw.run_success(&["itinerary", "rm", "CROM"]);
    assert_eq!(rw.saved_ids(), vec!["CPAR"]);
}

#[test]
fn test_clear_empties_storage() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(TWO_SAVED);

    let json = rw.run_json(&["itinerary", "clear"]);
    assert_eq!(json["removed"], 2);
    assert_eq!(json["persisted"], true);

    let stored = rw.read_itinerary().unwrap();
    assert_eq!(stored["destinations"], json!([]));
}

#[test]
fn test_clear_when_empty() {
    let rw = RouteWiseTest::new();

    let output = rw.run_success(&["itinerary", "clear"]);
    assert!(output.contains("already empty"));
    assert_eq!(
        rw.read_itinerary().unwrap(),
        json!({"version": 1, "destinations": []})
    );
}

#[test]
fn test_clear_overwrites_unreadable_storage() {
    let rw = RouteWiseTest::new();
    rw.write_itinerary(r#"{"version":9,"destinations":[{"id":"PAR"}]}"#);

    let json = rw.run_json(&["itinerary", "clear"]);
    assert_eq!(json["removed"], 0);
    assert_eq!(json["persisted"], true);
    assert_eq!(
        rw.read_itinerary().unwrap(),
        json!({"version": 1, "destinations": []})
    );
}

#[test]
fn test_custom_itinerary_key() {
    let rw = RouteWiseTest::new();
    rw.run_success(&["config", "set", "storage.itinerary_key", "trip-2026"]);
    rw.write_itinerary(TWO_SAVED);

    // The default key is no longer read
    let json = rw.run_json(&["itinerary", "ls"]);
    assert_eq!(json["count"], 0);
}
