use std::sync::Once;

use partition_core::{AggregateStats, Aggregator, Profile, ProfileInput};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(partition_logging::initialize_for_tests);
}

fn input(url: &str, username: &str, classification: &str) -> ProfileInput {
    ProfileInput {
        url: url.to_string(),
        username: username.to_string(),
        classification: classification.to_string(),
    }
}

fn assert_balanced(stats: &AggregateStats) {
    assert_eq!(
        stats.added + stats.duplicates + stats.missing_url + stats.invalid,
        stats.parsed,
        "unbalanced stats for {}",
        stats.source
    );
}

#[test]
fn cross_source_duplicate_is_recorded() {
    init_logging();
    let mut agg = Aggregator::new();

    let a = agg.add_profiles(vec![input("example.com/x", "x", "yes")], "fileA.json");
    let b = agg.add_profiles(vec![ProfileInput::from_url("https://example.com/X/")], "fileB.txt");

    assert_eq!((a.added, a.duplicates), (1, 0));
    assert_eq!((b.added, b.duplicates), (0, 1));
    assert_balanced(&a);
    assert_balanced(&b);

    let dups = agg.duplicates();
    assert_eq!(dups.len(), 1);
    let record = &dups[0];
    assert_eq!(record.url, "https://example.com/x");
    assert_eq!(record.all_sources, vec!["fileA.json", "fileB.txt"]);
    assert_eq!(record.existing.username, "x");
    assert_eq!(record.existing.sources, vec!["fileA.json", "fileB.txt"]);
    assert_eq!(record.conflicting.len(), 1);
    assert_eq!(record.conflicting[0].sources, vec!["fileB.txt"]);
    assert!(record.classification.is_empty());

    let stored = agg.store().get("https://example.com/x").unwrap();
    assert_eq!(stored.sources, vec!["fileA.json", "fileB.txt"]);
    assert_eq!(stored.classification, "yes");
}

#[test]
fn missing_urls_are_counted_not_stored() {
    init_logging();
    let mut agg = Aggregator::new();
    let stats = agg.add_profiles(
        vec![
            input("", "nobody", "yes"),
            input("   ", "", ""),
            input("https://example.com/ok", "", ""),
        ],
        "mixed.json",
    );

    assert_eq!(
        stats,
        AggregateStats {
            source: "mixed.json".to_string(),
            parsed: 3,
            added: 1,
            duplicates: 0,
            invalid: 0,
            missing_url: 2,
        }
    );
    assert_eq!(agg.store().len(), 1);
}

#[test]
fn repeated_conflicts_extend_one_record() {
    init_logging();
    let mut agg = Aggregator::new();
    agg.add_profiles(vec![input("https://b.example/u", "u", "")], "c.json");
    agg.add_profiles(vec![input("https://a.example/v", "v", "")], "c.json");
    let stats = agg.add_profiles(
        vec![
            input("b.example/u", "u2", "maybe"),
            input("B.example/U/", "u3", ""),
            input("https://a.example/v#frag", "v2", "no"),
        ],
        "a.txt",
    );
    assert_eq!(stats.duplicates, 3);
    assert_balanced(&stats);

    let dups = agg.duplicates();
    let urls: Vec<_> = dups.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.example/v", "https://b.example/u"]);

    let b = &dups[1];
    let usernames: Vec<_> = b.conflicting.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(usernames, vec!["u2", "u3"]);
    assert_eq!(b.all_sources, vec!["a.txt", "c.json"]);
    assert_eq!(b.classification, vec!["maybe"]);
    assert_eq!(dups[0].classification, vec!["no"]);

    let flattened: Vec<String> = agg
        .flatten_duplicates()
        .into_iter()
        .map(|p| p.username)
        .collect();
    assert_eq!(flattened, vec!["v2", "u2", "u3"]);
}

#[test]
fn same_source_repeat_is_a_duplicate() {
    init_logging();
    let mut agg = Aggregator::new();
    let stats = agg.add_profiles(
        vec![
            ProfileInput::from_url("https://example.com/a"),
            ProfileInput::from_url("https://example.com/a/"),
        ],
        "list.md",
    );
    assert_eq!((stats.added, stats.duplicates), (1, 1));

    let dups = agg.duplicates();
    assert_eq!(dups[0].all_sources, vec!["list.md"]);
    assert_eq!(dups[0].existing.sources, vec!["list.md"]);
}

#[test]
fn store_order_survives_duplicate_merges() {
    init_logging();
    let mut agg = Aggregator::new();
    agg.add_profiles(
        ["https://z.example", "https://m.example", "https://a.example"]
            .map(ProfileInput::from_url),
        "first.txt",
    );
    agg.add_profiles(
        ["https://a.example", "https://new.example", "https://z.example"]
            .map(ProfileInput::from_url),
        "second.txt",
    );

    let urls: Vec<_> = agg.store().list().into_iter().map(|p| p.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://z.example/",
            "https://m.example/",
            "https://a.example/",
            "https://new.example/",
        ]
    );
}

#[test]
fn duplicate_snapshots_are_detached() {
    init_logging();
    let mut agg = Aggregator::new();
    agg.add_profiles(vec![ProfileInput::from_url("https://example.com")], "a.txt");
    agg.add_profiles(vec![ProfileInput::from_url("https://example.com")], "b.txt");

    let mut snapshot = agg.duplicates();
    snapshot[0].conflicting.push(Profile::default());
    snapshot[0].all_sources.clear();

    let fresh = agg.duplicates();
    assert_eq!(fresh[0].conflicting.len(), 1);
    assert_eq!(fresh[0].all_sources, vec!["a.txt", "b.txt"]);
}

#[test]
fn report_uses_pascal_case_field_names() {
    init_logging();
    let mut agg = Aggregator::new();
    agg.add_profiles(vec![input("example.com/x", "x", "yes")], "a.json");
    agg.add_profiles(vec![input("example.com/x", "x", "no")], "b.json");

    let value = serde_json::to_value(agg.duplicates()).unwrap();
    let record = &value[0];
    assert_eq!(record["URL"], "https://example.com/x");
    assert_eq!(record["Existing"]["Username"], "x");
    assert_eq!(record["Conflicting"][0]["Sources"][0], "b.json");
    assert_eq!(record["AllSources"], serde_json::json!(["a.json", "b.json"]));
    assert_eq!(record["Classification"], serde_json::json!(["no"]));
}

#[test]
fn existing_is_captured_at_first_conflict_with_merged_source() {
    init_logging();
    let mut agg = Aggregator::new();
    agg.add_profiles(vec![input("example.com/x", "x", "yes")], "fileA.json");
    agg.add_profiles(vec![ProfileInput::from_url("https://example.com/X/")], "fileB.txt");
    agg.add_profiles(vec![ProfileInput::from_url("example.com/x?utm=1")], "fileC.md");

    let dups = agg.duplicates();
    assert_eq!(dups[0].existing.sources, vec!["fileA.json", "fileB.txt"]);
    assert_eq!(
        dups[0].all_sources,
        vec!["fileA.json", "fileB.txt", "fileC.md"]
    );
    assert_eq!(
        agg.store().get("https://example.com/x").unwrap().sources,
        vec!["fileA.json", "fileB.txt", "fileC.md"]
    );
}
