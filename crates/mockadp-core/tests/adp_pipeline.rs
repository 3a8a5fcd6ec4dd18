// Store -> aggregate -> export, through the file-backed store.

use chrono::{Duration, TimeZone, Utc};
use mockadp_core::export::{export, read_export};
use mockadp_core::store::{DraftRepository, JsonDraftStore, LoadStatus};
use mockadp_core::{calculate_adp, DraftRecord, PickRecord, TieBreak};

fn pick(name: &str, overall: u32) -> PickRecord {
    PickRecord {
        player_name: name.to_string(),
        player_id: None,
        position: "RB".into(),
        team: "SF".into(),
        round_num: (overall - 1) / 12 + 1,
        pick_num: (overall - 1) % 12 + 1,
        overall_pick: overall,
        drafted_by_team: format!("Team{}", (overall - 1) % 12 + 1),
    }
}

fn draft(i: usize, picks: Vec<PickRecord>) -> DraftRecord {
    let date = Utc.with_ymd_and_hms(2025, 8, 1, 19, 0, 0).unwrap() + Duration::days(i as i64);
    DraftRecord::new(format!("mock_{i}"), date, 12, 16).with_picks(picks)
}

/// Ten drafts giving means Alpha 5.1, Bravo 5.1, Charlie 12.3.
fn tied_drafts() -> Vec<DraftRecord> {
    (0..10)
        .map(|i| {
            let alpha = if i < 9 { 5 } else { 6 };
            let bravo = match i {
                0..=4 => 4,
                5..=8 => 6,
                _ => 7,
            };
            let charlie = if i < 7 { 12 } else { 13 };
            draft(i, vec![pick("Charlie", charlie), pick("Bravo", bravo), pick("Alpha", alpha)])
        })
        .collect()
}

#[test]
fn save_then_load_preserves_order_and_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("mock_drafts.json");

    let mut store = JsonDraftStore::load(&path);
    assert_eq!(store.load_status(), &LoadStatus::Fresh);
    let later = draft(5, vec![pick("Bijan Robinson", 1)]).with_keepers(vec!["Josh Allen".into()]);
    let earlier = draft(1, vec![pick("Breece Hall", 2), pick("Jahmyr Gibbs", 3)]).with_notes("early");
    store.add(later.clone()).unwrap();
    store.add(earlier.clone()).unwrap();

    let reloaded = JsonDraftStore::load(&path);
    assert_eq!(reloaded.load_status(), &LoadStatus::Loaded(2));
    assert_eq!(reloaded.drafts(), &[later, earlier]);
}

#[test]
fn corrupt_store_loads_empty_and_is_replaced_on_next_add() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mock_drafts.json");
    std::fs::write(&path, "[{\"draft_id\": 12").unwrap();

    let mut store = JsonDraftStore::load(&path);
    assert!(store.is_empty());
    assert!(matches!(store.load_status(), LoadStatus::Recovered(_)));

    store.add(draft(0, vec![pick("Bijan Robinson", 1)])).unwrap();
    assert_eq!(JsonDraftStore::load(&path).len(), 1);
}

#[test]
fn aggregate_from_persisted_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mock_drafts.json");
    let mut store = JsonDraftStore::load(&path);
    store.add(draft(0, vec![pick("Saquon Barkley", 3), pick("CeeDee Lamb", 1)])).unwrap();
    store.add(draft(1, vec![pick("Saquon Barkley", 5)])).unwrap();
    store.add(draft(2, vec![pick("Saquon Barkley", 7)])).unwrap();

    let store = JsonDraftStore::load(&path);
    let table = calculate_adp(&store, 3);
    assert!(table.warning().is_none());
    assert_eq!(table.len(), 2);

    let saquon = table.get("Saquon Barkley").unwrap();
    assert_eq!(saquon.times_drafted, 3);
    assert_eq!(saquon.average_pick, 5.0);
    assert_eq!(saquon.median_pick, 5.0);
    assert_eq!((saquon.earliest_pick, saquon.latest_pick), (3, 7));
    assert!(saquon.std_dev > 0.0);
    assert_eq!(saquon.all_picks, vec![3, 5, 7]);

    let lamb = table.get("CeeDee Lamb").unwrap();
    assert_eq!(lamb.std_dev, 0.0);
    assert!((lamb.draft_percentage - 100.0 / 3.0).abs() < 1e-9);

    // Recomputing over the unchanged store gives the same table.
    let again = calculate_adp(&store, 3);
    for (key, agg) in table.iter() {
        assert_eq!(again.get(key), Some(agg));
    }
}

#[test]
fn keeper_drafts_still_count_toward_percentage() {
    let drafts = vec![
        draft(0, vec![pick("Christian McCaffrey", 1)]),
        draft(1, vec![pick("Christian McCaffrey", 2)]),
        draft(2, vec![pick("Tyreek Hill", 1)]).with_keepers(vec!["Christian McCaffrey".into()]),
        draft(3, vec![]).with_keepers(vec!["Christian McCaffrey".into()]),
    ];
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonDraftStore::load(dir.path().join("drafts.json"));
    for d in drafts {
        store.add(d).unwrap();
    }

    let table = calculate_adp(&store, 1);
    assert_eq!(table.total_drafts(), 4);
    assert_eq!(table.get("Christian McCaffrey").unwrap().draft_percentage, 50.0);
    assert_eq!(table.get("Tyreek Hill").unwrap().draft_percentage, 25.0);
}

#[test]
fn nameless_pick_is_left_out() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonDraftStore::load(dir.path().join("drafts.json"));
    store
        .add(draft(0, vec![pick("Amon-Ra St. Brown", 4), pick("  ", 5)]))
        .unwrap();
    store.add(draft(1, vec![pick("Amon-Ra St. Brown", 6)])).unwrap();

    let table = calculate_adp(&store, 1);
    assert_eq!(table.len(), 1);
    let arsb = table.get("Amon-Ra St. Brown").unwrap();
    assert_eq!(arsb.all_picks, vec![4, 6]);
    assert_eq!(arsb.draft_percentage, 100.0);
}

#[test]
fn export_places_tied_means_ahead_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonDraftStore::load(dir.path().join("drafts.json"));
    for d in tied_drafts() {
        store.add(d).unwrap();
    }
    let table = calculate_adp(&store, 3);
    assert_eq!(table.get("Alpha").unwrap().average_pick, 5.1);
    assert_eq!(table.get("Bravo").unwrap().average_pick, 5.1);
    assert_eq!(table.get("Charlie").unwrap().average_pick, 12.3);

    let mut buf = Vec::new();
    assert_eq!(export(&table, &mut buf, TieBreak::Name).unwrap(), 3);

    let rows = read_export(buf.as_slice()).unwrap();
    let order: Vec<(usize, &str)> = rows.iter().map(|r| (r.rank, r.player_name.as_str())).collect();
    assert_eq!(order, vec![(1, "Alpha"), (2, "Bravo"), (3, "Charlie")]);
    assert_eq!(rows[2].draft_percentage, "100.0%");
}
