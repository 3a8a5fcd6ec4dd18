// Importer tests against an in-memory draft platform.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use mockadp_core::adp::aggregate::calculate_adp;
use mockadp_core::store::{DraftRepository, MemoryDraftStore};
use mockadp_sleeper::models::{
    LeagueMember, MemberMetadata, PlayerDirectory, PlayerInfo, RawPick, SleeperDraft, SleeperLeague, SleeperRoster,
    SleeperUser,
};
use mockadp_sleeper::{DraftFilter, DraftPlatform, ImportError, Importer};

// ===========================================================================
// Fake platform
// ===========================================================================

#[derive(Default)]
struct FakePlatform {
    users: HashMap<String, String>,
    drafts: HashMap<(String, u16), Vec<SleeperDraft>>,
    picks: HashMap<String, Vec<RawPick>>,
    players: PlayerDirectory,
    player_fetches: AtomicUsize,
    leagues: HashMap<(String, u16), Vec<SleeperLeague>>,
    rosters: HashMap<String, Vec<SleeperRoster>>,
    members: HashMap<String, Vec<LeagueMember>>,
    league_drafts: HashMap<String, Vec<SleeperDraft>>,
}

#[async_trait]
impl DraftPlatform for FakePlatform {
    async fn user(&self, username: &str) -> Result<Option<SleeperUser>, ImportError> {
        Ok(self.users.get(username).map(|id| SleeperUser {
            user_id: id.clone(),
            username: Some(username.to_string()),
            display_name: None,
        }))
    }

    async fn drafts(&self, user_id: &str, season: u16) -> Result<Vec<SleeperDraft>, ImportError> {
        Ok(self
            .drafts
            .get(&(user_id.to_string(), season))
            .cloned()
            .unwrap_or_default())
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<RawPick>, ImportError> {
        Ok(self.picks.get(draft_id).cloned().unwrap_or_default())
    }

    async fn players(&self) -> Result<PlayerDirectory, ImportError> {
        self.player_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.players.clone())
    }

    async fn leagues(&self, user_id: &str, season: u16) -> Result<Vec<SleeperLeague>, ImportError> {
        Ok(self
            .leagues
            .get(&(user_id.to_string(), season))
            .cloned()
            .unwrap_or_default())
    }

    async fn league_rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>, ImportError> {
        Ok(self.rosters.get(league_id).cloned().unwrap_or_default())
    }

    async fn league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>, ImportError> {
        Ok(self.members.get(league_id).cloned().unwrap_or_default())
    }

    async fn league_drafts(&self, league_id: &str) -> Result<Vec<SleeperDraft>, ImportError> {
        Ok(self.league_drafts.get(league_id).cloned().unwrap_or_default())
    }
}

fn player(first: &str, last: &str, pos: &str, team: &str) -> PlayerInfo {
    PlayerInfo {
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        full_name: None,
        position: Some(pos.into()),
        team: Some(team.into()),
    }
}

fn pick(player_id: Option<&str>, pick_no: u32, league_size: u32) -> RawPick {
    RawPick {
        player_id: player_id.map(str::to_string),
        round: Some((pick_no - 1) / league_size + 1),
        pick_no: Some(pick_no),
        draft_slot: Some((pick_no - 1) % league_size + 1),
        picked_by: Some("u1".into()),
        metadata: None,
    }
}

fn listing(id: &str, status: &str, league_id: Option<&str>, created_days_ago: i64) -> SleeperDraft {
    let created = Utc.with_ymd_and_hms(2025, 8, 20, 0, 0, 0).unwrap() - Duration::days(created_days_ago);
    SleeperDraft {
        draft_id: id.into(),
        status: Some(status.into()),
        draft_type: Some("snake".into()),
        league_id: league_id.map(str::to_string),
        created: Some(created.timestamp_millis()),
        season: Some("2025".into()),
        settings: None,
        metadata: None,
    }
}

fn platform() -> FakePlatform {
    let mut p = FakePlatform::default();
    p.users.insert("eleveners".into(), "u1".into());
    p.players.insert("1".into(), player("Ja'Marr", "Chase", "WR", "CIN"));
    p.players.insert("2".into(), player("Bijan", "Robinson", "RB", "ATL"));
    p.players.insert("3".into(), player("Saquon", "Barkley", "RB", "PHI"));
    p.players.insert("4".into(), player("Justin", "Jefferson", "WR", "MIN"));

    p.picks.insert(
        "mock_a".into(),
        vec![pick(Some("1"), 1, 2), pick(Some("2"), 2, 2), pick(Some("3"), 3, 2), pick(None, 4, 2)],
    );
    p.picks.insert(
        "mock_b".into(),
        vec![pick(Some("2"), 1, 2), pick(Some("1"), 2, 2), pick(Some("4"), 3, 2), pick(Some("3"), 4, 2)],
    );
    p.drafts.insert(
        ("u1".into(), 2025),
        vec![
            listing("mock_a", "complete", None, 2),
            listing("mock_b", "complete", None, 1),
            listing("league_draft", "complete", Some("55"), 1),
            listing("mock_live", "drafting", None, 0),
            listing("mock_old", "complete", None, 30),
        ],
    );
    p
}

fn league(id: &str, name: &str, previous: Option<&str>) -> SleeperLeague {
    SleeperLeague {
        league_id: id.into(),
        name: Some(name.into()),
        season: Some("2025".into()),
        previous_league_id: previous.map(str::to_string),
    }
}

fn roster(owner: &str, players: &[&str]) -> SleeperRoster {
    SleeperRoster {
        roster_id: None,
        owner_id: Some(owner.into()),
        players: Some(players.iter().map(|p| p.to_string()).collect()),
    }
}

fn member(user_id: &str, display: &str, team: Option<&str>) -> LeagueMember {
    LeagueMember {
        user_id: user_id.into(),
        display_name: Some(display.into()),
        metadata: team.map(|t| MemberMetadata {
            team_name: Some(t.into()),
        }),
    }
}

/// Two leagues for `eleveners` in 2025. The dynasty league was renewed from
/// league 81, which holds the 2024 draft.
fn keeper_platform() -> FakePlatform {
    let mut p = platform();
    p.leagues.insert(
        ("u1".into(), 2025),
        vec![league("90", "Work League", None), league("91", "Grundle Dynasty", Some("81"))],
    );
    p.rosters.insert("90".into(), vec![roster("u1", &["4"])]);
    p.rosters
        .insert("91".into(), vec![roster("u1", &["4", "3"]), roster("u2", &["1", "2"])]);
    p.members.insert(
        "91".into(),
        vec![member("u1", "eleveners", Some("11:59ers")), member("u2", "rival", None)],
    );
    p.league_drafts
        .insert("91".into(), vec![listing("grundle_25", "pre_draft", Some("91"), 0)]);
    p.league_drafts.insert(
        "81".into(),
        vec![SleeperDraft {
            season: Some("2024".into()),
            ..listing("grundle_24", "complete", Some("81"), 365)
        }],
    );
    p.picks.insert(
        "grundle_24".into(),
        vec![pick(Some("1"), 1, 2), pick(Some("2"), 2, 2), pick(Some("3"), 3, 2)],
    );
    p
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 0, 0, 0).unwrap()
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn import_draft_builds_record_and_drops_idless_picks() {
    let mut importer = Importer::new(platform());
    let draft = importer
        .import_draft("mock_a", &["Josh Allen".to_string()], None)
        .await
        .unwrap();

    assert_eq!(draft.draft_id, "mock_a");
    assert_eq!(draft.picks.len(), 3);
    assert_eq!(draft.league_size, 2);
    assert_eq!(draft.rounds, 2);
    assert_eq!(draft.keepers, vec!["Josh Allen"]);
    assert_eq!(draft.notes.as_deref(), Some("Imported from Sleeper draft mock_a"));
    assert_eq!(draft.picks[0].player_name, "Ja'Marr Chase");
    assert_eq!(draft.picks[2].round_num, 2);
    assert_eq!(draft.picks[2].pick_num, 1);
}

#[tokio::test]
async fn import_draft_without_picks_is_an_error() {
    let mut importer = Importer::new(platform());
    let err = importer.import_draft("missing", &[], None).await.unwrap_err();
    assert!(matches!(err, ImportError::NoPicks(id) if id == "missing"));
}

#[tokio::test]
async fn player_directory_is_fetched_once() {
    let mut importer = Importer::new(platform());
    importer.import_draft("mock_a", &[], None).await.unwrap();
    importer.import_draft("mock_b", &[], None).await.unwrap();
    assert_eq!(importer.platform().player_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn discover_defaults_to_completed_mocks_newest_first() {
    let importer = Importer::new(platform());
    let found = importer
        .discover("eleveners", &[2025], &DraftFilter::default(), now())
        .await
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|d| d.draft_id.as_str()).collect();
    assert_eq!(ids, vec!["mock_b", "mock_a", "mock_old"]);
    assert!(found.iter().all(|d| d.is_mock && d.is_complete()));
    assert_eq!(found[0].days_ago(now()), Some(1));
}

#[tokio::test]
async fn discover_with_recency_and_all_types() {
    let importer = Importer::new(platform());
    let filter = DraftFilter {
        mock_only: false,
        completed_only: false,
        within_days: Some(7),
    };
    let found = importer.discover("eleveners", &[2025, 2024], &filter, now()).await.unwrap();
    let mut ids: Vec<&str> = found.iter().map(|d| d.draft_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["league_draft", "mock_a", "mock_b", "mock_live"]);
}

#[tokio::test]
async fn discover_unknown_user_fails() {
    let importer = Importer::new(platform());
    let err = importer
        .discover("nobody", &[2025], &DraftFilter::default(), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::UserNotFound(name) if name == "nobody"));
}

#[tokio::test]
async fn import_into_appends_skips_and_reports_failures() {
    let mut importer = Importer::new(platform());
    let mut store = MemoryDraftStore::new();
    let ids = vec!["mock_a".to_string(), "missing".to_string(), "mock_b".to_string()];

    let report = importer
        .import_into(&mut store, &ids, &[], Some("11:59ers mock".into()))
        .await
        .unwrap();
    assert_eq!(report.imported, vec![("mock_a".to_string(), 3), ("mock_b".to_string(), 4)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "missing");
    assert_eq!(store.len(), 2);
    assert_eq!(store.find("mock_b").unwrap().notes.as_deref(), Some("11:59ers mock #3"));

    let again = importer.import_into(&mut store, &ids[..1], &[], None).await.unwrap();
    assert_eq!(again.skipped, vec!["mock_a".to_string()]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn imported_drafts_feed_the_aggregator() {
    let mut importer = Importer::new(platform());
    let mut store = MemoryDraftStore::new();
    let ids = vec!["mock_a".to_string(), "mock_b".to_string()];
    importer.import_into(&mut store, &ids, &[], None).await.unwrap();

    let table = calculate_adp(&store, 2);
    assert_eq!(table.len(), 4);
    let chase = table.get("Ja'Marr Chase").unwrap();
    assert_eq!(chase.all_picks, vec![1, 2]);
    assert_eq!(chase.average_pick, 1.5);
    let jefferson = table.get("Justin Jefferson").unwrap();
    assert!((jefferson.draft_percentage - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn keeper_report_follows_renewed_league_to_prior_draft() {
    let mut importer = Importer::new(keeper_platform());
    let report = importer
        .keeper_report("eleveners", 2025, Some("GRUNDLE"))
        .await
        .unwrap();

    assert_eq!(report.league_name, "Grundle Dynasty");
    assert_eq!(report.draft_season, 2024);
    assert_eq!(report.draft_id.as_deref(), Some("grundle_24"));

    let mine = report.team("11:59ers").unwrap();
    let names: Vec<&str> = mine.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Saquon Barkley", "Justin Jefferson"]);
    let barkley = mine.players[0].prior.unwrap();
    assert_eq!((barkley.round, barkley.pick_in_round, barkley.overall), (2, 1, 3));
    assert_eq!(mine.players[1].prior, None);

    let rival = report.team("rival").unwrap();
    assert_eq!(rival.team_name, "rival");
    assert_eq!((rival.earliest_pick(), rival.latest_pick()), (Some(1), Some(2)));
}

#[tokio::test]
async fn keeper_report_without_filter_uses_first_league() {
    let mut importer = Importer::new(keeper_platform());
    let report = importer.keeper_report("eleveners", 2025, None).await.unwrap();

    assert_eq!(report.league_id, "90");
    assert_eq!(report.draft_id, None);
    assert_eq!(report.teams.len(), 1);
    assert_eq!(report.teams[0].owner_name, "Unknown Owner");
    assert_eq!(report.teams[0].undrafted(), 1);
}

#[tokio::test]
async fn keeper_report_unknown_league_or_user_fails() {
    let mut importer = Importer::new(keeper_platform());
    let err = importer
        .keeper_report("eleveners", 2025, Some("Nope"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::LeagueNotFound { ref filter, season: 2025, .. } if filter == "nope"
    ));
    assert_eq!(err.to_string(), "no league for eleveners in 2025 matching 'nope'");

    let err = importer.keeper_report("eleveners", 2024, None).await.unwrap_err();
    assert!(matches!(err, ImportError::LeagueNotFound { ref filter, .. } if filter == "*"));

    let err = importer.keeper_report("nobody", 2025, None).await.unwrap_err();
    assert!(matches!(err, ImportError::UserNotFound(_)));
}
