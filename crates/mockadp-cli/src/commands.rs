// Subcommand handlers. Every query recomputes the ADP table from the store.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use chrono::{Local, Utc};
use mockadp_core::adp::aggregate::{AdpTable, SampleWarning};
use mockadp_core::adp::analysis::{summarize, value_picks};
use mockadp_core::adp::identity::IdentityResolver;
use mockadp_core::export::{default_export_name, export_to_path};
use mockadp_core::manual::{draft_from_pick_list, ManualDraft};
use mockadp_core::store::{DraftRepository, JsonDraftStore, LoadStatus};
use mockadp_core::calculate_adp_with;
use mockadp_sleeper::{DraftFilter, DraftListing, DraftPlatform, ImportReport, Importer, KeeperReport, KeeperTeam};
use tracing::{info, warn};

use crate::cli::{Command, DiscoverArgs};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Tracker state
// ---------------------------------------------------------------------------

/// Loaded configuration plus the draft store it points at.
pub struct Tracker {
    pub config: Config,
    pub store: JsonDraftStore,
    resolver: IdentityResolver,
}

impl Tracker {
    /// Open the store at `store_override`, or at `store.path` from config.
    pub fn open(config: Config, store_override: Option<PathBuf>) -> Self {
        let path = store_override.unwrap_or_else(|| config.store_path.clone());
        let store = JsonDraftStore::load(path);
        let resolver = config.resolver();
        Self {
            config,
            store,
            resolver,
        }
    }

    /// Notice for the user when the store file had to be discarded.
    pub fn store_notice(&self) -> Option<String> {
        match self.store.load_status() {
            LoadStatus::Recovered(reason) => Some(format!(
                "Warning: could not read {} ({reason}); starting with an empty dataset",
                self.store.path().display()
            )),
            _ => None,
        }
    }

    /// Fresh ADP table over the current store contents.
    pub fn table(&self) -> AdpTable {
        calculate_adp_with(self.store.drafts(), &self.resolver, self.config.adp.min_drafts_hint)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn execute<P: DraftPlatform, W: Write>(
    command: Command,
    tracker: &mut Tracker,
    importer: &mut Importer<P>,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Import {
            draft_ids,
            keepers,
            notes,
        } => {
            let report = importer
                .import_into(&mut tracker.store, &draft_ids, &keepers, notes)
                .await?;
            write_report(out, &report, tracker.store.len())?;
        }
        Command::Discover(args) => {
            let listings = discover(tracker, importer, &args).await?;
            write_listings(out, &listings, tracker)?;
        }
        Command::Pull {
            discover: args,
            keepers,
            notes,
        } => {
            let listings = discover(tracker, importer, &args).await?;
            write_listings(out, &listings, tracker)?;

            let new_ids: Vec<String> = listings
                .iter()
                .filter(|l| !tracker.store.contains(&l.draft_id))
                .map(|l| l.draft_id.clone())
                .collect();
            if new_ids.is_empty() {
                writeln!(out, "No new drafts to import.")?;
                return Ok(());
            }

            writeln!(out)?;
            let report = importer
                .import_into(&mut tracker.store, &new_ids, &keepers, notes)
                .await?;
            write_report(out, &report, tracker.store.len())?;
        }
        Command::Add {
            file,
            id,
            league_size,
            rounds,
            keepers,
            notes,
        } => add_from_file(tracker, &file, id, league_size, rounds, keepers, notes, out)?,
        Command::Summary => write_summary(tracker, out)?,
        Command::Board { top } => write_board(tracker, top, out)?,
        Command::Player { name } => write_player(tracker, &name, out)?,
        Command::Export { output } => {
            let table = tracker.table();
            write_warning(out, table.warning())?;
            let path = output.unwrap_or_else(|| {
                Path::new(&tracker.config.export.directory)
                    .join(default_export_name(Local::now().naive_local()))
            });
            let rows = export_to_path(&table, &path, tracker.config.adp.tie_break)
                .with_context(|| format!("failed to export ADP to {}", path.display()))?;
            writeln!(out, "Exported {rows} players to {}", path.display())?;
        }
        Command::Value {
            draft_id,
            team,
            limit,
        } => write_value(tracker, &draft_id, team.as_deref(), limit, out)?,
        Command::Keepers {
            username,
            season,
            league,
            team,
        } => {
            let sleeper = &tracker.config.sleeper;
            let Some(username) = username.or_else(|| sleeper.username.clone()) else {
                bail!("no Sleeper username; pass --username or set SLEEPER_USERNAME");
            };
            let Some(season) = season.or_else(|| sleeper.seasons.iter().copied().max()) else {
                bail!("no season; pass --season or set sleeper.seasons");
            };
            let report = importer
                .keeper_report(&username, season, league.as_deref())
                .await?;
            write_keepers(out, &report, team.as_deref())?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Import and discovery
// ---------------------------------------------------------------------------

async fn discover<P: DraftPlatform>(
    tracker: &Tracker,
    importer: &Importer<P>,
    args: &DiscoverArgs,
) -> anyhow::Result<Vec<DraftListing>> {
    let sleeper = &tracker.config.sleeper;
    let Some(username) = args.username.clone().or_else(|| sleeper.username.clone()) else {
        bail!("no Sleeper username; pass --username or set SLEEPER_USERNAME");
    };
    let seasons = if args.seasons.is_empty() {
        sleeper.seasons.clone()
    } else {
        args.seasons.clone()
    };
    let filter = DraftFilter {
        mock_only: !args.all_types,
        completed_only: !args.include_incomplete,
        within_days: args.days.or(sleeper.recent_days),
    };

    let listings = importer
        .discover(&username, &seasons, &filter, Utc::now())
        .await?;
    info!("Discovered {} drafts for {username}", listings.len());
    Ok(listings)
}

fn write_listings<W: Write>(out: &mut W, listings: &[DraftListing], tracker: &Tracker) -> anyhow::Result<()> {
    if listings.is_empty() {
        writeln!(out, "No matching drafts found.")?;
        return Ok(());
    }

    let now = Utc::now();
    writeln!(out, "Found {} drafts:", listings.len())?;
    for (i, listing) in listings.iter().enumerate() {
        let created = listing
            .created
            .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".into());
        let age = listing
            .days_ago(now)
            .map(|d| format!(" ({d} days ago)"))
            .unwrap_or_default();
        let stored = if tracker.store.contains(&listing.draft_id) {
            "  [stored]"
        } else {
            ""
        };
        writeln!(out, "{:>3}. {}{stored}", i + 1, listing.draft_id)?;
        writeln!(out, "     {created}{age}")?;
        writeln!(
            out,
            "     {} | {} | season {}{}",
            listing.status,
            listing.draft_type,
            listing.season,
            listing.name.as_deref().map(|n| format!(" | {n}")).unwrap_or_default()
        )?;
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &ImportReport, stored: usize) -> anyhow::Result<()> {
    for (draft_id, picks) in &report.imported {
        writeln!(out, "Imported {draft_id} ({picks} picks)")?;
    }
    for draft_id in &report.skipped {
        writeln!(out, "Skipped {draft_id} (already stored)")?;
    }
    for (draft_id, error) in &report.failed {
        writeln!(out, "Failed {draft_id}: {error}")?;
    }
    writeln!(
        out,
        "Imported {} of {} drafts; store holds {stored} drafts.",
        report.imported.len(),
        report.imported.len() + report.skipped.len() + report.failed.len()
    )?;
    Ok(())
}

fn write_keepers<W: Write>(out: &mut W, report: &KeeperReport, team: Option<&str>) -> anyhow::Result<()> {
    let teams: Vec<&KeeperTeam> = match team {
        Some(name) => match report.team(name) {
            Some(t) => vec![t],
            None => bail!("no team named '{name}' in {}", report.league_name),
        },
        None => report.teams.iter().collect(),
    };

    writeln!(
        out,
        "=== {}: {} rosters vs {} draft ===",
        report.league_name, report.season, report.draft_season
    )?;
    if report.draft_id.is_none() {
        writeln!(
            out,
            "No {} draft found for this league; every player is listed as undrafted.",
            report.draft_season
        )?;
    }
    if teams.is_empty() {
        writeln!(out, "No rosters found.")?;
        return Ok(());
    }

    for t in teams {
        writeln!(out)?;
        writeln!(out, "--- {} ({}) ---", t.team_name, t.owner_name)?;
        let range = match (t.earliest_pick(), t.latest_pick()) {
            (Some(first), Some(last)) => format!(", picks {first}-{last}"),
            _ => String::new(),
        };
        writeln!(out, "{} drafted, {} undrafted{range}", t.drafted(), t.undrafted())?;
        writeln!(
            out,
            "{:<25} {:<4} {:<4} {:<6} {:<5} {}",
            "Player", "Pos", "NFL", "Round", "Pick", "Overall"
        )?;
        for p in &t.players {
            let (round, pick, overall) = match p.prior {
                Some(prior) => (
                    prior.round.to_string(),
                    prior.pick_in_round.to_string(),
                    prior.overall.to_string(),
                ),
                None => ("-".into(), "-".into(), "-".into()),
            };
            writeln!(
                out,
                "{:<25} {:<4} {:<4} {:<6} {:<5} {}",
                p.name, p.position, p.nfl_team, round, pick, overall
            )?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Manual entry
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn add_from_file<W: Write>(
    tracker: &mut Tracker,
    file: &Path,
    id: Option<String>,
    league_size: Option<u32>,
    rounds: Option<u32>,
    keepers: Vec<String>,
    notes: Option<String>,
    out: &mut W,
) -> anyhow::Result<()> {
    let meta = ManualDraft {
        draft_id: id,
        league_size: league_size.unwrap_or(tracker.config.manual.league_size),
        rounds: rounds.unwrap_or(tracker.config.manual.rounds),
        keepers,
        notes,
    };
    let reader = File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let draft = draft_from_pick_list(reader, meta, Utc::now())
        .with_context(|| format!("invalid pick list {}", file.display()))?;

    let conflicts = draft.drafted_keepers();
    if !conflicts.is_empty() {
        warn!("Draft {} lists drafted players as keepers: {conflicts:?}", draft.draft_id);
        writeln!(out, "Warning: keepers also drafted: {}", conflicts.join(", "))?;
    }
    if tracker.store.contains(&draft.draft_id) {
        writeln!(
            out,
            "Warning: draft id {} already stored; the new record shadows it",
            draft.draft_id
        )?;
    }

    let draft_id = draft.draft_id.clone();
    let picks = draft.picks.len();
    let partial = draft.is_partial();
    tracker.store.add(draft)?;
    writeln!(
        out,
        "Added draft {draft_id} with {picks} picks{}",
        if partial { " (partial)" } else { "" }
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn write_warning<W: Write>(out: &mut W, warning: Option<SampleWarning>) -> anyhow::Result<()> {
    if let Some(w) = warning {
        writeln!(out, "Warning: {w}")?;
    }
    Ok(())
}

fn write_summary<W: Write>(tracker: &Tracker, out: &mut W) -> anyhow::Result<()> {
    let summary = summarize(tracker.store.drafts());
    writeln!(out, "=== Mock Draft Summary ===")?;
    writeln!(out, "Total drafts: {}", summary.total_drafts)?;
    writeln!(out, "Total picks: {}", summary.total_picks)?;
    writeln!(out, "Average picks per draft: {:.1}", summary.avg_picks_per_draft)?;

    if summary.recent.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Recent drafts:")?;
    for d in &summary.recent {
        writeln!(
            out,
            "  {}  {}  {} picks, {} keepers",
            d.draft_date.format("%Y-%m-%d"),
            d.draft_id,
            d.picks,
            d.keepers
        )?;
    }
    Ok(())
}

fn write_board<W: Write>(tracker: &Tracker, top: usize, out: &mut W) -> anyhow::Result<()> {
    if tracker.store.is_empty() {
        writeln!(out, "No drafts recorded yet.")?;
        return Ok(());
    }
    let table = tracker.table();
    write_warning(out, table.warning())?;
    if table.is_empty() {
        writeln!(out, "No picks recorded in {} stored drafts.", table.total_drafts())?;
        return Ok(());
    }

    writeln!(out, "=== Custom ADP ({} drafts) ===", table.total_drafts())?;
    writeln!(
        out,
        "{:<4} {:<25} {:<6} {:<8} {}",
        "Rank", "Player", "ADP", "Drafted", "Range"
    )?;
    for (i, p) in table.top(top, tracker.config.adp.tie_break).iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<25} {:<6.1} {:<8} {}-{}",
            i + 1,
            p.player_name,
            p.average_pick,
            format!("{:.0}%", p.draft_percentage),
            p.earliest_pick,
            p.latest_pick
        )?;
    }
    Ok(())
}

fn write_player<W: Write>(tracker: &Tracker, name: &str, out: &mut W) -> anyhow::Result<()> {
    let table = tracker.table();
    let Some(p) = table.player(name) else {
        writeln!(out, "No ADP data for '{name}'.")?;
        return Ok(());
    };
    write_warning(out, table.warning())?;

    let picks: Vec<String> = p.all_picks.iter().map(u32::to_string).collect();
    writeln!(out, "=== {} ===", p.player_name)?;
    writeln!(out, "ADP: {:.1}", p.average_pick)?;
    writeln!(out, "Median: {:.1}", p.median_pick)?;
    writeln!(
        out,
        "Drafted: {} of {} drafts ({:.1}%)",
        p.times_drafted,
        table.total_drafts(),
        p.draft_percentage
    )?;
    writeln!(out, "Range: {}-{}", p.earliest_pick, p.latest_pick)?;
    writeln!(out, "Std dev: {:.1}", p.std_dev)?;
    writeln!(out, "Picks: {}", picks.join(", "))?;
    Ok(())
}

fn write_value<W: Write>(
    tracker: &Tracker,
    draft_id: &str,
    team: Option<&str>,
    limit: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    let Some(draft) = tracker.store.find(draft_id) else {
        bail!("draft {draft_id} is not in the store");
    };
    let table = tracker.table();
    write_warning(out, table.warning())?;

    let values = value_picks(draft, &table, &tracker.resolver, team);
    if values.is_empty() {
        writeln!(out, "No picks to compare.")?;
        return Ok(());
    }

    writeln!(out, "=== Best value ===")?;
    for v in values.iter().filter(|v| v.value > 0.0).take(limit) {
        writeln!(
            out,
            "  #{:<4} {:<25} ADP {:<6.1} {:+.1}  {}",
            v.overall_pick, v.player_name, v.average_pick, v.value, v.drafted_by_team
        )?;
    }
    writeln!(out, "=== Biggest reaches ===")?;
    for v in values.iter().rev().filter(|v| v.value < 0.0).take(limit) {
        writeln!(
            out,
            "  #{:<4} {:<25} ADP {:<6.1} {:+.1}  {}",
            v.overall_pick, v.player_name, v.average_pick, v.value, v.drafted_by_team
        )?;
    }
    Ok(())
}
