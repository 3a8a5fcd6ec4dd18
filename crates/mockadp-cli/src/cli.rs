// Command-line surface of the `mockadp` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Track mock drafts and compute custom ADP from them.
#[derive(Debug, Parser)]
#[command(name = "mockadp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Draft store file (overrides store.path in config/tracker.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import Sleeper drafts by id
    Import {
        /// One or more Sleeper draft ids
        #[arg(required = true)]
        draft_ids: Vec<String>,

        /// Player kept before the draft (repeatable)
        #[arg(long = "keeper", value_name = "PLAYER")]
        keepers: Vec<String>,

        /// Note stored with each draft
        #[arg(long)]
        notes: Option<String>,
    },

    /// List a user's Sleeper drafts without importing them
    Discover(DiscoverArgs),

    /// Discover a user's Sleeper drafts and import the new ones
    Pull {
        #[command(flatten)]
        discover: DiscoverArgs,

        /// Player kept before the draft (repeatable)
        #[arg(long = "keeper", value_name = "PLAYER")]
        keepers: Vec<String>,

        /// Note stored with each draft
        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a draft from a pick list file (player_name,position,team[,drafted_by_team])
    Add {
        /// Pick list, one pick per line in draft order
        file: PathBuf,

        /// Draft id (default: generated from the current time)
        #[arg(long)]
        id: Option<String>,

        /// Teams in the league (default: manual.league_size)
        #[arg(long)]
        league_size: Option<u32>,

        /// Rounds in the draft (default: manual.rounds)
        #[arg(long)]
        rounds: Option<u32>,

        /// Player kept before the draft (repeatable)
        #[arg(long = "keeper", value_name = "PLAYER")]
        keepers: Vec<String>,

        /// Note stored with the draft
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show totals and the most recent drafts
    Summary,

    /// Show the ADP board
    Board {
        /// Number of players to show
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Show ADP detail for one player
    Player {
        /// Player name as recorded
        name: String,
    },

    /// Write the full ADP table to CSV
    Export {
        /// Output file (default: <export.directory>/custom_adp_<timestamp>.csv)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compare one draft's picks against the custom ADP
    Value {
        /// Stored draft id
        draft_id: String,

        /// Only picks made by this team
        #[arg(long)]
        team: Option<String>,

        /// Number of best and worst picks to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List league rosters with the round and pick each player cost last season
    Keepers {
        /// Sleeper username (default: SLEEPER_USERNAME or sleeper.username)
        #[arg(short, long)]
        username: Option<String>,

        /// Roster season (default: latest of sleeper.seasons)
        #[arg(long, value_name = "YEAR")]
        season: Option<u16>,

        /// Part of the league name (default: the user's first league)
        #[arg(long)]
        league: Option<String>,

        /// Only this team, by team or owner name
        #[arg(long)]
        team: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DiscoverArgs {
    /// Sleeper username (default: SLEEPER_USERNAME or sleeper.username)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Season to search (repeatable; default: sleeper.seasons)
    #[arg(long = "season", value_name = "YEAR")]
    pub seasons: Vec<u16>,

    /// Only drafts created within this many days (default: sleeper.recent_days)
    #[arg(long)]
    pub days: Option<i64>,

    /// Include league drafts, not just mocks
    #[arg(long)]
    pub all_types: bool,

    /// Include drafts that are not complete
    #[arg(long)]
    pub include_incomplete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_with_keepers() {
        let cli = Cli::try_parse_from([
            "mockadp", "import", "111", "222", "--keeper", "Josh Allen", "--keeper", "CeeDee Lamb",
        ])
        .unwrap();
        match cli.command {
            Command::Import { draft_ids, keepers, notes } => {
                assert_eq!(draft_ids, vec!["111", "222"]);
                assert_eq!(keepers, vec!["Josh Allen", "CeeDee Lamb"]);
                assert_eq!(notes, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn import_requires_a_draft_id() {
        assert!(Cli::try_parse_from(["mockadp", "import"]).is_err());
    }

    #[test]
    fn store_override_is_global() {
        let cli = Cli::try_parse_from(["mockadp", "board", "--store", "other.json", "-t", "5"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("other.json")));
        assert!(matches!(cli.command, Command::Board { top: 5 }));
    }

    #[test]
    fn pull_accepts_discover_flags() {
        let cli = Cli::try_parse_from([
            "mockadp", "pull", "-u", "drafter", "--season", "2024", "--season", "2025", "--all-types",
        ])
        .unwrap();
        match cli.command {
            Command::Pull { discover, .. } => {
                assert_eq!(discover.username.as_deref(), Some("drafter"));
                assert_eq!(discover.seasons, vec![2024, 2025]);
                assert!(discover.all_types);
                assert!(!discover.include_incomplete);
                assert_eq!(discover.days, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_keepers_filters() {
        let cli = Cli::try_parse_from([
            "mockadp", "keepers", "-u", "drafter", "--season", "2025", "--league", "grundle",
        ])
        .unwrap();
        match cli.command {
            Command::Keepers {
                username,
                season,
                league,
                team,
            } => {
                assert_eq!(username.as_deref(), Some("drafter"));
                assert_eq!(season, Some(2025));
                assert_eq!(league.as_deref(), Some("grundle"));
                assert_eq!(team, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
