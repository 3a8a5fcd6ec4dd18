// Player identity resolution: maps each pick to the key picks are grouped by.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draft::pick::PickRecord;

/// Generational suffixes dropped by name normalization.
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// How picks from independently sourced drafts are matched to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// The display name exactly as recorded. "A.J. Brown" and "AJ Brown"
    /// are different players.
    #[default]
    DisplayName,
    /// Display name after [`normalize_name`].
    NormalizedName,
    /// The platform player id when present, otherwise the normalized name.
    ExternalId,
}

impl IdentityStrategy {
    /// Parse a config/CLI string (`display_name`, `normalized_name`,
    /// `external_id`). Hyphens are accepted in place of underscores.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "display_name" | "name" => Some(Self::DisplayName),
            "normalized_name" | "normalized" => Some(Self::NormalizedName),
            "external_id" | "id" => Some(Self::ExternalId),
            _ => None,
        }
    }
}

/// Lowercase, strip punctuation, collapse whitespace and drop trailing
/// generational suffixes. Hyphens separate words.
///
/// `"Kenneth Walker III"` → `"kenneth walker"`, `"A.J. Brown"` → `"aj brown"`.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| NAME_SUFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Resolves picks to canonical player keys ahead of aggregation.
///
/// Aliases map a recorded display name to the name it should be counted
/// as, and are applied before the strategy.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    strategy: IdentityStrategy,
    aliases: HashMap<String, String>,
}

impl IdentityResolver {
    pub fn new(strategy: IdentityStrategy) -> Self {
        Self {
            strategy,
            aliases: HashMap::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn strategy(&self) -> IdentityStrategy {
        self.strategy
    }

    /// Display name after alias substitution.
    pub fn display_name<'a>(&'a self, pick: &'a PickRecord) -> &'a str {
        self.aliases
            .get(&pick.player_name)
            .map(String::as_str)
            .unwrap_or(&pick.player_name)
    }

    /// Canonical key for `pick`, or `None` when the pick carries no usable
    /// identity.
    pub fn key_for(&self, pick: &PickRecord) -> Option<String> {
        let name = self.display_name(pick);
        let key = match self.strategy {
            IdentityStrategy::DisplayName => name.to_string(),
            IdentityStrategy::NormalizedName => normalize_name(name),
            IdentityStrategy::ExternalId => match pick.player_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => format!("id:{id}"),
                _ => normalize_name(name),
            },
        };

        if key.trim().is_empty() {
            None
        } else {
            Some(key)
        }
    }
}
