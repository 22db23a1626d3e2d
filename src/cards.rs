//! Card planning: which Tenstorrent card families a model would run on.
use std::collections::BTreeSet;
use std::fmt;

/// Models that can be spread across wormhole cards when nothing else is configured.
pub const DEFAULT_WORMHOLE_MODELS: [&str; 3] = [
    "meta-llama/llama-3.1-8b-instruct",
    "meta-llama/llama-3.1-70b-instruct",
    "mistralai/mixtral-8x7b-instruct-v0.1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Wormhole,
    Blackhole,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Wormhole => f.write_str("wormhole"),
            Card::Blackhole => f.write_str("blackhole"),
        }
    }
}

/// An ordered list of cards, rendered as `wormhole + blackhole`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlan(pub Vec<Card>);

impl fmt::Display for CardPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Card::to_string).collect();
        f.write_str(&names.join(" + "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlanner {
    wormhole_models: BTreeSet<String>,
}

impl Default for CardPlanner {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl CardPlanner {
    /// Build a planner from configured model names. Entries are trimmed and
    /// lowercased and blanks are dropped; if nothing is left the defaults apply.
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wormhole_models: BTreeSet<String> = models
            .into_iter()
            .map(|model| normalize_model(model.as_ref()))
            .filter(|model| !model.is_empty())
            .collect();

        if wormhole_models.is_empty() {
            wormhole_models = DEFAULT_WORMHOLE_MODELS
                .iter()
                .map(|model| model.to_string())
                .collect();
        }

        Self { wormhole_models }
    }

    pub fn wormhole_models(&self) -> impl Iterator<Item = &str> {
        self.wormhole_models.iter().map(String::as_str)
    }

    /// Models matching (or prefixed by) a wormhole entry use both families.
    pub fn plan(&self, model: &str) -> CardPlan {
        let normalized = normalize_model(model);
        let wormhole = self
            .wormhole_models
            .iter()
            .any(|supported| normalized.starts_with(supported.as_str()));

        if wormhole {
            CardPlan(vec![Card::Wormhole, Card::Blackhole])
        } else {
            CardPlan(vec![Card::Blackhole])
        }
    }
}

fn normalize_model(model: &str) -> String {
    model.trim().to_lowercase()
}
