use serde::{Deserialize, Serialize};

/// The closed set of bins the station accumulates levels for. Fixed at
/// configuration time; no bins are created dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalBin {
    Recyclable,
    NonRecyclable,
    Organic,
}

impl CanonicalBin {
    pub const ALL: [CanonicalBin; 3] = [
        CanonicalBin::Recyclable,
        CanonicalBin::NonRecyclable,
        CanonicalBin::Organic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalBin::Recyclable => "Recyclable",
            CanonicalBin::NonRecyclable => "NonRecyclable",
            CanonicalBin::Organic => "Organic",
        }
    }

    pub fn from_name(name: &str) -> Option<CanonicalBin> {
        CanonicalBin::ALL.into_iter().find(|bin| bin.as_str() == name)
    }

    /// Short dashboard copy shown next to each bin meter.
    pub fn description(&self) -> &'static str {
        match self {
            CanonicalBin::Recyclable => "Bottles, cans, paper...",
            CanonicalBin::NonRecyclable => "Broken toys, dirty items",
            CanonicalBin::Organic => "Food scraps, fruit peels",
        }
    }
}

impl std::fmt::Display for CanonicalBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps raw model vocabulary onto canonical bins. Built once from config;
/// lookups are pure and deterministic.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    table: Vec<(String, CanonicalBin)>,
}

impl Taxonomy {
    pub fn new(table: Vec<(&str, CanonicalBin)>) -> Self {
        Self {
            table: table
                .into_iter()
                .map(|(label, bin)| (label.to_string(), bin))
                .collect(),
        }
    }

    /// The known vocabulary of the 3-class deployment.
    pub fn three_class() -> Self {
        Self::new(vec![
            ("Recyclable", CanonicalBin::Recyclable),
            ("Recyclable_item", CanonicalBin::Recyclable),
            ("Non-Recyclable", CanonicalBin::NonRecyclable),
            ("NonRecyclable", CanonicalBin::NonRecyclable),
            ("Organic", CanonicalBin::Organic),
            ("Compost", CanonicalBin::Organic),
        ])
    }

    /// Looks a raw model label up in the configured table, falling back to a
    /// direct match against the canonical names. Returns `None` for labels
    /// outside the vocabulary; callers drop those without touching any bin.
    pub fn normalize(&self, raw_label: &str) -> Option<CanonicalBin> {
        self.table
            .iter()
            .find(|(known, _)| known == raw_label)
            .map(|(_, bin)| *bin)
            .or_else(|| CanonicalBin::from_name(raw_label))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::three_class()
    }
}
