/*!
 * Persistent per-novel state models.
 *
 * The glossary is the knowledge graph the prompts lean on: source terms
 * mapped to their chosen target rendering, optionally annotated with the
 * metadata (kind, gender) that drives coreference resolution.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One glossary entry: the target rendering plus optional curation metadata.
///
/// Serializes back to a bare string when it carries no metadata, so
/// hand-written `terms.json` files can stay simple `"source": "target"`
/// mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TermEntryRepr", into = "TermEntryRepr")]
pub struct TermEntry {
    /// Target-language rendering
    pub target: String,

    /// Entity kind, e.g. "character" or "place"
    pub kind: Option<String>,

    /// Grammatical gender driving pronoun agreement, e.g. "F"
    pub gender: Option<String>,

    /// Occurrence count noted by the curator (informational only)
    pub frequency: Option<u64>,
}

impl TermEntry {
    /// Entry with just a target rendering.
    pub fn simple(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: None,
            gender: None,
            frequency: None,
        }
    }

    /// Short annotation for prompt rendering, when any metadata is present.
    pub fn annotation(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .kind
            .as_deref()
            .into_iter()
            .chain(self.gender.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// On-disk shape of a term entry: either a bare target string or an object
/// with metadata.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TermEntryRepr {
    Simple(String),
    Detailed {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frequency: Option<u64>,
    },
}

impl From<TermEntryRepr> for TermEntry {
    fn from(repr: TermEntryRepr) -> Self {
        match repr {
            TermEntryRepr::Simple(target) => Self::simple(target),
            TermEntryRepr::Detailed {
                target,
                kind,
                gender,
                frequency,
            } => Self {
                target,
                kind,
                gender,
                frequency,
            },
        }
    }
}

impl From<TermEntry> for TermEntryRepr {
    fn from(entry: TermEntry) -> Self {
        if entry.kind.is_none() && entry.gender.is_none() && entry.frequency.is_none() {
            Self::Simple(entry.target)
        } else {
            Self::Detailed {
                target: entry.target,
                kind: entry.kind,
                gender: entry.gender,
                frequency: entry.frequency,
            }
        }
    }
}

/// Accumulated source -> target term mappings for one novel.
///
/// Backed by a sorted map so prompt rendering and JSON write-back stay
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glossary {
    terms: BTreeMap<String, TermEntry>,
}

impl Glossary {
    /// Create an empty glossary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the glossary has no entries.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether a source term is already mapped.
    pub fn contains(&self, source: &str) -> bool {
        self.terms.contains_key(source)
    }

    /// Look up the entry for a source term.
    pub fn get(&self, source: &str) -> Option<&TermEntry> {
        self.terms.get(source)
    }

    /// Insert or replace a simple mapping.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.terms.insert(source.into(), TermEntry::simple(target));
    }

    /// Insert or replace a full entry.
    pub fn insert_entry(&mut self, source: impl Into<String>, entry: TermEntry) {
        self.terms.insert(source.into(), entry);
    }

    /// Merge entries whose source terms are not mapped yet. Existing keys
    /// always win. Returns how many entries were added.
    pub fn merge_missing(&mut self, other: &Glossary) -> usize {
        let mut added = 0;
        for (source, entry) in &other.terms {
            if !self.terms.contains_key(source) {
                self.terms.insert(source.clone(), entry.clone());
                added += 1;
            }
        }
        added
    }

    /// Iterate mappings in source-term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermEntry)> {
        self.terms.iter().map(|(source, entry)| (source.as_str(), entry))
    }

    /// Apply the mappings to translated text as literal replacements.
    ///
    /// Conservative post-correction for terms the model rendered its own
    /// way despite the prompt instructions.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (source, entry) in &self.terms {
            out = out.replace(source.as_str(), &entry.target);
        }
        out
    }
}
