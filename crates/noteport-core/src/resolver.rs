//! Cross-record reference resolution
//!
//! Runs after every record of a batch exists. `[[Name]]` and `((block-id))`
//! tokens inside text and wikilink segments are looked up in a
//! [`ReferenceIndex`] and replaced by `ref` segments. Misses become literal
//! text so a second pass finds the same unresolved remainder.

use std::collections::HashMap;

use noteport_parser::{Block, Segment};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::store::RecordId;

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]]+)\]\]|\(\(([^)]+)\)\)").expect("reference regex")
});

/// A record produced by the current import batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRecord {
    pub id: RecordId,
    /// Display name, used for `[[Name]]` lookups
    pub title: String,
    /// Source path of the document last written into this record
    pub path: String,
    pub blocks: Vec<Block>,
    /// Block ids declared in the source (outline documents)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub block_ids: Vec<String>,
}

/// Name and block-id lookup tables for one batch
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    names: HashMap<String, Vec<RecordId>>,
    block_ids: HashMap<String, RecordId>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every record of a batch, in batch order
    pub fn from_records(records: &[ImportedRecord]) -> Self {
        let mut index = Self::new();
        for record in records {
            index.add_name(&record.title, &record.id);
            for block_id in &record.block_ids {
                index.add_block_id(block_id, &record.id);
            }
        }
        index
    }

    /// Register a display name; earlier records stay first in the candidate list
    pub fn add_name(&mut self, name: &str, id: &str) {
        let key = normalize_key(name);
        if key.is_empty() {
            return;
        }
        let candidates = self.names.entry(key).or_default();
        if !candidates.iter().any(|c| c == id) {
            candidates.push(id.to_string());
        }
    }

    /// Register a block id; the first record to declare it keeps it
    pub fn add_block_id(&mut self, block_id: &str, id: &str) {
        let key = normalize_key(block_id);
        if key.is_empty() {
            return;
        }
        self.block_ids.entry(key).or_insert_with(|| id.to_string());
    }

    /// Candidates for a display name, first writer first
    pub fn lookup_name(&self, name: &str) -> &[RecordId] {
        self.names
            .get(&normalize_key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lookup_block(&self, block_id: &str) -> Option<&RecordId> {
        self.block_ids.get(&normalize_key(block_id))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.block_ids.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Reduce a wikilink's inner text to its note name
///
/// `Note|alias`, `Note#Heading` and `Note#^block` all name `Note`.
pub fn wikilink_target(inner: &str) -> &str {
    let end = inner.find(['|', '#']).unwrap_or(inner.len());
    inner[..end].trim()
}

/// Picks one record when a name matches several
pub trait Disambiguator: Send + Sync {
    /// Return the chosen record, or `None` to leave the reference unresolved
    fn choose(&self, name: &str, candidates: &[RecordId]) -> Option<RecordId>;
}

/// Always picks the earliest record
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl Disambiguator for FirstCandidate {
    fn choose(&self, _name: &str, candidates: &[RecordId]) -> Option<RecordId> {
        candidates.first().cloned()
    }
}

/// Counters for one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub links_found: usize,
    pub links_resolved: usize,
    /// Names that matched more than one record
    pub ambiguous: usize,
    /// Records whose blocks changed and were rewritten
    pub updated_records: usize,
    /// Records whose rewrite failed in the store
    pub failed_records: usize,
}

/// Rewrites reference tokens using a [`ReferenceIndex`]
pub struct ReferenceResolver {
    index: ReferenceIndex,
    disambiguator: Box<dyn Disambiguator>,
}

impl ReferenceResolver {
    pub fn new(index: ReferenceIndex) -> Self {
        Self {
            index,
            disambiguator: Box::new(FirstCandidate),
        }
    }

    #[must_use]
    pub fn with_disambiguator(mut self, disambiguator: Box<dyn Disambiguator>) -> Self {
        self.disambiguator = disambiguator;
        self
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Resolve every record of a batch in place
    ///
    /// `updated_records` counts records whose blocks changed.
    pub fn resolve(&self, records: &mut [ImportedRecord]) -> ResolutionStats {
        let mut stats = ResolutionStats::default();
        for record in records.iter_mut() {
            if self.resolve_blocks(&mut record.blocks, &mut stats) {
                stats.updated_records += 1;
            }
        }
        stats
    }

    /// Resolve the segments of a block list, returning whether anything changed
    pub fn resolve_blocks(&self, blocks: &mut [Block], stats: &mut ResolutionStats) -> bool {
        let mut changed = false;
        for block in blocks.iter_mut() {
            let Some(segments) = block.segments_mut() else {
                continue;
            };
            let resolved = self.resolve_segments(segments, stats);
            if resolved != *segments {
                *segments = resolved;
                changed = true;
            }
        }
        changed
    }

    /// Resolve one segment sequence
    ///
    /// Text around each reference is split off so segment boundaries line up
    /// with reference boundaries. Styled and already resolved segments are
    /// copied through.
    pub fn resolve_segments(&self, segments: &[Segment], stats: &mut ResolutionStats) -> Vec<Segment> {
        let mut output = Vec::with_capacity(segments.len());

        for segment in segments {
            if !segment.may_contain_reference() {
                output.push(segment.clone());
                continue;
            }

            let text = segment.as_str();
            let mut last = 0;
            let mut found_any = false;

            for caps in REFERENCE_REGEX.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                found_any = true;
                if whole.start() > last {
                    output.push(Segment::Text(text[last..whole.start()].to_string()));
                }

                stats.links_found += 1;
                match self.lookup(&caps, stats) {
                    Some(id) => {
                        stats.links_resolved += 1;
                        output.push(Segment::Ref(id));
                    }
                    None => output.push(Segment::Text(whole.as_str().to_string())),
                }
                last = whole.end();
            }

            if !found_any {
                output.push(match segment {
                    // a wikilink the pattern does not accept is plain text now
                    Segment::Wikilink(s) => Segment::Text(s.clone()),
                    other => other.clone(),
                });
            } else if last < text.len() {
                output.push(Segment::Text(text[last..].to_string()));
            }
        }

        output
    }

    fn lookup(&self, caps: &Captures<'_>, stats: &mut ResolutionStats) -> Option<RecordId> {
        if let Some(block_id) = caps.get(2) {
            let hit = self.index.lookup_block(block_id.as_str()).cloned();
            if hit.is_none() {
                debug!(block_id = block_id.as_str(), "unresolved block reference");
            }
            return hit;
        }

        let name = wikilink_target(caps.get(1)?.as_str());
        let candidates = self.index.lookup_name(name);
        match candidates.len() {
            0 => {
                debug!(name, "unresolved wikilink");
                None
            }
            1 => candidates.first().cloned(),
            _ => {
                stats.ambiguous += 1;
                debug!(name, candidates = candidates.len(), "ambiguous wikilink");
                self.disambiguator.choose(name, candidates)
            }
        }
    }
}
