use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Source, Sources};

/// A deduplicated URL together with every channel that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    pub url: String,
    pub sources: Sources,
}

impl AggregatedEntry {
    pub fn new(url: impl Into<String>, source: Source) -> Self {
        Self {
            url: url.into(),
            sources: Sources::only(source),
        }
    }

    pub fn badge(&self) -> String {
        self.sources.badge()
    }
}

/// Merge the two discovery channels into one attributed list.
///
/// DOM results are visited first, then network results; each URL keeps the
/// position of its first sighting and collects every source that saw it.
pub fn merge_sources<D, N>(dom: D, network: N) -> Vec<AggregatedEntry>
where
    D: IntoIterator,
    D::Item: Into<String>,
    N: IntoIterator,
    N::Item: Into<String>,
{
    let mut entries: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let tagged = dom
        .into_iter()
        .map(|url| (url.into(), Source::Dom))
        .chain(network.into_iter().map(|url| (url.into(), Source::Network)));

    for (url, source) in tagged {
        match index.get(&url) {
            Some(&pos) => entries[pos].sources.insert(source),
            None => {
                index.insert(url.clone(), entries.len());
                entries.push(AggregatedEntry::new(url, source));
            }
        }
    }

    entries
}
