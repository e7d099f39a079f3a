use std::fmt;

use serde::{Deserialize, Serialize};

/// Discovery channel that reported a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Found by scanning the rendered document and its styles.
    #[serde(rename = "dom")]
    Dom,
    /// Seen in a completed network request for the tab.
    #[serde(rename = "net")]
    Network,
}

impl Source {
    const ALL: [Source; 2] = [Source::Dom, Source::Network];

    fn bit(self) -> u8 {
        match self {
            Source::Dom => 0b01,
            Source::Network => 0b10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Dom => "dom",
            Source::Network => "net",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`Source`]s. Iteration order is fixed: dom, then net.
///
/// Serialized as an array of channel names, e.g. `["dom", "net"]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Source>", into = "Vec<Source>")]
pub struct Sources(u8);

impl Sources {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn only(source: Source) -> Self {
        Self(source.bit())
    }

    pub fn insert(&mut self, source: Source) {
        self.0 |= source.bit();
    }

    pub fn contains(&self, source: Source) -> bool {
        self.0 & source.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Source> + '_ {
        Source::ALL.into_iter().filter(|s| self.contains(*s))
    }

    /// Short label used by list renderers: `dom`, `net` or `dom+net`.
    pub fn badge(&self) -> String {
        self.iter().map(Source::as_str).collect::<Vec<_>>().join("+")
    }
}

impl fmt::Debug for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Source> for Sources {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        let mut sources = Sources::empty();
        for source in iter {
            sources.insert(source);
        }
        sources
    }
}

impl TryFrom<Vec<Source>> for Sources {
    type Error = &'static str;

    fn try_from(value: Vec<Source>) -> Result<Self, Self::Error> {
        let sources: Sources = value.into_iter().collect();
        if sources.is_empty() {
            return Err("sources must name at least one channel");
        }
        Ok(sources)
    }
}

impl From<Sources> for Vec<Source> {
    fn from(value: Sources) -> Self {
        value.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Source, Sources};

    #[test]
    fn insert_is_idempotent() {
        let mut sources = Sources::empty();
        sources.insert(Source::Network);
        sources.insert(Source::Network);
        assert_eq!(sources.len(), 1);
        assert!(sources.contains(Source::Network));
        assert!(!sources.contains(Source::Dom));
    }

    #[test]
    fn iteration_order_is_fixed() {
        let sources: Sources = [Source::Network, Source::Dom].into_iter().collect();
        assert_eq!(sources.iter().collect::<Vec<_>>(), vec![Source::Dom, Source::Network]);
        assert_eq!(sources.badge(), "dom+net");
        assert_eq!(Sources::only(Source::Network).badge(), "net");
    }

    #[test]
    fn serializes_as_channel_names() {
        let sources: Sources = [Source::Dom, Source::Network].into_iter().collect();
        let json = serde_json::to_string(&sources).unwrap();
        assert_eq!(json, r#"["dom","net"]"#);

        let back: Sources = serde_json::from_str(r#"["net"]"#).unwrap();
        assert_eq!(back, Sources::only(Source::Network));
    }

    #[test]
    fn empty_or_unknown_channel_lists_are_rejected() {
        assert!(serde_json::from_str::<Sources>("[]").is_err());
        assert!(serde_json::from_str::<Sources>(r#"["cache"]"#).is_err());
    }
}
