//! Typed view over the free-form tag strings carried by blueprints and attributes

const HIDDEN: &str = "is:hidden";
const IS_NAME: &str = "is:name";
const IS_GEO_POSITION: &str = "is:geoPosition";
const ATTRIBUTE_PREFIX: &str = "attribute:";

/// Tags parsed once at load time
///
/// The raw list is kept for prefix queries; the flags the blueprint analysis
/// cares about are precomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    raw: Vec<String>,
    /// `is:hidden`
    pub hidden: bool,
    /// Legacy `is:name` marker
    pub is_name: bool,
    /// Legacy `is:geoPosition` marker
    pub is_geo_position: bool,
    /// Names declared with `attribute:<name>`, in tag order
    pub attribute_aliases: Vec<String>,
}

impl Tags {
    /// Parse a tag list
    pub fn new(raw: Vec<String>) -> Self {
        let attribute_aliases = raw
            .iter()
            .filter_map(|t| t.strip_prefix(ATTRIBUTE_PREFIX))
            .map(str::to_string)
            .collect();

        Self {
            hidden: raw.iter().any(|t| t == HIDDEN),
            is_name: raw.iter().any(|t| t == IS_NAME),
            is_geo_position: raw.iter().any(|t| t == IS_GEO_POSITION),
            attribute_aliases,
            raw,
        }
    }

    /// All tags as given
    pub fn as_slice(&self) -> &[String] {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Check if the exact tag is present
    pub fn has(&self, tag: &str) -> bool {
        self.raw.iter().any(|t| t == tag)
    }

    /// First tag starting with `prefix`
    ///
    /// With `strip` the prefix is removed from the returned value.
    pub fn starting_with(&self, prefix: &str, strip: bool) -> Option<&str> {
        self.raw
            .iter()
            .find(|t| t.starts_with(prefix))
            .map(|t| if strip { &t[prefix.len()..] } else { t.as_str() })
    }

    /// Every tag starting with `prefix`, optionally stripped
    pub fn all_starting_with(&self, prefix: &str, strip: bool) -> Vec<&str> {
        self.raw
            .iter()
            .filter(|t| t.starts_with(prefix))
            .map(|t| if strip { &t[prefix.len()..] } else { t.as_str() })
            .collect()
    }
}

impl From<Option<Vec<String>>> for Tags {
    fn from(raw: Option<Vec<String>>) -> Self {
        Self::new(raw.unwrap_or_default())
    }
}
