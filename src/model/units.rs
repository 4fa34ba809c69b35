//! Unit-of-measure catalog lookup

use std::collections::HashSet;

/// Answers whether a declared attribute type is a unit of measure
pub trait UnitCatalog {
    fn is_unit_type(&self, value_type: &str) -> bool;
}

/// Unit families known out of the box
const BUILTIN_UNIT_TYPES: &[&str] = &[
    "acceleration",
    "angle",
    "area",
    "current",
    "distance",
    "duration",
    "energy",
    "flowRate",
    "force",
    "frequency",
    "fuelEconomy",
    "illuminance",
    "length",
    "mass",
    "power",
    "pressure",
    "ratio",
    "speed",
    "temperature",
    "voltage",
    "volume",
];

/// Builtin catalog, optionally extended with project specific unit types
#[derive(Debug, Clone)]
pub struct Units {
    types: HashSet<String>,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            types: BUILTIN_UNIT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Units {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extra unit type names
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }
}

impl UnitCatalog for Units {
    fn is_unit_type(&self, value_type: &str) -> bool {
        self.types.contains(value_type)
    }
}
