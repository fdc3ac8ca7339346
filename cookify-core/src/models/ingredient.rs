use serde::{Deserialize, Serialize};
use std::fmt;

/// One (ingredient, measure) line of a recipe. The measure is free text
/// from the catalog, e.g. "1 tbsp" or "to taste", and may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measure: measure.into(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measure.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.measure, self.name)
        }
    }
}
