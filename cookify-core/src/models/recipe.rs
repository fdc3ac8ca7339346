use serde::{Deserialize, Serialize};
use std::fmt;

use super::ingredient::Ingredient;
use crate::favorite_id::FavoriteId;

/// A hydrated recipe as returned by the catalog.
///
/// Fetched on demand and never persisted by the favorites store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: FavoriteId,
    pub name: String,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub video_url: Option<String>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
}

impl Recipe {
    pub fn new(id: impl Into<FavoriteId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            category: None,
            area: None,
            instructions: String::new(),
            ingredients: Vec::new(),
            video_url: None,
            source_url: None,
            tags: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Short preview of the instructions, cut at `max_chars` characters
    /// with "..." appended when anything was cut.
    pub fn summary(&self, max_chars: usize) -> String {
        let text = self.instructions.trim();
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
            None => text.to_string(),
        }
    }

    /// "Category • Area", skipping whichever is missing.
    pub fn origin(&self) -> Option<String> {
        match (&self.category, &self.area) {
            (Some(category), Some(area)) => Some(format!("{} • {}", category, area)),
            (Some(category), None) => Some(category.clone()),
            (None, Some(area)) => Some(area.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;

        if let Some(origin) = self.origin() {
            writeln!(f, "{}", origin)?;
        }

        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.instructions.is_empty() {
            writeln!(f, "\nInstructions:\n{}", self.instructions.trim())?;
        }

        if let Some(url) = &self.video_url {
            writeln!(f, "\nVideo: {}", url)?;
        }
        if let Some(url) = &self.source_url {
            writeln!(f, "Source: {}", url)?;
        }

        Ok(())
    }
}
