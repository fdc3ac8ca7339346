//! HTTP client for TheMealDB.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::{LookupError, RecipeLookup};
use crate::favorite_id::FavoriteId;
use crate::models::{Ingredient, Recipe};

/// Public v1 endpoint with the shared test key.
pub const DEFAULT_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// TheMealDB flattens ingredients into numbered fields, 1 through 20.
const MAX_INGREDIENTS: usize = 20;

#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<Vec<MealRow>>,
}

#[derive(Debug, Deserialize)]
struct MealRow {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl MealRow {
    fn ingredients(&self) -> Vec<Ingredient> {
        (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let name = self.field(&format!("strIngredient{}", i))?;
                let measure = self.field(&format!("strMeasure{}", i)).unwrap_or("");
                Some(Ingredient::new(name, measure))
            })
            .collect()
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn into_recipe(self) -> Recipe {
        let ingredients = self.ingredients();
        let tags = self
            .tags
            .as_deref()
            .map(|t| {
                t.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Recipe {
            id: FavoriteId::new(self.id),
            name: self.name,
            thumbnail: non_empty(self.thumbnail),
            category: non_empty(self.category),
            area: non_empty(self.area),
            instructions: self.instructions.unwrap_or_default(),
            ingredients,
            video_url: non_empty(self.youtube),
            source_url: non_empty(self.source),
            tags,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Decodes a TheMealDB `{"meals": [...]}` body. `{"meals": null}` is empty.
pub fn parse_meals(body: &str) -> Result<Vec<Recipe>, LookupError> {
    let response: MealsResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    Ok(response
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(MealRow::into_recipe)
        .collect())
}

/// TheMealDB catalog client.
#[derive(Debug, Clone)]
pub struct MealDbClient {
    base_url: String,
    http: reqwest::Client,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Client whose requests fail with `LookupError::Timeout` after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search.php?s={}", self.base_url, urlencoding::encode(query))
    }

    fn lookup_url(&self, id: &FavoriteId) -> String {
        format!(
            "{}/lookup.php?i={}",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    async fn fetch(&self, url: &str) -> Result<Vec<Recipe>, LookupError> {
        tracing::debug!(url, "catalog request");

        let response = self.http.get(url).send().await.map_err(map_reqwest)?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest)?;
        parse_meals(&body)
    }
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn map_reqwest(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Http(e.to_string())
    }
}

#[async_trait]
impl RecipeLookup for MealDbClient {
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, LookupError> {
        self.fetch(&self.search_url(query)).await
    }

    async fn lookup(&self, id: &FavoriteId) -> Result<Option<Recipe>, LookupError> {
        let mut meals = self.fetch(&self.lookup_url(id)).await?;
        if meals.is_empty() {
            return Ok(None);
        }
        Ok(Some(meals.swap_remove(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_BODY: &str = r#"{
        "meals": [{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "strTags": "Meat,Casserole",
            "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
            "strIngredient1": "soy sauce",
            "strIngredient2": "water",
            "strIngredient3": " ",
            "strIngredient4": "brown sugar",
            "strIngredient5": null,
            "strMeasure1": "3/4 cup",
            "strMeasure2": "1/2 cup",
            "strMeasure3": "",
            "strMeasure4": null,
            "strMeasure5": null,
            "strSource": "",
            "dateModified": null
        }]
    }"#;

    #[test]
    fn test_parse_lookup_body() {
        let meals = parse_meals(LOOKUP_BODY).unwrap();
        assert_eq!(meals.len(), 1);

        let recipe = &meals[0];
        assert_eq!(recipe.id.as_str(), "52772");
        assert_eq!(recipe.name, "Teriyaki Chicken Casserole");
        assert_eq!(recipe.category.as_deref(), Some("Chicken"));
        assert_eq!(recipe.area.as_deref(), Some("Japanese"));
        assert_eq!(recipe.tags, vec!["Meat", "Casserole"]);
        assert!(recipe.video_url.is_some());
        assert!(recipe.source_url.is_none());
    }

    #[test]
    fn test_parse_skips_blank_ingredients_and_defaults_measure() {
        let recipe = parse_meals(LOOKUP_BODY).unwrap().remove(0);
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::new("soy sauce", "3/4 cup"),
                Ingredient::new("water", "1/2 cup"),
                Ingredient::new("brown sugar", ""),
            ]
        );
    }

    #[test]
    fn test_parse_null_meals_is_empty() {
        assert!(parse_meals(r#"{"meals": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_body_is_decode_error() {
        let err = parse_meals("<html>oops</html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn test_urls_are_encoded() {
        let client = MealDbClient::new("https://example.test/api/");
        assert_eq!(client.base_url(), "https://example.test/api");
        assert_eq!(
            client.search_url("fish & chips"),
            "https://example.test/api/search.php?s=fish%20%26%20chips"
        );
        assert_eq!(
            client.lookup_url(&"52772".into()),
            "https://example.test/api/lookup.php?i=52772"
        );
    }
}
