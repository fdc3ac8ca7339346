mod ingredient;
mod recipe;

pub use ingredient::Ingredient;
pub use recipe::Recipe;
