//! Ingredient and dish catalog.

pub mod dto;
pub mod repo;
mod services;

pub use dto::{DishProfile, IngredientProfile, Ref};
pub use services::{
    add_component, components_of, compose_dish, dish_nutrition, edit_dish, edit_ingredient,
    pickable_ingredients, save_dish, save_ingredient, search, validate_dish, validate_ingredient,
    visible_to, DishComponent, DishDraft, IngredientDraft, Owned,
};
