//! Conversion of raw provider and backend payloads into canonical records.
//!
//! Raw structs are destructured field by field, so adding a field to a raw
//! type fails to compile here until the conversion decides what to do with it.

use crate::models::{
    recipe::{GENERAL_TAG, PLACEHOLDER_IMAGE},
    Difficulty, ExtendedIngredient, IngredientMatch, IngredientMatchPage, IngredientUse,
    Nutrition, Recipe, RecipeDetail, RecipeId, RecipePage, SimilarRecipe, Suggestion,
};
use crate::provider::models::{
    AnalyzedInstruction, ComplexSearchResponse, LocalRecipe, RandomResponse, RawIngredient,
    RawIngredientMatch, RawNutrition, RawRecipe, RawSimilarRecipe, RawSuggestion,
};
use crate::utils::{
    resolve_image_url,
    sanitize::{sanitize_html, slugify, strip_html, truncate},
};

/// Maximum length of the list-view description
pub const DESCRIPTION_LENGTH: usize = 150;

/// CDN prefix for ingredient image file names
pub const INGREDIENT_IMAGE_BASE: &str = "https://spoonacular.com/cdn/ingredients_100x100/";

pub fn search_page(raw: ComplexSearchResponse) -> RecipePage {
    let ComplexSearchResponse {
        results,
        total_results,
        offset,
        number,
    } = raw;

    RecipePage {
        results: results.into_iter().map(recipe).collect(),
        total_results,
        offset,
        number,
    }
}

pub fn random_page(raw: RandomResponse) -> RecipePage {
    let RandomResponse { recipes } = raw;
    let results: Vec<Recipe> = recipes.into_iter().map(recipe).collect();
    let total_results = results.len();

    RecipePage {
        number: total_results,
        results,
        total_results,
        offset: 0,
    }
}

pub fn ingredient_matches(raw: Vec<RawIngredientMatch>) -> IngredientMatchPage {
    let results: Vec<IngredientMatch> = raw
        .into_iter()
        .map(|m| {
            let RawIngredientMatch {
                id,
                title,
                image,
                used_ingredient_count,
                missed_ingredient_count,
                used_ingredients,
                missed_ingredients,
                likes,
            } = m;

            IngredientMatch {
                id: RecipeId::from(id),
                title,
                image: image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                used_ingredient_count,
                missed_ingredient_count,
                used_ingredients: used_ingredients.into_iter().map(ingredient_use).collect(),
                missed_ingredients: missed_ingredients.into_iter().map(ingredient_use).collect(),
                likes: likes.map(round).unwrap_or(0),
            }
        })
        .collect();

    IngredientMatchPage {
        total_results: results.len(),
        results,
    }
}

fn ingredient_use(raw: RawIngredient) -> IngredientUse {
    IngredientUse {
        name: raw.name,
        amount: raw.amount.unwrap_or(0.0),
        unit: raw.unit.unwrap_or_default(),
    }
}

pub fn suggestions(raw: Vec<RawSuggestion>) -> Vec<Suggestion> {
    raw.into_iter()
        .map(|RawSuggestion { id, title, image_type }| Suggestion {
            id: RecipeId::from(id),
            title,
            image_type,
        })
        .collect()
}

pub fn similar_recipes(raw: Vec<RawSimilarRecipe>) -> Vec<SimilarRecipe> {
    raw.into_iter()
        .map(
            |RawSimilarRecipe {
                 id,
                 title,
                 ready_in_minutes,
                 servings,
                 source_url,
             }| SimilarRecipe {
                id: RecipeId::from(id),
                title,
                ready_in_minutes: ready_in_minutes.map(minutes).unwrap_or(0),
                servings: servings.map(minutes).unwrap_or(1).max(1),
                source_url,
            },
        )
        .collect()
}

/// Full detail for the modal: canonical fields plus extended ingredients and
/// the untruncated summary
pub fn recipe_detail(raw: RawRecipe) -> RecipeDetail {
    let extended_ingredients = raw
        .extended_ingredients
        .iter()
        .map(|ing| ExtendedIngredient {
            id: ing.id,
            name: ing.name.clone(),
            original: ing.original.clone().unwrap_or_else(|| ing.name.clone()),
            amount: ing.amount.unwrap_or(0.0),
            unit: ing.unit.clone().unwrap_or_default(),
            image: ing
                .image
                .as_deref()
                .filter(|file| !file.is_empty())
                .and_then(|file| resolve_image_url(file, INGREDIENT_IMAGE_BASE)),
        })
        .collect();

    let summary_source = raw.summary.clone().unwrap_or_default();
    let summary = strip_html(&summary_source);
    let summary_html = sanitize_html(&summary_source);

    RecipeDetail {
        recipe: recipe(raw),
        extended_ingredients,
        summary,
        summary_html,
    }
}

/// Convert one provider recipe into the canonical record
pub fn recipe(raw: RawRecipe) -> Recipe {
    let RawRecipe {
        id,
        title,
        summary,
        image,
        ready_in_minutes,
        servings,
        instructions,
        analyzed_instructions,
        vegetarian,
        vegan,
        gluten_free,
        dairy_free,
        very_healthy,
        cheap,
        very_popular,
        diets,
        dish_types,
        cuisines,
        occasions: _,
        extended_ingredients,
        nutrition,
        source_url,
        spoonacular_source_url,
        aggregate_likes,
        health_score,
        price_per_serving,
        wine_pairing: _,
        taste: _,
    } = raw;

    let prep_time = ready_in_minutes.map(minutes).unwrap_or(0);
    let steps = analyzed_step_count(&analyzed_instructions);

    let flags = [
        (vegetarian, "vegetarian"),
        (vegan, "vegan"),
        (gluten_free, "gluten-free"),
        (dairy_free, "dairy-free"),
        (very_healthy, "healthy"),
        (cheap, "budget-friendly"),
        (very_popular, "popular"),
    ];

    Recipe {
        id: RecipeId::from(id),
        title,
        description: summary
            .as_deref()
            .map(|s| truncate(&strip_html(s), DESCRIPTION_LENGTH))
            .unwrap_or_default(),
        image: image
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        prep_time,
        servings: servings.map(minutes).unwrap_or(1).max(1),
        difficulty: Difficulty::from_metrics(prep_time, steps),
        diet_tags: diet_tags(&flags, &diets),
        category: category(&dish_types, &cuisines),
        ingredients: extended_ingredients
            .into_iter()
            .map(|ing| ing.original.filter(|o| !o.is_empty()).unwrap_or(ing.name))
            .collect(),
        instructions: instruction_steps(analyzed_instructions, instructions),
        nutrition: nutrition_summary(nutrition.as_ref()),
        likes: aggregate_likes.map(round).unwrap_or(0),
        health_score: health_score.map(round).unwrap_or(0),
        source_url: source_url.or(spoonacular_source_url),
        price_per_serving: price_per_serving.unwrap_or(0.0),
        cuisines,
        dish_types,
    }
}

/// Convert a local backend record into the canonical record
pub fn local_recipe(raw: LocalRecipe, fallback_id: usize) -> Recipe {
    let LocalRecipe {
        id,
        title,
        description,
        image,
        prep_time,
        servings,
        diet_type,
        category,
        ingredients,
        instructions,
        nutrition,
        likes,
    } = raw;

    let mut tags: Vec<String> = Vec::new();
    for tag in diet_type.iter().map(|t| slugify(t)) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    if tags.is_empty() {
        tags.push(GENERAL_TAG.to_string());
    }

    Recipe {
        id: id.unwrap_or_else(|| RecipeId::new(format!("local-{fallback_id}"))),
        title,
        description: strip_html(&description),
        image: image
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        prep_time,
        servings: servings.unwrap_or(1).max(1),
        difficulty: Difficulty::from_metrics(prep_time, instructions.len()),
        diet_tags: tags,
        category: category
            .map(|c| slugify(&c))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| GENERAL_TAG.to_string()),
        ingredients,
        instructions,
        nutrition,
        likes,
        health_score: 0,
        source_url: None,
        price_per_serving: 0.0,
        cuisines: Vec::new(),
        dish_types: Vec::new(),
    }
}

pub fn local_recipes(raw: Vec<LocalRecipe>) -> Vec<Recipe> {
    raw.into_iter()
        .enumerate()
        .map(|(index, recipe)| local_recipe(recipe, index + 1))
        .collect()
}

fn analyzed_step_count(blocks: &[AnalyzedInstruction]) -> usize {
    blocks.first().map(|block| block.steps.len()).unwrap_or(0)
}

fn instruction_steps(blocks: Vec<AnalyzedInstruction>, plain: Option<String>) -> Vec<String> {
    if let Some(block) = blocks.into_iter().next() {
        return block.steps.into_iter().map(|s| s.step).collect();
    }

    match plain.map(|text| strip_html(&text)) {
        Some(text) if !text.is_empty() => vec![text],
        _ => Vec::new(),
    }
}

fn diet_tags(flags: &[(bool, &str)], diets: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = flags
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, tag)| tag.to_string())
        .collect();

    for diet in diets {
        let normalized = slugify(diet);
        if !normalized.is_empty() && !tags.contains(&normalized) {
            tags.push(normalized);
        }
    }

    if tags.is_empty() {
        tags.push(GENERAL_TAG.to_string());
    }
    tags
}

fn category(dish_types: &[String], cuisines: &[String]) -> String {
    dish_types
        .first()
        .or_else(|| cuisines.first())
        .map(|label| slugify(label))
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| GENERAL_TAG.to_string())
}

fn nutrition_summary(raw: Option<&RawNutrition>) -> Nutrition {
    let Some(raw) = raw else {
        return Nutrition::default();
    };

    let find = |key: &str| {
        raw.nutrients
            .iter()
            .find(|n| n.name.to_lowercase().contains(key))
            .map(|n| round(n.amount))
            .unwrap_or(0)
    };

    Nutrition {
        calories: find("calories"),
        protein: find("protein"),
        carbs: find("carbohydrates"),
        fat: find("fat"),
        fiber: find("fiber"),
        sugar: find("sugar"),
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

fn minutes(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::models::{RawNutrient, RawStep};
    use serde_json::json;

    fn raw_recipe(value: serde_json::Value) -> RawRecipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_recipe_defaults() {
        let recipe = recipe(raw_recipe(json!({"id": 1, "title": "Toast"})));

        assert_eq!(recipe.id.as_str(), "1");
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.image, PLACEHOLDER_IMAGE);
        assert_eq!(recipe.prep_time, 0);
        assert_eq!(recipe.servings, 1);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.diet_tags, vec!["general".to_string()]);
        assert_eq!(recipe.category, "general");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.nutrition, Nutrition::default());
        assert_eq!(recipe.likes, 0);
    }

    #[test]
    fn test_recipe_full_normalization() {
        let recipe = recipe(raw_recipe(json!({
            "id": 715538,
            "title": "Bruschetta",
            "summary": "<b>Bruschetta</b> is a classic&nbsp;starter.",
            "image": "https://img.spoonacular.com/715538.jpg",
            "readyInMinutes": 30,
            "servings": 4,
            "vegetarian": true,
            "veryHealthy": true,
            "diets": ["Lacto Ovo Vegetarian", "vegetarian"],
            "dishTypes": ["Side Dish", "antipasti"],
            "cuisines": ["Italian"],
            "extendedIngredients": [
                {"name": "bread", "original": "1 loaf bread"},
                {"name": "tomato"}
            ],
            "analyzedInstructions": [{"name": "", "steps": [
                {"number": 1, "step": "Toast"},
                {"number": 2, "step": "Top"},
                {"number": 3, "step": "Serve"},
                {"number": 4, "step": "Eat"},
                {"number": 5, "step": "Wash"},
                {"number": 6, "step": "Rest"},
                {"number": 7, "step": "Repeat"}
            ]}],
            "nutrition": {"nutrients": [
                {"name": "Calories", "amount": 210.6, "unit": "kcal"},
                {"name": "Fat", "amount": 7.2, "unit": "g"},
                {"name": "Saturated Fat", "amount": 1.0, "unit": "g"},
                {"name": "Carbohydrates", "amount": 30.4, "unit": "g"},
                {"name": "Sugar", "amount": 3.5, "unit": "g"},
                {"name": "Protein", "amount": 6.1, "unit": "g"},
                {"name": "Fiber", "amount": 2.0, "unit": "g"}
            ]},
            "aggregateLikes": 209,
            "healthScore": 18.4
        })));

        assert_eq!(recipe.description, "Bruschetta is a classic starter.");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(
            recipe.diet_tags,
            vec!["vegetarian", "healthy", "lacto-ovo-vegetarian"]
        );
        assert_eq!(recipe.category, "side-dish");
        assert_eq!(recipe.ingredients, vec!["1 loaf bread", "tomato"]);
        assert_eq!(recipe.instructions.len(), 7);
        assert_eq!(recipe.nutrition.calories, 211);
        assert_eq!(recipe.nutrition.fat, 7);
        assert_eq!(recipe.nutrition.carbs, 30);
        assert_eq!(recipe.nutrition.sugar, 4);
        assert_eq!(recipe.likes, 209);
        assert_eq!(recipe.health_score, 18);
    }

    #[test]
    fn test_description_truncated() {
        let long = "a".repeat(400);
        let recipe = recipe(raw_recipe(json!({"id": 2, "title": "Long", "summary": long})));
        assert_eq!(recipe.description.chars().count(), DESCRIPTION_LENGTH + 3);
        assert!(recipe.description.ends_with("..."));
    }

    #[test]
    fn test_plain_instructions_and_category_from_cuisine() {
        let recipe = recipe(raw_recipe(json!({
            "id": 3,
            "title": "Stew",
            "readyInMinutes": 60,
            "instructions": "<ol><li>Simmer everything</li></ol>",
            "cuisines": ["Middle Eastern"]
        })));

        assert_eq!(recipe.instructions, vec!["Simmer everything"]);
        assert_eq!(recipe.category, "middle-eastern");
        assert_eq!(recipe.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_detail_keeps_full_summary_and_ingredient_images() {
        let raw = RawRecipe {
            id: 9,
            title: "Soup".to_string(),
            summary: Some(format!("<p>{}</p>", "b".repeat(300))),
            extended_ingredients: vec![RawIngredient {
                id: Some(11),
                name: "garlic".to_string(),
                original: None,
                amount: Some(2.0),
                unit: Some("cloves".to_string()),
                image: Some("garlic.png".to_string()),
            }],
            analyzed_instructions: vec![AnalyzedInstruction {
                name: String::new(),
                steps: vec![RawStep {
                    number: 1,
                    step: "Boil".to_string(),
                }],
            }],
            nutrition: Some(RawNutrition {
                nutrients: vec![RawNutrient {
                    name: "Protein".to_string(),
                    amount: 12.4,
                    unit: "g".to_string(),
                }],
            }),
            ..Default::default()
        };

        let detail = recipe_detail(raw);
        assert_eq!(detail.summary.len(), 300);
        assert!(detail.summary_html.starts_with("<p>"));
        assert_eq!(detail.extended_ingredients[0].original, "garlic");
        assert_eq!(
            detail.extended_ingredients[0].image.as_deref(),
            Some("https://spoonacular.com/cdn/ingredients_100x100/garlic.png")
        );
        assert_eq!(detail.recipe.nutrition.protein, 12);
        assert_eq!(detail.recipe.instructions, vec!["Boil"]);
    }

    #[test]
    fn test_random_page_reports_batch_size() {
        let page = random_page(RandomResponse {
            recipes: vec![
                raw_recipe(json!({"id": 1, "title": "A"})),
                raw_recipe(json!({"id": 2, "title": "B"})),
            ],
        });
        assert_eq!(page.total_results, 2);
        assert_eq!(page.results[1].title, "B");
    }

    #[test]
    fn test_ingredient_matches() {
        let raw: Vec<RawIngredientMatch> = serde_json::from_value(json!([{
            "id": 73420,
            "title": "Apple Tart",
            "image": "https://img.spoonacular.com/73420.jpg",
            "usedIngredientCount": 2,
            "missedIngredientCount": 1,
            "usedIngredients": [{"name": "apples", "amount": 6.0, "unit": ""}],
            "missedIngredients": [{"name": "flour", "amount": 1.5, "unit": "cups"}],
            "likes": 4
        }]))
        .unwrap();

        let page = ingredient_matches(raw);
        assert_eq!(page.total_results, 1);
        let m = &page.results[0];
        assert_eq!(m.used_ingredient_count, 2);
        assert_eq!(m.missed_ingredients[0].unit, "cups");
        assert_eq!(m.likes, 4);
    }

    #[test]
    fn test_local_recipe() {
        let raw: LocalRecipe = serde_json::from_value(json!({
            "id": 3,
            "title": "Quinoa Salad",
            "prepTime": 15,
            "servings": 2,
            "dietType": ["vegan", "Gluten Free"],
            "category": "Salads",
            "ingredients": ["1 cup quinoa", "cucumber"],
            "instructions": ["Cook quinoa", "Chop", "Mix"]
        }))
        .unwrap();

        let recipe = local_recipe(raw, 1);
        assert_eq!(recipe.id.as_str(), "3");
        assert_eq!(recipe.diet_tags, vec!["vegan", "gluten-free"]);
        assert_eq!(recipe.category, "salads");
        assert_eq!(recipe.difficulty, Difficulty::Easy);

        let untagged = local_recipe(
            serde_json::from_value(json!({"title": "Plain", "dietType": "general"})).unwrap(),
            4,
        );
        assert_eq!(untagged.id.as_str(), "local-4");
        assert_eq!(untagged.diet_tags, vec!["general"]);
    }
}
