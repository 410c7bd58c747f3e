use crate::app::AppContext;
use crate::models::{Recipe, RecipeId};
use crate::provider::RandomOptions;
use crate::search::{local, DisplayState, ModalState, SearchFilters, SearchForm};
use crate::utils::sanitize::truncate;
use crate::{Error, Result};
use tracing::warn;

/// Search recipes, following `pages` pages of results
pub async fn search(
    app: &AppContext,
    query: &str,
    filters: SearchFilters,
    pages: usize,
) -> Result<()> {
    let controller = app.search_controller();
    controller
        .set_form(SearchForm {
            query: query.trim().to_string(),
            filters: filters.cleaned(),
        })
        .await;
    controller.handle_search().await;

    for _ in 1..pages {
        let before = controller.snapshot().await;
        if !before.has_more {
            break;
        }
        controller.load_more_recipes().await;
        if let Some(notice) = controller.take_notice().await {
            warn!("{}", notice.message);
            break;
        }
    }

    let state = controller.snapshot().await;
    match state.display {
        DisplayState::Error(message) => Err(Error::Unavailable(message)),
        _ => {
            print_recipes(&state.results, state.total_results);
            Ok(())
        }
    }
}

/// Print a random batch of recipes
pub async fn random(app: &AppContext, count: usize) -> Result<()> {
    if !app.provider.is_configured() {
        let recipes = local::fetch(&app.backend).await?;
        let mut recipes = local::shuffle(recipes);
        recipes.truncate(count);
        let total = recipes.len();
        print_recipes(&recipes, total);
        return Ok(());
    }

    let page = app
        .provider
        .get_random_recipes(&RandomOptions {
            number: Some(count),
            tags: None,
        })
        .await?;
    print_recipes(&page.results, page.total_results);
    Ok(())
}

/// Print full details of one recipe
pub async fn show(app: &AppContext, id: &str) -> Result<()> {
    let controller = app.search_controller();
    if !controller.uses_provider() {
        // Local lookups resolve against the loaded list
        controller.load_initial().await;
    }

    match controller.show_recipe_modal(&RecipeId::from(id)).await {
        ModalState::Open(detail) => {
            let recipe = &detail.recipe;
            println!("\n{}", recipe.title);
            println!("{}", "=".repeat(recipe.title.chars().count().min(75)));
            println!(
                "{} min | {} servings | {} | health score {}",
                recipe.prep_time, recipe.servings, recipe.difficulty, recipe.health_score
            );
            if !recipe.diet_tags.is_empty() {
                println!("Diets: {}", recipe.diet_tags.join(", "));
            }
            if !detail.summary.is_empty() {
                println!("\n{}", detail.summary);
            }

            println!("\nIngredients:");
            for ingredient in &detail.extended_ingredients {
                println!("  - {}", ingredient.original);
            }

            if !recipe.instructions.is_empty() {
                println!("\nInstructions:");
                for (i, step) in recipe.instructions.iter().enumerate() {
                    println!("  {}. {}", i + 1, step);
                }
            }

            let n = &recipe.nutrition;
            println!(
                "\nNutrition: {} kcal, {} g protein, {} g carbs, {} g fat",
                n.calories, n.protein, n.carbs, n.fat
            );
            if let Some(url) = &recipe.source_url {
                println!("Source: {url}");
            }
            Ok(())
        }
        ModalState::Failed(message) => Err(Error::NotFound(message)),
        ModalState::Closed | ModalState::Loading => {
            Err(Error::Internal("Recipe detail was not loaded".to_string()))
        }
    }
}

/// Print title completions
pub async fn suggest(app: &AppContext, query: &str) -> Result<()> {
    let suggestions = app
        .provider
        .get_autocomplete_suggestions(query, app.settings.search.suggestion_limit)
        .await;

    if suggestions.is_empty() {
        println!("No suggestions");
        return Ok(());
    }
    for suggestion in suggestions {
        println!("{:<10} {}", suggestion.id.as_str(), suggestion.title);
    }
    Ok(())
}

/// Sign in and persist the session user
pub async fn login(app: &AppContext, email: &str, password: &str) -> Result<()> {
    match app.auth.login(email, password).await? {
        Some(user) => {
            println!("\x1b[32m\u{2713}\x1b[0m Signed in as {} ({})", user.name, user.email);
            println!("  Session saved to {}", app.settings.storage.path.display());
            Ok(())
        }
        None => Err(Error::Unauthorized(crate::auth::INVALID_CREDENTIALS.to_string())),
    }
}

fn print_recipes(recipes: &[Recipe], total: usize) {
    if recipes.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("\nShowing {} of {} recipes:\n", recipes.len(), total);
    println!("{:<10} {:<45} {:>6} {:<20}", "ID", "Title", "Min", "Diets");
    println!("{}", "-".repeat(84));

    for recipe in recipes {
        println!(
            "{:<10} {:<45} {:>6} {:<20}",
            recipe.id.as_str(),
            truncate(&recipe.title, 42),
            recipe.prep_time,
            truncate(&recipe.diet_tags.join(", "), 17)
        );
    }

    println!("\nTo see a recipe: recipebox show <ID>");
}
