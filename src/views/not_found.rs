use crate::router::{Container, Route, View};
use crate::Result;
use askama::Template;
use async_trait::async_trait;
use rand::seq::SliceRandom;

pub const FUN_FACTS: [&str; 10] = [
    "Honey never spoils. Edible honey has been found in 3000 year old Egyptian tombs.",
    "Bananas are berries, but strawberries are not.",
    "The Aztecs valued chocolate so highly they used it as currency.",
    "Carrots were originally purple. Orange carrots were bred in the Netherlands in the 17th century.",
    "Most restaurant wasabi is green-dyed horseradish.",
    "Peanuts are not nuts. They are legumes that grow underground.",
    "Red bell peppers are ripe green bell peppers.",
    "Broccoli, cauliflower, cabbage and Brussels sprouts are all varieties of the same plant.",
    "Ketchup was sold as medicine in the 1830s.",
    "Potatoes were the first vegetable grown in space.",
];

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    links: Vec<NavLink>,
    fun_fact: &'static str,
}

struct NavLink {
    route: &'static str,
    title: &'static str,
}

impl From<Route> for NavLink {
    fn from(route: Route) -> Self {
        Self {
            route: route.as_str(),
            title: route.title(),
        }
    }
}

#[derive(Default)]
pub struct NotFoundView;

impl NotFoundView {
    pub fn new() -> Self {
        Self
    }
}

pub fn random_fun_fact() -> &'static str {
    FUN_FACTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FUN_FACTS[0])
}

#[async_trait]
impl View for NotFoundView {
    fn route(&self) -> Route {
        Route::NotFound
    }

    async fn render(&mut self, container: &mut Container) -> Result<()> {
        let template = NotFoundTemplate {
            links: vec![NavLink::from(Route::Home), NavLink::from(Route::Recipes)],
            fun_fact: random_fun_fact(),
        };
        container.set_html(template.render()?);
        Ok(())
    }
}
