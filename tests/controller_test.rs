mod common;

use mockito::Matcher;
use recipebox::search::controller::{
    SearchController, LOAD_MORE_FAILED_MESSAGE, RANDOM_LOADED_MESSAGE,
};
use recipebox::search::{
    DisplayState, NoticeKind, QuickFilter, SearchFilters, SearchForm, SearchState,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn search_query(query: &str, offset: usize) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("query".into(), query.into()),
        Matcher::UrlEncoded("offset".into(), offset.to_string()),
    ])
}

fn query_form(query: &str) -> SearchForm {
    SearchForm {
        query: query.to_string(),
        ..Default::default()
    }
}

/// Wait until the controller leaves `Idle`/`Loading`
async fn settled(controller: &SearchController) -> SearchState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = controller.snapshot().await;
            if !matches!(state.display, DisplayState::Idle | DisplayState::Loading) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("search did not settle")
}

#[tokio::test]
async fn test_handle_search_replaces_results_from_first_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("pasta", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1, 2], 30, 0).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller
        .set_form(SearchForm {
            query: "pasta".to_string(),
            ..Default::default()
        })
        .await;
    controller.handle_search().await;

    let state = controller.snapshot().await;
    assert_eq!(state.display, DisplayState::Populated);
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.total_results, 30);
    assert_eq!(state.offset, 0);
    assert!(state.has_more);
    assert_eq!(state.generation, 1);
}

#[tokio::test]
async fn test_load_more_appends_without_duplicates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1, 2], 30, 0).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 12))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[2, 3], 30, 12).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller
        .set_form(SearchForm {
            query: "soup".to_string(),
            ..Default::default()
        })
        .await;
    controller.handle_search().await;
    controller.load_more_recipes().await;

    let state = controller.snapshot().await;
    let ids: Vec<&str> = state.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(state.offset, 12);
    assert!(state.has_more);
    assert!(!state.loading_more);
}

#[tokio::test]
async fn test_load_more_failure_keeps_results_and_restores_offset() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("rice", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1], 30, 0).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("rice", 12))
        .with_status(500)
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller
        .set_form(SearchForm {
            query: "rice".to_string(),
            ..Default::default()
        })
        .await;
    controller.handle_search().await;
    controller.load_more_recipes().await;

    let state = controller.snapshot().await;
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.offset, 0);
    assert_eq!(state.display, DisplayState::Populated);
    let notice = controller.take_notice().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, LOAD_MORE_FAILED_MESSAGE);
    assert!(controller.take_notice().await.is_none());
}

#[tokio::test]
async fn test_search_error_enters_error_state() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(402)
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.handle_search().await;

    let state = controller.snapshot().await;
    assert!(matches!(state.display, DisplayState::Error(ref msg) if msg.contains("quota")));
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_local_mode_filters_backend_recipes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::local_recipes().to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let controller = app.search_controller();
    assert!(!controller.uses_provider());

    controller.load_initial().await;
    let state = controller.snapshot().await;
    assert_eq!(state.results.len(), 3);
    assert!(!state.has_more);

    controller
        .set_form(SearchForm {
            query: "PASTA".to_string(),
            filters: SearchFilters {
                diet: Some("vegetarian".to_string()),
                cuisine: None,
                max_time: Some(20),
            },
        })
        .await;
    controller.handle_search().await;

    let state = controller.snapshot().await;
    let titles: Vec<&str> = state.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Tomato Soup"]);
    assert!(!state.has_more);

    controller
        .set_form(SearchForm {
            query: "lobster".to_string(),
            ..Default::default()
        })
        .await;
    controller.handle_search().await;
    assert_eq!(controller.snapshot().await.display, DisplayState::Empty);
}

#[tokio::test]
async fn test_random_load_sets_notice_and_stops_paging() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/random")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"recipes": [common::provider_recipe(4, "Tacos"), common::provider_recipe(5, "Curry")]})
                .to_string(),
        )
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.load_random_recipes().await;

    let state = controller.snapshot().await;
    assert_eq!(state.results.len(), 2);
    assert!(!state.has_more);
    assert_eq!(
        state.notice.map(|n| n.message).as_deref(),
        Some(RANDOM_LOADED_MESSAGE)
    );
}

#[tokio::test]
async fn test_quick_filter_runs_search() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("maxReadyTime".into(), "30".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[8], 1, 0).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.apply_quick_filter(QuickFilter::Quick).await;

    let state = controller.snapshot().await;
    assert_eq!(state.form.filters.max_time, Some(30));
    assert_eq!(state.results.len(), 1);
    assert!(!state.has_more);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_local_modal_looks_up_loaded_recipe() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::local_recipes().to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let controller = app.search_controller();
    controller.load_initial().await;

    let modal = controller
        .show_recipe_modal(&recipebox::models::RecipeId::from(2))
        .await;
    match modal {
        recipebox::search::ModalState::Open(detail) => {
            assert_eq!(detail.recipe.title, "Beef Stew");
            assert_eq!(detail.extended_ingredients.len(), 2);
        }
        other => panic!("unexpected modal state: {other:?}"),
    }

    let modal = controller
        .show_recipe_modal(&recipebox::models::RecipeId::from(99))
        .await;
    assert!(matches!(modal, recipebox::search::ModalState::Failed(_)));

    controller.close_recipe_modal().await;
    assert_eq!(
        controller.snapshot().await.modal,
        recipebox::search::ModalState::Closed
    );
}

#[tokio::test]
async fn test_new_search_resets_paging() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1, 2], 30, 0).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 12))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[3, 4], 30, 12).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.set_form(query_form("soup")).await;
    controller.handle_search().await;
    controller.load_more_recipes().await;
    assert_eq!(controller.snapshot().await.offset, 12);
    assert_eq!(controller.snapshot().await.results.len(), 4);

    controller.handle_search().await;

    let state = controller.snapshot().await;
    assert_eq!(state.offset, 0);
    assert!(state.has_more);
    let ids: Vec<&str> = state.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_load_more_pages_through_last_search_not_typed_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1, 2], 30, 0).to_string())
        .create_async()
        .await;
    let soup_page = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 12))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[3, 4], 30, 12).to_string())
        .expect(1)
        .create_async()
        .await;
    let chicken_page = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("chicken", 12))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[900, 901], 30, 12).to_string())
        .expect(0)
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.set_form(query_form("soup")).await;
    controller.handle_search().await;

    controller.on_query_input("chicken").await;
    controller.load_more_recipes().await;
    controller.destroy();

    let state = controller.snapshot().await;
    let ids: Vec<&str> = state.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(state.form.query, "chicken");
    assert_eq!(state.active.query, "soup");
    soup_page.assert_async().await;
    chicken_page.assert_async().await;
}

#[tokio::test]
async fn test_typing_burst_searches_once_for_last_text() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("sou", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[1], 1, 0).to_string())
        .expect(0)
        .create_async()
        .await;
    let last = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[2, 3], 2, 0).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut settings = common::settings(common::UNREACHABLE, &server.url(), Some(common::API_KEY));
    settings.search.debounce_ms = 100;
    let app = common::app(settings);
    let controller = app.search_controller();

    controller.on_query_input("sou").await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    controller.on_query_input("soup").await;
    assert!(controller.has_pending_search());
    assert_eq!(controller.snapshot().await.display, DisplayState::Idle);

    let state = settled(&controller).await;
    assert_eq!(state.display, DisplayState::Populated);
    let ids: Vec<&str> = state.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(state.generation, 1);
    first.assert_async().await;
    last.assert_async().await;
}

#[tokio::test]
async fn test_slow_older_search_is_dropped() {
    let mut server = mockito::Server::new_async().await;
    let slow_body = common::search_response(&[1, 2], 2, 0).to_string();
    let slow = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("soup", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(move |w| {
            std::thread::sleep(Duration::from_millis(300));
            w.write_all(slow_body.as_bytes())
        })
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(search_query("chicken", 0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::search_response(&[7], 1, 0).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(
        common::UNREACHABLE,
        &server.url(),
        Some(common::API_KEY),
    ));
    let controller = app.search_controller();
    controller.set_form(query_form("soup")).await;
    let older = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.handle_search().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    controller.set_form(query_form("chicken")).await;
    controller.handle_search().await;
    older.await.unwrap();

    let state = controller.snapshot().await;
    let ids: Vec<&str> = state.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["7"]);
    assert_eq!(state.total_results, 1);
    assert_eq!(state.generation, 2);
    assert_eq!(state.active.query, "chicken");
    slow.assert_async().await;
}

#[tokio::test]
async fn test_local_load_more_after_failed_search_is_noop() {
    let mut server = mockito::Server::new_async().await;
    let recipes = server
        .mock("GET", "/recipes")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let controller = app.search_controller();
    controller.set_form(query_form("pasta")).await;
    controller.handle_search().await;

    let state = controller.snapshot().await;
    assert!(matches!(state.display, DisplayState::Error(_)));
    assert!(!state.has_more);

    controller.load_more_recipes().await;

    let state = controller.snapshot().await;
    assert!(matches!(state.display, DisplayState::Error(_)));
    assert!(state.results.is_empty());
    assert_eq!(state.offset, 0);
    recipes.assert_async().await;
}
