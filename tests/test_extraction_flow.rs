use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use recipe_keeper::{
    can_submit, ExtractError, ExtractionFlow, FlowError, RecipeStore, SpoonacularClient,
    StoreEvent, UNTITLED_PLACEHOLDER,
};

const PAGE_URL: &str = "https://www.example.com/recipes/lemon-drizzle-cake";

fn flow_for(base_url: String) -> ExtractionFlow {
    let client = SpoonacularClient::new("test-key", base_url, Duration::from_secs(5)).unwrap();
    ExtractionFlow::new(Arc::new(client), Arc::new(RecipeStore::new(16)))
}

async fn mock_extract(server: &mut Server, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/recipes/extract")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("url".into(), PAGE_URL.into()),
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[test]
fn test_submit_enabled_only_for_non_empty_input() {
    assert!(!can_submit(""));
    assert!(can_submit(PAGE_URL));
}

#[tokio::test]
async fn test_titled_response_adds_one_record() {
    let mut server = Server::new_async().await;
    let mock = mock_extract(
        &mut server,
        200,
        r#"{
            "id": 1,
            "title": "Lemon Drizzle Cake",
            "servings": 8,
            "readyInMinutes": 60,
            "extendedIngredients": [{"original": "225g unsalted butter"}]
        }"#,
    )
    .await;

    let flow = flow_for(server.url());
    flow.store().add(Default::default());
    let before = flow.store().len();

    let recipe = flow.run(PAGE_URL).await.unwrap();

    assert_eq!(flow.store().len(), before + 1);
    let saved = flow.store().get(before).unwrap();
    assert_eq!(saved.title.as_deref(), Some("Lemon Drizzle Cake"));
    assert_eq!(saved, recipe);
    assert_eq!(flow.last_message().as_deref(), Some("Lemon Drizzle Cake"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_title_falls_back_to_placeholder() {
    let mut server = Server::new_async().await;
    let _m = mock_extract(&mut server, 200, r#"{"servings": 2}"#).await;

    let flow = flow_for(server.url());
    let recipe = flow.run(PAGE_URL).await.unwrap();

    assert!(recipe.title.is_none());
    assert_eq!(flow.store().len(), 1);
    assert_eq!(flow.last_message().as_deref(), Some(UNTITLED_PLACEHOLDER));
}

#[tokio::test]
async fn test_network_failure_leaves_store_unchanged() {
    // Nothing listens on port 1
    let flow = flow_for("http://127.0.0.1:1".to_string());
    flow.store().add(Default::default());

    let err = flow.run(PAGE_URL).await.unwrap_err();

    let FlowError::Extract(inner @ ExtractError::Network(_)) = &err else {
        panic!("Expected network error, got {err:?}");
    };
    assert_eq!(flow.store().len(), 1);
    assert_eq!(flow.last_message(), Some(inner.to_string()));
    assert!(!inner.to_string().is_empty());
}

#[tokio::test]
async fn test_decode_failure_reports_description() {
    let mut server = Server::new_async().await;
    let _m = mock_extract(&mut server, 200, r#"{"title": 42}"#).await;

    let flow = flow_for(server.url());
    let err = flow.run(PAGE_URL).await.unwrap_err();

    assert!(matches!(err, FlowError::Extract(ExtractError::Decode(_))));
    assert!(flow.store().is_empty());
    assert_eq!(flow.last_message(), Some(err.to_string()));
}

#[tokio::test]
async fn test_unbuildable_endpoint_reports_fixed_text() {
    let flow = flow_for("not a url".to_string());
    let err = flow.run(PAGE_URL).await.unwrap_err();

    assert!(matches!(err, FlowError::Extract(ExtractError::InvalidUrl)));
    assert!(flow.store().is_empty());
    assert_eq!(flow.last_message().as_deref(), Some("Invalid URL"));
}

#[tokio::test]
async fn test_schemeless_input_is_sent_as_typed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/extract")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("url".into(), "www.Example.com/Recipes/soup".into()),
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title": "Soup"}"#)
        .create_async()
        .await;

    let flow = flow_for(server.url());
    flow.run("www.Example.com/Recipes/soup").await.unwrap();

    assert_eq!(flow.store().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_quota_failure_reports_vendor_message() {
    let mut server = Server::new_async().await;
    let _m = mock_extract(
        &mut server,
        402,
        r#"{"status": "failure", "code": 402, "message": "Your daily points limit of 150 has been reached."}"#,
    )
    .await;

    let flow = flow_for(server.url());
    let err = flow.run(PAGE_URL).await.unwrap_err();

    assert!(matches!(
        err,
        FlowError::Extract(ExtractError::Api { status: 402, .. })
    ));
    assert!(flow.store().is_empty());
    assert!(flow
        .last_message()
        .unwrap()
        .contains("daily points limit"));
}

#[tokio::test]
async fn test_spawned_extraction_notifies_subscribers() {
    let mut server = Server::new_async().await;
    let _m = mock_extract(&mut server, 200, r#"{"title": "Lemon Drizzle Cake"}"#).await;

    let flow = flow_for(server.url());
    let mut events = flow.store().subscribe();

    let task = flow.submit(PAGE_URL).unwrap();
    task.join().await.unwrap();

    match events.recv().await.unwrap() {
        StoreEvent::Added { index, recipe } => {
            assert_eq!(index, 0);
            assert_eq!(recipe.display_title(), "Lemon Drizzle Cake");
        }
        other => panic!("Expected Added event, got {other:?}"),
    }

    flow.store().clear();
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Cleared { removed: 1 }
    );
    assert!(flow.store().is_empty());
}
