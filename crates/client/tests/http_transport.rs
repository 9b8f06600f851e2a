use std::sync::{Arc, Mutex};

use api_types::{Amount, Category, Entry, EntryKind};
use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use client::{ClientError, EntryService, HttpTransport, ResourceClient, TransportError};
use serde_json::{Value, json};

type Log = Arc<Mutex<Vec<String>>>;

async fn record(State(log): State<Log>, request: Request, next: Next) -> Response {
    log.lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

async fn list_categories() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Work", "description": "Salary and bonuses"},
        {"id": 2, "name": "Home", "description": null}
    ]))
}

async fn get_category(Path(id): Path<u64>) -> Response {
    match id {
        1 => Json(json!({"id": 1, "name": "Work", "description": "Salary and bonuses"}))
            .into_response(),
        2 => Json(json!({"id": 2, "name": "Home", "description": null})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_entries() -> Json<Value> {
    Json(json!([
        {"id": 10, "name": "Rent", "type": "expense", "amount": 800, "date": "15/03/2021", "paid": true, "categoryId": 2},
        {"id": 11, "name": "Bonus", "type": "income", "amount": 250.5, "date": "02/04/2021", "paid": false, "categoryId": 1},
        {"id": 12, "name": "Bills", "type": "expense", "amount": 120, "date": "28/03/2021", "paid": false, "categoryId": 2}
    ]))
}

/// Refuses entries that were not sent with their category, like a store that
/// cannot join on its own.
async fn create_entry(Json(mut body): Json<Value>) -> Response {
    if !body["category"].is_object() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": ["category must be embedded"]})),
        )
            .into_response();
    }
    body["id"] = json!(42);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_entry(Path(_id): Path<u64>, Json(body): Json<Value>) -> Response {
    if body["name"].as_str().is_none_or(|name| name.len() < 2) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": ["name is too short"]})),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_entry(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn spawn_store() -> (HttpTransport, Log) {
    let log = Log::default();
    let router = Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/{id}",
            axum::routing::put(update_entry).delete(delete_entry),
        )
        .layer(middleware::from_fn_with_state(log.clone(), record));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let transport = HttpTransport::new(&format!("http://{addr}")).unwrap();
    (transport, log)
}

fn salary() -> Entry {
    Entry {
        name: Some("Salary".to_string()),
        kind: EntryKind::Income,
        amount: Some(Amount::new(100_000)),
        date: Some("01/01/2022".to_string()),
        paid: true,
        category_id: Some(1),
        ..Entry::default()
    }
}

#[tokio::test]
async fn lists_categories_in_server_order() {
    let (transport, _log) = spawn_store().await;
    let categories: ResourceClient<Category, _> = ResourceClient::for_resource(transport);

    let list = categories.list().await.unwrap();

    let names: Vec<_> = list.iter().filter_map(|c| c.name.as_deref()).collect();
    assert_eq!(names, vec!["Work", "Home"]);
    assert_eq!(list[1].description, None);
}

#[tokio::test]
async fn missing_category_is_not_found() {
    let (transport, _log) = spawn_store().await;
    let categories: ResourceClient<Category, _> = ResourceClient::for_resource(transport);

    let err = categories.get_by_id(999).await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound { ref path } if path == "api/categories/999"));
}

#[tokio::test]
async fn create_entry_embeds_the_category_and_returns_the_server_id() {
    let (transport, log) = spawn_store().await;
    let service = EntryService::new(transport);

    let created = service.create(salary()).await.unwrap();

    assert_eq!(created.id, Some(42));
    assert_eq!(created.category.as_ref().and_then(|c| c.id), Some(1));
    assert_eq!(created.amount, Some(Amount::new(100_000)));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["GET /api/categories/1", "POST /api/entries"]
    );
}

#[tokio::test]
async fn unknown_category_blocks_the_post() {
    let (transport, log) = spawn_store().await;
    let service = EntryService::new(transport);
    let mut entry = salary();
    entry.category_id = Some(77);

    let err = service.create(entry).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(*log.lock().unwrap(), vec!["GET /api/categories/77"]);
}

#[tokio::test]
async fn update_resolves_with_the_submitted_entry() {
    let (transport, log) = spawn_store().await;
    let service = EntryService::new(transport);
    let mut entry = salary();
    entry.id = Some(10);

    let updated = service.update(entry.clone()).await.unwrap();

    assert_eq!(updated.name, entry.name);
    assert_eq!(updated.amount, entry.amount);
    assert_eq!(updated.category.as_ref().and_then(|c| c.name.as_deref()), Some("Work"));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["GET /api/categories/1", "PUT /api/entries/10"]
    );
}

#[tokio::test]
async fn rejected_update_carries_the_field_messages() {
    let (transport, _log) = spawn_store().await;
    let service = EntryService::new(transport);
    let mut entry = salary();
    entry.id = Some(10);
    entry.name = Some("S".to_string());

    let err = service.update(entry).await.unwrap_err();

    match err {
        ClientError::ValidationRejected { status, messages } => {
            assert_eq!(status, 422);
            assert_eq!(messages, vec!["name is too short"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_acknowledges_without_body() {
    let (transport, log) = spawn_store().await;

    EntryService::new(transport).delete(11).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["DELETE /api/entries/11"]);
}

#[tokio::test]
async fn month_and_year_query() {
    let (transport, _log) = spawn_store().await;

    let march = EntryService::new(transport)
        .get_by_month_and_year(3, 2021)
        .await
        .unwrap();

    let names: Vec<_> = march.iter().filter_map(|e| e.name.as_deref()).collect();
    assert_eq!(names, vec!["Rent", "Bills"]);
}

#[tokio::test]
async fn unreachable_store_is_a_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::builder()
        .base_url(&format!("http://{addr}"))
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .unwrap();
    let categories: ResourceClient<Category, _> = ResourceClient::for_resource(transport);

    let err = categories.list().await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::RequestFailed(TransportError::Network(_))
    ));
}
