use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::{InMemoryItemRepository, ItemService};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let items = ItemService::new(Arc::new(InMemoryItemRepository::new()));
    let app = server::startup::app(items);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create(app: &TestApp, body: Value) -> anyhow::Result<Value> {
    let res = client().post(format!("{}/items", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

async fn count(app: &TestApp) -> anyhow::Result<u64> {
    let body = client().get(format!("{}/items", app.base_url)).send().await?.json::<Value>().await?;
    Ok(body["count"].as_u64().unwrap_or_default())
}

#[tokio::test]
async fn e2e_health_is_liveness_only() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "item-store");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn e2e_create_then_get_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, json!({"name": "widget"})).await?;
    assert_eq!(created["status"], "success");
    let id = created["data"]["id"].as_i64().expect("id");

    let res = client().get(format!("{}/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "widget");
    assert_eq!(body["data"]["description"], "");
    assert!(!body["data"]["created_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_create_leaves_store_unchanged() -> anyhow::Result<()> {
    let app = start_server().await?;
    create(&app, json!({"name": "existing"})).await?;
    let before = count(&app).await?;

    for body in [json!({}), json!({"name": ""}), json!({"name": 5})] {
        let res = client().post(format!("{}/items", app.base_url)).json(&body).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
        let env = res.json::<Value>().await?;
        assert_eq!(env["status"], "error");
        assert!(env["message"].is_string());
    }

    let res = client()
        .post(format!("{}/items", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    assert_eq!(count(&app).await?, before);
    Ok(())
}

#[tokio::test]
async fn e2e_get_unknown_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/items/99999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "item with id 99999 not found");
    Ok(())
}

#[tokio::test]
async fn e2e_partial_update_keeps_name() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, json!({"name": "widget", "description": "old"})).await?;
    let id = created["data"]["id"].as_i64().expect("id");

    let res = client()
        .put(format!("{}/items/{}", app.base_url, id))
        .json(&json!({"description": "new"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "widget");
    assert_eq!(body["data"]["description"], "new");
    assert_eq!(body["data"]["created_at"], created["data"]["created_at"]);

    // no recognised keys
    let res = client().put(format!("{}/items/{}", app.base_url, id)).json(&json!({})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client()
        .put(format!("{}/items/99999", app.base_url))
        .json(&json!({"name": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_then_get_and_delete_again() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, json!({"name": "widget"})).await?;
    let id = created["data"]["id"].as_i64().expect("id");
    let url = format!("{}/items/{}", app.base_url, id);

    let res = client().delete(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "success");

    assert_eq!(client().get(&url).send().await?.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(client().delete(&url).send().await?.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_list_is_newest_first_with_count() -> anyhow::Result<()> {
    let app = start_server().await?;
    create(&app, json!({"name": "older"})).await?;
    create(&app, json!({"name": "newer"})).await?;

    let body = client().get(format!("{}/items", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "newer");
    assert_eq!(body["data"][1]["name"], "older");
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_routes_get_error_envelope() -> anyhow::Result<()> {
    let app = start_server().await?;
    for path in ["/nope", "/items/abc"] {
        let res = client().get(format!("{}{}", app.base_url, path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
        let body = res.json::<Value>().await?;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "route not found");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_wrong_method_gets_error_envelope() -> anyhow::Result<()> {
    let app = start_server().await?;
    let requests = [
        client().patch(format!("{}/items/1", app.base_url)),
        client().delete(format!("{}/items", app.base_url)),
        client().post(format!("{}/health", app.base_url)),
    ];
    for request in requests {
        let res = request.send().await?;
        assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "method not allowed");
    }
    Ok(())
}
