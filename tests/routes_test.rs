mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_server, ScriptedProvider};
use gullak::store::{DocumentStore, EXPENSES_COLLECTION, INVESTMENTS_COLLECTION};

#[tokio::test]
async fn test_home_reports_running() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let response = server.http.get(server.url("/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Gullak backend running!"}));
}

#[tokio::test]
async fn test_db_diagnostic_round_trips_sample_document() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let response = server.http.get(server.url("/test-db")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["document"]["id"], "sample");
    assert_eq!(body["document"]["status"], "connected");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_add_expense_then_list() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let response = server
        .http
        .post(server.url("/expenses/add"))
        .json(&json!({"amount": 250, "category": "Food"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["message"], "Expense added successfully!");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let listed: Value = server
        .http
        .get(server.url("/expenses/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let expenses = listed.as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["id"], id.as_str());
    assert_eq!(expenses[0]["amount"], 250);
    assert_eq!(expenses[0]["category"], "Food");
    assert_eq!(expenses[0]["note"], "");
    assert_eq!(expenses[0]["timestamp"], Value::Null);
}

#[tokio::test]
async fn test_add_expense_rejects_invalid_data() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let bodies = [
        json!({"amount": 250}).to_string(),
        json!({"category": "Food"}).to_string(),
        json!({}).to_string(),
        json!([250, "Food"]).to_string(),
        json!("amount").to_string(),
        "{not json".to_string(),
    ];

    for body in bodies {
        let response = server
            .http
            .post(server.url("/expenses/add"))
            .header("content-type", "application/json")
            .body(body.clone())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error, json!({"error": "Invalid data"}));
    }

    assert!(server.store.list(EXPENSES_COLLECTION).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_expense_only_checks_presence() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let bodies = [
        json!({"amount": "100", "category": "food"}),
        json!({"amount": 100, "category": "food", "note": 5}),
        json!({"amount": 100, "category": "food", "userId": 42}),
        json!({"amount": null, "category": "food"}),
    ];

    for body in &bodies {
        let response = server
            .http
            .post(server.url("/expenses/add"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "body: {}", body);
    }

    let stored = server.store.list(EXPENSES_COLLECTION).await.unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].get("amount"), Some(&json!("100")));
    assert_eq!(stored[1].get("note"), Some(&json!(5)));
    assert_eq!(stored[2].get("userId"), Some(&json!(42)));
    assert_eq!(stored[3].get("amount"), Some(&Value::Null));
}

#[tokio::test]
async fn test_list_expenses_filters_by_user() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    for (user, category) in [("u1", "Rent"), ("u2", "Travel"), ("u1", "Food")] {
        let response = server
            .http
            .post(server.url("/expenses/add"))
            .json(&json!({"amount": 10, "category": category, "userId": user}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let listed: Value = server
        .http
        .get(server.url("/expenses/all?userId=u1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let categories: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Rent", "Food"]);
}

#[tokio::test]
async fn test_delete_expense_is_unconditional() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let created: Value = server
        .http
        .post(server.url("/expenses/add"))
        .json(&json!({"amount": 99.5, "category": "Books", "note": "novel"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let response = server
            .http
            .delete(server.url(&format!("/expenses/delete/{}", id)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"message": "Expense deleted successfully!"}));
    }

    assert!(server.store.get(EXPENSES_COLLECTION, &id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_advice_includes_user_records_in_prompt() {
    let server = spawn_server(ScriptedProvider::replying("Cut back on takeout.")).await;

    server
        .http
        .post(server.url("/expenses/add"))
        .json(&json!({"amount": 1200, "category": "Takeout", "userId": "asha"}))
        .send()
        .await
        .unwrap();
    server
        .store
        .create(
            INVESTMENTS_COLLECTION,
            json!({"userId": "asha", "kind": "Index fund"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .json(&json!({"userId": "asha", "query": "How do I save more?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"advice": "Cut back on takeout."}));

    let prompt = server.provider.last_prompt().unwrap();
    assert!(prompt.contains("How do I save more?"));
    assert!(prompt.contains("Takeout"));
    assert!(prompt.contains("Index fund"));
}

#[tokio::test]
async fn test_advice_falls_back_to_last_message() {
    let server = spawn_server(ScriptedProvider::replying("ok")).await;

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .json(&json!({
            "user": {"id": "ravi", "name": "Ravi"},
            "messages": [
                {"role": "user", "content": "first"},
                {"role": "user", "content": "Should I buy gold?"}
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompt = server.provider.last_prompt().unwrap();
    assert!(prompt.contains("Should I buy gold?"));
    assert!(prompt.contains("ravi"));
}

#[tokio::test]
async fn test_advice_upstream_failure_is_internal_error() {
    let server = spawn_server(ScriptedProvider::failing("Invalid API Key")).await;

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .json(&json!({"query": "Hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid API Key"));
}

#[tokio::test]
async fn test_advice_malformed_body_is_internal_error() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .header("content-type", "application/json")
        .body("[1, 2")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert_eq!(server.provider.request_count(), 0);
}

#[tokio::test]
async fn test_advice_stream_emits_chunks_then_done() {
    let server = spawn_server(ScriptedProvider::replying("Save first, spend later")).await;

    let response = server
        .http
        .post(server.url("/ai-advice/stream"))
        .json(&json!({"query": "Budget tips"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let body = response.text().await.unwrap();
    assert!(body.contains("advice_chunk"));
    assert!(body.contains(r#"{"chunk":"Save "}"#));
    assert!(body.contains(r#"{"chunk":"later"}"#));
    let done_at = body.find("done").unwrap();
    let last_chunk_at = body.rfind("advice_chunk").unwrap();
    assert!(done_at > last_chunk_at);
}

#[tokio::test]
async fn test_influencers_parses_model_output() {
    let reply = json!([
        {"name": "A", "topic": "Tax", "platform": "YouTube", "link": "https://a.example"}
    ])
    .to_string();
    let server = spawn_server(ScriptedProvider::replying(&reply)).await;

    let response = server
        .http
        .get(server.url("/groq-influencers"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"influencers": [
            {"name": "A", "topic": "Tax", "platform": "YouTube", "link": "https://a.example"}
        ]})
    );
}

#[tokio::test]
async fn test_influencers_invalid_output_uses_fallback() {
    let server = spawn_server(ScriptedProvider::replying("Here are some names: ...")).await;

    let response = server
        .http
        .get(server.url("/groq-influencers"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["influencers"].as_array().unwrap().len(), 6);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_influencers_upstream_failure_still_succeeds() {
    let server = spawn_server(ScriptedProvider::failing("quota exhausted")).await;

    let response = server
        .http
        .get(server.url("/groq-influencers"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["influencers"], json!([]));
    assert!(body["error"].as_str().unwrap().contains("quota exhausted"));
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let server = spawn_server(ScriptedProvider::replying("unused")).await;

    let response = server.http.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = server
        .http
        .get(server.url("/expenses/add"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_advice_without_user_uses_empty_context() {
    let server = spawn_server(ScriptedProvider::replying("Track every rupee.")).await;

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["advice"], "Track every rupee.");

    let prompt = server.provider.last_prompt().unwrap();
    assert!(prompt.contains("User Query: Hi"));
    assert!(prompt.contains("User ID: unknown"));
    assert!(prompt.contains("User Expenses Summary: []"));
}

#[tokio::test]
async fn test_advice_null_fields_count_as_absent() {
    let server = spawn_server(ScriptedProvider::replying("Start small.")).await;

    let response = server
        .http
        .post(server.url("/ai-advice"))
        .json(&json!({"userId": null, "user": null, "query": null, "messages": null}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"advice": "Start small."}));

    let prompt = server.provider.last_prompt().unwrap();
    assert!(prompt.contains("User Query: Hi"));
    assert!(prompt.contains("User ID: unknown"));
}
