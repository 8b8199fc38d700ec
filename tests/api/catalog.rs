use crate::helpers::{detail_of, id_of, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn magazine_crud_works() {
    // given
    let app = TestApp::spawn().await;
    let response = app
        .post_magazine(&json!({
            "name": "Przekrój",
            "description": "Quarterly",
            "base_price": 39.9,
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let id = id_of(response).await;

    // when
    let updated = app
        .put(
            &format!("/magazines/{id}"),
            &json!({"name": "Przekrój", "description": "Monthly", "base_price": 12.5}),
        )
        .await;

    // then
    assert_eq!(updated.status().as_u16(), 200);
    let magazine: Value = app.get(&format!("/magazines/{id}")).await.json().await.unwrap();
    assert_eq!(magazine["description"], "Monthly");
    assert_eq!(magazine["base_price"].as_f64(), Some(12.5));

    let deleted = app.delete(&format!("/magazines/{id}")).await;
    assert_eq!(deleted.status().as_u16(), 200);
    assert_eq!(app.get(&format!("/magazines/{id}")).await.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_magazines_are_rejected_with_422() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        (json!({"name": "", "base_price": 10.0}), "empty name"),
        (json!({"name": "Przekrój", "base_price": 0.0}), "zero price"),
        (json!({"name": "Przekrój", "base_price": -1.0}), "negative price"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_magazine(&body).await;

        // then
        assert_eq!(
            response.status().as_u16(),
            422,
            "The API did not reject a magazine with {description}"
        );
    }
}

#[tokio::test]
async fn missing_catalog_rows_return_404() {
    // given
    let app = TestApp::spawn().await;

    for path in ["/magazines/999", "/plans/999"] {
        // when
        let get = app.get(path).await;
        let delete = app.delete(path).await;

        // then
        assert_eq!(get.status().as_u16(), 404, "GET {path}");
        assert_eq!(delete.status().as_u16(), 404, "DELETE {path}");
    }
}

#[tokio::test]
async fn magazines_are_paginated() {
    // given
    let app = TestApp::spawn().await;
    for _ in 0..12 {
        app.create_magazine(10.0).await;
    }

    // when
    let first: Vec<Value> = app.get("/magazines").await.json().await.unwrap();
    let rest: Vec<Value> = app
        .get("/magazines/?skip=10&limit=10")
        .await
        .json()
        .await
        .unwrap();

    // then
    assert_eq!(first.len(), 10);
    assert_eq!(rest.len(), 2);
}

#[tokio::test]
async fn plans_are_validated() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        (
            json!({"title": "Roczna", "renewal_period": 0, "discount": 0.1}),
            "zero renewal period",
        ),
        (
            json!({"title": "Roczna", "renewal_period": 365, "discount": 1.0}),
            "full discount",
        ),
        (
            json!({"title": "Roczna", "renewal_period": 365, "discount": -0.1}),
            "negative discount",
        ),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_plan(&body).await;

        // then
        assert_eq!(
            response.status().as_u16(),
            422,
            "The API did not reject a plan with {description}"
        );
    }
}

#[tokio::test]
async fn plan_update_rejects_non_positive_renewal_period() {
    // given
    let app = TestApp::spawn().await;
    let plan_id = app.create_plan(30, 0.1).await;

    // when
    let response = app
        .put(
            &format!("/plans/{plan_id}"),
            &json!({"title": "Roczna", "renewal_period": -30, "discount": 0.1}),
        )
        .await;

    // then
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn referenced_catalog_rows_cannot_be_deleted() {
    // given
    let app = TestApp::spawn().await;
    let magazine_id = app.create_magazine(10.0).await;
    let plan_id = app.create_plan(30, 0.0).await;
    app.subscribe_test_user(magazine_id, plan_id).await;

    // when
    let magazine = app.delete(&format!("/magazines/{magazine_id}")).await;
    let plan = app.delete(&format!("/plans/{plan_id}")).await;

    // then
    assert_eq!(magazine.status().as_u16(), 409);
    assert_eq!(plan.status().as_u16(), 409);
    assert_eq!(
        detail_of(magazine).await,
        "Magazine is still referenced by subscriptions"
    );
}
