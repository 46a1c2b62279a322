// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-level tests of the query builders against a mock store.

use serde::Deserialize;
use serde_json::json;
use stockroom_config::model::StoreConfig;
use stockroom_postgrest::{Direction, FilterBuilder, RestClient, StoreError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> RestClient {
    RestClient::new(&StoreConfig {
        url: server.uri(),
        api_key: Some("anon-key".into()),
        ..StoreConfig::default()
    })
    .unwrap()
}

fn query_pairs(request: &Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[tokio::test]
async fn select_sends_one_get_with_canonical_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "o1", "status": "Reservado", "customers": {"name": "Padaria Sol"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client(&server)
        .table("orders")
        .select("*, customers(name)")
        .eq("status", "Reservado")
        .order("created_at", Direction::Descending)
        .limit(5)
        .execute()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["customers"]["name"], "Padaria Sol");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        query_pairs(&requests[0]),
        vec![
            pair("select", "*,customers(name)"),
            pair("status", "eq.Reservado"),
            pair("order", "created_at.desc"),
            pair("limit", "5"),
        ]
    );
}

#[tokio::test]
async fn eq_filters_render_once_each_in_call_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client(&server)
        .table("order_items")
        .select("*")
        .eq("order_id", "o1")
        .eq("product_id", "p1")
        .eq("order_id", "o2")
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        query_pairs(&requests[0]),
        vec![
            pair("select", "*"),
            pair("order_id", "eq.o1"),
            pair("product_id", "eq.p1"),
            pair("order_id", "eq.o2"),
        ]
    );
}

#[tokio::test]
async fn raw_fragment_limit_is_replaced_by_later_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client(&server)
        .table("products")
        .select_with("id,name", "name=ilike.*cafe*&limit=10")
        .order_asc("name")
        .limit(3)
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        query_pairs(&requests[0]),
        vec![
            pair("select", "id,name"),
            pair("name", "ilike.*cafe*"),
            pair("order", "name.asc"),
            pair("limit", "3"),
        ]
    );
}

#[tokio::test]
async fn encoded_raw_fragment_is_not_encoded_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("name", "ilike.*café*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .table("products")
        .select_with("*", "name=ilike.*caf%C3%A9*")
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("select=*&name=ilike.*caf%C3%A9*")
    );
}

#[tokio::test]
async fn typed_rows_decode_through_execute_as() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
        stock_quantity: i64,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("stock_quantity", "lt.10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "p1", "stock_quantity": 4, "name": "Farinha"}])),
        )
        .mount(&server)
        .await;

    let rows: Vec<Row> = client(&server)
        .table("products")
        .select("id,stock_quantity")
        .lt("stock_quantity", 10)
        .execute_as()
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![Row {
            id: "p1".into(),
            stock_quantity: 4
        }]
    );
}

#[tokio::test]
async fn identical_selects_yield_identical_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}, {"id": "b"}])),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client
        .table("products")
        .select("id")
        .order_asc("id")
        .execute()
        .await
        .unwrap();
    let second = client
        .table("products")
        .select("id")
        .order_asc("id")
        .execute()
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn minimal_insert_yields_unit_and_prefers_minimal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/customers"))
        .and(header("prefer", "return=minimal"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "X"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server)
        .table("customers")
        .insert(&json!({"name": "X"}))
        .execute()
        .await;
    assert!(matches!(outcome, Ok(())));
}

#[tokio::test]
async fn returning_insert_yields_created_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/customers"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"name": "X"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([{"id": "c-42", "name": "X"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = client(&server)
        .table("customers")
        .insert(&json!({"name": "X"}))
        .returning()
        .execute()
        .await
        .unwrap();
    assert_eq!(rows[0]["id"], "c-42");
    assert_eq!(rows[0]["name"], "X");
}

#[tokio::test]
async fn array_insert_sends_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .and(body_json(json!([
            {"product_id": "p1", "quantity": 2},
            {"product_id": "p2", "quantity": 1}
        ])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![
        json!({"product_id": "p1", "quantity": 2}),
        json!({"product_id": "p2", "quantity": 1}),
    ];
    client(&server)
        .table("order_items")
        .insert(&lines)
        .execute()
        .await
        .unwrap();
}

#[tokio::test]
async fn update_patches_scoped_rows_and_returns_them() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/orders"))
        .and(query_param("id", "eq.o1"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"status": "Entregue"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "o1", "status": "Entregue"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = client(&server)
        .table("orders")
        .update(&json!({"status": "Entregue"}))
        .eq("id", "o1")
        .execute()
        .await
        .unwrap();
    assert_eq!(rows[0]["status"], "Entregue");
}

#[tokio::test]
async fn unscoped_update_sends_no_filters() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .table("orders")
        .update(&json!({"status": "Entregue"}))
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn unscoped_delete_sends_no_filters() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .table("order_items")
        .delete()
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn delete_returns_none_on_no_content_and_body_otherwise() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(query_param("id", "eq.gone"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(query_param("id", "eq.echo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "echo"}])))
        .mount(&server)
        .await;

    let client = client(&server);
    let gone = client
        .table("documents")
        .delete()
        .eq("id", "gone")
        .execute()
        .await
        .unwrap();
    assert_eq!(gone, None);

    let echo = client
        .table("documents")
        .delete()
        .eq("id", "echo")
        .execute()
        .await
        .unwrap();
    assert_eq!(echo, Some(json!([{"id": "echo"}])));
}

#[tokio::test]
async fn non_success_status_keeps_body_verbatim() {
    let server = MockServer::start().await;
    let body = r#"{"code":"42P01","message":"relation \"public.produtos\" does not exist","details":null,"hint":null}"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(body))
        .mount(&server)
        .await;

    let err = client(&server)
        .table("produtos")
        .select("*")
        .execute()
        .await
        .unwrap_err();
    match &err {
        StoreError::Store { status, body: got } => {
            assert_eq!(*status, 404);
            assert_eq!(got, body);
        }
        other => panic!("expected store error, got {other:?}"),
    }
    assert_eq!(err.api_error().unwrap().code.as_deref(), Some("42P01"));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .table("products")
        .select("*")
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let client = RestClient::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client
        .table("products")
        .select("*")
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Transport { .. }));
}

#[tokio::test]
async fn slow_store_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = RestClient::new(&StoreConfig {
        url: server.uri(),
        timeout_secs: 1,
        ..StoreConfig::default()
    })
    .unwrap();
    let err = client
        .table("products")
        .select("*")
        .execute()
        .await
        .unwrap_err();
    match err {
        StoreError::Transport { message, .. } => assert_eq!(message, "request timed out"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn bucket_upload_posts_bytes_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/documents/atas/ata-01.pdf"))
        .and(header("content-type", "application/pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Key": "documents/atas/ata-01.pdf"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client(&server)
        .bucket("documents")
        .upload("atas/ata-01.pdf", b"%PDF-1.7".to_vec(), Some("application/pdf"))
        .await
        .unwrap();
    assert_eq!(ack["Key"], "documents/atas/ata-01.pdf");
}
