//! HttpBillStore against a throwaway axum server that speaks the bills API.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use billed_core::{Bill, BillStatus, BillSubmission, ExpenseType, ReceiptFile, StagedReceipt};
use billed_service::{BillStore, HttpBillStore, ServiceError};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Default)]
struct Received {
    fields: Vec<(String, String)>,
    file: Option<(String, String, Vec<u8>)>,
    auth: Option<String>,
}

type Shared = Arc<Mutex<Received>>;

async fn create_bill(
    State(state): State<Shared>,
    headers: axum::http::HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut received = Received {
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ..Default::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await.unwrap().to_vec();
            received.file = Some((file_name, content_type, data));
        } else {
            let text = field.text().await.unwrap();
            received.fields.push((name, text));
        }
    }
    let get = |k: &str| {
        received
            .fields
            .iter()
            .find(|(name, _)| name == k)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    let body = json!({
        "id": "created-1",
        "email": get("email"),
        "type": get("type"),
        "name": get("name"),
        "amount": get("amount").parse::<i64>().unwrap_or_default(),
        "date": get("date"),
        "vat": get("vat"),
        "pct": get("pct").parse::<i64>().unwrap_or(20),
        "commentary": get("commentary"),
        "fileUrl": "https://localhost:3456/images/test.png",
        "fileName": get("fileName"),
        "status": get("status"),
    });
    *state.lock().unwrap() = received;
    Json(body)
}

async fn list_bills() -> Json<Value> {
    Json(json!([
        {
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://example.test/a.jpg",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "a.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "email": "a@a",
            "pct": 20
        },
        {
            "id": "BeKy5Mo4jkmdfPGYpTxZ",
            "vat": "",
            "fileUrl": null,
            "status": "refused",
            "type": "Transports",
            "commentary": "",
            "name": "test1",
            "fileName": "b.png",
            "date": "2001-01-01",
            "amount": 100,
            "email": "a@a",
            "pct": 20
        }
    ]))
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn submission() -> BillSubmission {
    let receipt =
        StagedReceipt::try_from(ReceiptFile::new("test.png", "image/png", &b"test"[..])).unwrap();
    BillSubmission::builder(receipt)
        .email("test@test.com")
        .expense_type(ExpenseType::OnlineServices)
        .name("test1")
        .amount(500)
        .date("2023-01-01")
        .vat("20")
        .pct(5)
        .commentary("commentary test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn create_sends_multipart_with_every_field() {
    let state: Shared = Arc::default();
    let router = Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .with_state(state.clone());
    let base = spawn(router).await;

    let store = HttpBillStore::with_api_key(&base, "secret".into());
    let bill: Bill = store.create(&submission()).await.unwrap();
    assert_eq!(bill.id, "created-1");
    assert_eq!(bill.status, BillStatus::Pending);
    assert_eq!(bill.expense_type, ExpenseType::OnlineServices);

    let received = state.lock().unwrap();
    assert_eq!(received.auth.as_deref(), Some("Bearer secret"));
    let (file_name, content_type, data) = received.file.clone().unwrap();
    assert_eq!(file_name, "test.png");
    assert_eq!(content_type, "image/png");
    assert_eq!(data, b"test");
    let names: Vec<&str> = received.fields.iter().map(|(k, _)| k.as_str()).collect();
    assert!(!names.contains(&"fileUrl"));
    assert!(received
        .fields
        .contains(&("pct".to_string(), "5".to_string())));
    assert!(received
        .fields
        .contains(&("amount".to_string(), "500".to_string())));
}

#[tokio::test]
async fn list_decodes_store_records_in_order() {
    let router = Router::new()
        .route("/bills", get(list_bills))
        .with_state(Shared::default());
    let base = spawn(router).await;

    let bills = HttpBillStore::new(&base).list().await.unwrap();
    assert_eq!(bills.len(), 2);
    assert_eq!(bills[0].id, "47qAXb6fIm2zOKkLzMro");
    assert_eq!(bills[1].status, BillStatus::Refused);
    assert!(bills[1].file_url.is_none());
}

#[tokio::test]
async fn error_bodies_map_to_service_errors() {
    let router = Router::new()
        .route(
            "/bills",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Erreur 500" })),
                )
            })
            .post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Erreur 404" })),
                )
            }),
        );
    let base = spawn(router).await;
    let store = HttpBillStore::new(&base);

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, ServiceError::Internal(ref m) if m == "Erreur 500"));

    let err = store.create(&submission()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Erreur 404"));
}

#[tokio::test]
async fn unreachable_server_is_an_internal_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpBillStore::new(&format!("http://{addr}"))
        .list()
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));
}
