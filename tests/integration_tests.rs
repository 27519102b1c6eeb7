use chrono::TimeDelta;
use gpu_marketplace::handlers::{self, AppState};
use gpu_marketplace::session::SessionRegistry;
use gpu_marketplace::store::InMemoryListingStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 메모리 저장소를 붙인 게이트웨이 실행
async fn spawn_app() -> TestApp {
    init_tracing();
    let state = AppState::new(
        Arc::new(InMemoryListingStore::new()),
        SessionRegistry::new(TimeDelta::minutes(30)),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, handlers::routes(state).into_make_service())
            .await
            .unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: Client::new(),
    }
}

struct TestApp {
    base_url: String,
    client: Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 회원가입 후 로그인, 토큰 반환
    async fn signup(&self, name: &str, role: &str) -> String {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": name,
                "email": format!("{name}@example.com"),
                "password": "secret",
                "role": role
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let login: Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": format!("{name}@example.com"), "password": "secret" }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .unwrap();
        assert_eq!(login["role"], json!(role));
        login["token"].as_str().unwrap().to_string()
    }

    async fn create_gpu(&self, token: &str, name: &str, price: f64) {
        let response = self
            .client
            .post(self.url("/listings"))
            .bearer_auth(token)
            .json(&json!({ "name": name, "description": "test gpu", "price": price }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    async fn bid(&self, token: &str, id: &str, amount: f64) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/listings/{id}/bids")))
            .bearer_auth(token)
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, token: &str, path: &str) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success(), "{path}: {}", response.status());
        response.json().await.unwrap()
    }

    /// 판매자 화면에서 상품명 -> id 조회
    async fn listing_id(&self, seller_token: &str, name: &str) -> String {
        let view = self.get_json(seller_token, "/seller/dashboard").await;
        view["myGPUs"]
            .as_array()
            .unwrap()
            .iter()
            .find(|card| card["name"] == json!(name))
            .and_then(|card| card["_id"].as_str())
            .unwrap()
            .to_string()
    }
}

fn names(section: &Value) -> Vec<String> {
    section
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["name"].as_str().unwrap().to_string())
        .collect()
}

/// 구매자 대시보드 분할 테스트
#[tokio::test]
async fn test_buyer_dashboard_partitions_by_viewer() {
    let app = spawn_app().await;
    let seller = app.signup("seller", "seller").await;
    let alice = app.signup("alice", "buyer").await;
    let bob = app.signup("bob", "buyer").await;
    let carol = app.signup("carol", "buyer").await;

    app.create_gpu(&seller, "RTX 4090", 1500.0).await;
    app.create_gpu(&seller, "RTX 3080", 700.0).await;
    app.create_gpu(&seller, "Radeon 7900", 900.0).await;
    let rtx4090 = app.listing_id(&seller, "RTX 4090").await;
    let rtx3080 = app.listing_id(&seller, "RTX 3080").await;

    assert!(app.bid(&alice, &rtx4090, 1600.0).await.status().is_success());
    assert!(app.bid(&bob, &rtx4090, 1550.0).await.status().is_success());
    assert!(app.bid(&bob, &rtx3080, 800.0).await.status().is_success());

    let view = app.get_json(&alice, "/buyer/dashboard").await;
    assert_eq!(names(&view["highestBid"]), vec!["RTX 4090"]);
    assert!(names(&view["userBid"]).is_empty());
    assert_eq!(names(&view["noBid"]), vec!["RTX 3080", "Radeon 7900"]);
    assert_eq!(view["highestBid"][0]["highestBid"], json!(1600.0));

    let view = app.get_json(&bob, "/buyer/dashboard").await;
    assert_eq!(names(&view["highestBid"]), vec!["RTX 3080"]);
    assert_eq!(names(&view["userBid"]), vec!["RTX 4090"]);
    assert_eq!(view["userBid"][0]["yourBid"], json!(1550.0));
    assert_eq!(names(&view["noBid"]), vec!["Radeon 7900"]);

    let view = app.get_json(&carol, "/buyer/dashboard").await;
    assert!(names(&view["highestBid"]).is_empty());
    assert!(names(&view["userBid"]).is_empty());
    assert_eq!(
        names(&view["noBid"]),
        vec!["RTX 4090", "RTX 3080", "Radeon 7900"]
    );
}

/// 구역별 검색/정렬 테스트
#[tokio::test]
async fn test_dashboard_search_and_sort() {
    let app = spawn_app().await;
    let seller = app.signup("seller", "seller").await;
    let buyer = app.signup("buyer", "buyer").await;

    app.create_gpu(&seller, "RTX 4090", 1500.0).await;
    app.create_gpu(&seller, "RTX 3080", 700.0).await;
    app.create_gpu(&seller, "Radeon 7900", 900.0).await;

    let view = app
        .get_json(&buyer, "/buyer/dashboard?noBid_search=rtx&noBid_sort=priceAsc")
        .await;
    assert_eq!(names(&view["noBid"]), vec!["RTX 3080", "RTX 4090"]);

    let view = app
        .get_json(&seller, "/seller/dashboard?myGPUs_sort=priceDesc&otherGPUs_search=rtx")
        .await;
    assert_eq!(
        names(&view["myGPUs"]),
        vec!["RTX 4090", "Radeon 7900", "RTX 3080"]
    );
    assert!(names(&view["otherGPUs"]).is_empty());

    // 알 수 없는 정렬 값은 정렬하지 않음
    let view = app
        .get_json(&seller, "/seller/dashboard?myGPUs_sort=cheapest")
        .await;
    assert_eq!(
        names(&view["myGPUs"]),
        vec!["RTX 4090", "RTX 3080", "Radeon 7900"]
    );
}

/// 입찰 마감 테스트
#[tokio::test]
async fn test_closed_listing_rejects_bids() {
    let app = spawn_app().await;
    let seller = app.signup("seller", "seller").await;
    let buyer = app.signup("buyer", "buyer").await;
    app.create_gpu(&seller, "RTX 4090", 1500.0).await;
    let id = app.listing_id(&seller, "RTX 4090").await;

    let toggled: Value = app
        .client
        .patch(app.url(&format!("/listings/{id}/bid-status")))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["bidStatus"], json!("Closed"));
    assert_eq!(toggled["canBid"], json!(false));

    let response = app.bid(&buyer, &id, 1600.0).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("BIDDING_CLOSED"));

    // 마감된 미입찰 상품은 모든 구매자에게 미입찰 구역
    let view = app.get_json(&buyer, "/buyer/dashboard").await;
    assert_eq!(names(&view["noBid"]), vec!["RTX 4090"]);
    assert_eq!(view["noBid"][0]["highestBid"], json!(0.0));
}

/// 입력 검증 및 권한 테스트
#[tokio::test]
async fn test_validation_and_roles() {
    let app = spawn_app().await;
    let seller = app.signup("seller", "seller").await;
    let buyer = app.signup("buyer", "buyer").await;
    app.create_gpu(&seller, "RTX 4090", 1500.0).await;
    let id = app.listing_id(&seller, "RTX 4090").await;

    let response = app.bid(&buyer, &id, 0.0).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("INVALID_BID_AMOUNT"));

    let response = app
        .client
        .post(app.url("/listings"))
        .bearer_auth(&buyer)
        .json(&json!({ "name": "Fake", "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .get(app.url("/seller/dashboard"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.client.get(app.url("/buyer/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// 상품 수정/삭제 테스트
#[tokio::test]
async fn test_update_and_delete_listing() {
    let app = spawn_app().await;
    let seller = app.signup("seller", "seller").await;
    app.create_gpu(&seller, "RTX 4090", 1500.0).await;
    let id = app.listing_id(&seller, "RTX 4090").await;

    let updated: Value = app
        .client
        .put(app.url(&format!("/listings/{id}")))
        .bearer_auth(&seller)
        .json(&json!({ "name": "RTX 4090 Ti", "description": "new", "price": 1800 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["name"], json!("RTX 4090 Ti"));
    assert_eq!(updated["price"], json!(1800.0));

    let response = app
        .client
        .delete(app.url(&format!("/listings/{id}")))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url(&format!("/listings/{id}")))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 로그아웃 테스트
#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = spawn_app().await;
    let buyer = app.signup("buyer", "buyer").await;

    app.get_json(&buyer, "/buyer/dashboard").await;

    let response = app
        .client
        .post(app.url("/auth/logout"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url("/buyer/dashboard"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
