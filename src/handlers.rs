// region:    --- Imports
use crate::bidding::commands::{
    self, handle_create_listing, handle_delete_listing, handle_place_bid,
    handle_toggle_bid_status, handle_update_listing, PlaceBidCommand,
};
use crate::bidding::model::{LoginRequest, NewListing, RegisterRequest, Role};
use crate::error::{Error, Result};
use crate::query::dashboard::{self, BuyerDashboardParams, ListingCard, SellerDashboardParams};
use crate::session::{Session, SessionRegistry};
use crate::store::ListingStore;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- App State
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(store: Arc<dyn ListingStore>, sessions: SessionRegistry) -> Self {
        Self { store, sessions }
    }

    /// Authorization: Bearer <token> 헤더로 세션 확인
    async fn session(&self, headers: &HeaderMap) -> Result<Session> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Unauthorized("로그인이 필요합니다.".to_string()))?;

        self.sessions.authenticate(token, Utc::now()).await
    }
}

// endregion: --- App State

// region:    --- Router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/buyer/dashboard", get(handle_buyer_dashboard))
        .route("/seller/dashboard", get(handle_seller_dashboard))
        .route("/listings", post(handle_create))
        .route(
            "/listings/:id",
            get(handle_get_listing)
                .put(handle_update)
                .delete(handle_delete),
        )
        .route("/listings/:id/bid-status", patch(handle_toggle))
        .route("/listings/:id/bids", post(handle_bid))
        .with_state(state)
}

// endregion: --- Router

// region:    --- Auth Handlers

/// 회원가입
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response> {
    commands::handle_register(state.store.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "회원가입이 완료되었습니다." })),
    )
        .into_response())
}

/// 로그인: 역할에 맞는 대시보드 경로를 함께 돌려준다.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let response = commands::handle_login(state.store.as_ref(), &state.sessions, request).await?;
    let dashboard = match response.role {
        Role::Buyer => "/buyer/dashboard",
        Role::Seller => "/seller/dashboard",
    };
    Ok(Json(serde_json::json!({
        "token": response.token,
        "role": response.role,
        "dashboard": dashboard,
    }))
    .into_response())
}

/// 로그아웃
pub async fn handle_logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let session = state.session(&headers).await?;
    commands::handle_logout(&state.sessions, &session).await;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// endregion: --- Auth Handlers

// region:    --- Query Handlers

/// 구매자 대시보드 조회
pub async fn handle_buyer_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BuyerDashboardParams>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    info!(
        "{:<12} --> 구매자 대시보드 조회 user={}",
        "Handler", session.user_id
    );
    let listings = state.store.fetch_buyer_listings(&session).await?;
    let view = dashboard::buyer_dashboard(&listings, &session.user_id, &params);
    Ok(Json(view).into_response())
}

/// 판매자 대시보드 조회
pub async fn handle_seller_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SellerDashboardParams>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    info!(
        "{:<12} --> 판매자 대시보드 조회 user={}",
        "Handler", session.user_id
    );
    session.require_role(Role::Seller)?;
    let listings = state.store.fetch_seller_listings(&session).await?;
    let view = dashboard::seller_dashboard(&listings, &params);
    Ok(Json(view).into_response())
}

/// 상품 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    info!("{:<12} --> 상품 조회 id: {}", "Handler", listing_id);
    let listing = state.store.fetch_listing(&session, &listing_id).await?;
    Ok(Json(ListingCard::new(&listing, Some(session.user_id.as_str()))).into_response())
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

/// 상품 등록
pub async fn handle_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(listing): Json<NewListing>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    handle_create_listing(state.store.as_ref(), &session, listing).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "상품이 등록되었습니다." })),
    )
        .into_response())
}

/// 상품 수정
pub async fn handle_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    Json(listing): Json<NewListing>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    let listing =
        handle_update_listing(state.store.as_ref(), &session, &listing_id, listing).await?;
    Ok(Json(ListingCard::new(&listing, None)).into_response())
}

/// 상품 삭제
pub async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    handle_delete_listing(state.store.as_ref(), &session, &listing_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// 입찰 상태 전환
pub async fn handle_toggle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    let listing = handle_toggle_bid_status(state.store.as_ref(), &session, &listing_id).await?;
    Ok(Json(ListingCard::new(&listing, None)).into_response())
}

/// 입찰
pub async fn handle_bid(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<Response> {
    let session = state.session(&headers).await?;
    let listing = handle_place_bid(state.store.as_ref(), &session, &listing_id, cmd).await?;
    Ok(Json(ListingCard::new(&listing, Some(session.user_id.as_str()))).into_response())
}

// endregion: --- Command Handlers
