/// 상품/입찰 관련 커맨드 처리
/// 1. 회원가입 / 로그인 / 로그아웃
/// 2. 상품 등록 / 수정 / 삭제 / 입찰 상태 전환
/// 3. 입찰
// region:    --- Imports
use crate::bidding::model::{
    Listing, LoginRequest, LoginResponse, NewListing, RegisterRequest, Role,
};
use crate::error::{Error, Result};
use crate::session::{Session, SessionRegistry};
use crate::store::ListingStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: Option<f64>,
}

/// 1. 회원가입
pub async fn handle_register(store: &dyn ListingStore, request: RegisterRequest) -> Result<()> {
    info!(
        "{:<12} --> 회원가입 처리 시작: {} ({})",
        "Command", request.username, request.role
    );
    if [&request.username, &request.email, &request.password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(Error::validation(
            "INVALID_REGISTRATION",
            "사용자명, 이메일, 비밀번호를 모두 입력하세요.",
        ));
    }
    let role = Role::parse(&request.role).ok_or_else(|| {
        Error::validation("INVALID_REGISTRATION", "역할은 buyer 또는 seller 여야 합니다.")
    })?;

    let request = RegisterRequest {
        role: role.as_str().to_string(),
        ..request
    };
    store.register(&request).await
}

/// 1. 로그인: 발급된 토큰으로 세션을 만들어 등록한다.
pub async fn handle_login(
    store: &dyn ListingStore,
    sessions: &SessionRegistry,
    request: LoginRequest,
) -> Result<LoginResponse> {
    info!("{:<12} --> 로그인 처리 시작: {}", "Command", request.email);
    let response = store.login(&request).await?;
    let session = Session::from_token(&response.token, response.role)?;
    sessions.insert(session).await;
    Ok(response)
}

/// 1. 로그아웃
pub async fn handle_logout(sessions: &SessionRegistry, session: &Session) {
    info!("{:<12} --> 로그아웃 처리: {}", "Command", session.user_id);
    sessions.remove(&session.token).await;
}

/// 2. 상품 등록
pub async fn handle_create_listing(
    store: &dyn ListingStore,
    session: &Session,
    listing: NewListing,
) -> Result<()> {
    info!("{:<12} --> 상품 등록 처리 시작: {}", "Command", listing.name);
    session.require_role(Role::Seller)?;
    let listing = validate_listing(listing)?;
    store.create_listing(session, &listing).await
}

/// 2. 상품 수정 후 변경된 상품 반환
pub async fn handle_update_listing(
    store: &dyn ListingStore,
    session: &Session,
    listing_id: &str,
    listing: NewListing,
) -> Result<Listing> {
    info!("{:<12} --> 상품 수정 처리 시작 id: {}", "Command", listing_id);
    session.require_role(Role::Seller)?;
    let listing = validate_listing(listing)?;
    store.update_listing(session, listing_id, &listing).await?;
    store.fetch_listing(session, listing_id).await
}

/// 2. 상품 삭제
pub async fn handle_delete_listing(
    store: &dyn ListingStore,
    session: &Session,
    listing_id: &str,
) -> Result<()> {
    info!("{:<12} --> 상품 삭제 처리 시작 id: {}", "Command", listing_id);
    session.require_role(Role::Seller)?;
    store.delete_listing(session, listing_id).await
}

/// 2. 입찰 상태 전환 (Open <-> Closed)
pub async fn handle_toggle_bid_status(
    store: &dyn ListingStore,
    session: &Session,
    listing_id: &str,
) -> Result<Listing> {
    info!(
        "{:<12} --> 입찰 상태 전환 처리 시작 id: {}",
        "Command", listing_id
    );
    session.require_role(Role::Seller)?;
    let listing = store.toggle_bid_status(session, listing_id).await?;
    info!(
        "{:<12} --> 입찰 상태: {:?} id: {}",
        "Command", listing.bid_status, listing_id
    );
    Ok(listing)
}

/// 3. 입찰 후 갱신된 상품 반환
pub async fn handle_place_bid(
    store: &dyn ListingStore,
    session: &Session,
    listing_id: &str,
    cmd: PlaceBidCommand,
) -> Result<Listing> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작 id: {}, {:?}",
        "Command", listing_id, cmd
    );
    session.require_role(Role::Buyer)?;

    let amount = match cmd.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => amount,
        _ => {
            return Err(Error::validation(
                "INVALID_BID_AMOUNT",
                "입찰 금액을 입력하세요.",
            ))
        }
    };

    // 입찰 상태 검증
    let listing = store.fetch_listing(session, listing_id).await?;
    if !listing.bid_status.is_open() {
        warn!("{:<12} --> 마감된 상품 입찰 시도 id: {}", "Command", listing_id);
        return Err(Error::BiddingClosed);
    }

    store.place_bid(session, listing_id, amount).await?;
    store.fetch_listing(session, listing_id).await
}

/// 상품 입력값 검증
fn validate_listing(listing: NewListing) -> Result<NewListing> {
    if listing.name.trim().is_empty() {
        return Err(Error::validation(
            "INVALID_LISTING",
            "상품명을 입력하세요.",
        ));
    }
    if !(listing.price.is_finite() && listing.price >= 0.0) {
        return Err(Error::validation(
            "INVALID_LISTING",
            "가격은 0 이상이어야 합니다.",
        ));
    }
    Ok(NewListing {
        name: listing.name.trim().to_string(),
        ..listing
    })
}

// endregion: --- Commands
