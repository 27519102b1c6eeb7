// region:    --- Imports
use super::ListingStore;
use crate::bidding::model::{
    Listing, LoginRequest, LoginResponse, NewListing, RegisterRequest, SellerListings,
};
use crate::error::{Error, Result};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- HTTP Listing Store
/// REST API 로 접근하는 원격 상품 저장소
#[derive(Clone)]
pub struct HttpListingStore {
    client: Client,
    base_url: Url,
}

/// 입찰 상태 전환 응답
#[derive(Deserialize)]
struct ToggleResponse {
    gpu: Listing,
}

/// 오류 응답 본문
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpListingStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("원격 저장소 주소 '{}' 해석 실패: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "원격 저장소 주소 '{}' 는 경로를 붙일 수 없습니다.",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// 기준 주소 뒤에 경로 구간을 붙인다. 각 구간은 퍼센트 인코딩되므로
    /// 상품 id 에 '/', '?', '#' 이 있어도 다른 엔드포인트로 새지 않는다.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("원격 저장소 주소 '{}' 오류", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 인증 헤더를 붙인 요청
    fn authed(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(&session.token)
    }

    /// 요청 전송 후 JSON 본문 해석
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// 요청 전송, 본문은 버림
    async fn send(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }
}

/// 경로 구간으로 쓸 상품 id 확인
/// 빈 값과 '.', '..' 은 URL 정규화로 구간 자체가 사라지므로 거부한다.
fn listing_path(listing_id: &str) -> Result<&str> {
    match listing_id {
        "" | "." | ".." => Err(Error::NotFound(format!(
            "상품을 찾을 수 없습니다: '{}'",
            listing_id
        ))),
        id => Ok(id),
    }
}

/// 비정상 응답을 오류로 변환
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .unwrap_or(text);
    warn!(
        "{:<12} --> 원격 저장소 오류 응답: status={}, message={}",
        "Store", status, message
    );

    Err(match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Remote {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl ListingStore for HttpListingStore {
    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        info!("{:<12} --> 회원가입 요청 email={}", "Store", request.email);
        self.send(self.client.post(self.url(&["auth", "register"])?).json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        info!("{:<12} --> 로그인 요청 email={}", "Store", request.email);
        self.send_json(self.client.post(self.url(&["auth", "login"])?).json(request))
            .await
    }

    async fn fetch_buyer_listings(&self, session: &Session) -> Result<Vec<Listing>> {
        info!("{:<12} --> 구매자 상품 목록 조회", "Store");
        let request = self.client.get(self.url(&["gpus", "getallgpubuyer"])?);
        self.send_json(self.authed(request, session)).await
    }

    async fn fetch_seller_listings(&self, session: &Session) -> Result<SellerListings> {
        info!("{:<12} --> 판매자 상품 목록 조회", "Store");
        let request = self.client.get(self.url(&["gpus", "getallgpu"])?);
        self.send_json(self.authed(request, session)).await
    }

    async fn fetch_listing(&self, session: &Session, listing_id: &str) -> Result<Listing> {
        info!("{:<12} --> 상품 조회 id: {}", "Store", listing_id);
        let request = self
            .client
            .get(self.url(&["gpus", "single", listing_path(listing_id)?])?);
        self.send_json(self.authed(request, session)).await
    }

    async fn create_listing(&self, session: &Session, listing: &NewListing) -> Result<()> {
        info!("{:<12} --> 상품 등록 name={}", "Store", listing.name);
        let request = self.client.post(self.url(&["gpus", "creategpu"])?).json(listing);
        self.send(self.authed(request, session)).await
    }

    async fn update_listing(
        &self,
        session: &Session,
        listing_id: &str,
        listing: &NewListing,
    ) -> Result<()> {
        info!("{:<12} --> 상품 수정 id: {}", "Store", listing_id);
        let request = self
            .client
            .put(self.url(&["gpus", "updategpu", listing_path(listing_id)?])?)
            .json(listing);
        self.send(self.authed(request, session)).await
    }

    async fn delete_listing(&self, session: &Session, listing_id: &str) -> Result<()> {
        info!("{:<12} --> 상품 삭제 id: {}", "Store", listing_id);
        let request = self
            .client
            .delete(self.url(&["gpus", "delete", listing_path(listing_id)?])?);
        self.send(self.authed(request, session)).await
    }

    async fn toggle_bid_status(&self, session: &Session, listing_id: &str) -> Result<Listing> {
        info!("{:<12} --> 입찰 상태 전환 id: {}", "Store", listing_id);
        let request = self
            .client
            .patch(self.url(&["gpus", "toggleBidStatus", listing_path(listing_id)?])?);
        let response: ToggleResponse = self.send_json(self.authed(request, session)).await?;
        Ok(response.gpu)
    }

    async fn place_bid(&self, session: &Session, listing_id: &str, amount: f64) -> Result<()> {
        info!(
            "{:<12} --> 입찰 요청 id: {}, amount: {}",
            "Store", listing_id, amount
        );
        let request = self
            .client
            .post(self.url(&["gpus", listing_path(listing_id)?, "bid"])?)
            .json(&serde_json::json!({ "amount": amount }));
        self.send(self.authed(request, session)).await
    }
}

// endregion: --- HTTP Listing Store
