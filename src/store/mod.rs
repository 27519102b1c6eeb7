// region:    --- Imports
use crate::bidding::model::{
    Listing, LoginRequest, LoginResponse, NewListing, RegisterRequest, SellerListings,
};
use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;

pub mod http;
pub mod in_memory;

pub use http::HttpListingStore;
pub use in_memory::InMemoryListingStore;

// endregion: --- Imports

// region:    --- Listing Store Trait
/// 원격 상품/입찰 저장소
/// 요청마다 세션을 넘겨 호출자를 식별한다.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<()>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// 구매자 화면용 전체 상품
    async fn fetch_buyer_listings(&self, session: &Session) -> Result<Vec<Listing>>;

    /// 판매자 화면용 상품 (내 상품 / 다른 판매자 상품)
    async fn fetch_seller_listings(&self, session: &Session) -> Result<SellerListings>;

    async fn fetch_listing(&self, session: &Session, listing_id: &str) -> Result<Listing>;

    async fn create_listing(&self, session: &Session, listing: &NewListing) -> Result<()>;

    async fn update_listing(
        &self,
        session: &Session,
        listing_id: &str,
        listing: &NewListing,
    ) -> Result<()>;

    async fn delete_listing(&self, session: &Session, listing_id: &str) -> Result<()>;

    /// 입찰 상태 전환 후 변경된 상품 반환
    async fn toggle_bid_status(&self, session: &Session, listing_id: &str) -> Result<Listing>;

    async fn place_bid(&self, session: &Session, listing_id: &str, amount: f64) -> Result<()>;
}

// endregion: --- Listing Store Trait
