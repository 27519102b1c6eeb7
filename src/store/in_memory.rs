// region:    --- Imports
use super::ListingStore;
use crate::bidding::model::{
    Bid, BidStatus, Listing, LoginRequest, LoginResponse, NewListing, RegisterRequest, Role,
    SellerListings, User, UserRef,
};
use crate::error::{Error, Result};
use crate::session::{encode_unsigned_token, Claims, Session};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

// endregion: --- Imports

// region:    --- In-Memory Listing Store
/// 프로세스 내 상품 저장소
///
/// 테스트와 로컬 데모용. 원격 저장소와 같은 규칙(소유자만 수정, 열린 상품만 입찰)을 따른다.
#[derive(Default)]
pub struct InMemoryListingStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<Account>,
    listings: Vec<Listing>,
    next_id: u64,
}

struct Account {
    user: User,
    email: String,
    password: String,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn listing_mut(&mut self, listing_id: &str) -> Result<&mut Listing> {
        self.listings
            .iter_mut()
            .find(|listing| listing.id == listing_id)
            .ok_or_else(|| Error::NotFound(format!("상품 {}", listing_id)))
    }

    /// 판매자 본인 상품인지 확인
    fn owned_listing_mut(&mut self, session: &Session, listing_id: &str) -> Result<&mut Listing> {
        session.require_role(Role::Seller)?;
        let listing = self.listing_mut(listing_id)?;
        let is_owner = listing
            .seller
            .as_ref()
            .is_some_and(|seller| seller.id() == session.user_id);
        if is_owner {
            Ok(listing)
        } else {
            Err(Error::Forbidden("본인 상품만 수정할 수 있습니다.".to_string()))
        }
    }

    fn username(&self, user_id: &str) -> Option<String> {
        self.users
            .iter()
            .find(|account| account.user.id == user_id)
            .map(|account| account.user.username.clone())
    }
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let role = Role::parse(&request.role).ok_or_else(|| {
            Error::validation("INVALID_REGISTRATION", "역할은 buyer 또는 seller 여야 합니다.")
        })?;

        let mut inner = self.inner.write().await;
        if inner
            .users
            .iter()
            .any(|account| account.email == request.email)
        {
            return Err(Error::validation(
                "EMAIL_TAKEN",
                "이미 가입된 이메일입니다.",
            ));
        }

        let id = inner.next_id("user-");
        info!("{:<12} --> 사용자 등록 id: {}", "Store", id);
        inner.users.push(Account {
            user: User {
                id,
                username: request.username.clone(),
                role,
            },
            email: request.email.clone(),
            password: request.password.clone(),
        });
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let inner = self.inner.read().await;
        let account = inner
            .users
            .iter()
            .find(|account| account.email == request.email && account.password == request.password)
            .ok_or_else(|| {
                Error::Unauthorized("이메일 또는 비밀번호가 올바르지 않습니다.".to_string())
            })?;

        let token = encode_unsigned_token(&Claims {
            id: account.user.id.clone(),
            role: Some(account.user.role),
            iat: Utc::now().timestamp(),
        });
        Ok(LoginResponse {
            token,
            role: account.user.role,
        })
    }

    async fn fetch_buyer_listings(&self, _session: &Session) -> Result<Vec<Listing>> {
        Ok(self.inner.read().await.listings.clone())
    }

    async fn fetch_seller_listings(&self, session: &Session) -> Result<SellerListings> {
        let inner = self.inner.read().await;
        let (my_gpus, other_gpus): (Vec<Listing>, Vec<Listing>) = inner.listings.iter().cloned().partition(|listing| {
            listing
                .seller
                .as_ref()
                .is_some_and(|seller| seller.id() == session.user_id)
        });
        Ok(SellerListings {
            my_gpus,
            other_gpus,
        })
    }

    async fn fetch_listing(&self, _session: &Session, listing_id: &str) -> Result<Listing> {
        self.inner
            .read()
            .await
            .listings
            .iter()
            .find(|listing| listing.id == listing_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("상품 {}", listing_id)))
    }

    async fn create_listing(&self, session: &Session, listing: &NewListing) -> Result<()> {
        session.require_role(Role::Seller)?;
        let mut inner = self.inner.write().await;
        let id = inner.next_id("gpu-");
        info!("{:<12} --> 상품 등록 id: {}", "Store", id);
        inner.listings.push(Listing {
            id,
            name: listing.name.clone(),
            description: listing.description.clone(),
            price: listing.price,
            bid_status: BidStatus::Open,
            bids: Vec::new(),
            seller: Some(UserRef::Id(session.user_id.clone())),
        });
        Ok(())
    }

    async fn update_listing(
        &self,
        session: &Session,
        listing_id: &str,
        listing: &NewListing,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let stored = inner.owned_listing_mut(session, listing_id)?;
        stored.name = listing.name.clone();
        stored.description = listing.description.clone();
        stored.price = listing.price;
        Ok(())
    }

    async fn delete_listing(&self, session: &Session, listing_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.owned_listing_mut(session, listing_id)?;
        inner.listings.retain(|listing| listing.id != listing_id);
        Ok(())
    }

    async fn toggle_bid_status(&self, session: &Session, listing_id: &str) -> Result<Listing> {
        let mut inner = self.inner.write().await;
        let listing = inner.owned_listing_mut(session, listing_id)?;
        listing.bid_status = listing.bid_status.toggled();
        Ok(listing.clone())
    }

    async fn place_bid(&self, session: &Session, listing_id: &str, amount: f64) -> Result<()> {
        session.require_role(Role::Buyer)?;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(Error::validation(
                "INVALID_BID_AMOUNT",
                "입찰 금액은 0보다 커야 합니다.",
            ));
        }

        let mut inner = self.inner.write().await;
        let username = inner.username(&session.user_id);
        let listing = inner.listing_mut(listing_id)?;
        if !listing.bid_status.is_open() {
            return Err(Error::BiddingClosed);
        }

        // 입찰은 덧붙이기만 한다 (같은 사용자의 기존 입찰을 대체하지 않음)
        listing.bids.push(Bid {
            bidder: UserRef::User {
                id: session.user_id.clone(),
                username,
            },
            amount,
        });
        Ok(())
    }
}

// endregion: --- In-Memory Listing Store
