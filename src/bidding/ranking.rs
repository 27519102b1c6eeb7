/// 입찰 순위 계산
/// 1. 최고 입찰가
/// 2. 사용자 입찰 조회
/// 3. 사용자 기준 상품 분류
/// 4. 상품 목록 분할
// region:    --- Imports
use super::model::{Bid, Listing};

// endregion: --- Imports

// region:    --- Bid Position
/// 조회 사용자 기준 상품의 입찰 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidPosition {
    HighestBidder,
    Outbid,
    NoBid,
}

/// 사용자 기준으로 분할된 상품 목록
/// 각 목록은 입력 순서를 유지한다.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub highest_bid: Vec<&'a Listing>,
    pub user_bid: Vec<&'a Listing>,
    pub no_bid: Vec<&'a Listing>,
}

// endregion: --- Bid Position

// region:    --- Ranking

/// 1. 최고 입찰가 (입찰이 없으면 0)
pub fn compute_highest_bid(listing: &Listing) -> f64 {
    listing
        .bids
        .iter()
        .map(|bid| bid.amount)
        .fold(0.0, f64::max)
}

/// 2. 사용자 입찰 조회
/// 같은 사용자의 입찰이 여러 개면 먼저 들어온 입찰을 반환한다.
pub fn find_user_bid<'a>(listing: &'a Listing, user_id: &str) -> Option<&'a Bid> {
    listing.bids.iter().find(|bid| bid.bidder_id() == user_id)
}

/// 3. 사용자 기준 상품 분류
/// 최고가와 같은 금액이면 다른 입찰자와 동률이어도 최고 입찰자로 본다.
pub fn classify(listing: &Listing, user_id: &str) -> BidPosition {
    let highest = compute_highest_bid(listing);
    match find_user_bid(listing, user_id) {
        None => BidPosition::NoBid,
        Some(bid) if bid.amount == highest => BidPosition::HighestBidder,
        Some(_) => BidPosition::Outbid,
    }
}

/// 4. 상품 목록 분할
pub fn partition<'a, I>(listings: I, user_id: &str) -> Partition<'a>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut partition = Partition::default();
    for listing in listings {
        match classify(listing, user_id) {
            BidPosition::HighestBidder => partition.highest_bid.push(listing),
            BidPosition::Outbid => partition.user_bid.push(listing),
            BidPosition::NoBid => partition.no_bid.push(listing),
        }
    }
    partition
}

// endregion: --- Ranking
