/// 대시보드 조회 모델
/// 구매자: 최고 입찰 / 입찰(최고 아님) / 미입찰 세 구역
/// 판매자: 내 상품 / 다른 판매자 상품 두 구역
/// 각 구역은 자체 검색어와 정렬 기준을 가진다.
// region:    --- Imports
use crate::bidding::filter_sort::{self, SortPolicy};
use crate::bidding::model::{Listing, SellerListings};
use crate::bidding::ranking::{compute_highest_bid, find_user_bid, partition};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Query Params
/// 구매자 대시보드 구역별 검색/정렬
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuyerDashboardParams {
    #[serde(rename = "highestBid_search")]
    pub highest_bid_search: String,
    #[serde(rename = "highestBid_sort")]
    pub highest_bid_sort: SortPolicy,
    #[serde(rename = "userBid_search")]
    pub user_bid_search: String,
    #[serde(rename = "userBid_sort")]
    pub user_bid_sort: SortPolicy,
    #[serde(rename = "noBid_search")]
    pub no_bid_search: String,
    #[serde(rename = "noBid_sort")]
    pub no_bid_sort: SortPolicy,
}

/// 판매자 대시보드 구역별 검색/정렬
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SellerDashboardParams {
    #[serde(rename = "myGPUs_search")]
    pub my_gpus_search: String,
    #[serde(rename = "myGPUs_sort")]
    pub my_gpus_sort: SortPolicy,
    #[serde(rename = "otherGPUs_search")]
    pub other_gpus_search: String,
    #[serde(rename = "otherGPUs_sort")]
    pub other_gpus_sort: SortPolicy,
}

// endregion: --- Query Params

// region:    --- Views
/// 화면 카드: 상품 + 최고 입찰가 (+ 내 입찰가)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard<'a> {
    #[serde(flatten)]
    pub listing: &'a Listing,
    pub highest_bid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_bid: Option<f64>,
    pub can_bid: bool,
}

impl<'a> ListingCard<'a> {
    pub fn new(listing: &'a Listing, viewer_id: Option<&str>) -> Self {
        Self {
            listing,
            highest_bid: compute_highest_bid(listing),
            your_bid: viewer_id
                .and_then(|user_id| find_user_bid(listing, user_id))
                .map(|bid| bid.amount),
            can_bid: listing.bid_status.is_open(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDashboard<'a> {
    pub highest_bid: Vec<ListingCard<'a>>,
    pub user_bid: Vec<ListingCard<'a>>,
    pub no_bid: Vec<ListingCard<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SellerDashboard<'a> {
    #[serde(rename = "myGPUs")]
    pub my_gpus: Vec<ListingCard<'a>>,
    #[serde(rename = "otherGPUs")]
    pub other_gpus: Vec<ListingCard<'a>>,
}

// endregion: --- Views

// region:    --- Builders

/// 구매자 대시보드: 사용자 기준 분할 후 구역별 검색/정렬
pub fn buyer_dashboard<'a>(
    listings: &'a [Listing],
    user_id: &str,
    params: &BuyerDashboardParams,
) -> BuyerDashboard<'a> {
    let split = partition(listings, user_id);
    let section = |listings: Vec<&'a Listing>, search: &str, sort: SortPolicy| {
        filter_sort::apply(listings, search, sort)
            .into_iter()
            .map(|listing| ListingCard::new(listing, Some(user_id)))
            .collect::<Vec<_>>()
    };

    BuyerDashboard {
        highest_bid: section(
            split.highest_bid,
            &params.highest_bid_search,
            params.highest_bid_sort,
        ),
        user_bid: section(
            split.user_bid,
            &params.user_bid_search,
            params.user_bid_sort,
        ),
        no_bid: section(split.no_bid, &params.no_bid_search, params.no_bid_sort),
    }
}

/// 판매자 대시보드: 내 상품 / 다른 판매자 상품 구역별 검색/정렬
pub fn seller_dashboard<'a>(
    listings: &'a SellerListings,
    params: &SellerDashboardParams,
) -> SellerDashboard<'a> {
    let section = |listings: &'a [Listing], search: &str, sort: SortPolicy| {
        filter_sort::apply(listings, search, sort)
            .into_iter()
            .map(|listing| ListingCard::new(listing, None))
            .collect::<Vec<_>>()
    };

    SellerDashboard {
        my_gpus: section(
            listings.my_gpus.as_slice(),
            &params.my_gpus_search,
            params.my_gpus_sort,
        ),
        other_gpus: section(
            listings.other_gpus.as_slice(),
            &params.other_gpus_search,
            params.other_gpus_sort,
        ),
    }
}

// endregion: --- Builders
