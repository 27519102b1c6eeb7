// region:    --- Imports
use super::model::Listing;
use super::ranking::compute_highest_bid;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

// endregion: --- Imports

// region:    --- Sort Policy
/// 상품 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    #[default]
    None,
    PriceAscending,
    PriceDescending,
    BidAscending,
    BidDescending,
}

impl SortPolicy {
    /// 화면 선택값 해석. 알 수 없는 값은 정렬하지 않음으로 처리
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "priceAsc" => SortPolicy::PriceAscending,
            "priceDesc" => SortPolicy::PriceDescending,
            "bidAsc" => SortPolicy::BidAscending,
            "bidDesc" => SortPolicy::BidDescending,
            _ => SortPolicy::None,
        }
    }
}

impl<'de> Deserialize<'de> for SortPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SortPolicy::parse(&raw))
    }
}

// endregion: --- Sort Policy

// region:    --- Filter & Sort

/// 상품명 검색 후 정렬한 새 목록을 반환한다. 입력 목록은 건드리지 않는다.
pub fn apply<'a, I>(listings: I, query: &str, policy: SortPolicy) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let needle = query.to_lowercase();
    let mut filtered: Vec<&'a Listing> = listings
        .into_iter()
        .filter(|listing| listing.name.to_lowercase().contains(&needle))
        .collect();

    // sort_by 는 안정 정렬
    match policy {
        SortPolicy::None => {}
        SortPolicy::PriceAscending => filtered.sort_by(|a, b| by_price(a, b)),
        SortPolicy::PriceDescending => filtered.sort_by(|a, b| by_price(b, a)),
        SortPolicy::BidAscending => filtered.sort_by(|a, b| by_highest_bid(a, b)),
        SortPolicy::BidDescending => filtered.sort_by(|a, b| by_highest_bid(b, a)),
    }
    filtered
}

fn by_price(a: &Listing, b: &Listing) -> Ordering {
    a.price.total_cmp(&b.price)
}

fn by_highest_bid(a: &Listing, b: &Listing) -> Ordering {
    compute_highest_bid(a).total_cmp(&compute_highest_bid(b))
}

// endregion: --- Filter & Sort
