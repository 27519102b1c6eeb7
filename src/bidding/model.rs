use serde::{Deserialize, Deserializer, Serialize};

// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    /// "buyer" / "seller" 문자열 해석 (대소문자 무시)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// 사용자 참조
/// 원격 저장소는 id 문자열 또는 populate 된 사용자 객체를 내려준다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    User {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::User { id, .. } => id,
        }
    }
}

// 입찰 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BidStatus {
    #[default]
    Open,
    Closed,
}

impl BidStatus {
    pub fn is_open(self) -> bool {
        self == BidStatus::Open
    }

    pub fn toggled(self) -> Self {
        match self {
            BidStatus::Open => BidStatus::Closed,
            BidStatus::Closed => BidStatus::Open,
        }
    }
}

// 판매자 화면은 "Open", 구매자 화면은 "closed" 로 비교하므로 대소문자를 무시한다.
impl<'de> Deserialize<'de> for BidStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().eq_ignore_ascii_case("closed") {
            Ok(BidStatus::Closed)
        } else {
            Ok(BidStatus::Open)
        }
    }
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(rename = "userId")]
    pub bidder: UserRef,
    pub amount: f64,
}

impl Bid {
    pub fn bidder_id(&self) -> &str {
        self.bidder.id()
    }
}

// GPU 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(rename = "bidStatus", default)]
    pub bid_status: BidStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bids: Vec<Bid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<UserRef>,
}

/// 입찰 목록이 없거나 null 이면 빈 목록으로 취급
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Bid>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Bid>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 판매자 화면용 상품 목록 (내 상품 / 다른 판매자 상품)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellerListings {
    #[serde(rename = "myGPUs", default)]
    pub my_gpus: Vec<Listing>,
    #[serde(rename = "otherGPUs", default)]
    pub other_gpus: Vec<Listing>,
}

/// 상품 등록/수정 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

/// 회원가입 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    Role::Buyer.as_str().to_string()
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}
