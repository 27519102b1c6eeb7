// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::warn;

// endregion: --- Imports

// region:    --- Error
/// 게이트웨이 오류
/// 순위 계산/필터는 오류를 내지 않으며, 외부 협력자(저장소, 세션, 설정)의 실패만 여기로 모인다.
#[derive(Debug, Error)]
pub enum Error {
    #[error("인증이 필요합니다: {0}")]
    Unauthorized(String),

    #[error("권한이 없습니다: {0}")]
    Forbidden(String),

    #[error("찾을 수 없습니다: {0}")]
    NotFound(String),

    #[error("{message}")]
    Validation { code: &'static str, message: String },

    #[error("입찰이 마감된 상품입니다.")]
    BiddingClosed,

    #[error("원격 저장소 오류({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("원격 저장소 통신 실패: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("설정 오류: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            code,
            message: message.into(),
        }
    }

    /// 응답 본문의 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Validation { code, .. } => *code,
            Error::BiddingClosed => "BIDDING_CLOSED",
            Error::Remote { .. } => "REMOTE_ERROR",
            Error::Transport(_) => "TRANSPORT_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::BiddingClosed => StatusCode::CONFLICT,
            // 원격 저장소의 4xx 는 그대로 전달
            Error::Remote { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|status| status.is_client_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("{:<12} --> 요청 처리 실패: {}", "Error", self);
        }
        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

// endregion: --- Error
