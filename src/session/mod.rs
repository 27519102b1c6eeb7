/// 세션 관리
/// 토큰을 전역 저장소에 두지 않고, 필요한 곳에 Session 을 명시적으로 넘긴다.
// region:    --- Imports
use crate::bidding::model::Role;
use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

// endregion: --- Imports

// 세션 유효 시간 (발급 후 30분)
pub const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 60;

// region:    --- Session
/// 토큰 payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub iat: i64,
}

/// 로그인한 사용자 세션
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// 토큰의 payload 를 해석해 세션을 만든다.
    /// 서명 검증은 원격 저장소의 몫이다.
    pub fn from_token(token: &str, role: Role) -> Result<Self> {
        let claims = decode_claims(token)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| Error::Unauthorized("토큰 발급 시각이 올바르지 않습니다.".to_string()))?;

        Ok(Self {
            token: token.to_string(),
            user_id: claims.id,
            role: claims.role.unwrap_or(role),
            issued_at,
        })
    }

    /// 역할 확인
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden(format!(
                "{} 전용 기능입니다.",
                role.as_str()
            )))
        }
    }
}

/// 만료 여부 (발급 시각 + 유효 시간 이후)
/// 만료 시각을 표현할 수 없을 만큼 먼 발급 시각은 만료로 본다.
pub fn is_expired(session: &Session, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
    session
        .issued_at
        .checked_add_signed(ttl)
        .map_or(true, |deadline| now > deadline)
}

/// JWT 두 번째 구간(payload) 해석
pub fn decode_claims(token: &str) -> Result<Claims> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| Error::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::Unauthorized(format!("토큰 디코딩 실패: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Unauthorized(format!("토큰 payload 해석 실패: {}", e)))
}

/// 서명 없는 토큰 생성 (메모리 저장소용)
pub fn encode_unsigned_token(claims: &Claims) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    // Claims 직렬화는 실패하지 않는다
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
    format!("{}.{}.", header, payload)
}

// endregion: --- Session

// region:    --- Session Registry
/// 게이트웨이에 로그인된 세션 목록 (토큰 기준)
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: TimeDelta,
}

impl SessionRegistry {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// 세션 등록
    pub async fn insert(&self, session: Session) {
        info!(
            "{:<12} --> 세션 등록 user={}, role={}",
            "Session",
            session.user_id,
            session.role.as_str()
        );
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session);
    }

    /// 세션 제거 (로그아웃)
    pub async fn remove(&self, token: &str) -> Option<Session> {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            info!("{:<12} --> 로그아웃 user={}", "Session", session.user_id);
        }
        removed
    }

    /// 요청 인증: 등록된 세션이면서 만료되지 않아야 한다.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Session> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| Error::Unauthorized("로그인이 필요합니다.".to_string()))?;

        if is_expired(&session, self.ttl, now) {
            self.remove(token).await;
            return Err(Error::Unauthorized("세션이 만료되었습니다.".to_string()));
        }

        debug!("{:<12} --> 인증 성공 user={}", "Session", session.user_id);
        Ok(session)
    }

    /// 만료된 세션을 모두 제거하고 반환
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<Session> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .values()
            .filter(|session| is_expired(session, self.ttl, now))
            .map(|session| session.token.clone())
            .collect();

        expired
            .iter()
            .filter_map(|token| sessions.remove(token))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

// endregion: --- Session Registry
