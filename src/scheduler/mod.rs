/// 세션 만료 감시 스케줄러
/// 주기적으로 등록된 세션의 만료 여부를 확인하고, 만료된 세션은 로그아웃 처리한다.
/// 만료 판정 자체는 session::is_expired 가 담당한다.
// region:    --- Imports
use crate::session::SessionRegistry;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Session Watcher
/// 세션 만료 감시 스케줄러
pub struct SessionWatcher {
    registry: SessionRegistry,
    period: Duration,
}

impl SessionWatcher {
    /// 세션 만료 감시 스케줄러 생성
    pub fn new(registry: SessionRegistry, period: Duration) -> Self {
        Self { registry, period }
    }

    /// 세션 만료 감시 시작
    pub fn start(&self) -> JoinHandle<()> {
        let registry = self.registry.clone();
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                Self::expire_sessions(&registry).await;
            }
        })
    }

    /// 만료 세션 로그아웃, 로그아웃된 세션 수 반환
    pub async fn expire_sessions(registry: &SessionRegistry) -> usize {
        let expired = registry.sweep_expired(Utc::now()).await;
        for session in &expired {
            info!(
                "{:<12} --> 세션 만료로 로그아웃 user={}",
                "Scheduler", session.user_id
            );
        }
        debug!(
            "{:<12} --> 세션 만료 확인 완료: 만료 {}건",
            "Scheduler",
            expired.len()
        );
        expired.len()
    }
}
// endregion: --- Session Watcher
