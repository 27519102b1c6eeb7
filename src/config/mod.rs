// region:    --- Imports
use crate::error::{Error, Result};
use crate::session::DEFAULT_SESSION_TTL_SECS;
use chrono::TimeDelta;
use std::str::FromStr;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Config
/// 환경 변수 기반 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 원격 상품 저장소 주소
    pub api_url: String,
    pub bind_addr: String,
    pub session_ttl: TimeDelta,
    /// 세션 만료 확인 주기
    pub session_check_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 구성 (테스트에서 환경 변수 대신 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("MARKETPLACE_API_URL")
            .unwrap_or_else(|| "http://localhost:5000".to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let ttl_secs: i64 = parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        let check_secs: u64 = parse_or(&lookup, "SESSION_CHECK_INTERVAL_SECS", 5 * 60)?;
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;

        if ttl_secs <= 0 {
            return Err(Error::Config(
                "SESSION_TTL_SECS 는 0보다 커야 합니다.".to_string(),
            ));
        }
        let session_ttl = TimeDelta::try_seconds(ttl_secs).ok_or_else(|| {
            Error::Config(format!("SESSION_TTL_SECS 값 {} 이 너무 큽니다.", ttl_secs))
        })?;
        if check_secs == 0 {
            return Err(Error::Config(
                "SESSION_CHECK_INTERVAL_SECS 는 0보다 커야 합니다.".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            bind_addr,
            session_ttl,
            session_check_interval: Duration::from_secs(check_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} 값 '{}' 해석 실패: {}", key, raw, e))),
    }
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.session_ttl, TimeDelta::minutes(30));
        assert_eq!(config.session_check_interval, Duration::from_secs(300));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            ("MARKETPLACE_API_URL", "https://gpus.example"),
            ("SESSION_TTL_SECS", "60"),
            ("SESSION_CHECK_INTERVAL_SECS", " 5 "),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://gpus.example");
        assert_eq!(config.session_ttl, TimeDelta::seconds(60));
        assert_eq!(config.session_check_interval, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = config_from(&[("SESSION_TTL_SECS", "soon")]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        let err = config_from(&[("SESSION_CHECK_INTERVAL_SECS", "0")]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn oversized_ttl_is_config_error() {
        let huge = i64::MAX.to_string();
        let err = config_from(&[("SESSION_TTL_SECS", huge.as_str())]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        // 표현 가능한 최대치 근처는 허용
        let config = config_from(&[("SESSION_TTL_SECS", "9000000000000000")]).unwrap();
        assert_eq!(config.session_ttl.num_seconds(), 9_000_000_000_000_000);
    }
}
