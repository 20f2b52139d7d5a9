//! 설정 관리 -- tapline.toml 파싱 및 런타임 설정
//!
//! [`TaplineConfig`]는 전송, 필터, 소스 테이블, 포매터 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`TAPLINE_TRANSPORT_KIND=udp` 형식)
//! 2. 설정 파일 (`tapline.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), tapline_core::error::TaplineError> {
//! use tapline_core::config::TaplineConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TaplineConfig::load("tapline.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TaplineConfig::parse("[transport]\nkind = \"syslog\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, TaplineError};
use crate::event::{
    DEFAULT_SRC_CONSOLE, DEFAULT_SRC_LOGFILE, DEFAULT_SRC_METRIC, DEFAULT_SRC_SYSLOG, EventSource,
};

/// 지원하는 전송 종류
pub const TRANSPORT_KINDS: &[&str] = &["udp", "file", "unix", "syslog", "shm", "none"];

/// 지원하는 포매터 종류
pub const FORMAT_KINDS: &[&str] = &["json", "line"];

/// Tapline 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaplineConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 전송 설정
    #[serde(default)]
    pub transport: TransportConfig,
    /// 로그 파일 필터 설정
    #[serde(default)]
    pub filter: FilterConfig,
    /// 이벤트 소스 활성화 테이블
    #[serde(default)]
    pub sources: SourcesConfig,
    /// 포매터 설정
    #[serde(default)]
    pub format: FormatConfig,
}

impl TaplineConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaplineError> {
        let mut config = Self::read(path.as_ref())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TaplineError> {
        let config = Self::read(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, TaplineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaplineError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TaplineError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TaplineError> {
        toml::from_str(toml_str).map_err(|e| {
            TaplineError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TAPLINE_{SECTION}_{FIELD}`
    /// 예: `TAPLINE_TRANSPORT_HOST=10.0.0.5`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TAPLINE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TAPLINE_GENERAL_LOG_FORMAT");

        // Transport
        override_string(&mut self.transport.kind, "TAPLINE_TRANSPORT_KIND");
        override_string(&mut self.transport.host, "TAPLINE_TRANSPORT_HOST");
        override_string(&mut self.transport.port, "TAPLINE_TRANSPORT_PORT");
        override_string(&mut self.transport.path, "TAPLINE_TRANSPORT_PATH");

        // Filter
        override_string(&mut self.filter.log_file, "TAPLINE_FILTER_LOG_FILE");

        // Sources
        override_u32(&mut self.sources.logfile, "TAPLINE_SOURCES_LOGFILE");
        override_u32(&mut self.sources.console, "TAPLINE_SOURCES_CONSOLE");
        override_u32(&mut self.sources.syslog, "TAPLINE_SOURCES_SYSLOG");
        override_u32(&mut self.sources.metric, "TAPLINE_SOURCES_METRIC");

        // Format
        override_string(&mut self.format.kind, "TAPLINE_FORMAT_KIND");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 필터 패턴은 검증하지 않습니다. 잘못된 패턴은 적용 시점에 기본 패턴으로 대체됩니다.
    pub fn validate(&self) -> Result<(), TaplineError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if !TRANSPORT_KINDS.contains(&self.transport.kind.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "transport.kind".to_owned(),
                reason: format!("must be one of: {}", TRANSPORT_KINDS.join(", ")),
            }
            .into());
        }

        match self.transport.kind.as_str() {
            "udp" => {
                if self.transport.host.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "transport.host".to_owned(),
                        reason: "host must not be empty for udp transport".to_owned(),
                    }
                    .into());
                }
                if self.transport.port.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "transport.port".to_owned(),
                        reason: "port must not be empty for udp transport".to_owned(),
                    }
                    .into());
                }
            }
            "file" | "unix" => {
                if self.transport.path.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "transport.path".to_owned(),
                        reason: format!(
                            "path must not be empty for {} transport",
                            self.transport.kind
                        ),
                    }
                    .into());
                }
            }
            _ => {}
        }

        if !FORMAT_KINDS.contains(&self.format.kind.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format.kind".to_owned(),
                reason: format!("must be one of: {}", FORMAT_KINDS.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 전송 설정
///
/// `kind`에 따라 사용하는 필드가 다릅니다.
/// - `udp`: `host`, `port`
/// - `file`, `unix`: `path`
/// - `syslog`, `shm`, `none`: 없음
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// 전송 종류 (udp, file, unix, syslog, shm, none)
    pub kind: String,
    /// UDP 대상 호스트 (숫자/심볼릭, IPv4/IPv6)
    pub host: String,
    /// UDP 대상 포트 (숫자 또는 서비스 이름)
    pub port: String,
    /// 파일 또는 Unix 소켓 경로
    pub path: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: "udp".to_owned(),
            host: "127.0.0.1".to_owned(),
            port: "8125".to_owned(),
            path: String::new(),
        }
    }
}

/// 로그 파일 필터 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 로그 파일 판별 패턴 (확장 정규식). 비어 있으면 기본 패턴.
    pub log_file: String,
}

/// 이벤트 소스 활성화 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// 로그 파일 소스
    pub logfile: u32,
    /// 콘솔 소스
    pub console: u32,
    /// syslog 소스
    pub syslog: u32,
    /// 메트릭 소스
    pub metric: u32,
}

impl SourcesConfig {
    /// 소스별 설정값을 반환합니다.
    pub fn value(&self, src: EventSource) -> u32 {
        match src {
            EventSource::LogFile => self.logfile,
            EventSource::Console => self.console,
            EventSource::Syslog => self.syslog,
            EventSource::Metric => self.metric,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            logfile: DEFAULT_SRC_LOGFILE,
            console: DEFAULT_SRC_CONSOLE,
            syslog: DEFAULT_SRC_SYSLOG,
            metric: DEFAULT_SRC_METRIC,
        }
    }
}

/// 포매터 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// 포매터 종류 (json, line)
    pub kind: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            kind: "json".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = TaplineConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.transport.kind, "udp");
        assert_eq!(config.transport.port, "8125");
        assert!(config.filter.log_file.is_empty());
        assert_eq!(config.format.kind, "json");
        assert_eq!(config.sources.logfile, DEFAULT_SRC_LOGFILE);
    }

    #[test]
    fn default_config_passes_validation() {
        TaplineConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = TaplineConfig::parse("").unwrap();
        assert_eq!(config.transport.host, "127.0.0.1");
        assert_eq!(config.format.kind, "json");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[transport]
kind = "file"
path = "/tmp/tapline.log"

[sources]
metric = 1
"#;
        let config = TaplineConfig::parse(toml).unwrap();
        assert_eq!(config.transport.kind, "file");
        assert_eq!(config.transport.path, "/tmp/tapline.log");
        // host는 기본값 유지
        assert_eq!(config.transport.host, "127.0.0.1");
        assert_eq!(config.sources.metric, 1);
        assert_eq!(config.sources.console, DEFAULT_SRC_CONSOLE);
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = TaplineConfig::parse("kind = [[[").unwrap_err();
        assert!(matches!(
            err,
            TaplineError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_transport_kind() {
        let mut config = TaplineConfig::default();
        config.transport.kind = "carrier-pigeon".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transport.kind"));
    }

    #[test]
    fn validate_rejects_udp_without_port() {
        let mut config = TaplineConfig::default();
        config.transport.port = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transport.port"));
    }

    #[test]
    fn validate_rejects_file_without_path() {
        let mut config = TaplineConfig::default();
        config.transport.kind = "file".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transport.path"));
    }

    #[test]
    fn validate_accepts_syslog_without_arguments() {
        let mut config = TaplineConfig::default();
        config.transport.kind = "syslog".to_owned();
        config.transport.host = String::new();
        config.transport.port = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = TaplineConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_unknown_format() {
        let mut config = TaplineConfig::default();
        config.format.kind = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("format.kind"));
    }

    #[test]
    fn sources_value_by_enum() {
        let sources = SourcesConfig {
            logfile: 1,
            console: 2,
            syslog: 3,
            metric: 4,
        };
        assert_eq!(sources.value(EventSource::LogFile), 1);
        assert_eq!(sources.value(EventSource::Metric), 4);
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 고유한 변수명을 사용하며 다른 테스트와 공유하지 않습니다.
        unsafe { std::env::set_var("TEST_TAPLINE_STR", "overridden") };
        override_string(&mut val, "TEST_TAPLINE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_TAPLINE_STR") };
    }

    #[test]
    fn env_override_u32_invalid_keeps_original() {
        let mut val = 3;
        // SAFETY: 고유한 변수명을 사용하며 다른 테스트와 공유하지 않습니다.
        unsafe { std::env::set_var("TEST_TAPLINE_U32_BAD", "lots") };
        override_u32(&mut val, "TEST_TAPLINE_U32_BAD");
        assert_eq!(val, 3);
        unsafe { std::env::remove_var("TEST_TAPLINE_U32_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_TAPLINE_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = TaplineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = TaplineConfig::parse(&toml_str).unwrap();
        assert_eq!(config.transport.kind, parsed.transport.kind);
        assert_eq!(config.sources.metric, parsed.sources.metric);
    }

    #[test]
    fn from_file_not_found() {
        let err = TaplineConfig::from_file("/nonexistent/path/tapline.toml").unwrap_err();
        assert!(matches!(
            err,
            TaplineError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tapline.toml");
        std::fs::write(&path, "[transport]\nkind = \"shm\"\n").unwrap();
        let config = TaplineConfig::from_file(&path).unwrap();
        assert_eq!(config.transport.kind, "shm");
    }
}
