//! 이벤트 모델 -- 계측 에이전트가 방출하는 텔레메트리의 기본 단위
//!
//! [`Event`]는 인터포지션 계층이 만들어내는 구조화된 런타임 이벤트이며,
//! [`EventSource`]는 이벤트의 범주(로그 파일, 콘솔, syslog, 메트릭)를 나타냅니다.
//! 범주별 활성화 테이블은 [`CFG_SRC_MAX`] 크기의 고정 배열로 관리됩니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// 이벤트 소스 테이블의 고정 용량
pub const CFG_SRC_MAX: usize = 4;

/// 로그 파일 소스 기본값 (비활성)
pub const DEFAULT_SRC_LOGFILE: u32 = 0;
/// 콘솔 소스 기본값 (비활성)
pub const DEFAULT_SRC_CONSOLE: u32 = 0;
/// syslog 소스 기본값 (비활성)
pub const DEFAULT_SRC_SYSLOG: u32 = 0;
/// 메트릭 소스 기본값 (비활성)
pub const DEFAULT_SRC_METRIC: u32 = 0;

/// 이벤트 소스 -- 텔레메트리의 범주별 출처
///
/// 판별값은 소스 테이블의 인덱스와 일치합니다.
/// 외부에서 들어오는 원시 인덱스는 반드시 [`EventSource::from_index`]로 검증합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum EventSource {
    /// 로그 파일에 기록된 라인
    LogFile = 0,
    /// 콘솔(stdout/stderr) 출력
    Console = 1,
    /// syslog 메시지
    Syslog = 2,
    /// 메트릭
    Metric = 3,
}

impl EventSource {
    /// 모든 소스 (인덱스 순서)
    pub const ALL: [EventSource; CFG_SRC_MAX] =
        [Self::LogFile, Self::Console, Self::Syslog, Self::Metric];

    /// 원시 인덱스를 소스로 변환합니다. 범위를 벗어나면 `None`.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::LogFile),
            1 => Some(Self::Console),
            2 => Some(Self::Syslog),
            3 => Some(Self::Metric),
            _ => None,
        }
    }

    /// 소스 테이블 인덱스
    pub fn index(self) -> usize {
        self as usize
    }

    /// 컴파일 시점 기본값
    pub fn default_value(self) -> u32 {
        match self {
            Self::LogFile => DEFAULT_SRC_LOGFILE,
            Self::Console => DEFAULT_SRC_CONSOLE,
            Self::Syslog => DEFAULT_SRC_SYSLOG,
            Self::Metric => DEFAULT_SRC_METRIC,
        }
    }

    /// 설정/CLI에서 쓰는 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogFile => "logfile",
            Self::Console => "console",
            Self::Syslog => "syslog",
            Self::Metric => "metric",
        }
    }

    /// 문자열에서 소스를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "logfile" | "log_file" | "file" => Some(Self::LogFile),
            "console" => Some(Self::Console),
            "syslog" => Some(Self::Syslog),
            "metric" | "metrics" => Some(Self::Metric),
            _ => None,
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 텔레메트리 이벤트
///
/// 인터포지션 계층이 생성하고 [`Formatter`](crate::format::Formatter)가 텍스트로 렌더링합니다.
/// 페이로드 인코딩은 포매터의 몫이며, 이 타입은 렌더링에 필요한 필드만 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 이벤트 고유 ID (UUID v4)
    pub id: String,
    /// 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트 소스
    pub source: EventSource,
    /// 이벤트 이름 (예: 로그 파일 경로, 메트릭 이름)
    pub name: String,
    /// 본문 (로그 라인, 메트릭 값 등)
    pub data: String,
    /// 추가 필드 (key, value)
    pub fields: Vec<(String, String)>,
}

impl Event {
    /// 새 이벤트를 생성합니다.
    pub fn new(source: EventSource, name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: SystemTime::now(),
            source,
            name: name.into(),
            data: data.into(),
            fields: Vec::new(),
        }
    }

    /// 추가 필드를 붙입니다.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// 필드 값을 조회합니다.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// UNIX epoch 기준 초 단위 타임스탬프 (소수점 포함)
    pub fn unix_timestamp(&self) -> f64 {
        match self.timestamp.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(_) => 0.0,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.source, self.name, self.data)
    }
}
