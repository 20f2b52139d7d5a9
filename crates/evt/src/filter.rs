//! 로그 파일 필터
//!
//! 파일 경로(또는 로그 라인)가 로그 파일 이벤트 대상인지 판단하는 정규식 하나를 감쌉니다.
//! 매칭은 위치 고정 없이 문자열 어디서든 일치하면 참입니다.
//!
//! 라우터가 없을 때 쓰는 프로세스 전역 기본 필터는 [`default_log_file_filter`]로 얻습니다.

use std::sync::{Arc, Mutex, PoisonError};

use metrics::counter;
use regex::Regex;
use tapline_core::metrics as m;
use tracing::{debug, warn};

use crate::error::FilterError;

/// 내장 기본 패턴. 초기 상태이자 대체 대상입니다.
pub const DEFAULT_LOG_FILE_FILTER: &str = ".*log.*";

/// 컴파일된 로그 파일 필터
#[derive(Debug, Clone)]
pub struct LogFileFilter {
    regex: Regex,
}

impl LogFileFilter {
    /// 패턴을 컴파일합니다.
    pub fn compile(pattern: &str) -> Result<Self, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::Compile {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// 기본 패턴으로 컴파일합니다.
    pub fn default_filter() -> Result<Self, FilterError> {
        Self::compile(DEFAULT_LOG_FILE_FILTER)
    }

    /// 패턴을 컴파일하되, 비어 있거나 잘못된 패턴이면 기본 패턴을 사용합니다.
    ///
    /// 기본 패턴마저 실패한 경우에만 에러를 반환합니다.
    pub fn with_fallback(pattern: Option<&str>) -> Result<Self, FilterError> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => p,
            _ => return Self::default_filter(),
        };

        match Self::compile(pattern) {
            Ok(filter) => Ok(filter),
            Err(e) => {
                warn!(error = %e, fallback = DEFAULT_LOG_FILE_FILTER, "invalid log file filter, using default");
                counter!(m::EVT_FILTER_FALLBACKS_TOTAL).increment(1);
                Self::default_filter()
            }
        }
    }

    /// 문자열의 어느 부분이든 패턴과 일치하면 `true`
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// 컴파일된 패턴 원문
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// 기본 패턴인지 여부
    pub fn is_default(&self) -> bool {
        self.pattern() == DEFAULT_LOG_FILE_FILTER
    }
}

enum DefaultFilter {
    Uninit,
    Ready(Arc<LogFileFilter>),
    Failed,
}

static DEFAULT_FILTER: Mutex<DefaultFilter> = Mutex::new(DefaultFilter::Uninit);

/// 프로세스 전역 기본 필터를 반환합니다.
///
/// 처음 호출될 때 한 번만 컴파일합니다. 컴파일에 실패했다면 이후 호출도 `None`입니다.
pub fn default_log_file_filter() -> Option<Arc<LogFileFilter>> {
    let mut state = DEFAULT_FILTER.lock().unwrap_or_else(PoisonError::into_inner);
    match &*state {
        DefaultFilter::Ready(filter) => Some(Arc::clone(filter)),
        DefaultFilter::Failed => None,
        DefaultFilter::Uninit => match LogFileFilter::default_filter() {
            Ok(filter) => {
                debug!("default log file filter compiled");
                let filter = Arc::new(filter);
                *state = DefaultFilter::Ready(Arc::clone(&filter));
                Some(filter)
            }
            Err(e) => {
                warn!(error = %e, "default log file filter failed to compile");
                *state = DefaultFilter::Failed;
                None
            }
        },
    }
}

/// 전역 기본 필터를 초기 상태로 되돌립니다. 다음 조회 때 다시 컴파일합니다.
pub fn reset_default_log_file_filter() {
    let mut state = DEFAULT_FILTER.lock().unwrap_or_else(PoisonError::into_inner);
    *state = DefaultFilter::Uninit;
}
