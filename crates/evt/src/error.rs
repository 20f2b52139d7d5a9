//! 이벤트 라우터 에러 타입
//!
//! [`EvtError`]는 라우터 연산의 에러, [`FilterError`]는 로그 파일 필터 컴파일 에러입니다.
//! 둘 다 `TaplineError`로 변환됩니다.

use tapline_core::error::{ConfigError, RouterError, TaplineError};
use tapline_transport::TransportError;

/// 이벤트 라우터 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EvtError {
    /// 라우터, 메시지, 이벤트 또는 렌더링 결과가 없음
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 메모리 할당 실패
    ///
    /// Rust의 전역 할당자는 실패 시 프로세스를 중단하므로 현재는 생성되지 않습니다.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// 설치된 transport가 없음
    #[error("no transport installed")]
    NoTransport,

    /// 필터 컴파일 실패
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// transport 에러
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// 로그 파일 필터 에러
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// 정규식 컴파일 실패
    #[error("failed to compile log file filter '{pattern}': {source}")]
    Compile {
        /// 컴파일하려던 패턴
        pattern: String,
        /// 원인 에러
        #[source]
        source: regex::Error,
    },
}

impl From<FilterError> for TaplineError {
    fn from(err: FilterError) -> Self {
        TaplineError::Config(ConfigError::InvalidValue {
            field: "filter.log_file".to_owned(),
            reason: err.to_string(),
        })
    }
}

impl From<EvtError> for TaplineError {
    fn from(err: EvtError) -> Self {
        match err {
            EvtError::Transport(e) => e.into(),
            EvtError::Filter(e) => TaplineError::Router(RouterError::InitFailed(e.to_string())),
            EvtError::Allocation(_) => TaplineError::Router(RouterError::InitFailed(err.to_string())),
            EvtError::InvalidArgument(_) | EvtError::NoTransport => {
                TaplineError::Router(RouterError::EmitFailed(err.to_string()))
            }
        }
    }
}
