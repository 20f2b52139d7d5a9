//! 에러 타입 -- 도메인별 에러 정의

/// Tapline 최상위 에러 타입
///
/// 각 크레이트의 도메인 에러(`TransportError`, `EvtError` 등)는
/// `From` 구현을 통해 이 타입으로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum TaplineError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 전송(sink) 관련 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// 이벤트 라우터 에러
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 전송 계층 에러 요약
///
/// `tapline-transport`의 세부 에러가 상위로 전파될 때 사용됩니다.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 전송 생성(연결/열기) 실패
    #[error("sink init failed: {0}")]
    InitFailed(String),

    /// 전송 실패
    #[error("sink send failed: {0}")]
    SendFailed(String),
}

/// 이벤트 라우터 에러 요약
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// 라우터 초기화 실패
    #[error("router init failed: {0}")]
    InitFailed(String),

    /// 이벤트 방출 실패
    #[error("emit failed: {0}")]
    EmitFailed(String),
}
