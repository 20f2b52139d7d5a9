//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 전역 레코더가 설치되지 않은 경우 기록은 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `tapline_`
//! - 모듈명: `transport_`, `evt_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(tapline_core::metrics::TRANSPORT_MESSAGES_SENT_TOTAL,
//!     tapline_core::metrics::LABEL_TRANSPORT => "udp").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 전송 종류 레이블 키 (udp, file, unix, syslog, shm)
pub const LABEL_TRANSPORT: &str = "transport";

/// 이벤트 소스 레이블 키 (logfile, console, syslog, metric)
pub const LABEL_SOURCE: &str = "source";

// ─── Transport 메트릭 ──────────────────────────────────────────────

/// Transport: 전송 성공 메시지 수 (counter, label: transport)
pub const TRANSPORT_MESSAGES_SENT_TOTAL: &str = "tapline_transport_messages_sent_total";

/// Transport: 전송 실패 수 (counter, label: transport)
pub const TRANSPORT_SEND_FAILURES_TOTAL: &str = "tapline_transport_send_failures_total";

/// Transport: 전송 바이트 수 (counter, label: transport)
pub const TRANSPORT_BYTES_SENT_TOTAL: &str = "tapline_transport_bytes_sent_total";

// ─── Evt 메트릭 ────────────────────────────────────────────────────

/// Evt: 렌더링된 이벤트 수 (counter, label: source)
pub const EVT_EVENTS_RENDERED_TOTAL: &str = "tapline_evt_events_rendered_total";

/// Evt: 렌더링 실패 수 (counter, label: source)
pub const EVT_RENDER_FAILURES_TOTAL: &str = "tapline_evt_render_failures_total";

/// Evt: 필터 패턴이 기본값으로 대체된 횟수 (counter)
pub const EVT_FILTER_FALLBACKS_TOTAL: &str = "tapline_evt_filter_fallbacks_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        TRANSPORT_MESSAGES_SENT_TOTAL,
        "Total number of messages delivered to a sink"
    );
    describe_counter!(
        TRANSPORT_SEND_FAILURES_TOTAL,
        "Total number of sink send failures"
    );
    describe_counter!(
        TRANSPORT_BYTES_SENT_TOTAL,
        "Total payload bytes delivered to a sink"
    );
    describe_counter!(
        EVT_EVENTS_RENDERED_TOTAL,
        "Total number of events rendered by the installed formatter"
    );
    describe_counter!(
        EVT_RENDER_FAILURES_TOTAL,
        "Total number of events the formatter could not render"
    );
    describe_counter!(
        EVT_FILTER_FALLBACKS_TOTAL,
        "Total number of log file filter patterns replaced by the default"
    );
}
