//! 이벤트 라우터
//!
//! [`EventRouter`]는 transport, 포매터, 로그 파일 필터, 소스 테이블을 하나로 묶은
//! 호출 측의 유일한 진입점입니다. 이벤트 → 포매터 렌더링 → transport 전송 순서로 흐릅니다.
//!
//! # 동시성
//!
//! 모든 연산은 `&self`로 동작하므로 `Arc<EventRouter>`로 여러 스레드에서 공유할 수 있습니다.
//! 전송은 읽기 잠금을 쥔 채 sink를 호출하고, 교체는 쓰기 잠금을 교체 순간에만 잡습니다.
//! 진행 중인 전송은 이전 인스턴스로 끝나며, 이전 인스턴스는 잠금을 놓은 뒤 해제됩니다.
//! 다른 호출자의 패닉으로 잠금이 오염되어도 그대로 복구해 계속 동작합니다.
//!
//! # 널 안전 함수
//!
//! 모듈 수준의 [`send`], [`send_event`], [`flush`] 등은 라우터가 없는 경우(`None`)를 받아
//! 에러 결과나 내장 기본값으로 처리합니다.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use metrics::counter;
use tapline_core::config::{FormatConfig, TaplineConfig};
use tapline_core::event::{Event, EventSource};
use tapline_core::format::{Formatter, JsonFormatter, LineFormatter};
use tapline_core::metrics as m;
use tapline_transport::{Transport, TransportKind};
use tracing::{debug, warn};

use crate::error::EvtError;
use crate::filter::{self, LogFileFilter};
use crate::source::{self, SourceTable};

fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// `[format]` 설정 섹션으로 포매터를 생성합니다.
pub fn formatter_from_config(config: &FormatConfig) -> Result<Box<dyn Formatter>, EvtError> {
    match config.kind.to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonFormatter::new())),
        "line" => Ok(Box::new(LineFormatter::new())),
        other => Err(EvtError::InvalidArgument(format!(
            "unknown format kind '{other}'"
        ))),
    }
}

/// 이벤트 라우터
pub struct EventRouter {
    transport: RwLock<Option<Transport>>,
    formatter: RwLock<Option<Box<dyn Formatter>>>,
    filter: RwLock<Arc<LogFileFilter>>,
    sources: RwLock<SourceTable>,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("transport", &self.transport_kind())
            .field(
                "formatter",
                &read(&self.formatter).as_ref().map(|fmt| fmt.name().to_owned()),
            )
            .field("filter", &read(&self.filter).pattern())
            .field("sources", &*read(&self.sources))
            .finish()
    }
}

impl EventRouter {
    /// transport와 포매터 없이, 기본 필터와 기본 소스 값으로 라우터를 생성합니다.
    ///
    /// 기본 필터를 컴파일할 수 없으면 에러를 반환합니다.
    pub fn new() -> Result<Self, EvtError> {
        let filter = LogFileFilter::default_filter()?;
        debug!("event router created");
        Ok(Self {
            transport: RwLock::new(None),
            formatter: RwLock::new(None),
            filter: RwLock::new(Arc::new(filter)),
            sources: RwLock::new(SourceTable::new()),
        })
    }

    /// 설정으로 transport, 포매터, 필터, 소스 값을 모두 채운 라우터를 생성합니다.
    pub fn from_config(config: &TaplineConfig) -> Result<Self, EvtError> {
        let transport = Transport::from_config(&config.transport)?;
        let formatter = formatter_from_config(&config.format)?;
        let filter = LogFileFilter::with_fallback(Some(config.filter.log_file.as_str()))?;

        let router = Self {
            transport: RwLock::new(transport),
            formatter: RwLock::new(Some(formatter)),
            filter: RwLock::new(Arc::new(filter)),
            sources: RwLock::new(SourceTable::from_config(&config.sources)),
        };
        debug!(router = ?router, "event router created from config");
        Ok(router)
    }

    /// 텍스트를 설치된 transport로 전송합니다.
    ///
    /// transport가 없으면 [`EvtError::NoTransport`]를 반환합니다.
    pub fn send(&self, msg: &str) -> Result<usize, EvtError> {
        let transport = read(&self.transport);
        let transport = transport.as_ref().ok_or(EvtError::NoTransport)?;
        Ok(transport.send(msg)?)
    }

    /// 이벤트를 포매터로 렌더링한 뒤 전송합니다.
    ///
    /// 포매터가 없거나 렌더링 결과가 없으면 [`EvtError::InvalidArgument`]입니다.
    pub fn send_event(&self, event: &Event) -> Result<usize, EvtError> {
        let rendered = {
            let formatter = read(&self.formatter);
            let formatter = formatter
                .as_ref()
                .ok_or_else(|| EvtError::InvalidArgument("no formatter installed".to_owned()))?;
            formatter.render(event)
        };

        let source = event.source.as_str();
        let Some(text) = rendered else {
            counter!(m::EVT_RENDER_FAILURES_TOTAL, m::LABEL_SOURCE => source).increment(1);
            return Err(EvtError::InvalidArgument(format!(
                "formatter produced no output for event '{}'",
                event.name
            )));
        };
        counter!(m::EVT_EVENTS_RENDERED_TOTAL, m::LABEL_SOURCE => source).increment(1);

        self.send(&text)
    }

    /// transport의 버퍼를 내립니다. transport가 없으면 아무 동작도 하지 않습니다.
    pub fn flush(&self) -> Result<(), EvtError> {
        Ok(tapline_transport::flush(read(&self.transport).as_ref())?)
    }

    /// 현재 로그 파일 필터
    pub fn log_file_filter(&self) -> Arc<LogFileFilter> {
        Arc::clone(&read(&self.filter))
    }

    /// 라인이 로그 파일 필터와 일치하는지 확인합니다.
    pub fn is_log_file(&self, line: &str) -> bool {
        read(&self.filter).is_match(line)
    }

    /// 소스 값
    pub fn source(&self, src: EventSource) -> u32 {
        read(&self.sources).get(src)
    }

    /// 원시 인덱스로 소스 값을 조회합니다. 범위를 벗어나면 LOGFILE 기본값입니다.
    pub fn source_by_index(&self, index: u32) -> u32 {
        read(&self.sources).get_by_index(index)
    }

    /// 소스 값이 0이 아니면 활성화 상태입니다.
    pub fn is_enabled(&self, src: EventSource) -> bool {
        self.source(src) != 0
    }

    /// transport를 교체합니다. 이전 transport는 해제됩니다.
    pub fn set_transport(&self, transport: Option<Transport>) {
        let kind = transport.as_ref().map(Transport::kind);
        let old = std::mem::replace(&mut *write(&self.transport), transport);
        debug!(
            old = ?old.as_ref().map(Transport::kind),
            new = ?kind,
            "transport replaced"
        );
        drop(old);
    }

    /// 포매터를 교체합니다. 이전 포매터는 해제됩니다.
    pub fn set_formatter(&self, formatter: Option<Box<dyn Formatter>>) {
        let name = formatter.as_ref().map(|f| f.name().to_owned());
        let old = std::mem::replace(&mut *write(&self.formatter), formatter);
        debug!(new = ?name, replaced = old.is_some(), "formatter replaced");
        drop(old);
    }

    /// 로그 파일 필터를 교체합니다.
    ///
    /// 비어 있거나 없는 패턴은 기본 패턴, 잘못된 패턴은 기본 패턴으로 대체합니다.
    /// 기본 패턴마저 실패하면 기존 필터를 유지하고 에러를 반환합니다.
    pub fn set_log_file_filter(&self, pattern: Option<&str>) -> Result<(), EvtError> {
        let filter = match LogFileFilter::with_fallback(pattern) {
            Ok(filter) => Arc::new(filter),
            Err(e) => {
                warn!(error = %e, "keeping previous log file filter");
                return Err(e.into());
            }
        };
        debug!(pattern = filter.pattern(), "log file filter replaced");
        let old = std::mem::replace(&mut *write(&self.filter), filter);
        drop(old);
        Ok(())
    }

    /// 소스 값을 설정합니다.
    pub fn set_source_enabled(&self, src: EventSource, value: u32) {
        write(&self.sources).set(src, value);
    }

    /// 원시 인덱스로 소스 값을 설정합니다. 범위를 벗어나면 무시합니다.
    pub fn set_source_enabled_by_index(&self, index: u32, value: u32) {
        if !write(&self.sources).set_by_index(index, value) {
            debug!(index, "ignoring out-of-range event source index");
        }
    }

    /// 설치된 transport의 종류
    pub fn transport_kind(&self) -> Option<TransportKind> {
        read(&self.transport).as_ref().map(Transport::kind)
    }

    /// 포매터가 설치되어 있는지 여부
    pub fn has_formatter(&self) -> bool {
        read(&self.formatter).is_some()
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        debug!(transport = ?self.transport_kind(), "event router destroyed");
    }
}

// --- 널 안전 함수 ---

fn require(router: Option<&EventRouter>) -> Result<&EventRouter, EvtError> {
    router.ok_or_else(|| EvtError::InvalidArgument("no event router".to_owned()))
}

/// 라우터나 메시지가 없으면 [`EvtError::InvalidArgument`]
pub fn send(router: Option<&EventRouter>, msg: Option<&str>) -> Result<usize, EvtError> {
    let router = require(router)?;
    let msg = msg.ok_or_else(|| EvtError::InvalidArgument("no message".to_owned()))?;
    router.send(msg)
}

/// 라우터나 이벤트가 없으면 [`EvtError::InvalidArgument`]
pub fn send_event(router: Option<&EventRouter>, event: Option<&Event>) -> Result<usize, EvtError> {
    let router = require(router)?;
    let event = event.ok_or_else(|| EvtError::InvalidArgument("no event".to_owned()))?;
    router.send_event(event)
}

/// 라우터가 없으면 아무 동작도 하지 않습니다.
pub fn flush(router: Option<&EventRouter>) -> Result<(), EvtError> {
    match router {
        Some(r) => r.flush(),
        None => Ok(()),
    }
}

/// 라우터의 필터, 라우터가 없으면 프로세스 전역 기본 필터
pub fn log_file_filter(router: Option<&EventRouter>) -> Option<Arc<LogFileFilter>> {
    match router {
        Some(r) => Some(r.log_file_filter()),
        None => filter::default_log_file_filter(),
    }
}

/// 라우터의 소스 값, 라우터가 없거나 인덱스가 범위를 벗어나면 내장 기본값
pub fn source_by_index(router: Option<&EventRouter>, index: u32) -> u32 {
    match router {
        Some(r) => r.source_by_index(index),
        None => source::default_for_index(index),
    }
}

/// 라우터가 없으면 아무 동작도 하지 않습니다.
pub fn set_source_enabled(router: Option<&EventRouter>, index: u32, value: u32) {
    if let Some(r) = router {
        r.set_source_enabled_by_index(index, value);
    }
}

/// 라우터를 해제하고 `None`으로 남깁니다. 여러 번 호출해도 안전합니다.
pub fn destroy(router: &mut Option<EventRouter>) {
    drop(router.take());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tapline_core::event::DEFAULT_SRC_LOGFILE;

    struct CountingFormatter {
        drops: Arc<AtomicUsize>,
    }

    impl Formatter for CountingFormatter {
        fn name(&self) -> &str {
            "counting"
        }

        fn render(&self, event: &Event) -> Option<String> {
            Some(format!("{}\n", event.name))
        }
    }

    impl Drop for CountingFormatter {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct SilentFormatter;

    impl Formatter for SilentFormatter {
        fn name(&self) -> &str {
            "silent"
        }

        fn render(&self, _event: &Event) -> Option<String> {
            None
        }
    }

    #[test]
    fn new_router_is_empty_with_default_filter() {
        let r = EventRouter::new().unwrap();
        assert!(r.transport_kind().is_none());
        assert!(!r.has_formatter());
        assert!(r.log_file_filter().is_default());
        for src in EventSource::ALL {
            assert_eq!(r.source(src), src.default_value());
        }
    }

    #[test]
    fn send_without_transport_fails() {
        let r = EventRouter::new().unwrap();
        assert!(matches!(r.send("hello"), Err(EvtError::NoTransport)));
    }

    #[test]
    fn flush_without_transport_is_noop() {
        let r = EventRouter::new().unwrap();
        assert!(r.flush().is_ok());
    }

    #[test]
    fn send_event_without_formatter_is_invalid_argument() {
        let r = EventRouter::new().unwrap();
        r.set_transport(Some(Transport::shm().unwrap()));
        let event = Event::new(EventSource::Console, "stdout", "x");
        assert!(matches!(
            r.send_event(&event),
            Err(EvtError::InvalidArgument(_))
        ));
    }

    #[test]
    fn send_event_with_empty_render_is_invalid_argument() {
        let r = EventRouter::new().unwrap();
        r.set_transport(Some(Transport::shm().unwrap()));
        r.set_formatter(Some(Box::new(SilentFormatter)));
        let event = Event::new(EventSource::Metric, "cpu", "1");
        assert!(matches!(
            r.send_event(&event),
            Err(EvtError::InvalidArgument(_))
        ));
    }

    #[test]
    fn send_event_renders_then_sends() {
        let r = EventRouter::new().unwrap();
        r.set_transport(Some(Transport::shm().unwrap()));
        r.set_formatter(Some(Box::new(LineFormatter::new())));
        let event = Event::new(EventSource::Metric, "cpu", "1");
        assert_eq!(r.send_event(&event).unwrap(), "cpu:1|metric\n".len());
    }

    #[test]
    fn set_formatter_releases_previous_exactly_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let r = EventRouter::new().unwrap();

        for _ in 0..10 {
            r.set_formatter(Some(Box::new(CountingFormatter {
                drops: Arc::clone(&drops),
            })));
        }
        assert_eq!(drops.load(Ordering::SeqCst), 9);

        r.set_formatter(None);
        assert_eq!(drops.load(Ordering::SeqCst), 10);
        assert!(!r.has_formatter());
    }

    #[test]
    fn destroy_releases_formatter_and_is_idempotent() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut r = Some(EventRouter::new().unwrap());
        r.as_ref().unwrap().set_formatter(Some(Box::new(CountingFormatter {
            drops: Arc::clone(&drops),
        })));

        destroy(&mut r);
        assert!(r.is_none());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        destroy(&mut r);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_transport_replaces_kind() {
        let r = EventRouter::new().unwrap();
        r.set_transport(Some(Transport::shm().unwrap()));
        assert_eq!(r.transport_kind(), Some(TransportKind::Shm));
        r.set_transport(Some(Transport::syslog().unwrap()));
        assert_eq!(r.transport_kind(), Some(TransportKind::Syslog));
        r.set_transport(None);
        assert!(r.transport_kind().is_none());
    }

    #[test]
    fn invalid_filter_falls_back_to_default() {
        let r = EventRouter::new().unwrap();
        r.set_log_file_filter(Some(r"\.txt$")).unwrap();
        assert!(!r.log_file_filter().is_default());

        r.set_log_file_filter(Some("(((")).unwrap();
        assert!(r.log_file_filter().is_default());
        assert!(r.is_log_file("/var/log/auth.log"));
    }

    #[test]
    fn empty_filter_resets_to_default() {
        let r = EventRouter::new().unwrap();
        r.set_log_file_filter(Some("stdout")).unwrap();
        assert!(r.is_log_file("/dev/stdout"));

        r.set_log_file_filter(Some("")).unwrap();
        assert!(r.log_file_filter().is_default());
        r.set_log_file_filter(Some("stdout")).unwrap();
        r.set_log_file_filter(None).unwrap();
        assert!(r.log_file_filter().is_default());
    }

    #[test]
    fn filter_handle_outlives_replacement() {
        let r = EventRouter::new().unwrap();
        let held = r.log_file_filter();
        r.set_log_file_filter(Some("nothing-matches-this")).unwrap();
        assert!(held.is_match("app.log"));
        assert!(!r.is_log_file("app.log"));
    }

    #[test]
    fn source_set_and_out_of_range() {
        let r = EventRouter::new().unwrap();
        r.set_source_enabled(EventSource::Console, 1);
        assert!(r.is_enabled(EventSource::Console));
        assert_eq!(r.source_by_index(1), 1);

        r.set_source_enabled_by_index(99, 5);
        assert_eq!(r.source_by_index(99), DEFAULT_SRC_LOGFILE);
        assert_eq!(r.source_by_index(u32::MAX), DEFAULT_SRC_LOGFILE);
    }

    #[test]
    fn null_safe_functions_without_router() {
        assert!(matches!(
            send(None, Some("x")),
            Err(EvtError::InvalidArgument(_))
        ));
        let event = Event::new(EventSource::Console, "stdout", "x");
        assert!(matches!(
            send_event(None, Some(&event)),
            Err(EvtError::InvalidArgument(_))
        ));
        assert!(flush(None).is_ok());
        set_source_enabled(None, 0, 1);
        for src in EventSource::ALL {
            assert_eq!(source_by_index(None, src.index() as u32), src.default_value());
        }
        assert_eq!(source_by_index(None, 1000), DEFAULT_SRC_LOGFILE);
        let mut none = None;
        destroy(&mut none);
    }

    #[test]
    fn null_safe_functions_without_arguments() {
        let r = EventRouter::new().unwrap();
        assert!(matches!(
            send(Some(&r), None),
            Err(EvtError::InvalidArgument(_))
        ));
        assert!(matches!(
            send_event(Some(&r), None),
            Err(EvtError::InvalidArgument(_))
        ));
        assert!(log_file_filter(Some(&r)).unwrap().is_default());
    }

    #[test]
    fn formatter_from_config_kinds() {
        let json = FormatConfig {
            kind: "json".to_owned(),
        };
        assert_eq!(formatter_from_config(&json).unwrap().name(), "json");
        let line = FormatConfig {
            kind: "LINE".to_owned(),
        };
        assert_eq!(formatter_from_config(&line).unwrap().name(), "line");
        let bad = FormatConfig {
            kind: "xml".to_owned(),
        };
        assert!(formatter_from_config(&bad).is_err());
    }

    #[test]
    fn router_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventRouter>();
    }
}
