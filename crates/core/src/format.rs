//! 포매터 trait -- 이벤트를 전송 가능한 텍스트로 렌더링하는 확장 포인트
//!
//! 라우터는 [`Formatter::render`] 계약만 사용합니다.
//! [`JsonFormatter`]와 [`LineFormatter`]는 기본 제공 구현입니다.

use serde_json::{Map, Value};

use crate::event::Event;

/// 이벤트 렌더링 trait
///
/// 새로운 출력 형식을 지원하려면 이 trait을 구현합니다.
/// 렌더링할 수 없는 이벤트는 `None`을 반환합니다.
pub trait Formatter: Send + Sync {
    /// 형식 이름 (로깅에 사용)
    fn name(&self) -> &str;

    /// 이벤트를 소유권 있는 텍스트 버퍼로 렌더링
    fn render(&self, event: &Event) -> Option<String>;
}

/// JSON 한 줄 포매터
///
/// 이벤트마다 개행으로 끝나는 JSON 객체 하나를 생성합니다.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// 새 JSON 포매터를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, event: &Event) -> Option<String> {
        let mut obj = Map::new();
        obj.insert("id".to_owned(), Value::from(event.id.as_str()));
        obj.insert("_time".to_owned(), Value::from(event.unix_timestamp()));
        obj.insert("source".to_owned(), Value::from(event.source.as_str()));
        obj.insert("name".to_owned(), Value::from(event.name.as_str()));
        obj.insert("data".to_owned(), Value::from(event.data.as_str()));
        if !event.fields.is_empty() {
            let fields: Map<String, Value> = event
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect();
            obj.insert("fields".to_owned(), Value::Object(fields));
        }

        let mut line = serde_json::to_string(&Value::Object(obj)).ok()?;
        line.push('\n');
        Some(line)
    }
}

/// 평문 한 줄 포매터
///
/// `name:data|source|#key:value,...` 형식으로 렌더링합니다.
/// 구분자(`|`, 개행)가 포함된 이벤트는 렌더링하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct LineFormatter;

impl LineFormatter {
    /// 새 평문 포매터를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for LineFormatter {
    fn name(&self) -> &str {
        "line"
    }

    fn render(&self, event: &Event) -> Option<String> {
        let invalid = |s: &str| s.contains('|') || s.contains('\n');
        if invalid(&event.name) || invalid(&event.data) {
            return None;
        }

        let mut line = format!("{}:{}|{}", event.name, event.data, event.source);
        if !event.fields.is_empty() {
            let tags: Vec<String> = event
                .fields
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect();
            line.push_str("|#");
            line.push_str(&tags.join(","));
        }
        line.push('\n');
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventSource;

    #[test]
    fn json_formatter_renders_single_line_object() {
        let event = Event::new(EventSource::LogFile, "/var/log/app.log", "hello")
            .with_field("pid", "7");
        let text = JsonFormatter::new().render(&event).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);

        let parsed: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed["source"], "logfile");
        assert_eq!(parsed["name"], "/var/log/app.log");
        assert_eq!(parsed["data"], "hello");
        assert_eq!(parsed["fields"]["pid"], "7");
        assert_eq!(parsed["id"], event.id.as_str());
    }

    #[test]
    fn json_formatter_escapes_embedded_newlines() {
        let event = Event::new(EventSource::Console, "stdout", "a\nb");
        let text = JsonFormatter::new().render(&event).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
    }

    #[test]
    fn line_formatter_renders_tags() {
        let event = Event::new(EventSource::Metric, "net.tx", "1024")
            .with_field("proc", "curl")
            .with_field("pid", "99");
        let text = LineFormatter::new().render(&event).unwrap();
        assert_eq!(text, "net.tx:1024|metric|#proc:curl,pid:99\n");
    }

    #[test]
    fn line_formatter_rejects_separator_in_payload() {
        let event = Event::new(EventSource::Metric, "bad|name", "1");
        assert!(LineFormatter::new().render(&event).is_none());
    }

    #[test]
    fn formatters_report_names() {
        assert_eq!(JsonFormatter::new().name(), "json");
        assert_eq!(LineFormatter::new().name(), "line");
    }
}
