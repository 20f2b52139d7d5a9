//! 이벤트 소스 테이블 -- 소스별 활성화 값

use tapline_core::config::SourcesConfig;
use tapline_core::event::{CFG_SRC_MAX, DEFAULT_SRC_LOGFILE, EventSource};
use tracing::debug;

/// 원시 인덱스의 내장 기본값. 알 수 없는 인덱스는 LOGFILE 기본값입니다.
pub fn default_for_index(index: u32) -> u32 {
    match EventSource::from_index(index) {
        Some(src) => src.default_value(),
        None => {
            debug!(index, "unknown event source index, using logfile default");
            DEFAULT_SRC_LOGFILE
        }
    }
}

/// `EventSource`를 인덱스로 하는 고정 크기 테이블
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTable {
    values: [u32; CFG_SRC_MAX],
}

impl Default for SourceTable {
    fn default() -> Self {
        let mut values = [0; CFG_SRC_MAX];
        for src in EventSource::ALL {
            values[src.index()] = src.default_value();
        }
        Self { values }
    }
}

impl SourceTable {
    /// 내장 기본값으로 채운 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// `[sources]` 설정 섹션으로 테이블을 생성합니다.
    pub fn from_config(config: &SourcesConfig) -> Self {
        let mut table = Self::default();
        for src in EventSource::ALL {
            table.set(src, config.value(src));
        }
        table
    }

    pub fn get(&self, src: EventSource) -> u32 {
        self.values[src.index()]
    }

    pub fn set(&mut self, src: EventSource, value: u32) {
        self.values[src.index()] = value;
    }

    /// 원시 인덱스로 조회합니다. 범위를 벗어나면 LOGFILE 기본값입니다.
    pub fn get_by_index(&self, index: u32) -> u32 {
        match EventSource::from_index(index) {
            Some(src) => self.get(src),
            None => default_for_index(index),
        }
    }

    /// 원시 인덱스로 설정합니다. 범위를 벗어나면 무시하고 `false`를 반환합니다.
    pub fn set_by_index(&mut self, index: u32, value: u32) -> bool {
        match EventSource::from_index(index) {
            Some(src) => {
                self.set(src, value);
                true
            }
            None => false,
        }
    }
}
