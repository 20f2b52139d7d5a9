//! 파일 전송
//!
//! 경로의 파일을 append 모드로 열고, 새로 만든 파일은 권한을 0666으로 맞춥니다.
//!
//! 상위 디렉토리는 만들지 않습니다. 없는 디렉토리 아래 경로는 열기 실패로 처리됩니다.

use std::fs::{File, OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::TransportError;

/// 새로 만든 파일의 권한
pub const FILE_MODE: u32 = 0o666;

/// 파일 전송
#[derive(Debug)]
pub struct FileTransport {
    /// 출력 파일 경로
    path: PathBuf,
    /// 출력 파일 핸들
    file: Mutex<File>,
}

impl FileTransport {
    /// 파일을 append 모드로 엽니다. 없으면 0666 권한으로 만듭니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TransportError::InvalidArgument(
                "file transport requires a path".to_owned(),
            ));
        }

        let (file, created) = match OpenOptions::new()
            .append(true)
            .create_new(true)
            .mode(FILE_MODE)
            .open(path)
        {
            Ok(file) => (file, true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let file = OpenOptions::new()
                    .append(true)
                    .open(path)
                    .map_err(|e| TransportError::io("file open", e))?;
                (file, false)
            }
            Err(e) => return Err(TransportError::io("file open", e)),
        };

        // open(2)의 mode는 umask로 좁혀지므로 새 파일은 명시적으로 권한을 설정
        let chmod = if created {
            file.set_permissions(Permissions::from_mode(FILE_MODE))
        } else {
            Ok(())
        };
        if let Err(e) = chmod {
            warn!(path = %path.display(), error = %e, "failed to set file transport permissions");
        }

        debug!(path = %path.display(), created, "file transport opened");
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// 메시지 전체를 파일 끝에 기록합니다. 프레이밍은 추가하지 않습니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(msg.as_bytes())
            .map_err(|e| TransportError::io("file write", e))?;
        Ok(msg.len())
    }

    /// 기록된 데이터를 저장 장치까지 내립니다.
    pub fn flush(&self) -> Result<(), TransportError> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.flush()
            .map_err(|e| TransportError::io("file flush", e))?;
        file.sync_data()
            .map_err(|e| TransportError::io("file sync", e))
    }

    /// 출력 파일 경로를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
