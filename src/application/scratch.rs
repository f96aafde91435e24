//! Request Scratch - 请求级临时目录
//!
//! 每个请求独占一个临时目录（位于 work_dir 下），
//! 无论成功还是出错，Drop 时都会删除

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

/// 请求级临时目录
#[derive(Debug)]
pub struct RequestScratch {
    request_id: Uuid,
    dir: TempDir,
}

impl RequestScratch {
    /// 在 work_dir 下创建临时目录
    pub fn create_in(work_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(work_dir)?;
        let request_id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("req-{}-", request_id))
            .tempdir_in(work_dir)?;

        tracing::debug!(request_id = %request_id, dir = %dir.path().display(), "Scratch created");

        Ok(Self { request_id, dir })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 临时目录中的文件路径
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scratch_removed_on_drop() {
        let work = tempdir().unwrap();
        let path = {
            let scratch = RequestScratch::create_in(work.path()).unwrap();
            std::fs::write(scratch.file("a.wav"), b"data").unwrap();
            assert!(scratch.file("a.wav").exists());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_isolated_per_request() {
        let work = tempdir().unwrap();
        let a = RequestScratch::create_in(work.path()).unwrap();
        let b = RequestScratch::create_in(work.path()).unwrap();
        assert_ne!(a.path(), b.path());
        assert_ne!(a.request_id(), b.request_id());
    }
}
