//! 배치 파일 쓰기 모듈
//!
//! 조립된 행을 메모리에 모았다가 배치 크기마다 번호가 붙은 중간 파일
//! (`j_results_<n>.txt`)로 내보내고, 남은 행은 `j_results_final.txt`로 씁니다.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;

use crate::error::{JsonCsvError, Result};

/// 배치 파일 이름 접두사
pub const BATCH_PREFIX: &str = "j_results";

/// 실행 전 삭제 대상 패턴
pub const STALE_BATCH_PATTERN: &str = "j_results*";

/// 병합 대상 패턴
pub const BATCH_FILE_PATTERN: &str = "j_results*.txt";

/// 마지막 부분 배치 파일 이름
pub const FINAL_BATCH_NAME: &str = "j_results_final.txt";

/// 배치 크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchSize {
    /// 실행이 끝날 때 한 번만 기록
    #[default]
    Unbounded,
    /// 지정한 파일 수마다 기록
    Bounded(NonZeroUsize),
}

impl BatchSize {
    /// 정수 입력으로부터 배치 크기 생성 (`None`이면 무제한)
    ///
    /// # Examples
    /// ```
    /// use jsoncsv::batch::BatchSize;
    ///
    /// assert_eq!(BatchSize::from_option(None).unwrap(), BatchSize::Unbounded);
    /// assert!(BatchSize::from_option(Some(0)).is_err());
    /// assert!(matches!(BatchSize::from_option(Some(2)).unwrap(), BatchSize::Bounded(_)));
    /// ```
    pub fn from_option(value: Option<i64>) -> Result<Self> {
        match value {
            None => Ok(BatchSize::Unbounded),
            Some(v) => usize::try_from(v)
                .ok()
                .and_then(NonZeroUsize::new)
                .map(BatchSize::Bounded)
                .ok_or(JsonCsvError::InvalidBatchSize { value: v }),
        }
    }

    /// 한 번에 처리할 파일 수 (무제한이면 `None`)
    pub fn limit(&self) -> Option<usize> {
        match self {
            BatchSize::Unbounded => None,
            BatchSize::Bounded(n) => Some(n.get()),
        }
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSize::Unbounded => write!(f, "무제한"),
            BatchSize::Bounded(n) => write!(f, "{}", n),
        }
    }
}

/// 기록된 배치 파일 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFlush {
    /// 배치 파일 경로
    pub path: PathBuf,
    /// 이 배치에 기록된 행 수
    pub rows: usize,
    /// 지금까지 처리한 파일 수 (실패 포함)
    pub processed: usize,
    /// 기록된 바이트 수
    pub bytes: u64,
}

/// 배치 단위로 행을 파일에 쓰는 작성기
#[derive(Debug)]
pub struct BatchWriter {
    dir: PathBuf,
    size: BatchSize,
    buffer: String,
    buffered_rows: usize,
    processed: usize,
    flushed: Vec<BatchFlush>,
}

impl BatchWriter {
    /// 새 배치 작성기 생성
    ///
    /// # Arguments
    /// * `dir` - 배치 파일을 쓸 폴더
    /// * `size` - 배치 크기
    pub fn new(dir: impl Into<PathBuf>, size: BatchSize) -> Self {
        Self {
            dir: dir.into(),
            size,
            buffer: String::new(),
            buffered_rows: 0,
            processed: 0,
            flushed: Vec::new(),
        }
    }

    /// 처리한 파일 하나의 결과 기록
    ///
    /// 파싱에 실패한 파일은 `None`으로 전달되며 행은 남기지 않지만 배치 경계
    /// 계산에는 포함됩니다. 경계에 도달해 배치 파일을 썼다면 그 정보를 돌려줍니다.
    pub fn record(&mut self, row: Option<&str>) -> Result<Option<BatchFlush>> {
        if let Some(row) = row {
            self.buffer.push_str(row);
            self.buffer.push('\n');
            self.buffered_rows += 1;
        }
        self.processed += 1;

        match self.size.limit() {
            Some(limit) if self.processed % limit == 0 => {
                let name = format!("{}_{}.txt", BATCH_PREFIX, self.processed / limit);
                self.flush_to(&name)
            }
            _ => Ok(None),
        }
    }

    /// 남은 행을 마지막 배치 파일로 쓰고 기록된 배치 목록 반환
    pub fn finish(mut self) -> Result<Vec<BatchFlush>> {
        self.flush_to(FINAL_BATCH_NAME)?;
        Ok(self.flushed)
    }

    /// 지금까지 처리한 파일 수
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// 아직 기록되지 않은 행 수
    pub fn buffered_rows(&self) -> usize {
        self.buffered_rows
    }

    fn flush_to(&mut self, name: &str) -> Result<Option<BatchFlush>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let path = self.dir.join(name);
        write_text(&path, &self.buffer)?;

        let flush = BatchFlush {
            path,
            rows: self.buffered_rows,
            processed: self.processed,
            bytes: self.buffer.len() as u64,
        };
        debug!(path = %flush.path.display(), rows = flush.rows, "배치 파일 기록");

        self.buffer.clear();
        self.buffered_rows = 0;
        self.flushed.push(flush.clone());
        Ok(Some(flush))
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let write_err = |source: std::io::Error| JsonCsvError::WriteError {
        file: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)
}

/// 폴더에서 패턴과 이름이 일치하는 파일 목록 (이름 순)
pub fn list_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).map_err(|_| JsonCsvError::InvalidPattern {
        pattern: pattern.to_string(),
    })?;

    let entries = fs::read_dir(dir).map_err(|source| JsonCsvError::ReadError {
        file: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|s| s.to_str())
                .map(|s| pattern.matches(s))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    Ok(files)
}

/// 이전 실행에서 남은 배치 파일 삭제
///
/// # Returns
/// 삭제한 파일 수
pub fn cleanup_stale_batches(dir: &Path) -> Result<usize> {
    let stale = list_matching(dir, STALE_BATCH_PATTERN)?;
    for path in &stale {
        fs::remove_file(path).map_err(|source| JsonCsvError::CleanupError {
            file: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "이전 배치 파일 삭제");
    }
    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bounded(n: usize) -> BatchSize {
        BatchSize::Bounded(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn test_batch_size_validation() {
        assert!(matches!(
            BatchSize::from_option(Some(-3)),
            Err(JsonCsvError::InvalidBatchSize { value: -3 })
        ));
        assert_eq!(BatchSize::from_option(Some(5)).unwrap().limit(), Some(5));
        assert_eq!(BatchSize::Unbounded.limit(), None);
    }

    #[test]
    fn test_flush_on_boundary() {
        let dir = TempDir::new().unwrap();
        let mut writer = BatchWriter::new(dir.path(), bounded(2));

        assert!(writer.record(Some("a")).unwrap().is_none());
        let flush = writer.record(Some("b")).unwrap().unwrap();
        assert_eq!(flush.rows, 2);
        assert_eq!(flush.processed, 2);
        assert_eq!(flush.path, dir.path().join("j_results_1.txt"));
        assert_eq!(fs::read_to_string(&flush.path).unwrap(), "a\nb\n");
        assert_eq!(writer.buffered_rows(), 0);
    }

    #[test]
    fn test_five_documents_batch_of_two() {
        let dir = TempDir::new().unwrap();
        let mut writer = BatchWriter::new(dir.path(), bounded(2));
        for row in ["1", "2", "3", "4", "5"] {
            writer.record(Some(row)).unwrap();
        }
        let flushed = writer.finish().unwrap();

        let rows: Vec<usize> = flushed.iter().map(|f| f.rows).collect();
        assert_eq!(rows, vec![2, 2, 1]);
        assert_eq!(flushed[2].path, dir.path().join(FINAL_BATCH_NAME));
    }

    #[test]
    fn test_failed_documents_count_toward_boundary() {
        let dir = TempDir::new().unwrap();
        let mut writer = BatchWriter::new(dir.path(), bounded(2));

        writer.record(Some("ok")).unwrap();
        let flush = writer.record(None).unwrap().unwrap();
        assert_eq!(flush.rows, 1);

        // 배치 전체가 실패하면 파일을 쓰지 않음
        assert!(writer.record(None).unwrap().is_none());
        assert!(writer.record(None).unwrap().is_none());
        assert!(!dir.path().join("j_results_2.txt").exists());
        assert_eq!(writer.processed(), 4);

        let flushed = writer.finish().unwrap();
        assert_eq!(flushed.len(), 1);
    }

    #[test]
    fn test_unbounded_writes_only_final() {
        let dir = TempDir::new().unwrap();
        let mut writer = BatchWriter::new(dir.path(), BatchSize::Unbounded);
        for _ in 0..10 {
            assert!(writer.record(Some("row")).unwrap().is_none());
        }
        let flushed = writer.finish().unwrap();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].rows, 10);
    }

    #[test]
    fn test_empty_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let writer = BatchWriter::new(dir.path(), BatchSize::Unbounded);
        assert!(writer.finish().unwrap().is_empty());
        assert!(!dir.path().join(FINAL_BATCH_NAME).exists());
    }

    #[test]
    fn test_cleanup_stale_batches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("j_results_1.txt"), "old").unwrap();
        fs::write(dir.path().join("j_results_final.txt"), "old").unwrap();
        fs::write(dir.path().join("j_results.bak"), "old").unwrap();
        fs::write(dir.path().join("results.txt"), "keep").unwrap();
        fs::write(dir.path().join("data.json"), "{}").unwrap();

        assert_eq!(cleanup_stale_batches(dir.path()).unwrap(), 3);
        assert!(dir.path().join("results.txt").exists());
        assert!(dir.path().join("data.json").exists());
        assert!(list_matching(dir.path(), STALE_BATCH_PATTERN).unwrap().is_empty());
    }
}
