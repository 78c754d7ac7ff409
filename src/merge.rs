//! 배치 파일 병합 모듈
//!
//! 이번 실행에서 기록된 배치 파일을 찾아 정렬한 뒤, 헤더 라인과 함께
//! 하나의 결과 파일로 이어 붙입니다.

use clap::ValueEnum;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::batch::{list_matching, BATCH_FILE_PATTERN, BATCH_PREFIX};
use crate::error::{JsonCsvError, Result};

/// 배치 파일 병합 순서
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum MergeOrder {
    /// 마지막 수정 시각 순 (같은 시각이면 일련번호 순)
    #[default]
    Modified,
    /// 파일 이름의 일련번호 순 (final은 마지막)
    Sequence,
}

impl std::fmt::Display for MergeOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOrder::Modified => write!(f, "Modified"),
            MergeOrder::Sequence => write!(f, "Sequence"),
        }
    }
}

/// 병합 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// 결과 파일 경로
    pub output: PathBuf,
    /// 병합한 배치 파일 (병합 순서)
    pub artifacts: Vec<PathBuf>,
    /// 헤더를 제외한 데이터 행 수
    pub data_lines: usize,
    /// 결과 파일 크기
    pub bytes: u64,
}

/// 배치 파일 이름에 포함된 일련번호 정렬 키
///
/// 번호가 있는 배치가 먼저, `final`이 그 다음, 해석할 수 없는 이름이 마지막입니다.
///
/// # Examples
/// ```
/// use jsoncsv::merge::sequence_key;
/// use std::path::Path;
///
/// assert!(sequence_key(Path::new("j_results_2.txt")) < sequence_key(Path::new("j_results_10.txt")));
/// assert!(sequence_key(Path::new("j_results_10.txt")) < sequence_key(Path::new("j_results_final.txt")));
/// ```
pub fn sequence_key(path: &Path) -> (u8, u64) {
    let seq = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.strip_prefix(BATCH_PREFIX))
        .and_then(|s| s.strip_prefix('_'));

    match seq {
        Some("final") => (1, 0),
        Some(n) => n.parse().map(|n| (0, n)).unwrap_or((2, 0)),
        None => (2, 0),
    }
}

/// 폴더의 배치 파일을 병합 순서대로 정렬하여 반환
pub fn discover_batches(dir: &Path, order: MergeOrder) -> Result<Vec<PathBuf>> {
    let files = list_matching(dir, BATCH_FILE_PATTERN)?;

    match order {
        MergeOrder::Sequence => {
            let mut files = files;
            files.sort_by_key(|p| sequence_key(p));
            Ok(files)
        }
        MergeOrder::Modified => {
            let mut keyed: Vec<(SystemTime, (u8, u64), PathBuf)> = files
                .into_iter()
                .map(|p| modified_time(&p).map(|modified| (modified, sequence_key(&p), p)))
                .collect::<Result<_>>()?;
            keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
            Ok(keyed.into_iter().map(|(_, _, p)| p).collect())
        }
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| JsonCsvError::ReadError {
            file: path.to_path_buf(),
            source,
        })
}

/// 배치 파일을 하나의 결과 파일로 병합
///
/// 결과 파일은 헤더 라인 한 줄로 시작하고, 이어서 각 배치 파일의 모든 줄이
/// 병합 순서대로 기록됩니다.
///
/// # Arguments
/// * `dir` - 배치 파일이 있는 폴더
/// * `header_line` - 결과 파일 첫 줄
/// * `output` - 결과 파일 경로
/// * `order` - 병합 순서
pub fn merge_batches(
    dir: &Path,
    header_line: &str,
    output: &Path,
    order: MergeOrder,
) -> Result<MergeSummary> {
    let artifacts: Vec<PathBuf> = discover_batches(dir, order)?
        .into_iter()
        .filter(|p| p != output)
        .collect();

    let write_err = |source: std::io::Error| JsonCsvError::WriteError {
        file: output.to_path_buf(),
        source,
    };

    let file = File::create(output).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", header_line).map_err(write_err)?;
    let mut bytes = header_line.len() as u64 + 1;

    let mut data_lines = 0;
    for artifact in &artifacts {
        let read_err = |source: std::io::Error| JsonCsvError::ReadError {
            file: artifact.clone(),
            source,
        };

        let reader = BufReader::new(File::open(artifact).map_err(read_err)?);
        for line in reader.lines() {
            let line = line.map_err(read_err)?;
            writeln!(writer, "{}", line).map_err(write_err)?;
            bytes += line.len() as u64 + 1;
            data_lines += 1;
        }
        debug!(artifact = %artifact.display(), "배치 파일 병합");
    }

    writer.flush().map_err(write_err)?;

    Ok(MergeSummary {
        output: output.to_path_buf(),
        artifacts,
        data_lines,
        bytes,
    })
}
