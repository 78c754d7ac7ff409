//! 변환 파이프라인 모듈
//!
//! 입력 폴더 탐색, 파일별 처리, 배치 기록, 최종 병합을 순서대로 실행합니다.

use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::batch::{cleanup_stale_batches, BatchFlush, BatchWriter};
use crate::config::Config;
use crate::error::{JsonCsvError, Result};
use crate::merge::{merge_batches, MergeSummary};
use crate::pattern::PatternMatcher;
use crate::processor::{process_file, ProcessContext, ProcessResult};
use crate::stats::Statistics;

/// 한 번의 실행 결과
#[derive(Debug)]
pub struct RunReport {
    /// 처리한 파일 수 (실패 포함)
    pub processed: usize,
    /// 결과에 기록된 행 수
    pub rows: usize,
    /// 파싱에 실패한 파일과 사유
    pub failures: Vec<(PathBuf, String)>,
    /// 기록된 배치 파일
    pub batches: Vec<BatchFlush>,
    /// 병합 결과
    pub merge: MergeSummary,
}

/// 입력 폴더에서 JSON 파일 수집 (파일 이름 순)
///
/// # Arguments
/// * `dir` - 입력 폴더
/// * `max_depth` - 탐색 깊이 (1이면 입력 폴더 바로 아래만)
/// * `matcher` - 파일 이름 필터
pub fn collect_json_files(dir: &Path, max_depth: usize, matcher: &PatternMatcher) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| matcher.accepts(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// 설정에 따라 파일 목록을 변환하고 결과 파일로 병합
///
/// 파싱에 실패한 파일은 경고 후 건너뛰며, 배치 파일이나 결과 파일 쓰기에
/// 실패하면 즉시 에러를 반환합니다.
///
/// # Arguments
/// * `config` - 검증된 실행 설정
/// * `files` - 처리 순서대로 정렬된 JSON 파일 목록
/// * `progress` - 진행률 표시 (테스트에서는 `ProgressBar::hidden()`)
/// * `stats` - 통계 수집기
pub fn run(
    config: &Config,
    files: Vec<PathBuf>,
    progress: &ProgressBar,
    stats: &Statistics,
) -> Result<RunReport> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| JsonCsvError::WriteError {
        file: config.output_dir.clone(),
        source,
    })?;

    let removed = cleanup_stale_batches(&config.output_dir)?;
    if removed > 0 {
        info!(removed, "이전 배치 파일 삭제");
    }

    let ctx = config.process_context();
    let pool = build_pool(config.threads)?;
    let mut writer = BatchWriter::new(&config.output_dir, config.batch_size);

    let mut rows = 0;
    let mut failures = Vec::new();
    let mut flushed_during_run = 0;

    // 배치 경계에 맞춰 나누면 병렬 처리 후에도 기록 순서가 유지됨
    let chunk_len = config.batch_size.limit().unwrap_or(files.len()).max(1);
    for chunk in files.chunks(chunk_len) {
        for result in process_chunk(chunk, &ctx, pool.as_ref(), progress) {
            stats.record_file(&result);

            if result.is_success() {
                rows += 1;
            } else {
                let reason = result.error.clone().unwrap_or_default();
                warn!(file = %result.path.display(), "파싱할 수 없는 파일을 건너뜁니다: {}", reason);
                failures.push((result.path.clone(), reason));
            }

            if let Some(flush) = writer.record(result.row.as_deref())? {
                flushed_during_run += 1;
                report_flush(&flush, progress, stats);
            }
        }
    }

    let processed = writer.processed();
    debug!(pending = writer.buffered_rows(), "마지막 배치 기록");
    let batches = writer.finish()?;
    if let Some(last) = batches.get(flushed_during_run) {
        report_flush(last, progress, stats);
    }

    let merge = merge_batches(
        &config.output_dir,
        &config.header_line(),
        &config.output_file,
        config.merge_order,
    )?;
    stats.record_merge(&merge);
    info!(
        output = %merge.output.display(),
        artifacts = merge.artifacts.len(),
        lines = merge.data_lines,
        "병합 완료"
    );

    Ok(RunReport {
        processed,
        rows,
        failures,
        batches,
        merge,
    })
}

fn build_pool(threads: usize) -> Result<Option<ThreadPool>> {
    if threads <= 1 {
        return Ok(None);
    }

    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Some)
        .map_err(|e| JsonCsvError::ThreadPoolError {
            reason: e.to_string(),
        })
}

fn process_chunk(
    chunk: &[PathBuf],
    ctx: &ProcessContext,
    pool: Option<&ThreadPool>,
    progress: &ProgressBar,
) -> Vec<ProcessResult> {
    let work = |path: &PathBuf| {
        let result = process_file(path.clone(), ctx);
        progress.inc(1);
        result
    };

    match pool {
        Some(pool) => pool.install(|| chunk.par_iter().map(work).collect()),
        None => chunk.iter().map(work).collect(),
    }
}

fn report_flush(flush: &BatchFlush, progress: &ProgressBar, stats: &Statistics) {
    stats.record_batch();
    info!(
        path = %flush.path.display(),
        rows = flush.rows,
        processed = flush.processed,
        "배치 파일 기록"
    );
    progress.println(format!(
        "  ✓ {} 개 파일 처리 완료 → {:?}",
        flush.processed,
        flush.path.file_name().unwrap_or_default()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &Path, header: &str, batch_size: Option<i64>) -> Config {
        let args = Args {
            input: dir.to_path_buf(),
            header: Some(header.to_string()),
            batch_size,
            ..Args::default()
        };
        Config::from_args(&args).unwrap()
    }

    fn run_all(config: &Config) -> RunReport {
        let matcher = PatternMatcher::new(config.pattern.clone()).unwrap();
        let files = collect_json_files(&config.input_dir, config.max_depth, &matcher);
        let stats = Statistics::new(files.len());
        run(config, files, &ProgressBar::hidden(), &stats).unwrap()
    }

    #[test]
    fn test_collect_sorted_top_level_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.json"), "{}").unwrap();

        let matcher = PatternMatcher::new(None).unwrap();
        let files = collect_json_files(dir.path(), 1, &matcher);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);

        assert_eq!(collect_json_files(dir.path(), 2, &matcher).len(), 3);
    }

    #[test]
    fn test_run_batches_and_merges_in_order() {
        let dir = TempDir::new().unwrap();
        for i in 1..=5 {
            fs::write(dir.path().join(format!("doc{}.json", i)), format!(r#"{{"n": {}}}"#, i)).unwrap();
        }

        let report = run_all(&config(dir.path(), "n", Some(2)));

        assert_eq!(report.processed, 5);
        assert_eq!(report.rows, 5);
        let sizes: Vec<usize> = report.batches.iter().map(|b| b.rows).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(
            fs::read_to_string(dir.path().join("results.txt")).unwrap(),
            "n\n1\n2\n3\n4\n5\n"
        );
    }

    #[test]
    fn test_run_feeds_statistics() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": 1}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"id": "#).unwrap();
        fs::write(dir.path().join("c.json"), r#"{"id": 3}"#).unwrap();

        let config = config(dir.path(), "id", Some(2));
        let files = collect_json_files(&config.input_dir, 1, &PatternMatcher::default());
        let stats = Statistics::new(files.len());
        let report = run(&config, files, &ProgressBar::hidden(), &stats).unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.converted, 2);
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.pending(), 0);
        assert_eq!(snapshot.batches, report.batches.len());
        assert_eq!(snapshot.bytes_out, report.merge.bytes);
    }

    #[test]
    fn test_run_skips_unparsable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": 1}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"id": "#).unwrap();
        fs::write(dir.path().join("c.json"), r#"[1, 2]"#).unwrap();

        let report = run_all(&config(dir.path(), "id", None));

        assert_eq!(report.processed, 3);
        assert_eq!(report.rows, 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("results.txt")).unwrap(),
            "id\n1\n"
        );
    }

    #[test]
    fn test_run_removes_stale_batches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("j_results_9.txt"), "stale\n").unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": 1}"#).unwrap();

        let report = run_all(&config(dir.path(), "id", None));

        assert!(!dir.path().join("j_results_9.txt").exists());
        assert_eq!(report.merge.data_lines, 1);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            fs::write(
                dir.path().join(format!("f{:02}.json", i)),
                format!(r#"{{"id": {}, "inner": {{"v": "x{}"}}}}"#, i, i),
            )
            .unwrap();
        }

        let sequential = config(dir.path(), "id,v", Some(3));
        run_all(&sequential);
        let expected = fs::read_to_string(dir.path().join("results.txt")).unwrap();

        let mut parallel = config(dir.path(), "id,v", Some(3));
        parallel.threads = 4;
        run_all(&parallel);
        let actual = fs::read_to_string(dir.path().join("results.txt")).unwrap();

        assert_eq!(expected, actual);
    }
}
