//! 실행 통계 모듈
//!
//! 변환 중에는 파일/배치/병합 결과를 원자적 카운터에 누적하고,
//! 끝나면 [`Snapshot`]으로 고정해 요약 표를 출력합니다.

use colored::Colorize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::merge::MergeSummary;
use crate::processor::ProcessResult;

/// 변환 진행 중 여러 스레드에서 갱신되는 통계
#[derive(Debug)]
pub struct Statistics {
    total_files: usize,
    converted: AtomicUsize,
    skipped: AtomicUsize,
    batches: AtomicUsize,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
    started: Instant,
}

/// 특정 시점의 통계 값
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// 수집된 입력 파일 수
    pub total_files: usize,
    /// 행으로 변환된 파일 수
    pub converted: usize,
    /// 파싱에 실패해 건너뛴 파일 수
    pub skipped: usize,
    /// 기록된 배치 파일 수
    pub batches: usize,
    /// 읽은 입력 바이트
    pub bytes_in: u64,
    /// 결과 파일 크기
    pub bytes_out: u64,
}

impl Statistics {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            converted: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            bytes_in: AtomicU64::new(0),
            bytes_out: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// 파일 하나의 처리 결과 반영
    pub fn record_file(&self, result: &ProcessResult) {
        let counter = if result.is_success() {
            &self.converted
        } else {
            &self.skipped
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(result.file_size, Ordering::Relaxed);
    }

    /// 배치 파일 기록 반영
    pub fn record_batch(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    /// 병합 결과 반영 (결과 파일 크기는 마지막 병합 값으로 덮어씀)
    pub fn record_merge(&self, merge: &MergeSummary) {
        self.bytes_out.store(merge.bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            total_files: self.total_files,
            converted: self.converted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let line = "═".repeat(50);

        println!("\n{}", line.bright_blue());
        println!("{}", " 📊 변환 요약".bright_white().bold());
        println!("{}", line.bright_blue());

        for (label, value) in snapshot.summary_rows(self.elapsed()) {
            println!("  {:<12} {}", label, value);
        }
        if snapshot.skipped > 0 {
            println!(
                "  {}",
                format!("⚠️ {} 개 파일은 결과에 포함되지 않았습니다", snapshot.skipped).yellow()
            );
        }

        println!("{}", line.bright_blue());
    }
}

impl Snapshot {
    /// 아직 결과가 반영되지 않은 파일 수
    pub fn pending(&self) -> usize {
        self.total_files
            .saturating_sub(self.converted + self.skipped)
    }

    /// 변환 성공 비율 (백분율, 입력 파일이 없으면 `None`)
    pub fn conversion_rate(&self) -> Option<f64> {
        (self.total_files > 0).then(|| self.converted as f64 * 100.0 / self.total_files as f64)
    }

    /// 요약 표의 (항목, 값) 목록
    pub fn summary_rows(&self, elapsed: Duration) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("입력 파일", self.total_files.to_string()),
            ("변환된 행", self.converted.to_string()),
            ("건너뛴 파일", self.skipped.to_string()),
            ("배치 파일", self.batches.to_string()),
            ("읽은 용량", format_bytes(self.bytes_in)),
            ("결과 크기", format_bytes(self.bytes_out)),
        ];
        if let Some(rate) = self.conversion_rate() {
            rows.push(("변환율", format!("{:.1}%", rate)));
        }
        rows.push(("소요 시간", format_duration(elapsed)));
        rows
    }
}

/// 바이트 수를 1024 단위로 읽기 쉽게 표시
///
/// # Examples
/// ```
/// use jsoncsv::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// 소요 시간을 읽기 쉽게 표시
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.subsec_millis()),
        1..=59 => format!("{}.{:03}초", secs, duration.subsec_millis()),
        60..=3599 => format!("{}분 {}초", secs / 60, secs % 60),
        _ => format!("{}시간 {}분", secs / 3600, (secs % 3600) / 60),
    }
}
