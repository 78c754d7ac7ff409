//! jsoncsv - JSON FOLDER TO CSV FLATTENER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use jsoncsv::{
    cli::Args,
    config::Config,
    error::JsonCsvError,
    logging::init_logging,
    pattern::PatternMatcher,
    pipeline::{collect_json_files, run},
    prompt::prompt_args,
    stats::Statistics,
};

/// 설정 에러로 종료할 때의 프로세스 종료 코드
const CONFIG_ERROR_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let mut args = Args::parse();
    init_logging(args.verbose);

    // 대화형 모드
    if args.interactive {
        let stdin = std::io::stdin();
        args = prompt_args(stdin.lock(), std::io::stdout(), args).context("설정 입력 실패")?;
    }

    // 설정 검증 (실패하면 아무것도 쓰지 않고 종료)
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            if let Some(code) = config_error_exit_code(&e) {
                eprintln!("{} {}", "❌ 설정 오류:".bright_red().bold(), e);
                eprintln!("  {}", "--help 로 사용법을 확인하세요.".dimmed());
                std::process::exit(code);
            }
            return Err(e).context("설정이 올바르지 않습니다");
        }
    };

    // 헤더 출력
    print_header(&config);

    // JSON 파일 수집
    let pattern_matcher = PatternMatcher::new(config.pattern.clone())?;
    let json_files = collect_json_files(&config.input_dir, config.max_depth, &pattern_matcher);

    if json_files.is_empty() {
        println!("{}", "⚠️ 처리할 JSON 파일이 없습니다.".yellow());
    } else {
        println!(
            "  {} 발견된 파일 수: {}",
            "📋".bright_white(),
            json_files.len().to_string().bright_green()
        );
    }

    // 드라이런 모드
    if config.dry_run {
        print_dry_run(&json_files);
        return Ok(());
    }

    run_conversion(&config, json_files, args.verbose)
}

/// 설정 에러면 종료 코드 반환 (실행 중 에러는 `None`으로 anyhow에 맡김)
fn config_error_exit_code(error: &JsonCsvError) -> Option<i32> {
    error.is_config_error().then_some(CONFIG_ERROR_EXIT_CODE)
}

/// 헤더 출력
fn print_header(config: &Config) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 JSON FOLDER TO CSV FLATTENER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), config.input_dir);
    println!("  {} 결과 파일: {:?}", "📄".bright_green(), config.output_file);
    println!(
        "  {} 헤더: {}",
        "🎯".bright_cyan(),
        config.columns.header().join(",")
    );
    println!(
        "  {} 구분자: {:?}{}",
        "✂️".bright_yellow(),
        config.flatten.delimiter,
        config
            .flatten
            .escape_delimiter
            .as_ref()
            .map(|e| format!(" (값 안에서는 {:?})", e))
            .unwrap_or_default()
    );
    println!("  {} 배치 크기: {}", "🗂️".bright_white(), config.batch_size);

    if let Some(ref pattern) = config.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if config.max_depth > 1 {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), config.max_depth);
    }

    if config.flatten.counts_only {
        println!("  {} {}", "🔢".bright_magenta(), "개수 전용 모드".magenta());
    }

    if config.tag_file_name {
        println!("  {} {}", "🏷️".bright_cyan(), "파일 이름 컬럼 포함".cyan());
    }

    if config.threads > 1 {
        println!("  {} 스레드 수: {}", "⚡".bright_yellow(), config.threads);
    }

    if config.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(json_files: &[PathBuf]) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, path) in json_files.iter().enumerate() {
        println!("  {}. {:?}", i + 1, path.file_name().unwrap_or_default());
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        json_files.len().to_string().bright_green()
    );
}

/// 변환 모드 실행
fn run_conversion(config: &Config, json_files: Vec<PathBuf>, verbose: bool) -> Result<()> {
    let stats = Statistics::new(json_files.len());
    let pb = create_progress_bar(json_files.len());

    println!(
        "\n{} 처리 시작: {}",
        "⚡".bright_cyan(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let report = run(config, json_files, &pb, &stats).context("변환 실패")?;

    pb.finish_with_message("완료!");

    // 에러 출력
    print_errors(&report.failures, verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = config.log {
        write_error_log(log_path, &report.failures)?;
    }

    // 통계 출력
    stats.print_summary();

    println!(
        "\n{} 결과 저장 완료: {:?} ({} 행)",
        "✅".bright_green(),
        report.merge.output,
        report.merge.data_lines
    );
    println!(
        "{} 처리 종료: {}\n",
        "🏁".bright_white(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

/// 파싱 실패 파일 목록 출력
fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 파싱할 수 없는 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)
        .with_context(|| format!("로그 파일을 만들 수 없습니다: {:?}", log_path))?;

    writeln!(log_file, "jsoncsv 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", Local::now().to_rfc3339())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_error_log() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("errors.log");
        let errors = vec![(PathBuf::from("bad.json"), "JSON 파싱 실패".to_string())];

        write_error_log(&log, &errors).unwrap();

        let text = fs::read_to_string(&log).unwrap();
        assert!(text.contains("총 에러 수: 1"));
        assert!(text.contains("bad.json"));
        assert!(text.contains("JSON 파싱 실패"));
    }

    #[test]
    fn test_config_errors_exit_with_code_two() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            input: dir.path().to_path_buf(),
            header: Some(" , ".to_string()),
            ..Args::default()
        };
        let err = Config::from_args(&args).unwrap_err();
        assert_eq!(config_error_exit_code(&err), Some(2));

        let missing = Args {
            input: dir.path().join("missing"),
            header: Some("id".to_string()),
            ..Args::default()
        };
        let err = Config::from_args(&missing).unwrap_err();
        assert_eq!(config_error_exit_code(&err), Some(2));

        let runtime = JsonCsvError::WriteError {
            file: dir.path().join("results.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(config_error_exit_code(&runtime), None);
    }

    #[test]
    fn test_run_conversion_writes_result() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": 1}"#).unwrap();

        let args = Args {
            input: dir.path().to_path_buf(),
            header: Some("id".to_string()),
            ..Args::default()
        };
        let config = Config::from_args(&args).unwrap();
        let matcher = PatternMatcher::new(None).unwrap();
        let files = collect_json_files(&config.input_dir, config.max_depth, &matcher);

        run_conversion(&config, files, false).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("results.txt")).unwrap(),
            "id\n1\n"
        );
    }
}
