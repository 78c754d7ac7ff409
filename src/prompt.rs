//! 대화형 입력 모듈
//!
//! `--interactive` 모드에서 설정 값을 차례로 물어 `Args`를 채웁니다.
//! 빈 입력은 기본값을 사용합니다.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cli::Args;

/// 표준 입력에서 설정을 묻고 기존 인자에 덮어쓴 결과 반환
///
/// 질문 순서: 입력 폴더, 구분자, 보조 구분자, 헤더, 개수 전용 모드,
/// 배치 크기, 파일 이름 컬럼.
///
/// # Arguments
/// * `input` - 답변을 읽을 입력
/// * `output` - 질문을 쓸 출력
/// * `base` - 대화형으로 묻지 않는 나머지 옵션
pub fn prompt_args<R: BufRead, W: Write>(mut input: R, mut output: W, base: Args) -> io::Result<Args> {
    let mut args = base;

    let dir = ask(
        &mut input,
        &mut output,
        "JSON 폴더 경로를 입력하세요 (생략하면 현재 폴더):",
    )?;
    args.input = if dir.is_empty() || dir == "." {
        std::env::current_dir()?
    } else {
        PathBuf::from(dir)
    };

    let delimiter = ask(&mut input, &mut output, "구분자를 입력하세요 (생략하면 쉼표):")?;
    args.delimiter = if delimiter.is_empty() {
        ",".to_string()
    } else {
        delimiter
    };

    let escape = ask(
        &mut input,
        &mut output,
        "보조 구분자를 입력하세요 (선택). 데이터에 구분자와 같은 문자가 있으면 이 문자로 바뀝니다:",
    )?;
    args.escape_delimiter = Some(escape).filter(|s| !s.is_empty());

    let header = ask(&mut input, &mut output, "쉼표로 구분된 헤더를 입력하세요:")?;
    args.header = Some(header).filter(|s| !s.is_empty());

    args.counts_only = is_yes(&ask(
        &mut input,
        &mut output,
        "배열/객체는 개수만 출력할까요 (Y/N)?",
    )?);

    let batch = ask(
        &mut input,
        &mut output,
        "배치 파일당 JSON 파일 수를 입력하세요 (생략하면 배치 없음):",
    )?;
    // 숫자가 아니면 배치 없음, 0 이하는 설정 검증에서 거부됨
    args.batch_size = batch.trim().parse::<i64>().ok();

    args.file_name = is_yes(&ask(
        &mut input,
        &mut output,
        "각 행에 파일 이름을 포함할까요 (Y/N)?",
    )?);

    Ok(args)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    writeln!(output)?;
    writeln!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn is_yes(answer: &str) -> bool {
    answer == "Y" || answer == "y"
}
