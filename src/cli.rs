//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::merge::MergeOrder;

/// jsoncsv CLI 인자 구조체
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jsoncsv",
    author = "YourName <your@email.com>",
    version,
    about = "JSON FOLDER TO CSV FLATTENER - 폴더 내 JSON 파일들을 헤더 기준으로 평탄화하여 하나의 CSV로 병합하는 CLI 도구",
    long_about = r#"
JSON FOLDER TO CSV FLATTENER
============================

지정된 폴더 내의 모든 JSON 파일을 읽어 헤더에 지정한 필드를
중첩 깊이와 상관없이 찾아내고, 파일마다 한 줄씩 구분자로 연결합니다.
결과는 배치 파일(j_results_*.txt)로 나뉘어 기록된 뒤
하나의 결과 파일로 병합됩니다.

특징:
  • 중첩 문서 재귀 탐색 (필드 이름 대소문자 무시)
  • 컬렉션 개수만 출력하는 모드
  • 값 안의 구분자를 보조 구분자로 치환
  • 배치 단위 기록 및 병합
  • 대화형 입력 모드

예제:
  jsoncsv -i ./data --header "id,name,tags"
  jsoncsv -i ./data --header "id,tags" --counts-only -b 1000
  jsoncsv -i ./data --header "id,comment" -e ";" --file-name
  jsoncsv --interactive
"#
)]
pub struct Args {
    /// JSON 파일들이 있는 입력 폴더 경로 (기본값: 현재 폴더)
    #[arg(short, long, default_value = ".")]
    pub input: PathBuf,

    /// 결과 파일 이름 (출력 폴더 기준, 기본값: results.txt)
    #[arg(short, long, default_value = "results.txt")]
    pub output: PathBuf,

    /// 배치 파일과 결과 파일을 쓸 폴더 (기본값: 입력 폴더)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// 쉼표로 구분된 헤더 (예: "id,name,title")
    #[arg(short = 'H', long)]
    pub header: Option<String>,

    /// 행 구분자 (기본값: 쉼표, "\t"는 탭)
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,

    /// 값 안의 구분자를 대체할 보조 구분자
    #[arg(short, long)]
    pub escape_delimiter: Option<String>,

    /// 배열과 객체를 원소 수로 출력
    #[arg(long)]
    pub counts_only: bool,

    /// 배치 파일당 JSON 파일 수 (기본값: 배치 없음)
    #[arg(short, long, allow_negative_numbers = true)]
    pub batch_size: Option<i64>,

    /// 각 행 앞에 원본 파일 이름 컬럼(FileName) 추가
    #[arg(long)]
    pub file_name: bool,

    /// 배치 파일 병합 순서
    #[arg(long, value_enum, default_value_t = MergeOrder::Modified)]
    pub merge_order: MergeOrder,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "*_SUM_*", "data?.json")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 최대 폴더 탐색 깊이 (기본값: 1, 입력 폴더만)
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// 병렬 처리 스레드 수 (기본값: 1, 순차 처리)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// 파싱 실패 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 설정을 표준 입력에서 차례로 묻는 대화형 모드
    #[arg(short = 'I', long)]
    pub interactive: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("results.txt"),
            output_dir: None,
            header: None,
            delimiter: ",".to_string(),
            escape_delimiter: None,
            counts_only: false,
            batch_size: None,
            file_name: false,
            merge_order: MergeOrder::Modified,
            pattern: None,
            max_depth: 1,
            threads: None,
            log: None,
            verbose: false,
            dry_run: false,
            interactive: false,
        }
    }
}

impl Args {
    /// 헤더를 파싱하여 필드 이름 벡터로 반환
    pub fn get_header(&self) -> Option<Vec<String>> {
        self.header.as_deref().map(crate::columns::split_header)
    }
}
