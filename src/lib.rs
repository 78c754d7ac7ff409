//! jsoncsv - JSON FOLDER TO CSV FLATTENER
//!
//! 폴더 내 JSON 파일들을 사용자가 지정한 헤더 기준으로 한 줄씩 평탄화하여,
//! 배치 파일로 나누어 기록한 뒤 하나의 결과 파일로 병합하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔎 **재귀 평탄화**: 중첩 깊이와 관계없이 헤더에 있는 필드 이름을 찾아 기록
//! - 🔠 **대소문자 무시**: 헤더와 JSON 필드 이름을 대소문자 구분 없이 매칭
//! - 🔁 **중복 헤더**: 같은 이름이 여러 번 나오면 모든 위치에 같은 값 기록
//! - 🔢 **개수 전용 모드**: 배열/객체를 내용 대신 원소 수로 출력
//! - ✂️ **보조 구분자**: 값 안의 구분자를 다른 문자로 치환하여 컬럼 정렬 유지
//! - 🗂️ **배치 기록**: 지정한 파일 수마다 중간 파일을 쓰고 마지막에 병합
//! - 💬 **대화형 모드**: 설정을 차례로 물어 실행
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! jsoncsv -i ./data --header "id,name,tags"
//!
//! # 배열은 개수만, 1000개 파일마다 배치
//! jsoncsv -i ./data --header "id,tags" --counts-only -b 1000
//!
//! # 값 안의 쉼표를 세미콜론으로 치환하고 파일 이름 컬럼 추가
//! jsoncsv -i ./data --header "id,comment" -e ";" --file-name
//! ```

pub mod batch;
pub mod cli;
pub mod columns;
pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod merge;
pub mod pattern;
pub mod pipeline;
pub mod processor;
pub mod prompt;
pub mod row;
pub mod stats;

// Re-exports for convenient access
pub use batch::{BatchSize, BatchWriter};
pub use cli::Args;
pub use columns::ColumnIndex;
pub use config::Config;
pub use error::{JsonCsvError, Result};
pub use flatten::{flatten_document, FlattenOptions, RowBuffer};
pub use merge::{merge_batches, MergeOrder};
pub use pattern::PatternMatcher;
pub use pipeline::{collect_json_files, run, RunReport};
pub use processor::{process_file, ProcessContext, ProcessResult};
pub use row::RowAssembler;
pub use stats::{format_bytes, Snapshot, Statistics};
