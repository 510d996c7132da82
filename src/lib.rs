//! IGEM/UP/1 가스 배관 체적 산정과 시험/퍼지 파라미터 유도 엔진.
//! 계산 로직은 라이브러리에 두고 CLI는 얇게 유지한다.

pub mod app;
pub mod config;
pub mod conversion;
pub mod form;
pub mod gas;
pub mod i18n;
pub mod quantity;
pub mod report;
pub mod ui_cli;
pub mod units;
