//! 가스 배관 체적 산정과 시험/퍼지 파라미터 유도 모듈 모음.

pub mod error;
pub mod meter_allowance;
pub mod procedure;
pub mod purge_helpers;
pub mod reference_data;
pub mod segment_volume;
pub mod test_plan;
pub mod totals;

pub use error::SizingError;
pub use meter_allowance::{meter_allowance, MeterAllowance, MeterSelection};
pub use procedure::{
    evaluate, plan_outcome, summarize_purge, ProcedureReport, PurgeRequest, PurgeSummary,
    TestPlanOutcome, VolumeSource,
};
pub use purge_helpers::*;
pub use reference_data::{MeterKind, ReferenceTables, TableId};
pub use segment_volume::{install_volume, purge_volume, PipeSegment};
pub use test_plan::*;
pub use totals::*;
