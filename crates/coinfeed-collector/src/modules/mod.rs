//! 데이터 수집 모듈.

pub mod batch_fetch;
pub mod cycle;
pub mod scheduler;

pub use batch_fetch::{fetch_in_batches, plan_chunks, BatchOutcome, BatchSettings};
pub use cycle::{CycleRunner, IngestionCycle};
pub use scheduler::Scheduler;
