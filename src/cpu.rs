use rocket::serde::{Deserialize, Serialize};

use crate::model::{Count, Workload};
use crate::timing::{run_blocking, WorkloadResponse};

const DEFAULT_N: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpuResult {
    pub n: u64,
    pub sum: f64,
}

/// Sum of `sqrt(i)` for `i` in `1..=n`, accumulated in ascending order.
#[tracing::instrument(level = "debug")]
pub fn sum_of_square_roots(n: u64) -> f64 {
    (1..=n).map(|i| (i as f64).sqrt()).sum()
}

#[get("/cpu?<n>")]
pub async fn cpu(n: Option<Count>) -> WorkloadResponse<CpuResult> {
    let n = n.map_or(DEFAULT_N, Count::get);
    run_blocking(Workload::Cpu, move || {
        Ok(CpuResult {
            n,
            sum: sum_of_square_roots(n),
        })
    })
    .await
}
