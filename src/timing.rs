use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::tokio::task::{self, JoinError};

use crate::model::Workload;

/// Output of a workload together with the wall-clock time it took.
#[derive(Debug)]
pub struct Timed<T> {
    pub output: T,
    pub elapsed: Duration,
}

/// Runs `f` between two clock readings.
///
/// If `f` unwinds, the elapsed time up to the panic is still logged.
pub fn timed<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let guard = scopeguard::guard_on_unwind(start, |start| {
        tracing::error!(
            elapsed_ms = duration_ms(start.elapsed()),
            "workload panicked"
        );
    });
    let output = f();
    let elapsed = scopeguard::ScopeGuard::into_inner(guard).elapsed();
    Timed { output, elapsed }
}

pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Index of the thread running the workload, assigned on first use.
pub fn worker_index() -> usize {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    thread_local! {
        static INDEX: usize = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    INDEX.with(|i| *i)
}

#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("workbench/io: {0}")]
    IO(#[from] std::io::Error),
    #[error("workbench/json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("workbench/task: {0}")]
    Join(#[from] JoinError),
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub workload: Workload,
    #[serde(flatten)]
    pub result: T,
    pub elapsed_ms: f64,
    pub pid: u32,
    pub worker: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<Workload>,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(workload: Option<Workload>, error: String) -> Self {
        ErrorResponse {
            status: "KO".into(),
            workload,
            error,
        }
    }
}

pub type WorkloadResponse<T> = Result<Json<Envelope<T>>, status::Custom<Json<ErrorResponse>>>;

/// Runs a workload on the blocking pool, times it, and wraps the outcome
/// into either a result envelope or a 500 error body.
pub async fn run_blocking<T, F>(workload: Workload, f: F) -> WorkloadResponse<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, WorkloadError> + Send + 'static,
{
    let (run, worker) = match task::spawn_blocking(move || (timed(f), worker_index())).await {
        Ok(v) => v,
        Err(err) => {
            tracing::error!(?workload, "{err}");
            return Err(internal_error(workload, err.into()));
        }
    };
    let elapsed_ms = duration_ms(run.elapsed);
    match run.output {
        Ok(result) => {
            tracing::info!(?workload, elapsed_ms, worker, "workload done");
            Ok(Json(Envelope {
                workload,
                result,
                elapsed_ms,
                pid: std::process::id(),
                worker,
            }))
        }
        Err(err) => {
            tracing::error!(?workload, elapsed_ms, "{err}");
            Err(internal_error(workload, err))
        }
    }
}

fn internal_error(workload: Workload, err: WorkloadError) -> status::Custom<Json<ErrorResponse>> {
    status::Custom(
        Status::InternalServerError,
        Json(ErrorResponse::new(Some(workload), err.to_string())),
    )
}
