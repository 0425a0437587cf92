use fm_matrix::Dims;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("cannot multiply {a} by {b}: left columns must equal right rows")]
    NotConformable { a: Dims, b: Dims },
    #[error("{dims} product has more elements than fit in memory")]
    TooLarge { dims: Dims },
    #[error("{strategy}: failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        strategy: String,
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("{strategy}: worker {worker} panicked")]
    WorkerPanicked { strategy: String, worker: usize },
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("invalid worker limit: {0}")]
    InvalidWorkerLimit(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
