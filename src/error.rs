use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Please enter a task description.")]
    EmptyText,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type TaskResult<T> = Result<T, TaskError>;
