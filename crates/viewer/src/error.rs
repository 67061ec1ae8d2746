use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Terminal I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
