use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("render size {width}x{height} is empty")]
    EmptyTarget { width: u32, height: u32 },
}
