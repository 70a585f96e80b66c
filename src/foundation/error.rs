pub type SkyhourResult<T> = Result<T, SkyhourError>;

/// Crate-wide error type, split by which input is at fault: the generation
/// config, the font, or the rendering pipeline itself. I/O and encoding
/// failures travel through `Other` with their context attached.
#[derive(thiserror::Error, Debug)]
pub enum SkyhourError {
    #[error("config error: {0}")]
    Config(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkyhourError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
