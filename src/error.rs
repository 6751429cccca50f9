pub type StorycardResult<T> = Result<T, StorycardError>;

#[derive(thiserror::Error, Debug)]
pub enum StorycardError {
    #[error("quote text is required")]
    MissingQuote,

    #[error("cover image is required")]
    MissingImage,

    #[error("unprocessable image: {0}")]
    Unprocessable(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorycardError {
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// True for the input-validation failures that are reported verbatim to
    /// callers instead of being collapsed into a generic processing error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingQuote | Self::MissingImage)
    }
}
