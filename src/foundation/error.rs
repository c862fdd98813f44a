pub type BehindTextResult<T> = Result<T, BehindTextError>;

#[derive(thiserror::Error, Debug)]
pub enum BehindTextError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("sticker error: {0}")]
    Sticker(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BehindTextError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub fn sticker(msg: impl Into<String>) -> Self {
        Self::Sticker(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-classify any error as an upload failure, keeping its message.
    pub(crate) fn into_upload(self) -> Self {
        match self {
            Self::Upload(_) => self,
            other => Self::Upload(other.to_string()),
        }
    }

    /// Re-classify any error as a sticker failure, keeping its message.
    pub(crate) fn into_sticker(self) -> Self {
        match self {
            Self::Sticker(_) => self,
            other => Self::Sticker(other.to_string()),
        }
    }

    /// Re-classify any error as an export failure, keeping its message.
    pub(crate) fn into_export(self) -> Self {
        match self {
            Self::Export(_) => self,
            other => Self::Export(other.to_string()),
        }
    }
}
