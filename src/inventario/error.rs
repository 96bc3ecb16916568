use crate::commands::CmdResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventarioError {
    #[error("{0}")]
    Validation(String),

    #[error("No inventory selected")]
    NoInventorySelected,

    #[error("Inventory not found: {0}")]
    InventoryNotFound(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Storage quota exceeded: state needs {needed} bytes but the quota is {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// The in-memory state was changed but the durable copy was not updated.
    /// `result` is what the command returned, created ids included.
    #[error("Change applied but not saved, it may not survive a restart: {source}")]
    Unsaved {
        result: Box<CmdResult>,
        source: Box<InventarioError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl InventarioError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for user-input problems: the operation was aborted before any state change.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NoInventorySelected | Self::SectionNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, InventarioError>;
