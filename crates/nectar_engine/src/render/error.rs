//! Rendering errors and the error-handler collaborator

use log::error;

/// Display-list protocol errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// A layer with this selector already exists
    #[error("layer already exists")]
    LayerExists,

    /// No layer with this selector
    #[error("layer does not exist")]
    LayerNotFound,

    /// Another layer is still open
    #[error("layer already open")]
    LayerAlreadyOpen,

    /// The operation needs an open layer
    #[error("no layer open")]
    NoLayerOpen,
}

/// Failures writing a rendered frame out
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Image encoding or file output failed
    #[error("Failed to export frame: {0}")]
    Export(String),
}

/// Receives messages about malformed scenes found while rendering
///
/// Rendering never stops for a structural problem: the offending element
/// is skipped and the handler is told why.
pub trait ErrorHandler: Send {
    /// Report one problem
    fn handle_error(&mut self, message: &str);
}

/// Default handler that reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn handle_error(&mut self, message: &str) {
        error!("Render error: {message}");
    }
}

impl<F: FnMut(&str) + Send> ErrorHandler for F {
    fn handle_error(&mut self, message: &str) {
        self(message);
    }
}
