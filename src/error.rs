//! Plugin error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while managing plugin GPU resources.
///
/// All of these are handled locally: the frame path logs them and skips the
/// dependent operation, nothing is propagated to the host.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The streaming assets path has not been provided by the host yet.
    #[error("streaming assets path has not been provided yet")]
    AssetsPathUnset,

    /// A frame or resource operation arrived while no device is active.
    #[error("graphics device is not initialized")]
    DeviceNotInitialized,

    /// A shader bytecode file could not be opened or read.
    #[error("failed to read shader {}: {source}", path.display())]
    ShaderIo {
        /// Path of the shader file that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backend reported a failure while creating a resource.
    #[error("failed to create {what}: {reason}")]
    ResourceCreationFailed {
        /// Which resource was being created.
        what: &'static str,
        /// Backend-provided failure description.
        reason: String,
    },

    /// The backend rejected a buffer write.
    #[error("buffer write failed: {0}")]
    BufferWriteFailed(String),

    /// The backend rejected a draw submission.
    #[error("draw submission failed: {0}")]
    DrawFailed(String),

    /// The backend rejected a texture upload.
    #[error("texture update failed: {0}")]
    TextureUpdateFailed(String),
}

/// Convenience alias for plugin results.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PluginError::AssetsPathUnset;
        assert_eq!(
            err.to_string(),
            "streaming assets path has not been provided yet"
        );

        let err = PluginError::ResourceCreationFailed {
            what: "vertex buffer",
            reason: "out of memory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to create vertex buffer: out of memory"
        );
    }
}
