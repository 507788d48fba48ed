//! Startup failures
//!
//! Anything that goes wrong before the first frame is fatal. Gameplay itself
//! has no error paths: a collision is a phase change, not an error.

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("no browser window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element #{0} not found")]
    MissingElement(&'static str),

    #[error("element #{0} is not a canvas")]
    NotACanvas(&'static str),

    #[error("failed to create WebGPU surface: {0}")]
    Surface(String),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(String),

    #[error("failed to create graphics device: {0}")]
    Device(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_element() {
        let err = StartupError::MissingElement("canvas");
        assert_eq!(err.to_string(), "element #canvas not found");
        let err = StartupError::NotACanvas("canvas");
        assert_eq!(err.to_string(), "element #canvas is not a canvas");
    }
}
