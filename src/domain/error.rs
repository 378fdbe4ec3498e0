// Error taxonomy for per-file processing
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("could not read dimensions of {image}: {message}")]
    ImageIntrospection { image: String, message: String },

    #[error("unknown legend color: {color}")]
    UnknownLegendColor { color: String },

    #[error("renderer failed: {message}")]
    RenderExecution { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnnotateError {
    pub fn invalid_parameter<S: Into<String>>(name: &'static str, message: S) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn image_introspection<I: Into<String>, S: Into<String>>(image: I, message: S) -> Self {
        Self::ImageIntrospection {
            image: image.into(),
            message: message.into(),
        }
    }

    pub fn render_execution<S: Into<String>>(message: S) -> Self {
        Self::RenderExecution {
            message: message.into(),
        }
    }
}

pub type AnnotateResult<T> = Result<T, AnnotateError>;
