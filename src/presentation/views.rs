use askama::Error as AskamaError;
use thiserror::Error;

pub mod posts;

#[derive(Debug, Error)]
#[error("{public_message} ({origin})")]
pub struct TemplateRenderError {
    origin: &'static str,
    public_message: &'static str,
    #[source]
    error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(origin: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            origin,
            public_message,
            error,
        }
    }
}
