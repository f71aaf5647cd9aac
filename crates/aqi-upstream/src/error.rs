use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} timed out")]
    Timeout { service: &'static str },
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} returned an unexpected payload: {message}")]
    Payload {
        service: &'static str,
        message: String,
    },
    #[error("city not found: {0}")]
    NotFound(String),
    #[error("no route found between the requested locations")]
    NoRoute,
}

impl UpstreamError {
    pub(crate) fn from_reqwest(service: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { service }
        } else if source.is_decode() {
            Self::Payload {
                service,
                message: source.to_string(),
            }
        } else {
            Self::Http { service, source }
        }
    }

    pub(crate) fn payload(service: &'static str, message: impl Into<String>) -> Self {
        Self::Payload {
            service,
            message: message.into(),
        }
    }
}
