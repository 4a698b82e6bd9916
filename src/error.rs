pub type LyrisResult<T> = Result<T, LyrisError>;

#[derive(thiserror::Error)]
pub enum LyrisError {
    /// The reply was parsed but its TYPE was not `success`. Carries the server message.
    #[error("Mailing list API rejected the request: {0}")]
    Api(String),
    #[error("Failed to reach the mailing list API.")]
    Http(#[from] reqwest::Error),
    #[error("Mailing list API returned a malformed reply: {0}")]
    MalformedReply(String),
    #[error("Failed to write the request document.")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("{value} is not a valid value for {field}")]
    InvalidField { field: String, value: String },
    #[error("{0}")]
    InvalidEmail(String),
}

impl LyrisError {
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        LyrisError::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, LyrisError::Api(_))
    }
}

impl From<roxmltree::Error> for LyrisError {
    fn from(err: roxmltree::Error) -> Self {
        LyrisError::MalformedReply(err.to_string())
    }
}

impl std::fmt::Debug for LyrisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)?;

        if let Some(source) = std::error::Error::source(self) {
            write!(f, "\n\t({})", source)?;
        }

        Ok(())
    }
}
