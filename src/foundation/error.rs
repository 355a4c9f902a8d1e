pub type InkpadResult<T> = Result<T, InkpadError>;

#[derive(thiserror::Error, Debug)]
pub enum InkpadError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkpadError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for InkpadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            InkpadError::invalid_input("x")
                .to_string()
                .contains("invalid input:")
        );
        assert!(
            InkpadError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(InkpadError::render("x").to_string().contains("render error:"));
        assert!(InkpadError::model("x").to_string().contains("model error:"));
        assert!(
            InkpadError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = InkpadError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: InkpadError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, InkpadError::Serde(_)));
    }
}
