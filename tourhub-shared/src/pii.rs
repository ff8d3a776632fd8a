use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// An email address that hides its local part in Debug/Display output.
///
/// Tour rosters flow through log macros and API traces; wrapping the email
/// keeps the real value available for serialization (order payloads need it)
/// while `tracing::info!("{:?}", ...)` only ever sees `j***@demo.com`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct MaskedEmail(pub String);

impl MaskedEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn masked(&self) -> String {
        match self.0.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().unwrap_or('*');
                format!("{}***@{}", first, domain)
            }
            None => "********".to_string(),
        }
    }
}

impl fmt::Debug for MaskedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Display for MaskedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl Serialize for MaskedEmail {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // API payloads need the real address; masking applies to logs only.
        self.0.serialize(serializer)
    }
}

impl From<String> for MaskedEmail {
    fn from(email: String) -> Self {
        Self(email)
    }
}

impl From<&str> for MaskedEmail {
    fn from(email: &str) -> Self {
        Self(email.to_string())
    }
}
