use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address shared by warehouse records and order ship/bill blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PostalAddress {
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PostalAddress {
    pub fn new(street1: &str, city: &str, state: &str, zip: &str, country: &str) -> Self {
        Self {
            street1: street1.to_string(),
            street2: None,
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
            country: country.to_string(),
            phone: None,
        }
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ", self.street1)?;
        if let Some(street2) = &self.street2 {
            write!(f, "{}, ", street2)?;
        }
        write!(
            f,
            "{}, {} {}, {}",
            self.city, self.state, self.zip, self.country
        )
    }
}
