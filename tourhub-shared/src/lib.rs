pub mod address;
pub mod pii;

pub use address::PostalAddress;
pub use pii::MaskedEmail;
