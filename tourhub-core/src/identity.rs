use crate::tour::{Host, Participant};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tourhub_shared::MaskedEmail;

/// Which pool a synthetic order's customer identity is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// A real attendee, pulled from the tour's participant list by index
    Participant,
    /// A generated demo customer, pulled from the name sampler by index
    Generated,
    /// The tour host, used when a workflow needs orders but no attendees exist
    Host,
}

/// The customer block stamped onto a synthetic order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: MaskedEmail,
}

impl CustomerIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Supplies indexed first/last name pairs for generated demo customers.
/// The production sampler draws from a name corpus; tests inject fixtures.
pub trait NameSampler: Send + Sync {
    fn sample(&self, index: usize) -> Option<(String, String)>;
}

/// Deterministic sampler over a fixed roster, cycling by index.
pub struct RosterNameSampler {
    roster: Vec<(&'static str, &'static str)>,
}

impl RosterNameSampler {
    pub fn new() -> Self {
        Self {
            roster: vec![
                ("Ada", "Hargreaves"),
                ("Miles", "Okafor"),
                ("June", "Castellano"),
                ("Theo", "Lindqvist"),
                ("Priya", "Raghunathan"),
                ("Marcus", "Delacroix"),
                ("Ingrid", "Svensson"),
                ("Rafael", "Quintero"),
                ("Hana", "Kobayashi"),
                ("Dmitri", "Volkov"),
                ("Celeste", "Moreau"),
                ("Kofi", "Mensah"),
            ],
        }
    }
}

impl Default for RosterNameSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl NameSampler for RosterNameSampler {
    fn sample(&self, index: usize) -> Option<(String, String)> {
        let (first, last) = self.roster[index % self.roster.len()];
        Some((first.to_string(), last.to_string()))
    }
}

/// Resolves customer identities for synthetic orders. Pure lookup over the
/// loaded tour data and the injected sampler; deterministic given the same
/// inputs and sampling sequence.
pub struct IdentitySource {
    participants: Vec<Participant>,
    host: Host,
    sampler: Arc<dyn NameSampler>,
}

impl IdentitySource {
    pub fn new(participants: Vec<Participant>, host: Host, sampler: Arc<dyn NameSampler>) -> Self {
        Self {
            participants,
            host,
            sampler,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn resolve(&self, kind: IdentityKind, index: usize) -> CustomerIdentity {
        match kind {
            IdentityKind::Participant => self.resolve_participant(index),
            IdentityKind::Generated => self.resolve_generated(index),
            IdentityKind::Host => self.resolve_host(),
        }
    }

    fn resolve_participant(&self, index: usize) -> CustomerIdentity {
        let participant = self.participants.get(index);

        let first_name = participant
            .map(|p| p.first_name.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Participant".to_string());
        let last_name = participant
            .map(|p| p.last_name.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{}", index + 1));
        let email = participant
            .map(|p| p.email.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("participant{}@demo.com", index + 1));

        CustomerIdentity {
            first_name,
            last_name,
            email: MaskedEmail::new(email),
        }
    }

    fn resolve_generated(&self, index: usize) -> CustomerIdentity {
        let (first_name, last_name) = self
            .sampler
            .sample(index)
            .unwrap_or_else(|| ("Demo".to_string(), format!("Customer {}", index + 1)));

        let email = format!(
            "{}.{}@demo.com",
            slugify(&first_name),
            slugify(&last_name)
        );

        CustomerIdentity {
            first_name,
            last_name,
            email: MaskedEmail::new(email),
        }
    }

    fn resolve_host(&self) -> CustomerIdentity {
        let first_name = self
            .host
            .first_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.host.display_name.clone());
        let last_name = self
            .host
            .last_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_default();

        let email = format!("{}@demo.com", slugify(&self.host.display_name));

        CustomerIdentity {
            first_name,
            last_name,
            email: MaskedEmail::new(email),
        }
    }
}

/// Lowercase alphanumeric with dots, for synthesized email local parts
fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect::<String>()
        .split('.')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
