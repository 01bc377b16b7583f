//! Knowledge domain registry.
//!
//! A domain is a named knowledge scope (one aircraft type, or the briefing
//! assistant) with its own conversation history and retrieval backend
//! routing. The set of domains is fixed at startup.

/// Display metadata for a single knowledge domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInfo {
    /// Stable identifier used as the session map key (e.g. "a320").
    pub tag: String,
    /// Human-readable name shown in the UI (e.g. "A320").
    pub display_name: String,
    /// Short description of what the domain covers.
    pub description: String,
}

impl DomainInfo {
    /// Creates a new `DomainInfo`.
    pub fn new(
        tag: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }
}

/// The fixed, insertion-ordered set of knowledge domains.
///
/// Exactly one domain is "active" in the UI at any time; the registry only
/// enumerates what exists and how to display it. Operations against a tag
/// that is not registered are rejected at the service boundary.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    domains: Vec<DomainInfo>,
}

impl DomainRegistry {
    /// Creates a registry from an explicit domain list.
    pub fn new(domains: Vec<DomainInfo>) -> Self {
        Self { domains }
    }

    /// Returns the built-in fleet registry.
    pub fn builtin() -> Self {
        Self::new(vec![
            DomainInfo::new("a320", "A320", "A320 family systems and procedures"),
            DomainInfo::new("a330", "A330", "A330 systems and procedures"),
            DomainInfo::new("a350", "A350", "A350 systems and procedures"),
            DomainInfo::new("briefing", "Briefing", "Flight preparation and briefing assistant"),
        ])
    }

    /// Looks up a domain by its tag.
    pub fn get(&self, tag: &str) -> Option<&DomainInfo> {
        self.domains.iter().find(|d| d.tag == tag)
    }

    /// Returns true if the tag names a registered domain.
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Returns all registered domains in registration order.
    pub fn domains(&self) -> &[DomainInfo] {
        &self.domains
    }

    /// Returns the tag of the first registered domain, if any.
    ///
    /// Used as the initially active domain.
    pub fn first_tag(&self) -> Option<&str> {
        self.domains.first().map(|d| d.tag.as_str())
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
