//! Identifier canonicalization
//!
//! Some packages ship under several identifiers (split builds, loader ports,
//! renamed artifacts). Each group below lists identifiers that satisfy each
//! other; the first member is the representative used as the graph key.

/// Built-in equivalence groups. The first entry of each group is canonical.
pub const EQUIVALENT_GROUPS: &[&[&str]] = &[
    &["puzzleslib", "puzzlesapi", "puzzlesaccessapi"],
    &["create", "flywheel", "ponder"],
    &["fabric", "fabricloader", "connector", "connectormod"],
    &[
        "fabric-api",
        "fabric_api",
        "fabric-api-base",
        "fabric-resource-loader-v0",
        "fabric-rendering-v1",
    ],
    &["owo", "owo-lib"],
    &["xaeroworldmap", "xaerosworldmap"],
    &["thermal_expansion", "thermal"],
];

/// Canonicalize against the built-in table only.
pub fn canonicalize(id: &str) -> &str {
    EQUIVALENT_GROUPS
        .iter()
        .find(|group| group.contains(&id))
        .map(|group| group[0])
        .unwrap_or(id)
}

/// Equivalence table combining the built-in groups with user-configured ones.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    groups: Vec<Vec<String>>,
}

impl Canonicalizer {
    /// Built-in groups followed by `extra` groups (empty groups are skipped).
    pub fn new(extra: &[Vec<String>]) -> Self {
        let mut groups: Vec<Vec<String>> = EQUIVALENT_GROUPS
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect();
        groups.extend(extra.iter().filter(|g| !g.is_empty()).cloned());
        Self { groups }
    }

    /// Representative of the first group containing `id`, or `id` itself.
    pub fn canonicalize<'a>(&'a self, id: &'a str) -> &'a str {
        self.groups
            .iter()
            .find(|group| group.iter().any(|member| member == id))
            .map(|group| group[0].as_str())
            .unwrap_or(id)
    }

    /// True when both identifiers share a representative.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.canonicalize(a) == self.canonicalize(b)
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&[])
    }
}
