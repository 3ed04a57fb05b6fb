//! Schema validation seam.
//!
//! The crawler never interprets schema rules itself; it hands the stamped
//! manifest to a [`SchemaValidator`] and continues with whatever comes back.
//! [`V1Schema`] covers the `v1.0.0` funding.json format.

use std::collections::HashSet;

use url::Url;

use crate::manifest::{Manifest, UrlRef};

/// Schema version accepted by [`V1Schema`].
pub const V1_VERSION: &str = "v1.0.0";

/// Path every v1 disclosure list must end with.
pub const WELL_KNOWN_SUFFIX: &str = "/.well-known/funding-manifest-urls";

/// A manifest the validator refused, with the value it handed back.
#[derive(Debug, Clone, thiserror::Error)]
#[error("manifest failed schema validation: {}", .violations.join("; "))]
pub struct SchemaError {
    /// The validator's (possibly partially normalised) manifest.
    pub manifest: Box<Manifest>,

    /// One message per broken rule.
    pub violations: Vec<String>,
}

impl SchemaError {
    pub fn new(manifest: Manifest, violations: Vec<String>) -> Self {
        Self {
            manifest: Box::new(manifest),
            violations,
        }
    }
}

/// Validates and normalises a decoded manifest.
///
/// Implementations must be deterministic and must not touch the network.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, manifest: Manifest) -> Result<Manifest, SchemaError>;
}

impl<F> SchemaValidator for F
where
    F: Fn(Manifest) -> Result<Manifest, SchemaError> + Send + Sync,
{
    fn validate(&self, manifest: Manifest) -> Result<Manifest, SchemaError> {
        self(manifest)
    }
}

/// Passes every manifest through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, manifest: Manifest) -> Result<Manifest, SchemaError> {
        Ok(manifest)
    }
}

/// Validator for the `v1.0.0` funding.json format.
///
/// Collects every violation before failing. Names and descriptions are
/// trimmed and project tags lower-cased and de-duplicated in both outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1Schema;

impl SchemaValidator for V1Schema {
    fn validate(&self, mut manifest: Manifest) -> Result<Manifest, SchemaError> {
        normalize(&mut manifest);

        let mut violations = Vec::new();

        if manifest.version != V1_VERSION {
            violations.push(format!(
                "version: expected {}, got {:?}",
                V1_VERSION, manifest.version
            ));
        }

        if manifest.entity.name.is_empty() {
            violations.push("entity.name: must not be empty".to_string());
        }
        if !manifest.entity.email.is_empty() && !manifest.entity.email.contains('@') {
            violations.push(format!(
                "entity.email: {:?} is not an email address",
                manifest.entity.email
            ));
        }

        let mut guids = HashSet::new();
        for (i, project) in manifest.projects.iter().enumerate() {
            if project.guid.is_empty() {
                violations.push(format!("projects[{}].guid: must not be empty", i));
            } else if !guids.insert(project.guid.as_str()) {
                violations.push(format!(
                    "projects[{}].guid: duplicate guid {:?}",
                    i, project.guid
                ));
            }
        }

        for (label, url_ref) in manifest.provenance_targets() {
            check_url_ref(&label, url_ref, &mut violations);
        }

        if violations.is_empty() {
            Ok(manifest)
        } else {
            Err(SchemaError::new(manifest, violations))
        }
    }
}

fn normalize(manifest: &mut Manifest) {
    trim_in_place(&mut manifest.entity.name);
    trim_in_place(&mut manifest.entity.description);

    for project in &mut manifest.projects {
        trim_in_place(&mut project.name);
        trim_in_place(&mut project.description);

        let mut seen = HashSet::new();
        project.tags = project
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();
    }
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

fn check_url_ref(label: &str, url_ref: &UrlRef, violations: &mut Vec<String>) {
    let url = match Url::parse(&url_ref.url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        Ok(u) => {
            violations.push(format!(
                "{}.url: unsupported scheme {:?}",
                label,
                u.scheme()
            ));
            return;
        }
        Err(e) => {
            violations.push(format!("{}.url: {:?} is not a valid URL: {}", label, url_ref.url, e));
            return;
        }
    };

    if !url_ref.is_verifiable() {
        return;
    }

    let well_known = match Url::parse(&url_ref.well_known) {
        Ok(u) => u,
        Err(e) => {
            violations.push(format!(
                "{}.wellKnown: {:?} is not a valid URL: {}",
                label, url_ref.well_known, e
            ));
            return;
        }
    };

    if well_known.scheme() != "https" {
        violations.push(format!("{}.wellKnown: must use https", label));
    }
    if well_known.host_str() != url.host_str() {
        violations.push(format!(
            "{}.wellKnown: host {:?} does not match url host {:?}",
            label,
            well_known.host_str().unwrap_or_default(),
            url.host_str().unwrap_or_default()
        ));
    }
    if !well_known.path().ends_with(WELL_KNOWN_SUFFIX) {
        violations.push(format!(
            "{}.wellKnown: path must end with {}",
            label, WELL_KNOWN_SUFFIX
        ));
    }
}
