//! The `funding.json` manifest model.
//!
//! Field names follow the wire format (camelCase). `url` and `body` are
//! pipeline metadata: they are never read from or written to the JSON.

use serde::{Deserialize, Serialize};

/// A decoded funding manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Where the manifest was fetched from.
    #[serde(skip)]
    pub url: String,

    /// Raw JSON body, verbatim, for audit and storage.
    #[serde(skip)]
    pub body: String,

    /// Schema version (e.g., "v1.0.0").
    #[serde(default)]
    pub version: String,

    /// The publishing organisation or individual.
    #[serde(default)]
    pub entity: Entity,

    /// Funded projects, in document order.
    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub funding: Funding,
}

/// A URL that may be subject to a provenance check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRef {
    #[serde(default)]
    pub url: String,

    /// Absolute URL of the disclosure list published by `url`'s domain.
    /// Empty means the reference is not checked.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub well_known: String,
}

impl UrlRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            well_known: String::new(),
        }
    }

    pub fn with_well_known(mut self, well_known: impl Into<String>) -> Self {
        self.well_known = well_known.into();
        self
    }

    /// Whether a disclosure list is declared for this URL.
    pub fn is_verifiable(&self) -> bool {
        !self.well_known.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// "individual", "group", "organisation", ...
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub webpage_url: UrlRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub guid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub webpage_url: UrlRef,

    #[serde(default)]
    pub repository_url: UrlRef,

    /// SPDX identifiers, e.g. "spdx:MIT".
    #[serde(default)]
    pub licenses: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funding {
    #[serde(default)]
    pub channels: Vec<Channel>,

    #[serde(default)]
    pub plans: Vec<Plan>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub guid: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub guid: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub amount: f64,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub frequency: String,

    /// GUIDs of the channels this plan accepts.
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub year: u16,

    #[serde(default)]
    pub income: f64,

    #[serde(default)]
    pub expenses: f64,

    #[serde(default)]
    pub taxes: f64,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub description: String,
}

impl Manifest {
    /// Every URL reference subject to provenance checking, in check order:
    /// the entity webpage, then per project its webpage and repository.
    ///
    /// Labels use the wire field paths (`projects[1].repositoryUrl`).
    pub fn provenance_targets(&self) -> Vec<(String, &UrlRef)> {
        let mut targets = Vec::with_capacity(1 + self.projects.len() * 2);
        targets.push(("entity.webpageUrl".to_string(), &self.entity.webpage_url));

        for (i, project) in self.projects.iter().enumerate() {
            targets.push((format!("projects[{}].webpageUrl", i), &project.webpage_url));
            targets.push((
                format!("projects[{}].repositoryUrl", i),
                &project.repository_url,
            ));
        }

        targets
    }
}
