pub mod config;
pub mod error;
pub mod model;
pub mod purl;
pub mod testing;

pub use config::{FilterConfig, ParamCollision};
pub use error::{ProjectqlError, Result};
pub use model::{Classifier, Tag, Team};
pub use purl::PackageUrl;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// A value bound to a named placeholder in a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Team(Team),
    Tag(Tag),
    Text(String),
    Classifier(Classifier),
    Uuid(Uuid),
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<Team> for ParamValue {
    fn from(t: Team) -> Self {
        ParamValue::Team(t)
    }
}

impl From<Tag> for ParamValue {
    fn from(t: Tag) -> Self {
        ParamValue::Tag(t)
    }
}

impl From<Classifier> for ParamValue {
    fn from(c: Classifier) -> Self {
        ParamValue::Classifier(c)
    }
}

impl From<Uuid> for ParamValue {
    fn from(u: Uuid) -> Self {
        ParamValue::Uuid(u)
    }
}

pub type Params = BTreeMap<String, ParamValue>;

/// A filter expression plus the parameters its placeholders refer to, as
/// handed to the query manager that executes it.
pub trait QueryFilter {
    fn filter(&self) -> String;
    fn params(&self) -> &Params;
}

/// Built filter, detached from the builder that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub filter: String,
    pub params: Params,
}

impl QueryFilter for ProjectFilter {
    fn filter(&self) -> String {
        self.filter.clone()
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

/// Named placeholders (`:name`) referenced in a filter string.
pub fn placeholders(filter: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut chars = filter.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != ':' {
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while let Some(&(j, d)) = chars.peek() {
            if d.is_ascii_alphanumeric() || d == '_' {
                end = j + d.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        if end > start {
            found.insert(filter[start..end].to_string());
        }
    }
    found
}
