use crate::predicate::{build_filter, Predicate};
use projectql_core::{
    Classifier, FilterConfig, PackageUrl, ParamCollision, ParamValue, Params, ProjectFilter,
    ProjectqlError, QueryFilter, Result, Tag, Team,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use uuid::Uuid;

/// Accumulates filter clauses and their parameters for a project query.
///
/// Clauses are ANDed together in the order they were added. Each `with_*`
/// call binds its parameters in the same step that adds its clause, so the
/// bound names always match the placeholders in the built filter.
///
/// Parameter names are shared between criteria: `with_name` and
/// `with_fuzzy_name` both bind `name`. The later call wins unless the
/// builder is configured with [`ParamCollision::Reject`]. Rebinding a name
/// to an equal value replaces nothing and is not a collision.
#[derive(Debug, Clone, Default)]
pub struct ProjectQueryFilterBuilder {
    params: Params,
    clauses: Vec<Predicate>,
    config: FilterConfig,
    collisions: Vec<String>,
}

impl ProjectQueryFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn bind(&mut self, name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.params.insert(name.to_string(), value.clone()) {
            Some(previous) if previous != value => {
                debug!("Parameter {} rebound, previous value replaced", name);
                if !self.collisions.iter().any(|c| c == name) {
                    self.collisions.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    pub fn exclude_inactive(mut self, exclude_inactive: bool) -> Self {
        if exclude_inactive {
            self.clauses.push(
                Predicate::Or(vec![
                    Predicate::IsTrue { field: "active" },
                    Predicate::IsNull { field: "active" },
                ])
                .group(),
            );
        }
        self
    }

    pub fn with_team(mut self, team: &Team) -> Self {
        self.bind("team", team.clone());
        self.clauses.push(
            Predicate::Contains {
                collection: "accessTeams",
                param: "team",
            }
            .group(),
        );
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.bind("name", ParamValue::Text(name.into()));
        self.clauses.push(
            Predicate::Equals {
                field: "name",
                param: "name",
            }
            .group(),
        );
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.bind("version", ParamValue::Text(version.into()));
        self.clauses.push(
            Predicate::Equals {
                field: "version",
                param: "version",
            }
            .group(),
        );
        self
    }

    pub fn with_tag(mut self, tag: &Tag) -> Self {
        self.bind("tag", tag.clone());
        self.clauses.push(
            Predicate::Contains {
                collection: "tags",
                param: "tag",
            }
            .group(),
        );
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.bind("classifier", classifier);
        self.clauses.push(
            Predicate::Equals {
                field: "classifier",
                param: "classifier",
            }
            .group(),
        );
        self
    }

    /// Case-insensitive name match. The pattern is passed through untouched;
    /// callers must supply a well-formed pattern for the query engine.
    pub fn with_fuzzy_name(mut self, pattern: impl Into<String>) -> Self {
        self.bind("name", ParamValue::Text(pattern.into()));
        self.clauses.push(
            Predicate::Matches {
                field: "name",
                param: "name",
            }
            .group(),
        );
        self
    }

    pub fn with_fuzzy_name_or_exact_tag(mut self, pattern: impl Into<String>, tag: &Tag) -> Self {
        self.bind("name", ParamValue::Text(pattern.into()));
        self.bind("tag", tag.clone());
        self.clauses.push(
            Predicate::Or(vec![
                Predicate::Matches {
                    field: "name",
                    param: "name",
                },
                Predicate::Contains {
                    collection: "tags",
                    param: "tag",
                },
            ])
            .group(),
        );
        self
    }

    pub fn exclude_child_projects(mut self) -> Self {
        self.clauses.push(Predicate::IsNull { field: "parent" });
        self
    }

    pub fn with_parent(mut self, parent_uuid: Uuid) -> Self {
        self.bind("parentUuid", parent_uuid);
        self.clauses.push(Predicate::Equals {
            field: "parent.uuid",
            param: "parentUuid",
        });
        self
    }

    /// Match any of the given package identifiers. Absent identifiers are
    /// left out; with none present no clause is added.
    pub fn with_purl_or_cpe_or_swid(
        mut self,
        purl: Option<&PackageUrl>,
        cpe: Option<&str>,
        swid_tag_id: Option<&str>,
    ) -> Self {
        let mut terms = Vec::new();
        if let Some(purl) = purl {
            self.bind("purl", purl.canonicalize());
            terms.push(Predicate::Equals {
                field: "purl",
                param: "purl",
            });
        }
        if let Some(cpe) = cpe {
            self.bind("cpe", cpe);
            terms.push(Predicate::Equals {
                field: "cpe",
                param: "cpe",
            });
        }
        if let Some(swid_tag_id) = swid_tag_id {
            self.bind("swidTagId", swid_tag_id);
            terms.push(Predicate::Equals {
                field: "swidtagid",
                param: "swidTagId",
            });
        }

        match terms.len() {
            0 => {}
            1 => self.clauses.extend(terms),
            _ => self.clauses.push(Predicate::Or(terms).group()),
        }
        self
    }

    pub fn build_filter(&self) -> String {
        build_filter(&self.clauses)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn clauses(&self) -> &[Predicate] {
        &self.clauses
    }

    /// Placeholder names referenced by the accumulated clauses.
    pub fn placeholders(&self) -> BTreeSet<&'static str> {
        self.clauses.iter().flat_map(|c| c.placeholders()).collect()
    }

    pub fn build(self) -> ProjectFilter {
        let filter = self.build_filter();
        debug_assert!(
            self.placeholders()
                .into_iter()
                .eq(self.params.keys().map(String::as_str)),
            "placeholders and bound params diverged"
        );
        debug!(
            "Built project filter with {} clauses and {} params: {}",
            self.clauses.len(),
            self.params.len(),
            filter
        );
        ProjectFilter {
            filter,
            params: self.params,
        }
    }

    /// Like [`build`](Self::build), but honours [`ParamCollision::Reject`].
    pub fn try_build(self) -> Result<ProjectFilter> {
        if self.config.on_collision == ParamCollision::Reject && !self.collisions.is_empty() {
            let names = self.collisions.join(", ");
            warn!("Rejecting project filter, parameters bound more than once: {}", names);
            return Err(ProjectqlError::ParameterCollision(names));
        }
        Ok(self.build())
    }
}

impl QueryFilter for ProjectQueryFilterBuilder {
    fn filter(&self) -> String {
        self.build_filter()
    }

    fn params(&self) -> &Params {
        &self.params
    }
}
