use std::fmt;

/// One boolean sub-expression of a project filter.
///
/// Rendered to JDOQL only when the filter is built:
/// - `Equals` → `field == :param`
/// - `IsNull` → `field == null`
/// - `IsTrue` → `field == true`
/// - `Contains` → `collection.contains(:param)`
/// - `Matches` → `field.toLowerCase().matches(:param)`
/// - `Or` → terms joined by ` || `
/// - `Group` → the inner predicate in parentheses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals {
        field: &'static str,
        param: &'static str,
    },
    IsNull {
        field: &'static str,
    },
    IsTrue {
        field: &'static str,
    },
    Contains {
        collection: &'static str,
        param: &'static str,
    },
    Matches {
        field: &'static str,
        param: &'static str,
    },
    Or(Vec<Predicate>),
    Group(Box<Predicate>),
}

impl Predicate {
    pub fn group(self) -> Self {
        Predicate::Group(Box::new(self))
    }

    /// Placeholder names this predicate references, in rendering order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        match self {
            Predicate::Equals { param, .. }
            | Predicate::Contains { param, .. }
            | Predicate::Matches { param, .. } => vec![*param],
            Predicate::IsNull { .. } | Predicate::IsTrue { .. } => vec![],
            Predicate::Or(terms) => terms.iter().flat_map(|t| t.placeholders()).collect(),
            Predicate::Group(inner) => inner.placeholders(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { field, param } => write!(f, "{field} == :{param}"),
            Predicate::IsNull { field } => write!(f, "{field} == null"),
            Predicate::IsTrue { field } => write!(f, "{field} == true"),
            Predicate::Contains { collection, param } => {
                write!(f, "{collection}.contains(:{param})")
            }
            Predicate::Matches { field, param } => {
                write!(f, "{field}.toLowerCase().matches(:{param})")
            }
            Predicate::Or(terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                f.write_str(&rendered.join(" || "))
            }
            Predicate::Group(inner) => write!(f, "({inner})"),
        }
    }
}

/// Join rendered clauses with `&&`. No clauses yields an empty filter.
pub fn build_filter(clauses: &[Predicate]) -> String {
    clauses
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" && ")
}
