use crate::{placeholders, ParamValue, QueryFilter};
use std::collections::BTreeSet;

// ---- Filter Certification Tests ----

pub fn test_placeholders_match_params(filter: &dyn QueryFilter) {
    let referenced = placeholders(&filter.filter());
    let bound: BTreeSet<String> = filter.params().keys().cloned().collect();
    assert_eq!(
        referenced,
        bound,
        "placeholders in '{}' do not match bound params",
        filter.filter()
    );
}

pub fn test_empty_filter_has_no_params(filter: &dyn QueryFilter) {
    assert_eq!(filter.filter(), "");
    assert!(filter.params().is_empty());
}

pub fn test_clauses_in_order(filter: &dyn QueryFilter, expected: &[&str]) {
    assert_eq!(filter.filter(), expected.join(" && "));
    test_placeholders_match_params(filter);
}

pub fn test_param_bound_to(filter: &dyn QueryFilter, name: &str, expected: &ParamValue) {
    let actual = filter
        .params()
        .get(name)
        .unwrap_or_else(|| panic!("param '{name}' not bound"));
    assert_eq!(actual, expected);
}
