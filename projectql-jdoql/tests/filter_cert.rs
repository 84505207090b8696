use projectql_core::{
    placeholders, testing, Classifier, PackageUrl, ParamValue, ProjectFilter, QueryFilter, Tag,
    Team,
};
use projectql_jdoql::ProjectQueryFilterBuilder;
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Clone, Debug)]
enum Op {
    ExcludeInactive(bool),
    Team(String),
    Name(String),
    Version(String),
    Tag(String),
    Classifier(Classifier),
    FuzzyName(String),
    FuzzyNameOrExactTag(String, String),
    ExcludeChildProjects,
    Parent(u128),
    PurlOrCpeOrSwid(Option<String>, Option<String>, Option<String>),
}

impl Op {
    fn apply(&self, builder: ProjectQueryFilterBuilder) -> ProjectQueryFilterBuilder {
        match self {
            Op::ExcludeInactive(flag) => builder.exclude_inactive(*flag),
            Op::Team(name) => builder.with_team(&Team::new(name.clone())),
            Op::Name(name) => builder.with_name(name.clone()),
            Op::Version(version) => builder.with_version(version.clone()),
            Op::Tag(name) => builder.with_tag(&Tag::new(name.clone())),
            Op::Classifier(c) => builder.with_classifier(*c),
            Op::FuzzyName(pattern) => builder.with_fuzzy_name(pattern.clone()),
            Op::FuzzyNameOrExactTag(pattern, tag) => {
                builder.with_fuzzy_name_or_exact_tag(pattern.clone(), &Tag::new(tag.clone()))
            }
            Op::ExcludeChildProjects => builder.exclude_child_projects(),
            Op::Parent(n) => builder.with_parent(Uuid::from_u128(*n)),
            Op::PurlOrCpeOrSwid(purl, cpe, swid) => {
                let purl: Option<PackageUrl> =
                    purl.as_ref().map(|name| format!("pkg:cargo/{name}@1.0").parse().unwrap());
                builder.with_purl_or_cpe_or_swid(purl.as_ref(), cpe.as_deref(), swid.as_deref())
            }
        }
    }

    /// The clause this call is expected to add, if any.
    fn expected_clause(&self) -> Option<String> {
        let clause = match self {
            Op::ExcludeInactive(false) => return None,
            Op::ExcludeInactive(true) => "(active == true || active == null)",
            Op::Team(_) => "(accessTeams.contains(:team))",
            Op::Name(_) => "(name == :name)",
            Op::Version(_) => "(version == :version)",
            Op::Tag(_) => "(tags.contains(:tag))",
            Op::Classifier(_) => "(classifier == :classifier)",
            Op::FuzzyName(_) => "(name.toLowerCase().matches(:name))",
            Op::FuzzyNameOrExactTag(..) => {
                "(name.toLowerCase().matches(:name) || tags.contains(:tag))"
            }
            Op::ExcludeChildProjects => "parent == null",
            Op::Parent(_) => "parent.uuid == :parentUuid",
            Op::PurlOrCpeOrSwid(purl, cpe, swid) => {
                let terms: Vec<&str> = [
                    purl.as_ref().map(|_| "purl == :purl"),
                    cpe.as_ref().map(|_| "cpe == :cpe"),
                    swid.as_ref().map(|_| "swidtagid == :swidTagId"),
                ]
                .into_iter()
                .flatten()
                .collect();
                return match terms.len() {
                    0 => None,
                    1 => Some(terms[0].to_string()),
                    _ => Some(format!("({})", terms.join(" || "))),
                };
            }
        };
        Some(clause.to_string())
    }
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-z0-9_.-]{1,8}"
}

fn arb_classifier() -> impl Strategy<Value = Classifier> {
    prop::sample::select(Classifier::ALL.to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::ExcludeInactive),
        arb_text().prop_map(Op::Team),
        arb_text().prop_map(Op::Name),
        arb_text().prop_map(Op::Version),
        arb_text().prop_map(Op::Tag),
        arb_classifier().prop_map(Op::Classifier),
        arb_text().prop_map(Op::FuzzyName),
        (arb_text(), arb_text()).prop_map(|(p, t)| Op::FuzzyNameOrExactTag(p, t)),
        Just(Op::ExcludeChildProjects),
        any::<u128>().prop_map(Op::Parent),
        (
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of(arb_text()),
            proptest::option::of(arb_text()),
        )
            .prop_map(|(p, c, s)| Op::PurlOrCpeOrSwid(p, c, s)),
    ]
}

fn run(ops: &[Op]) -> ProjectQueryFilterBuilder {
    ops.iter()
        .fold(ProjectQueryFilterBuilder::new(), |builder, op| op.apply(builder))
}

proptest! {
    #[test]
    fn placeholders_always_match_params(ops in prop::collection::vec(arb_op(), 0..12)) {
        let builder = run(&ops);
        let bound: BTreeSet<String> = builder.params().keys().cloned().collect();
        prop_assert_eq!(placeholders(&builder.build_filter()), bound);
    }

    #[test]
    fn clauses_follow_call_order(ops in prop::collection::vec(arb_op(), 0..12)) {
        let builder = run(&ops);
        let expected: Vec<String> = ops.iter().filter_map(Op::expected_clause).collect();
        prop_assert_eq!(builder.build_filter(), expected.join(" && "));
    }

    #[test]
    fn built_filter_matches_builder(ops in prop::collection::vec(arb_op(), 0..12)) {
        let builder = run(&ops);
        let filter = builder.build_filter();
        let params = builder.params().clone();
        let built = builder.build();
        prop_assert_eq!(built.filter, filter);
        prop_assert_eq!(built.params, params);
    }
}

#[test]
fn test_certify_empty_builder() {
    testing::test_empty_filter_has_no_params(&ProjectQueryFilterBuilder::new());
    testing::test_empty_filter_has_no_params(&ProjectQueryFilterBuilder::new().build());
}

#[test]
fn test_certify_full_filter() {
    let team = Team::new("appsec");
    let tag = Tag::new("prod");
    let parent = Uuid::new_v4();
    let purl: PackageUrl = "pkg:npm/@acme/widget@2.1.0".parse().unwrap();

    let builder = ProjectQueryFilterBuilder::new()
        .exclude_inactive(true)
        .with_team(&team)
        .with_version("2.1.0")
        .with_classifier(Classifier::Library)
        .with_fuzzy_name_or_exact_tag(".*widget.*", &tag)
        .with_parent(parent)
        .with_purl_or_cpe_or_swid(Some(&purl), Some("cpe:/a:acme:widget"), None);

    testing::test_clauses_in_order(
        &builder,
        &[
            "(active == true || active == null)",
            "(accessTeams.contains(:team))",
            "(version == :version)",
            "(classifier == :classifier)",
            "(name.toLowerCase().matches(:name) || tags.contains(:tag))",
            "parent.uuid == :parentUuid",
            "(purl == :purl || cpe == :cpe)",
        ],
    );
    testing::test_param_bound_to(
        &builder,
        "purl",
        &ParamValue::Text("pkg:npm/%40acme/widget@2.1.0".to_string()),
    );
    testing::test_param_bound_to(&builder, "tag", &ParamValue::Tag(tag));
    testing::test_param_bound_to(&builder, "team", &ParamValue::Team(team));
}

#[test]
fn test_built_filter_serializes() {
    let built = ProjectQueryFilterBuilder::new()
        .exclude_child_projects()
        .with_version("1.0")
        .build();
    let value = serde_json::to_value(&built).unwrap();
    assert_eq!(
        value,
        json!({
            "filter": "parent == null && (version == :version)",
            "params": {"version": {"type": "text", "value": "1.0"}}
        })
    );
    let back: ProjectFilter = serde_json::from_value(value).unwrap();
    assert_eq!(back.filter(), built.filter);
}
