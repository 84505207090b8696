mod builder;
mod predicate;

pub use builder::ProjectQueryFilterBuilder;
pub use predicate::Predicate;
