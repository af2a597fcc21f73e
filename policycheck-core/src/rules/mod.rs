// Rule validation module
// - predicate.rs: typed field/operator predicates compiled against a dataset
// - validation.rs: RuleValidator, applies every rule and isolates failures

pub mod predicate;
pub mod validation;

pub use predicate::{RowPredicate, RulePredicate};
pub use validation::{validate, RuleValidator};
