use super::{Constraint, Direction, Matcher};
use crate::err::Error;
use crate::key::pl;
use std::collections::HashMap;

/// The entry point a plan is built for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Target {
	/// A query returning triples
	Triples,
	/// A query returning subjects
	Subjects,
}

/// A normalized query plan, parsed from a list of matchers.
#[derive(Debug, Default)]
pub(crate) struct Plan {
	/// The explicit subject restriction, in argument order
	pub(crate) subjects: Option<Vec<String>>,
	/// The included predicates, in argument order
	pub(crate) includes: Vec<String>,
	/// Object constraints, keyed by predicate name
	pub(crate) constraints: HashMap<String, Constraint>,
	/// Predicates which must not be present on a resulting subject
	pub(crate) without: Vec<String>,
	/// The sort predicate and direction
	pub(crate) sort: Option<(String, Direction)>,
	/// The maximum number of results
	pub(crate) limit: Option<usize>,
}

impl Plan {
	/// Normalize matchers for a triple query, which accepts only subject
	/// and predicate matchers.
	pub(crate) fn for_triples(matchers: Vec<Matcher>) -> Result<Plan, Error> {
		Plan::new(matchers, Target::Triples)
	}

	/// Normalize matchers for a subject query, which accepts the full
	/// matcher set.
	pub(crate) fn for_subjects(matchers: Vec<Matcher>) -> Result<Plan, Error> {
		Plan::new(matchers, Target::Subjects)
	}

	fn new(matchers: Vec<Matcher>, target: Target) -> Result<Plan, Error> {
		let mut plan = Plan::default();
		for matcher in matchers {
			match matcher {
				Matcher::Subjects(list) => {
					plan.subjects.get_or_insert_with(Vec::new).extend(list);
				}
				Matcher::Predicates {
					names,
					constraint,
				} => {
					for name in names {
						check_pd(&name)?;
						if let Some(c) = &constraint {
							plan.constraints.insert(name.clone(), c.clone());
						}
						plan.includes.push(name);
					}
				}
				Matcher::Without(list) if target == Target::Subjects => {
					for name in &list {
						check_pd(name)?;
					}
					plan.without.extend(list);
				}
				Matcher::Without(_) => {
					return Err(Error::MatcherNotSupported {
						matcher: "without",
					})
				}
				Matcher::Sort {
					predicate,
					direction,
				} if target == Target::Subjects => {
					check_pd(&predicate)?;
					plan.sort = Some((predicate, direction));
				}
				Matcher::Sort {
					..
				} => {
					return Err(Error::MatcherNotSupported {
						matcher: "sort",
					})
				}
				Matcher::Limit(limit) if target == Target::Subjects => {
					plan.limit = Some(limit);
				}
				Matcher::Limit(_) => {
					return Err(Error::MatcherNotSupported {
						matcher: "limit",
					})
				}
				Matcher::Malformed(message) => return Err(Error::MatcherMalformed(message)),
			}
		}
		Ok(plan)
	}
}

fn check_pd(name: &str) -> Result<(), Error> {
	if pl::valid(name) {
		Ok(())
	} else {
		Err(Error::PredicateName {
			name: name.to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::qry::Matcher;

	#[test]
	fn normalizes_matchers() {
		let plan = Plan::for_subjects(vec![
			Matcher::subjects(["john"]),
			Matcher::predicates(["age", "size"]).gt(3),
			Matcher::without(["deleted"]),
			Matcher::sort("size").desc(),
			Matcher::limit(10),
		])
		.unwrap();
		assert_eq!(plan.subjects, Some(vec!["john".to_owned()]));
		assert_eq!(plan.includes, vec!["age".to_owned(), "size".to_owned()]);
		assert!(plan.constraints.contains_key("age"));
		assert!(plan.constraints.contains_key("size"));
		assert_eq!(plan.without, vec!["deleted".to_owned()]);
		assert_eq!(plan.sort, Some(("size".to_owned(), Direction::Desc)));
		assert_eq!(plan.limit, Some(10));
	}

	#[test]
	fn triple_queries_reject_subject_only_matchers() {
		for matcher in [Matcher::without(["a"]), Matcher::sort("a"), Matcher::limit(1)] {
			let res = Plan::for_triples(vec![matcher]);
			assert!(matches!(res, Err(Error::MatcherNotSupported { .. })));
		}
	}

	#[test]
	fn malformed_chains_are_rejected() {
		let res = Plan::for_subjects(vec![Matcher::limit(1).eq(3)]);
		assert!(matches!(res, Err(Error::MatcherMalformed(_))));
		let res = Plan::for_subjects(vec![Matcher::predicates(["a"]).desc()]);
		assert!(matches!(res, Err(Error::MatcherMalformed(_))));
	}

	#[test]
	fn nul_bytes_in_predicate_names_are_rejected() {
		let res = Plan::for_subjects(vec![Matcher::predicates(["li\0ves"])]);
		assert!(matches!(res, Err(Error::PredicateName { .. })));
	}
}
