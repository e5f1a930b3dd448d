use super::plan::Plan;
use super::{Constraint, Direction, Triple};
use crate::err::Error;
use crate::idx::postings;
use crate::idx::Uid;
use crate::kvs::{Transaction, Val};
use crate::val::codec;
use crate::val::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

const TARGET: &str = "tripledb::qry::exe";

/// Executes a normalized plan against a transaction.
pub(crate) struct QueryExecutor {
	plan: Plan,
}

/// A constraint with its value resolved against the dictionary, once per
/// predicate. Equality constraints are decided by UID; ordering constraints
/// compare encoded values.
enum Filter {
	None,
	Eq(Option<Uid>),
	Ne(Option<Uid>),
	Lt(Val),
	Gt(Val),
}

impl QueryExecutor {
	pub(crate) fn new(plan: Plan) -> Self {
		QueryExecutor {
			plan,
		}
	}

	/// Run the plan, returning matching triples.
	pub(crate) async fn triples(&self, tx: &mut Transaction) -> Result<Vec<Triple>, Error> {
		// With no predicate matcher, enumerate every known predicate
		let predicates = match self.plan.includes.is_empty() {
			false => self.plan.includes.clone(),
			true => tx.all_pd().await?,
		};
		// Resolve the explicit subject restriction once, skipping subjects
		// which were never interned
		let subjects = match &self.plan.subjects {
			Some(list) => {
				let mut out = Vec::with_capacity(list.len());
				for subject in list {
					if let Some(sj) = tx.get_uid(subject.as_bytes()).await? {
						out.push((subject.clone(), sj));
					}
				}
				Some(out)
			}
			None => None,
		};
		let mut out = Vec::new();
		for pd in &predicates {
			let filter = self.filter(tx, pd).await?;
			// An equality against an unknown value can never match
			if let Filter::Eq(None) = filter {
				continue;
			}
			// Collect the posting lists to walk
			let lists = match &subjects {
				Some(subjects) => {
					let mut lists = Vec::with_capacity(subjects.len());
					for (subject, sj) in subjects {
						if let Some(list) = tx.get_pl(pd, *sj).await? {
							lists.push((subject.clone(), list));
						}
					}
					lists
				}
				None => {
					let mut lists = Vec::new();
					for (sj, list) in tx.scan_pl(pd).await? {
						// Recover the subject string through the dictionary
						if let Some(data) = tx.get_data(sj).await? {
							lists.push((String::from_utf8(data)?, list));
						}
					}
					lists
				}
			};
			#[cfg(debug_assertions)]
			trace!(target: TARGET, "checking {} posting lists for {pd}", lists.len());
			for (subject, list) in lists {
				for oj in postings::iter(&list) {
					if !self.accept(tx, &filter, oj).await? {
						continue;
					}
					if let Some(data) = tx.get_data(oj).await? {
						out.push(Triple {
							subject: subject.clone(),
							predicate: pd.clone(),
							object: codec::decode(&data)?,
						});
					}
				}
			}
		}
		Ok(out)
	}

	/// Run the plan, returning matching object values in visit order.
	/// Objects bound under several subjects or predicates appear once per
	/// binding.
	pub(crate) async fn objects(&self, tx: &mut Transaction) -> Result<Vec<Value>, Error> {
		let mut out = Vec::new();
		// With no predicate matcher, enumerate every known predicate
		let predicates = match self.plan.includes.is_empty() {
			false => self.plan.includes.clone(),
			true => tx.all_pd().await?,
		};
		// Resolve the explicit subject restriction once
		let subjects = match &self.plan.subjects {
			Some(list) => {
				let mut out = Vec::with_capacity(list.len());
				for subject in list {
					if let Some(sj) = tx.get_uid(subject.as_bytes()).await? {
						out.push(sj);
					}
				}
				Some(out)
			}
			None => None,
		};
		for pd in &predicates {
			let filter = self.filter(tx, pd).await?;
			// An equality against an unknown value can never match
			if let Filter::Eq(None) = filter {
				continue;
			}
			let lists = match &subjects {
				Some(subjects) => {
					let mut lists = Vec::with_capacity(subjects.len());
					for sj in subjects {
						if let Some(list) = tx.get_pl(pd, *sj).await? {
							lists.push(list);
						}
					}
					lists
				}
				None => tx.scan_pl(pd).await?.into_iter().map(|(_, list)| list).collect(),
			};
			for list in lists {
				for oj in postings::iter(&list) {
					if !self.accept(tx, &filter, oj).await? {
						continue;
					}
					if let Some(data) = tx.get_data(oj).await? {
						out.push(codec::decode(&data)?);
					}
				}
			}
		}
		Ok(out)
	}

	/// Run the plan, stopping at the first matching triple.
	pub(crate) async fn has(&self, tx: &mut Transaction) -> Result<bool, Error> {
		// With no predicate matcher, enumerate every known predicate
		let predicates = match self.plan.includes.is_empty() {
			false => self.plan.includes.clone(),
			true => tx.all_pd().await?,
		};
		// Resolve the explicit subject restriction once
		let subjects = match &self.plan.subjects {
			Some(list) => {
				let mut out = Vec::with_capacity(list.len());
				for subject in list {
					if let Some(sj) = tx.get_uid(subject.as_bytes()).await? {
						out.push(sj);
					}
				}
				Some(out)
			}
			None => None,
		};
		for pd in &predicates {
			let filter = self.filter(tx, pd).await?;
			// An equality against an unknown value can never match
			if let Filter::Eq(None) = filter {
				continue;
			}
			let lists = match &subjects {
				Some(subjects) => {
					let mut lists = Vec::with_capacity(subjects.len());
					for sj in subjects {
						if let Some(list) = tx.get_pl(pd, *sj).await? {
							lists.push(list);
						}
					}
					lists
				}
				None => tx.scan_pl(pd).await?.into_iter().map(|(_, list)| list).collect(),
			};
			for list in lists {
				if self.any(tx, &filter, &list).await? {
					return Ok(true);
				}
			}
		}
		Ok(false)
	}

	/// Run the plan, returning matching subject names.
	pub(crate) async fn subjects(&self, tx: &mut Transaction) -> Result<Vec<String>, Error> {
		// Resolve the explicit subject restriction once
		let restrict = match &self.plan.subjects {
			Some(list) => {
				let mut out = Vec::with_capacity(list.len());
				for subject in list {
					if let Some(sj) = tx.get_uid(subject.as_bytes()).await? {
						out.push(sj);
					}
				}
				Some(out)
			}
			None => None,
		};
		// Each include predicate collects the subjects with a surviving
		// object; the first seeds the set and the rest intersect it
		let mut subjects: Option<Vec<Uid>> = None;
		for pd in &self.plan.includes {
			// A predicate with no posting lists short-circuits the query
			if !tx.has_pl(pd).await? {
				return Ok(Vec::new());
			}
			let filter = self.filter(tx, pd).await?;
			// An equality against an unknown value can never match
			if let Filter::Eq(None) = filter {
				return Ok(Vec::new());
			}
			let mut found = Vec::new();
			match &restrict {
				Some(uids) => {
					for sj in uids {
						if let Some(list) = tx.get_pl(pd, *sj).await? {
							if self.any(tx, &filter, &list).await? {
								found.push(*sj);
							}
						}
					}
				}
				None => {
					for (sj, list) in tx.scan_pl(pd).await? {
						if self.any(tx, &filter, &list).await? {
							found.push(sj);
						}
					}
				}
			}
			subjects = Some(match subjects {
				Some(acc) => intersect(acc, found),
				None => found,
			});
		}
		// With no include predicates, fall back to the explicit subjects
		let mut subjects = match subjects {
			Some(subjects) => subjects,
			None => restrict.unwrap_or_default(),
		};
		// Remove any subject with a triple for a without predicate
		for pd in &self.plan.without {
			if subjects.is_empty() {
				break;
			}
			let present: HashSet<Uid> = tx.sj_pl(pd).await?.into_iter().collect();
			subjects.retain(|sj| !present.contains(sj));
		}
		// Order the survivors by their value under the sort predicate
		if let Some((pd, direction)) = &self.plan.sort {
			subjects = sort(tx, subjects, pd, *direction).await?;
		}
		// Apply any limit
		if let Some(limit) = self.plan.limit {
			if limit > 0 {
				subjects.truncate(limit);
			}
		}
		// Resolve the surviving UIDs back to subject strings
		let mut out = Vec::with_capacity(subjects.len());
		for sj in subjects {
			if let Some(data) = tx.get_data(sj).await? {
				out.push(String::from_utf8(data)?);
			}
		}
		Ok(out)
	}

	/// Resolve a predicate's constraint against the dictionary.
	async fn filter(&self, tx: &mut Transaction, pd: &str) -> Result<Filter, Error> {
		match self.plan.constraints.get(pd) {
			None => Ok(Filter::None),
			Some(Constraint::Eq(v)) => Ok(Filter::Eq(tx.get_uid(&codec::encode(v)).await?)),
			Some(Constraint::Ne(v)) => Ok(Filter::Ne(tx.get_uid(&codec::encode(v)).await?)),
			Some(Constraint::Lt(v)) => Ok(Filter::Lt(codec::encode(v))),
			Some(Constraint::Gt(v)) => Ok(Filter::Gt(codec::encode(v))),
		}
	}

	/// Check whether an object UID survives a filter.
	async fn accept(&self, tx: &mut Transaction, filter: &Filter, oj: Uid) -> Result<bool, Error> {
		match filter {
			Filter::None => Ok(true),
			Filter::Eq(uid) => Ok(*uid == Some(oj)),
			Filter::Ne(uid) => Ok(*uid != Some(oj)),
			Filter::Lt(bound) => match tx.get_data(oj).await? {
				Some(data) => Ok(codec::compare(&data, bound)? == Ordering::Less),
				None => Ok(false),
			},
			Filter::Gt(bound) => match tx.get_data(oj).await? {
				Some(data) => Ok(codec::compare(&data, bound)? == Ordering::Greater),
				None => Ok(false),
			},
		}
	}

	/// Check whether any object in a posting list survives a filter.
	async fn any(&self, tx: &mut Transaction, filter: &Filter, list: &[u8]) -> Result<bool, Error> {
		for oj in postings::iter(list) {
			if self.accept(tx, filter, oj).await? {
				return Ok(true);
			}
		}
		Ok(false)
	}
}

/// Order subjects by their extreme object value under the sort predicate:
/// the minimum value when ascending, the maximum when descending. Subjects
/// with no value for the predicate sort after every subject with one.
async fn sort(
	tx: &mut Transaction,
	subjects: Vec<Uid>,
	pd: &str,
	direction: Direction,
) -> Result<Vec<Uid>, Error> {
	// Pair each subject with its sort value
	let mut keyed: Vec<(Uid, Option<Val>)> = Vec::with_capacity(subjects.len());
	for sj in subjects {
		let mut best: Option<Val> = None;
		if let Some(list) = tx.get_pl(pd, sj).await? {
			for oj in postings::iter(&list) {
				let Some(data) = tx.get_data(oj).await? else {
					continue;
				};
				best = Some(match best {
					None => data,
					Some(cur) => {
						let better = match direction {
							Direction::Asc => codec::compare(&data, &cur)? == Ordering::Less,
							Direction::Desc => codec::compare(&data, &cur)? == Ordering::Greater,
						};
						if better {
							data
						} else {
							cur
						}
					}
				});
			}
		}
		keyed.push((sj, best));
	}
	// The comparator below must be total, so reject mixed kinds up front
	let mut kinds = keyed.iter().filter_map(|(_, v)| v.as_deref()).map(codec::kind);
	if let Some(first) = kinds.next() {
		let first = first?;
		for kind in kinds {
			let kind = kind?;
			if kind != first {
				return Err(Error::TypeMismatch {
					expected: first,
					found: kind,
				});
			}
		}
	}
	keyed.sort_by(|(_, a), (_, b)| match (a, b) {
		(Some(a), Some(b)) => {
			// Kinds are uniform, checked above
			let ord = codec::compare(a, b).unwrap_or(Ordering::Equal);
			match direction {
				Direction::Asc => ord,
				Direction::Desc => ord.reverse(),
			}
		}
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	});
	Ok(keyed.into_iter().map(|(sj, _)| sj).collect())
}

/// Intersect two subject lists, preserving the first list's order.
fn intersect(a: Vec<Uid>, b: Vec<Uid>) -> Vec<Uid> {
	let b: HashSet<Uid> = b.into_iter().collect();
	a.into_iter().filter(|sj| b.contains(sj)).collect()
}

#[cfg(test)]
mod tests {
	use super::intersect;

	#[test]
	fn intersect_preserves_first_order() {
		assert_eq!(intersect(vec![3, 1, 2], vec![2, 3]), vec![3, 2]);
		assert_eq!(intersect(vec![1, 2], vec![]), Vec::<u64>::new());
		assert_eq!(intersect(vec![], vec![1]), Vec::<u64>::new());
	}
}
