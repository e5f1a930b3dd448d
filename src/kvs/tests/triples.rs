use super::new_ds;
use crate::err::Error;
use crate::qry::{Matcher, Triple};
use crate::val::Value;
use test_log::test;

#[test(tokio::test)]
async fn query_by_subject_and_predicate() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "firstName", "John"),
		Triple::new("john", "lastName", "Smith"),
	])
	.await
	.unwrap();

	let res = ds
		.query(vec![
			Matcher::subjects(["john"]),
			Matcher::predicates(["firstName", "lastName"]),
		])
		.await
		.unwrap();
	assert_eq!(
		res,
		vec![
			Triple::new("john", "firstName", "John"),
			Triple::new("john", "lastName", "Smith"),
		]
	);
}

#[test(tokio::test)]
async fn query_every_predicate() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "firstName", "John"),
		Triple::new("john", "age", 20),
		Triple::new("dave", "firstName", "Dave"),
	])
	.await
	.unwrap();

	// With no predicates matcher, the whole registry is enumerated
	let res = ds.query(vec![]).await.unwrap();
	assert_eq!(res.len(), 3);
	assert!(res.contains(&Triple::new("john", "age", 20)));
	assert!(res.contains(&Triple::new("john", "firstName", "John")));
	assert!(res.contains(&Triple::new("dave", "firstName", "Dave")));
}

#[test(tokio::test)]
async fn query_with_int_constraints() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("x", "count", 1),
		Triple::new("x", "count", 3),
		Triple::new("x", "count", 5),
		Triple::new("y", "count", 2),
		Triple::new("y", "count", 4),
		Triple::new("y", "count", 6),
	])
	.await
	.unwrap();

	let res = ds.query(vec![Matcher::predicates(["count"]).eq(3)]).await.unwrap();
	assert_eq!(res, vec![Triple::new("x", "count", 3)]);

	let res = ds.query(vec![Matcher::predicates(["count"]).ne(3)]).await.unwrap();
	assert_eq!(
		res,
		vec![
			Triple::new("x", "count", 1),
			Triple::new("x", "count", 5),
			Triple::new("y", "count", 2),
			Triple::new("y", "count", 4),
			Triple::new("y", "count", 6),
		]
	);

	let res = ds.query(vec![Matcher::predicates(["count"]).lt(3)]).await.unwrap();
	assert_eq!(res, vec![Triple::new("x", "count", 1), Triple::new("y", "count", 2)]);

	let res = ds.query(vec![Matcher::predicates(["count"]).gt(3)]).await.unwrap();
	assert_eq!(
		res,
		vec![
			Triple::new("x", "count", 5),
			Triple::new("y", "count", 4),
			Triple::new("y", "count", 6),
		]
	);
}

#[test(tokio::test)]
async fn query_with_strand_constraints() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("x", "count", "1"),
		Triple::new("x", "count", "3"),
		Triple::new("x", "count", "5"),
		Triple::new("y", "count", "2"),
		Triple::new("y", "count", "4"),
		Triple::new("y", "count", "6"),
	])
	.await
	.unwrap();

	let res = ds.query(vec![Matcher::predicates(["count"]).eq("3")]).await.unwrap();
	assert_eq!(res, vec![Triple::new("x", "count", "3")]);

	let res = ds.query(vec![Matcher::predicates(["count"]).lt("3")]).await.unwrap();
	assert_eq!(res, vec![Triple::new("x", "count", "1"), Triple::new("y", "count", "2")]);

	let res = ds.query(vec![Matcher::predicates(["count"]).gt("3")]).await.unwrap();
	assert_eq!(
		res,
		vec![
			Triple::new("x", "count", "5"),
			Triple::new("y", "count", "4"),
			Triple::new("y", "count", "6"),
		]
	);
}

#[test(tokio::test)]
async fn typed_objects_are_distinct() {
	let ds = new_ds().await;
	ds.insert([Triple::new("a", "value", 30), Triple::new("b", "value", "30")]).await.unwrap();

	// The integer 30 and the string "30" are different objects
	let res = ds.query(vec![Matcher::predicates(["value"]).eq(30)]).await.unwrap();
	assert_eq!(res, vec![Triple::new("a", "value", 30)]);
	let res = ds.query(vec![Matcher::predicates(["value"]).eq("30")]).await.unwrap();
	assert_eq!(res, vec![Triple::new("b", "value", Value::from("30"))]);
}

#[test(tokio::test)]
async fn query_objects_returns_the_object_side() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "eats", "sushi"),
		Triple::new("john", "eats", "indian"),
		Triple::new("dave", "eats", "thai"),
		Triple::new("john", "age", 20),
	])
	.await
	.unwrap();

	let res = ds.query_objects(vec![Matcher::predicates(["eats"])]).await.unwrap();
	assert_eq!(
		res,
		vec![Value::from("sushi"), Value::from("indian"), Value::from("thai")]
	);

	let res = ds
		.query_objects(vec![Matcher::subjects(["john"]), Matcher::predicates(["age"])])
		.await
		.unwrap();
	assert_eq!(res, vec![Value::Int(20)]);
}

#[test(tokio::test)]
async fn has_stops_at_the_first_match() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "eats", "sushi"),
		Triple::new("dave", "eats", "thai"),
	])
	.await
	.unwrap();

	assert!(ds.has(vec![Matcher::predicates(["eats"])]).await.unwrap());
	assert!(ds.has(vec![Matcher::predicates(["eats"]).eq("thai")]).await.unwrap());
	assert!(!ds.has(vec![Matcher::predicates(["eats"]).eq("pizza")]).await.unwrap());
	assert!(!ds.has(vec![Matcher::predicates(["drinks"])]).await.unwrap());
	assert!(!ds
		.has(vec![Matcher::subjects(["mike"]), Matcher::predicates(["eats"])])
		.await
		.unwrap());
}

#[test(tokio::test)]
async fn query_missing_things_is_not_an_error() {
	let ds = new_ds().await;
	ds.insert([Triple::new("john", "firstName", "John")]).await.unwrap();

	// Unknown predicate
	let res = ds.query(vec![Matcher::predicates(["lastName"])]).await.unwrap();
	assert!(res.is_empty());
	// Unknown subject
	let res = ds
		.query(vec![Matcher::subjects(["dave"]), Matcher::predicates(["firstName"])])
		.await
		.unwrap();
	assert!(res.is_empty());
	// Unknown constraint object
	let res = ds.query(vec![Matcher::predicates(["firstName"]).eq("Dave")]).await.unwrap();
	assert!(res.is_empty());
}

#[test(tokio::test)]
async fn query_subjects_intersects_clauses() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "lives-in", "sf"),
		Triple::new("john", "eats", "sushi"),
		Triple::new("john", "eats", "indian"),
		Triple::new("dave", "lives-in", "nyc"),
		Triple::new("dave", "eats", "thai"),
		Triple::new("adam", "lives-in", "sf"),
		Triple::new("adam", "eats", "thai"),
	])
	.await
	.unwrap();

	let res = ds
		.query_subjects(vec![
			Matcher::predicates(["lives-in"]).eq("sf"),
			Matcher::predicates(["eats"]).eq("sushi"),
		])
		.await
		.unwrap();
	assert_eq!(res, vec!["john".to_owned()]);

	let res = ds
		.query_subjects(vec![
			Matcher::predicates(["lives-in"]).eq("sf"),
			Matcher::predicates(["eats"]).eq("thai"),
		])
		.await
		.unwrap();
	assert_eq!(res, vec!["adam".to_owned()]);

	// An unknown predicate in any clause short-circuits to empty
	let res = ds
		.query_subjects(vec![
			Matcher::predicates(["lives-in"]).eq("sf"),
			Matcher::predicates(["drinks"]).eq("tea"),
		])
		.await
		.unwrap();
	assert!(res.is_empty());
}

#[test(tokio::test)]
async fn query_subjects_sorts_and_limits() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("a", "size", 1),
		Triple::new("b", "size", 4),
		Triple::new("c", "size", 2),
		Triple::new("d", "size", 5),
		Triple::new("e", "size", 3),
	])
	.await
	.unwrap();

	let res = ds
		.query_subjects(vec![
			Matcher::predicates(["size"]),
			Matcher::sort("size"),
			Matcher::limit(4),
		])
		.await
		.unwrap();
	assert_eq!(res, vec!["a".to_owned(), "c".to_owned(), "e".to_owned(), "b".to_owned()]);

	let res = ds
		.query_subjects(vec![
			Matcher::predicates(["size"]),
			Matcher::sort("size").desc(),
			Matcher::limit(2),
		])
		.await
		.unwrap();
	assert_eq!(res, vec!["d".to_owned(), "b".to_owned()]);
}

#[test(tokio::test)]
async fn query_subjects_sorts_missing_values_last() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("a", "kind", "entry"),
		Triple::new("b", "kind", "entry"),
		Triple::new("c", "kind", "entry"),
		Triple::new("a", "size", 2),
		Triple::new("c", "size", 1),
	])
	.await
	.unwrap();

	let res = ds
		.query_subjects(vec![Matcher::predicates(["kind"]), Matcher::sort("size")])
		.await
		.unwrap();
	assert_eq!(res, vec!["c".to_owned(), "a".to_owned(), "b".to_owned()]);
}

#[test(tokio::test)]
async fn query_subjects_without_excludes() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("u", "deleted", "true"),
		Triple::new("u", "other", "x"),
		Triple::new("v", "other", "y"),
	])
	.await
	.unwrap();

	let res = ds
		.query_subjects(vec![Matcher::predicates(["other"]), Matcher::without(["deleted"])])
		.await
		.unwrap();
	assert_eq!(res, vec!["v".to_owned()]);

	ds.delete("v", "other").await.unwrap();
	let res = ds
		.query_subjects(vec![Matcher::predicates(["other"]), Matcher::without(["deleted"])])
		.await
		.unwrap();
	assert!(res.is_empty());
}

#[test(tokio::test)]
async fn delete_removes_a_single_pair() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "firstName", "John"),
		Triple::new("john", "lastName", "Smith"),
	])
	.await
	.unwrap();

	ds.delete("john", "firstName").await.unwrap();
	let res = ds
		.query(vec![
			Matcher::subjects(["john"]),
			Matcher::predicates(["firstName", "lastName"]),
		])
		.await
		.unwrap();
	assert_eq!(res, vec![Triple::new("john", "lastName", "Smith")]);
}

#[test(tokio::test)]
async fn delete_is_idempotent() {
	let ds = new_ds().await;
	ds.insert([Triple::new("john", "firstName", "John")]).await.unwrap();

	ds.delete("john", "lastName").await.unwrap();
	ds.delete("dave", "firstName").await.unwrap();
	ds.delete("john", "firstName").await.unwrap();
	ds.delete("john", "firstName").await.unwrap();

	let res = ds.query(vec![]).await.unwrap();
	assert!(res.is_empty());
}

#[test(tokio::test)]
async fn delete_maintains_the_registry() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "firstName", "John"),
		Triple::new("dave", "firstName", "Dave"),
		Triple::new("john", "age", 20),
	])
	.await
	.unwrap();

	// The predicate stays registered while other posting lists remain
	ds.delete("john", "firstName").await.unwrap();
	let res = ds.query(vec![]).await.unwrap();
	assert!(res.contains(&Triple::new("dave", "firstName", "Dave")));

	// Removing the last posting list unregisters the predicate
	ds.delete("dave", "firstName").await.unwrap();
	let res = ds.query(vec![]).await.unwrap();
	assert_eq!(res, vec![Triple::new("john", "age", 20)]);
}

#[test(tokio::test)]
async fn delete_subject_drops_every_predicate() {
	let ds = new_ds().await;
	ds.insert([
		Triple::new("john", "firstName", "John"),
		Triple::new("john", "age", 20),
		Triple::new("dave", "firstName", "Dave"),
	])
	.await
	.unwrap();

	ds.delete_subject("john").await.unwrap();
	let res = ds.query(vec![]).await.unwrap();
	assert_eq!(res, vec![Triple::new("dave", "firstName", "Dave")]);

	// Unknown subjects are a no-op
	ds.delete_subject("mike").await.unwrap();
}

#[test(tokio::test)]
async fn duplicate_inserts_are_stored_once() {
	let ds = new_ds().await;
	ds.insert([Triple::new("john", "eats", "sushi")]).await.unwrap();
	ds.insert([Triple::new("john", "eats", "sushi")]).await.unwrap();

	let res = ds.query(vec![Matcher::predicates(["eats"])]).await.unwrap();
	assert_eq!(res, vec![Triple::new("john", "eats", "sushi")]);
}

#[test(tokio::test)]
async fn mixed_kind_comparisons_fail() {
	let ds = new_ds().await;
	ds.insert([Triple::new("a", "value", 1), Triple::new("b", "value", "1")]).await.unwrap();

	let res = ds.query(vec![Matcher::predicates(["value"]).lt(2)]).await;
	assert!(matches!(res, Err(Error::TypeMismatch { .. })));
}

#[test(tokio::test)]
async fn invalid_predicate_names_are_rejected() {
	let ds = new_ds().await;
	let res = ds.insert([Triple::new("john", "first\0Name", "John")]).await;
	assert!(matches!(res, Err(Error::PredicateName { .. })));
}
