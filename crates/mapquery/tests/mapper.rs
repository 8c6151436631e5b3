// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use mapquery::{Error, MapperConfig, RowErrorPolicy, RowMapper, ScanError, map_rows};
use mapquery_testing::ScriptedCursor;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}

fn abort_mapper() -> RowMapper {
	RowMapper::new(MapperConfig::new().with_on_row_error(RowErrorPolicy::Abort))
}

fn three_rows_second_typed() -> ScriptedCursor {
	ScriptedCursor::new(["id", "name"])
		.row([Some("1"), Some("alice")])
		.row([Some("2"), Some("bob")])
		.row([Some("3"), Some("carol")])
		.typed_slot(2, 1, "i64")
}

#[test]
fn test_records_have_exactly_the_column_names() {
	init_tracing();
	let cursor = ScriptedCursor::new(["id", "name", "email"])
		.row([Some("1"), Some("alice"), Some("a@example.com")])
		.row([Some("2"), None, Some("")]);

	let records = map_rows(cursor).unwrap();
	let expected: BTreeSet<&str> = ["id", "name", "email"].into_iter().collect();
	for record in &records {
		let keys: BTreeSet<&str> = record.keys().map(String::as_str).collect();
		assert_eq!(keys, expected);
	}
}

#[test]
fn test_records_are_independent() {
	let cursor = ScriptedCursor::new(["id"]).row([Some("1")]).row([Some("2")]);

	let mut records = map_rows(cursor).unwrap();
	records[0].insert("id".to_string(), "changed".to_string());
	records[0].insert("extra".to_string(), "x".to_string());

	assert_eq!(records[1].len(), 1);
	assert_eq!(records[1]["id"], "2");
}

#[test]
fn test_cursor_order_is_kept_without_dedup() {
	let cursor = ScriptedCursor::new(["v"]).row([Some("b")]).row([Some("a")]).row([Some("b")]);

	let records = map_rows(cursor).unwrap();
	let values: Vec<&str> = records.iter().map(|r| r["v"].as_str()).collect();
	assert_eq!(values, vec!["b", "a", "b"]);
}

#[test]
fn test_typical_result() {
	let cursor = ScriptedCursor::new(["id", "name"]).row([Some("1"), Some("alice")]).row([Some("2"), Some("bob")]);

	let records = map_rows(cursor).unwrap();
	assert_eq!(mapquery::json::to_string(&records).unwrap(), r#"[{"id":"1","name":"alice"},{"id":"2","name":"bob"}]"#);
}

#[test]
fn test_empty_result() {
	let cursor = ScriptedCursor::new(["id"]);
	let closes = cursor.close_counter();

	let records = map_rows(cursor).unwrap();
	assert!(records.is_empty());
	assert_eq!(closes.get(), 1);
}

#[test]
fn test_null_cell_is_empty_string() {
	let cursor = ScriptedCursor::new(["id", "note"]).row([Some("1"), None]);

	let records = map_rows(cursor).unwrap();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0]["id"], "1");
	assert_eq!(records[0].get("note").map(String::as_str), Some(""));
}

#[test]
fn test_column_discovery_failure() {
	for mapper in [RowMapper::default(), abort_mapper()] {
		let cursor = ScriptedCursor::new(["id"]).row([Some("1")]).fail_columns("metadata unavailable");
		let closes = cursor.close_counter();

		let err = mapper.map_all(cursor).unwrap_err();
		assert!(err.is_cursor(), "{err}");
		assert_eq!(closes.get(), 1);
	}
}

#[test]
fn test_skip_leaves_failing_row_out() {
	init_tracing();
	let cursor = three_rows_second_typed();
	let closes = cursor.close_counter();

	let outcome = RowMapper::default().map_all_with_stats(cursor).unwrap();
	let ids: Vec<&str> = outcome.records.iter().map(|r| r["id"].as_str()).collect();
	assert_eq!(ids, vec!["1", "3"]);
	assert_eq!(outcome.records[1]["name"], "carol");
	assert_eq!(outcome.rows_read, 3);
	assert_eq!(outcome.rows_skipped, 1);
	assert_eq!(closes.get(), 1);
}

#[test]
fn test_abort_stops_at_failing_row() {
	let cursor = three_rows_second_typed();
	let closes = cursor.close_counter();

	let err = abort_mapper().map_all(cursor).unwrap_err();
	match err {
		Error::Scan {
			row,
			source,
		} => {
			assert_eq!(row, 2);
			assert_eq!(
				source,
				ScanError::UnexpectedTarget {
					index: 1,
					column: "name".to_string(),
					kind: "i64",
				}
			);
		}
		other => panic!("expected scan error, got {other:?}"),
	}
	assert_eq!(closes.get(), 1);
}

#[test]
fn test_failed_advance_ends_result_under_skip() {
	init_tracing();
	let cursor = ScriptedCursor::new(["id"]).row([Some("1")]).row([Some("2")]).fail_advance_at(2, "connection reset");
	let closes = cursor.close_counter();

	let outcome = RowMapper::default().map_all_with_stats(cursor).unwrap();
	assert_eq!(outcome.records.len(), 1);
	assert_eq!(outcome.rows_read, 1);
	assert_eq!(closes.get(), 1);
}

#[test]
fn test_failed_advance_is_returned_under_abort() {
	let cursor = ScriptedCursor::new(["id"]).row([Some("1")]).row([Some("2")]).fail_advance_at(2, "connection reset");
	let closes = cursor.close_counter();

	let err = abort_mapper().map_all(cursor).unwrap_err();
	assert!(err.is_cursor());
	assert_eq!(err.to_string(), "cannot advance cursor: connection reset");
	assert_eq!(closes.get(), 1);
}

#[test]
fn test_borrowed_cursor_is_closed_once() {
	let mut cursor = ScriptedCursor::new(["id"]).row([Some("1")]);

	let records = map_rows(&mut cursor).unwrap();
	assert_eq!(records.len(), 1);
	assert!(cursor.is_closed());
	assert_eq!(cursor.close_counter().get(), 1);
}

#[test]
fn test_empty_column_set_yields_empty_records() {
	let cursor = ScriptedCursor::new(Vec::<String>::new()).row(Vec::<Option<&str>>::new()).row(Vec::<Option<&str>>::new());

	let records = map_rows(cursor).unwrap();
	assert_eq!(records.len(), 2);
	assert!(records.iter().all(|record| record.is_empty()));
}
