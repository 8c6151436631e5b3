// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! JSON rendering of mapped records as an array of objects. The string
//! renderings keep the column order of each record.

use serde_json::{Map, Value};

use crate::{Record, error::Result};

pub fn to_value(records: &[Record]) -> Value {
	Value::Array(
		records.iter()
			.map(|record| {
				let object: Map<String, Value> = record
					.iter()
					.map(|(column, value)| (column.clone(), Value::String(value.clone())))
					.collect();
				Value::Object(object)
			})
			.collect(),
	)
}

pub fn to_string(records: &[Record]) -> Result<String> {
	Ok(serde_json::to_string(records)?)
}

pub fn to_string_pretty(records: &[Record]) -> Result<String> {
	Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn record(pairs: &[(&str, &str)]) -> Record {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn test_to_value_builds_array_of_objects() {
		let records = vec![record(&[("id", "1"), ("name", "alice")]), record(&[("id", "2"), ("name", "")])];
		assert_eq!(
			to_value(&records),
			json!([
				{"id": "1", "name": "alice"},
				{"id": "2", "name": ""},
			])
		);
	}

	#[test]
	fn test_to_string_keeps_column_order() {
		let records = vec![record(&[("z", "1"), ("a", "2")])];
		assert_eq!(to_string(&records).unwrap(), r#"[{"z":"1","a":"2"}]"#);
	}

	#[test]
	fn test_empty_result_is_empty_array() {
		assert_eq!(to_string(&[]).unwrap(), "[]");
		assert_eq!(to_value(&[]), json!([]));
	}

	#[test]
	fn test_to_string_pretty_indents_objects() {
		let records = vec![record(&[("id", "1")])];
		assert_eq!(to_string_pretty(&records).unwrap(), "[\n  {\n    \"id\": \"1\"\n  }\n]");
	}
}
