// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// What the mapper does with a row that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
	/// Log the failure, leave the row out and keep reading. The result may
	/// hold fewer records than the cursor produced rows.
	#[default]
	Skip,
	/// Stop at the first failing row and return the error without a result.
	Abort,
}

impl RowErrorPolicy {
	pub fn as_str(&self) -> &'static str {
		match self {
			RowErrorPolicy::Skip => "skip",
			RowErrorPolicy::Abort => "abort",
		}
	}
}

/// Configuration for a [`RowMapper`](crate::RowMapper)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
	pub on_row_error: RowErrorPolicy,
}

impl MapperConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_on_row_error(mut self, policy: RowErrorPolicy) -> Self {
		self.on_row_error = policy;
		self
	}
}
