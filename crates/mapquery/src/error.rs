// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the cursor itself, as opposed to a single row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
	#[error("cannot discover result columns: {reason}")]
	Columns {
		reason: String,
	},

	#[error("cannot advance cursor: {reason}")]
	Advance {
		reason: String,
	},

	#[error("cursor is closed")]
	Closed,
}

/// Failures binding or decoding the cells of one row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
	#[error("cannot convert index {index} column {column} to raw bytes, slot is bound as {kind}")]
	UnexpectedTarget {
		index: usize,
		column: String,
		kind: &'static str,
	},

	#[error("expected {expected} scan targets, got {found}")]
	ColumnCount {
		expected: usize,
		found: usize,
	},

	#[error("no row is pending on the cursor")]
	NoRow,

	#[error("driver failed to read row: {reason}")]
	Driver {
		reason: String,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Cursor(#[from] CursorError),

	#[error("row {row} failed to decode")]
	Scan {
		row: usize,
		#[source]
		source: ScanError,
	},

	#[error("cannot serialize records: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Whether the whole result was unusable, rather than one row.
	pub fn is_cursor(&self) -> bool {
		matches!(self, Error::Cursor(_))
	}

	pub fn as_scan(&self) -> Option<&ScanError> {
		match self {
			Error::Scan {
				source,
				..
			} => Some(source),
			_ => None,
		}
	}
}
