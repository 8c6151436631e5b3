// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! [`Cursor`] over the rows of an executing rusqlite statement.

use rusqlite::{Params, Rows, Statement, types::ValueRef};
use tracing::instrument;

use crate::{
	cursor::{Cursor, ScanTarget},
	error::{CursorError, ScanError},
};

/// Reads a rusqlite result row by row.
///
/// Each advance copies the current row into a per-column buffer that the next
/// scan moves into the raw-bytes targets. Integers are rendered in decimal,
/// reals in their shortest form with an exponent for very large or small
/// magnitudes (`2.5`, `1e+300`), text and blobs are passed through as bytes.
pub struct SqliteCursor<'stmt> {
	rows: Option<Rows<'stmt>>,
	cells: Vec<Option<Vec<u8>>>,
	pending: bool,
	fault: Option<String>,
}

impl<'stmt> SqliteCursor<'stmt> {
	pub fn new(rows: Rows<'stmt>) -> Self {
		Self {
			rows: Some(rows),
			cells: Vec::new(),
			pending: false,
			fault: None,
		}
	}

	/// Executes a prepared statement and wraps its rows.
	pub fn query<P: Params>(stmt: &'stmt mut Statement<'_>, params: P) -> rusqlite::Result<Self> {
		Ok(Self::new(stmt.query(params)?))
	}

	pub fn is_closed(&self) -> bool {
		self.rows.is_none()
	}
}

impl Cursor for SqliteCursor<'_> {
	#[instrument(name = "mapquery::sqlite::columns", level = "trace", skip(self))]
	fn columns(&mut self) -> Result<Vec<String>, CursorError> {
		let rows = self.rows.as_ref().ok_or(CursorError::Closed)?;
		let stmt = Rows::as_ref(rows).ok_or_else(|| CursorError::Columns {
			reason: "rows are not bound to a statement".to_string(),
		})?;
		Ok(stmt.column_names().into_iter().map(String::from).collect())
	}

	fn advance(&mut self) -> Result<bool, CursorError> {
		let rows = self.rows.as_mut().ok_or(CursorError::Closed)?;
		let width = Rows::as_ref(rows).map(|stmt| stmt.column_count()).unwrap_or(0);

		self.pending = false;
		self.fault = None;
		self.cells.clear();

		let row = match rows.next() {
			Ok(Some(row)) => row,
			Ok(None) => return Ok(false),
			Err(err) => {
				return Err(CursorError::Advance {
					reason: err.to_string(),
				});
			}
		};

		for index in 0..width {
			match row.get_ref(index) {
				Ok(value) => self.cells.push(render(value)),
				Err(err) => {
					self.fault = Some(format!("column {index}: {err}"));
					break;
				}
			}
		}

		self.pending = true;
		Ok(true)
	}

	fn scan(&mut self, targets: &mut [ScanTarget]) -> Result<(), ScanError> {
		if !self.pending {
			return Err(ScanError::NoRow);
		}
		self.pending = false;

		if let Some(reason) = self.fault.take() {
			self.cells.clear();
			return Err(ScanError::Driver {
				reason,
			});
		}

		if targets.len() != self.cells.len() {
			let expected = self.cells.len();
			self.cells.clear();
			return Err(ScanError::ColumnCount {
				expected,
				found: targets.len(),
			});
		}

		for (target, cell) in targets.iter_mut().zip(self.cells.iter_mut()) {
			// typed slots are left alone for the caller to reject
			if let Some(raw) = target.as_raw_mut() {
				raw.set(cell.take());
			}
		}
		self.cells.clear();
		Ok(())
	}

	fn close(&mut self) {
		// dropping the rows resets the statement
		self.rows = None;
		self.cells.clear();
		self.pending = false;
		self.fault = None;
	}
}

fn render(value: ValueRef<'_>) -> Option<Vec<u8>> {
	match value {
		ValueRef::Null => None,
		ValueRef::Integer(value) => Some(value.to_string().into_bytes()),
		ValueRef::Real(value) => Some(render_real(value).into_bytes()),
		ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
	}
}

/// Shortest round-trip form of `value`, switching to exponent notation when
/// the decimal exponent is below -4 or at least 6: `2.5`, `1`, `1e+300`,
/// `1e-07`, `1.234567e+06`.
fn render_real(value: f64) -> String {
	if value.is_nan() {
		return "NaN".to_string();
	}
	if value.is_infinite() {
		return if value > 0.0 {
			"+Inf".to_string()
		} else {
			"-Inf".to_string()
		};
	}

	let scientific = format!("{value:e}");
	let (mantissa, exponent) = match scientific.split_once('e') {
		Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
		None => return value.to_string(),
	};

	if exponent < -4 || exponent >= 6 {
		let sign = if exponent < 0 {
			'-'
		} else {
			'+'
		};
		format!("{mantissa}e{sign}{:02}", exponent.abs())
	} else {
		value.to_string()
	}
}
