// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cell::Cell, rc::Rc};

use mapquery::{Cursor, CursorError, ScanError, ScanTarget};

/// Counts how often a [`ScriptedCursor`] was closed. Clones share the count,
/// so a test can keep one after handing the cursor to the mapper.
#[derive(Debug, Clone, Default)]
pub struct CloseCounter(Rc<Cell<usize>>);

impl CloseCounter {
	pub fn get(&self) -> usize {
		self.0.get()
	}

	fn increment(&self) {
		self.0.set(self.0.get() + 1);
	}
}

struct TypedSlot {
	row: usize,
	column: usize,
	kind: &'static str,
}

/// In-memory cursor replaying a fixed set of rows.
///
/// Rows are numbered from 1 in the order they were added. Failures can be
/// scripted for column discovery, for advancing onto a given row, and for a
/// single slot of a given row that the cursor rebinds to a non raw-bytes kind.
pub struct ScriptedCursor {
	columns: Vec<String>,
	column_failure: Option<String>,
	rows: Vec<Vec<Option<Vec<u8>>>>,
	typed_slots: Vec<TypedSlot>,
	advance_failure: Option<(usize, String)>,
	position: usize,
	pending: bool,
	closed: bool,
	closes: CloseCounter,
}

impl ScriptedCursor {
	pub fn new<I, S>(columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			columns: columns.into_iter().map(Into::into).collect(),
			column_failure: None,
			rows: Vec::new(),
			typed_slots: Vec::new(),
			advance_failure: None,
			position: 0,
			pending: false,
			closed: false,
			closes: CloseCounter::default(),
		}
	}

	/// Appends a row; `None` cells are SQL NULL.
	pub fn row<I, V>(mut self, cells: I) -> Self
	where
		I: IntoIterator<Item = Option<V>>,
		V: AsRef<[u8]>,
	{
		self.rows.push(cells.into_iter().map(|cell| cell.map(|v| v.as_ref().to_vec())).collect());
		self
	}

	pub fn fail_columns(mut self, reason: impl Into<String>) -> Self {
		self.column_failure = Some(reason.into());
		self
	}

	/// On `row`, the slot for `column` is rebound as `kind` instead of being
	/// filled.
	pub fn typed_slot(mut self, row: usize, column: usize, kind: &'static str) -> Self {
		self.typed_slots.push(TypedSlot {
			row,
			column,
			kind,
		});
		self
	}

	/// Advancing onto `row` fails instead of producing it.
	pub fn fail_advance_at(mut self, row: usize, reason: impl Into<String>) -> Self {
		self.advance_failure = Some((row, reason.into()));
		self
	}

	pub fn close_counter(&self) -> CloseCounter {
		self.closes.clone()
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}

	fn typed_kind(&self, row: usize, column: usize) -> Option<&'static str> {
		self.typed_slots.iter().find(|slot| slot.row == row && slot.column == column).map(|slot| slot.kind)
	}
}

impl Cursor for ScriptedCursor {
	fn columns(&mut self) -> Result<Vec<String>, CursorError> {
		if self.closed {
			return Err(CursorError::Closed);
		}
		match &self.column_failure {
			Some(reason) => Err(CursorError::Columns {
				reason: reason.clone(),
			}),
			None => Ok(self.columns.clone()),
		}
	}

	fn advance(&mut self) -> Result<bool, CursorError> {
		if self.closed {
			return Err(CursorError::Closed);
		}
		self.pending = false;

		let next = self.position + 1;
		if let Some((row, reason)) = &self.advance_failure {
			if *row == next {
				return Err(CursorError::Advance {
					reason: reason.clone(),
				});
			}
		}

		if self.position < self.rows.len() {
			self.position = next;
			self.pending = true;
			Ok(true)
		} else {
			Ok(false)
		}
	}

	fn scan(&mut self, targets: &mut [ScanTarget]) -> Result<(), ScanError> {
		if !self.pending {
			return Err(ScanError::NoRow);
		}
		self.pending = false;

		let row = self.position;
		let cells = &self.rows[row - 1];
		if cells.len() != targets.len() {
			return Err(ScanError::ColumnCount {
				expected: cells.len(),
				found: targets.len(),
			});
		}

		for (column, (target, cell)) in targets.iter_mut().zip(cells).enumerate() {
			if let Some(kind) = self.typed_kind(row, column) {
				*target = ScanTarget::Typed {
					kind,
				};
			} else if let Some(raw) = target.as_raw_mut() {
				raw.set(cell.clone());
			}
		}
		Ok(())
	}

	fn close(&mut self) {
		self.closed = true;
		self.pending = false;
		self.closes.increment();
	}
}
