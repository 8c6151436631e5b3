// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	Record,
	cursor::{Cursor, ScanTarget},
	error::ScanError,
};

/// Scratch state for reading one result: a raw-bytes slot per column and a
/// working map that is overwritten on every row. Only snapshots of the map
/// leave this type.
pub(crate) struct RowBinding {
	columns: Vec<String>,
	slots: Vec<ScanTarget>,
	row: Record,
}

impl RowBinding {
	pub(crate) fn new(columns: Vec<String>) -> Self {
		let slots = columns.iter().map(|_| ScanTarget::raw()).collect();
		let row = Record::with_capacity(columns.len());
		Self {
			columns,
			slots,
			row,
		}
	}

	pub(crate) fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Scans the cursor's pending row and returns a copy of the decoded
	/// values. Every slot is left empty afterwards, on success and on failure.
	pub(crate) fn decode<C: Cursor + ?Sized>(&mut self, cursor: &mut C) -> Result<Record, ScanError> {
		if let Err(err) = cursor.scan(&mut self.slots) {
			self.reset_slots();
			return Err(err);
		}

		let mut failure = None;
		for (index, slot) in self.slots.iter_mut().enumerate() {
			let raw = match slot {
				ScanTarget::Raw(raw) => raw,
				ScanTarget::Typed {
					kind,
				} => {
					let kind = *kind;
					if failure.is_none() {
						failure = Some(ScanError::UnexpectedTarget {
							index,
							column: self.columns[index].clone(),
							kind,
						});
					}
					slot.reset();
					continue;
				}
			};

			let value = raw.take().map(|bytes| decode_text(&bytes)).unwrap_or_default();
			let column = &self.columns[index];
			match self.row.get_mut(column) {
				Some(existing) => *existing = value,
				None => {
					self.row.insert(column.clone(), value);
				}
			}
		}

		match failure {
			Some(err) => Err(err),
			None => Ok(self.row.clone()),
		}
	}

	fn reset_slots(&mut self) {
		for slot in &mut self.slots {
			slot.reset();
		}
	}
}

fn decode_text(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).into_owned()
}
