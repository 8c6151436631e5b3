// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The cursor capability the mapper reads from, and the scan targets a cursor
//! writes a row into.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::error::{CursorError, ScanError};

/// Raw cell contents, independent of the column's declared SQL type.
/// `None` is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBytes(Option<Vec<u8>>);

impl RawBytes {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(Some(bytes.into()))
	}

	pub fn null() -> Self {
		Self(None)
	}

	pub fn set(&mut self, bytes: Option<Vec<u8>>) {
		self.0 = bytes;
	}

	/// Moves the contents out, leaving the slot empty.
	pub fn take(&mut self) -> Option<Vec<u8>> {
		self.0.take()
	}

	pub fn is_null(&self) -> bool {
		self.0.is_none()
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		self.0.as_deref()
	}
}

impl From<Option<Vec<u8>>> for RawBytes {
	fn from(bytes: Option<Vec<u8>>) -> Self {
		Self(bytes)
	}
}

/// A slot the cursor populates for one column of the current row.
///
/// The mapper only ever binds [`ScanTarget::Raw`]. A slot found in any other
/// state after a scan means the cursor broke its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
	Raw(RawBytes),
	Typed {
		kind: &'static str,
	},
}

impl ScanTarget {
	pub fn raw() -> Self {
		ScanTarget::Raw(RawBytes::null())
	}

	pub fn as_raw_mut(&mut self) -> Option<&mut RawBytes> {
		match self {
			ScanTarget::Raw(raw) => Some(raw),
			ScanTarget::Typed {
				..
			} => None,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			ScanTarget::Raw(_) => "raw bytes",
			ScanTarget::Typed {
				kind,
			} => *kind,
		}
	}

	/// Rebinds the slot as an empty raw-bytes target.
	pub fn reset(&mut self) {
		match self {
			ScanTarget::Raw(raw) => raw.set(None),
			ScanTarget::Typed {
				..
			} => *self = ScanTarget::raw(),
		}
	}
}

impl Default for ScanTarget {
	fn default() -> Self {
		Self::raw()
	}
}

/// An already executing query result.
///
/// Opening connections and preparing statements happens before a cursor is
/// handed over; the mapper only reads it and releases it.
pub trait Cursor {
	/// Ordered column names of the result.
	fn columns(&mut self) -> Result<Vec<String>, CursorError>;

	/// Moves to the next row. Returns `false` once the result is exhausted.
	fn advance(&mut self) -> Result<bool, CursorError>;

	/// Writes the cells of the current row into `targets`, one per column.
	fn scan(&mut self, targets: &mut [ScanTarget]) -> Result<(), ScanError>;

	/// Releases the underlying resource.
	fn close(&mut self);
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
	fn columns(&mut self) -> Result<Vec<String>, CursorError> {
		(**self).columns()
	}

	fn advance(&mut self) -> Result<bool, CursorError> {
		(**self).advance()
	}

	fn scan(&mut self, targets: &mut [ScanTarget]) -> Result<(), ScanError> {
		(**self).scan(targets)
	}

	fn close(&mut self) {
		(**self).close()
	}
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
	fn columns(&mut self) -> Result<Vec<String>, CursorError> {
		(**self).columns()
	}

	fn advance(&mut self) -> Result<bool, CursorError> {
		(**self).advance()
	}

	fn scan(&mut self, targets: &mut [ScanTarget]) -> Result<(), ScanError> {
		(**self).scan(targets)
	}

	fn close(&mut self) {
		(**self).close()
	}
}

/// Owns a cursor and closes it exactly once, on whichever path the owner
/// leaves by.
pub struct CursorGuard<C: Cursor> {
	cursor: C,
	closed: bool,
}

impl<C: Cursor> CursorGuard<C> {
	pub fn new(cursor: C) -> Self {
		Self {
			cursor,
			closed: false,
		}
	}

	/// Closes the cursor now instead of on drop.
	pub fn close(&mut self) {
		if !self.closed {
			self.closed = true;
			self.cursor.close();
			trace!("cursor closed");
		}
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}
}

impl<C: Cursor> Deref for CursorGuard<C> {
	type Target = C;

	fn deref(&self) -> &Self::Target {
		&self.cursor
	}
}

impl<C: Cursor> DerefMut for CursorGuard<C> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.cursor
	}
}

impl<C: Cursor> Drop for CursorGuard<C> {
	fn drop(&mut self) {
		self.close();
	}
}
