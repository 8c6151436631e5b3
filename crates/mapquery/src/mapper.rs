// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::{debug, instrument, trace, warn};

use crate::{
	ResultSet,
	binding::RowBinding,
	config::{MapperConfig, RowErrorPolicy},
	cursor::{Cursor, CursorGuard},
	error::{Error, Result},
};

/// Records of one mapped result, with the number of rows the cursor produced
/// and how many of them were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapOutcome {
	pub records: ResultSet,
	pub rows_read: usize,
	pub rows_skipped: usize,
}

/// Reads a cursor with an unknown column set into string records.
#[derive(Debug, Clone, Default)]
pub struct RowMapper {
	config: MapperConfig,
}

impl RowMapper {
	pub fn new(config: MapperConfig) -> Self {
		Self {
			config,
		}
	}

	pub fn config(&self) -> &MapperConfig {
		&self.config
	}

	/// Maps every remaining row of `cursor` and closes it.
	///
	/// Only a failure to discover the columns is returned as an error under
	/// [`RowErrorPolicy::Skip`]; rows that fail to decode are logged and left
	/// out.
	pub fn map_all<C: Cursor>(&self, cursor: C) -> Result<ResultSet> {
		self.map_all_with_stats(cursor).map(|outcome| outcome.records)
	}

	#[instrument(name = "mapquery::map_all", level = "debug", skip(self, cursor), fields(
		on_row_error = %self.config.on_row_error.as_str()
	))]
	pub fn map_all_with_stats<C: Cursor>(&self, cursor: C) -> Result<MapOutcome> {
		let mut cursor = CursorGuard::new(cursor);

		let columns = cursor.columns()?;
		debug!(columns = columns.len(), "discovered result columns");

		let mut binding = RowBinding::new(columns);
		let mut outcome = MapOutcome::default();

		loop {
			match cursor.advance() {
				Ok(true) => {}
				Ok(false) => break,
				Err(err) => match self.config.on_row_error {
					RowErrorPolicy::Skip => {
						warn!(after_row = outcome.rows_read, error = %err, "cursor failed to advance, ending result");
						break;
					}
					RowErrorPolicy::Abort => return Err(err.into()),
				},
			}

			outcome.rows_read += 1;
			let row = outcome.rows_read;

			match binding.decode(&mut *cursor) {
				Ok(record) => {
					trace!(row, "decoded row");
					outcome.records.push(record);
				}
				Err(source) => match self.config.on_row_error {
					RowErrorPolicy::Skip => {
						warn!(row, error = %source, "skipping row that failed to decode");
						outcome.rows_skipped += 1;
					}
					RowErrorPolicy::Abort => {
						return Err(Error::Scan {
							row,
							source,
						});
					}
				},
			}
		}

		cursor.close();
		debug!(
			columns = binding.columns().len(),
			rows_read = outcome.rows_read,
			rows_skipped = outcome.rows_skipped,
			"mapped result"
		);
		Ok(outcome)
	}
}

/// Maps `cursor` with the default configuration.
pub fn map_rows<C: Cursor>(cursor: C) -> Result<ResultSet> {
	RowMapper::default().map_all(cursor)
}
