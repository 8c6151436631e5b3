// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Maps the rows of a query result with an unknown column set into
//! string-keyed, string-valued records.
//!
//! The caller executes the query and hands over a [`Cursor`]. The mapper
//! discovers the column names once, reads every cell through a raw-bytes scan
//! target, and returns one independent [`Record`] per row, in cursor order.
//! The cursor is closed before the mapping call returns.
//!
//! ```ignore
//! let mut stmt = conn.prepare("SELECT id, name FROM users")?;
//! let records = mapquery::map_rows(SqliteCursor::new(stmt.query([])?))?;
//! println!("{}", mapquery::json::to_string(&records)?);
//! ```

use indexmap::IndexMap;

mod binding;
pub mod config;
pub mod cursor;
pub mod error;
pub mod json;
pub mod mapper;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{MapperConfig, RowErrorPolicy};
pub use cursor::{Cursor, CursorGuard, RawBytes, ScanTarget};
pub use error::{CursorError, Error, Result, ScanError};
pub use mapper::{MapOutcome, RowMapper, map_rows};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCursor;

/// One decoded row: column name to textual value, in column order.
pub type Record = IndexMap<String, String>;

/// All records of one query result, in cursor order.
pub type ResultSet = Vec<Record>;
