// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test doubles for exercising the row mapper without a database.

mod cursor;

pub use cursor::{CloseCounter, ScriptedCursor};
