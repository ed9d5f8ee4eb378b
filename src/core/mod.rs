//! Core data types shared by the configuration engines.
//!
//! This module provides the plain data structures the engines exchange:
//!
//! - [`TrackNode`]: A resolved track tree node, either a leaf with a download URL or a composite
//! - [`ReadRun`]: A sequencing read run with its selection [`Validation`]
//! - [`ConfiguredReads`]: The read-run fields contributed to a workflow configuration
//! - [`LibraryLayout`], [`ColumnType`], [`ContrastMode`]: Shared enums
//!
//! None of these types carry behavior beyond simple accessors; all
//! transformations live in [`crate::tracks`], [`crate::reads`] and
//! [`crate::design`].
//!
//! [`TrackNode`]: track::TrackNode
//! [`ReadRun`]: read_run::ReadRun
//! [`Validation`]: read_run::Validation
//! [`ConfiguredReads`]: read_run::ConfiguredReads
//! [`LibraryLayout`]: types::LibraryLayout
//! [`ColumnType`]: types::ColumnType
//! [`ContrastMode`]: types::ContrastMode

pub mod read_run;
pub mod track;
pub mod types;
