//! Core state for revu: pure, synchronous, free of I/O.
//!
//! Everything with state-consistency concerns lives here: the editable
//! [`buffer::SourceBuffer`], the derived [`diagnostics::DiagnosticIndex`],
//! the optimistic [`rules::RuleStore`], and the [`session::ReviewSession`]
//! controller that owns them. The TUI binary mutates this state only through
//! the operations these modules expose and renders from read-only snapshots;
//! the network layer feeds settlements back in as plain values.

pub mod buffer;
pub mod diagnostics;
pub mod rules;
pub mod session;
pub mod types;
