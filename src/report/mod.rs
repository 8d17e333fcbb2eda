//! Temporary report artifacts
//!
//! A report is written either in one shot ([`ReportStore::create`]) or
//! incrementally through a [`ReportWriter`]. Only a finished writer yields a
//! [`ReportHandle`]; an abandoned writer deletes its file. Handles remove their
//! file on [`ReportHandle::dispose`] or, failing that, when dropped.

mod store;

pub use store::{ReportError, ReportHandle, ReportStore, ReportWriter, REPORT_PREFIX};
