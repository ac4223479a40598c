//! rowview: load a handful of rows from a Supabase table and render them
//!
//! The heart of the crate is [`view::RecordListView`], which fetches rows from a
//! [`source::RemoteDataSource`] exactly once per mount and renders one of three
//! display states: loading, failed or ready.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod source;
pub mod tui;
pub mod view;

pub use errors::FetchFailure;
pub use models::{DisplayState, ErrorInfo, FetchResponse, Record};
pub use source::RemoteDataSource;
pub use view::{render, RecordListView, Rendered};
