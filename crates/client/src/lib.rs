//! HTTP client for the finance records API.
//!
//! The crate turns the typed resources of [`api_types`] into CRUD calls:
//!
//! - [`Transport`] issues raw verbs; [`HttpTransport`] does it with reqwest.
//! - [`ResourceClient`] is the generic list/get/create/update/delete client
//!   for one collection.
//! - [`EntryService`] writes entries only after resolving their category, and
//!   answers month/year queries through [`select_by_month_year`].
//! - [`form`] holds the create/edit form state machine used by consumers.
//!
//! Every operation settles exactly once and forwards failures unchanged; no
//! call is retried. Dropping a pending future does not cancel a request that
//! was already sent.

pub use entries::{EntryService, resolve_then};
pub use error::{ClientError, TransportError, VALIDATION_STATUS};
pub use filter::{in_month, select_by_month_year};
pub use resource::{ResourceClient, ResourceStore};
pub use transport::{HttpTransport, HttpTransportBuilder, Transport};

mod entries;
mod error;
mod filter;
pub mod form;
mod resource;
mod transport;

#[cfg(test)]
mod testing;
