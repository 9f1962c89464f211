//! API client layer for the recycling-rewards administration backend.
//!
//! # Overview
//! Translates CRUD intents on users, companies, localities, waste types,
//! collections, point balances and exchanges into HTTP requests, decodes the
//! responses tolerantly, normalizes inconsistent field casing and reports
//! every outcome through an injected notifier.
//!
//! # Design
//! - `ApiClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Dashboard` runs those requests over a `Transport`, logs with
//!   `tracing` and notifies through a `Notifier`. Lists propagate errors;
//!   single-record operations resolve to `None` / `false`.
//! - Field casing is fixed once per entity by the `normalize::Field` table
//!   declared on each `Record`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod normalize;
pub mod notify;
pub mod payload;
pub mod transport;
pub mod types;

pub use catalog::{label_for, Label, PuntosCatalog, RecoleccionesCatalog, UsuariosCatalog, MISSING_LABEL};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use dashboard::{Dashboard, ResourceApi};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Level, MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use payload::Payload;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Canje, Empresa, EstadoRecoleccion, Localidad, PuntosUsuario, Recoleccion, Record, Residuo, Resource,
    TipoResiduo, Usuario,
};
