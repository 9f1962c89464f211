//! Async CRUD operations with logging and notifications.
//!
//! # Design
//! `Dashboard` wires the stateless `ApiClient` to a `Transport` and a
//! `Notifier`. Every operation logs the request URL, the response status and
//! the decoded payload, and reports its outcome as a notification.
//!
//! Failure handling differs by operation on purpose:
//! - `list` notifies and then returns the error, so a joined batch of list
//!   calls aborts as a whole.
//! - `get`, `create`, `update` and `delete` notify and resolve to `None` /
//!   `false`, so callers only check the result.
//!
//! `ResourceApi` applies the endpoint conventions of a single `Resource`:
//! `{Name}/Lista`, `{Name}/{id}`, `{Name}/Nuevo`, `{Name}/Editar` and
//! `{Name}?id={id}`.

use std::marker::PhantomData;

use tracing::{debug, error, warn};

use crate::client::{record_from_payload, records_from_list, ApiClient};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::payload::Payload;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Canje, Empresa, Localidad, PuntosUsuario, Recoleccion, Record, Residuo, Resource, Usuario};

pub const MSG_CREATED: &str = "Registro creado exitosamente";
pub const MSG_UPDATED: &str = "Registro actualizado exitosamente";
pub const MSG_DELETED: &str = "Registro eliminado exitosamente";

#[derive(Debug)]
pub struct Dashboard<T, N> {
    client: ApiClient,
    transport: T,
    notifier: N,
}

impl Dashboard<ReqwestTransport, TracingNotifier> {
    /// HTTP over `reqwest`, notifications to `tracing`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self::new(
            ApiClient::new(&config.base_url),
            ReqwestTransport::new(),
            TracingNotifier,
        ))
    }
}

impl<T: Transport, N: Notifier> Dashboard<T, N> {
    pub fn new(client: ApiClient, transport: T, notifier: N) -> Self {
        Self {
            client,
            transport,
            notifier,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.path.clone();
        debug!(method = request.method.as_str(), url = %url, "fetching");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(url = %url, status = response.status, "response status");
                Ok(response)
            }
            Err(err) => {
                error!(url = %url, error = %err, "fetch error");
                Err(err)
            }
        }
    }

    fn decode(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        match self.client.parse_payload(response) {
            Ok(payload) => {
                debug!(payload = ?payload, "response data");
                Ok(payload)
            }
            Err(err) => {
                error!(error = %err, "API error");
                Err(err)
            }
        }
    }

    /// Issue `request` and decode the body tolerantly. Never swallows errors.
    pub async fn fetch(&self, request: HttpRequest) -> Result<Payload, ApiError> {
        let response = self.send(request).await?;
        self.decode(response)
    }

    /// List records. Notifies and re-raises on failure.
    pub async fn list<R: Record>(&self, endpoint: &str) -> Result<Vec<R>, ApiError> {
        let result = match self.fetch(self.client.build_list(endpoint)).await {
            Ok(payload) => {
                if payload.is_empty() {
                    warn!(endpoint, "no data returned");
                }
                records_from_list(payload)
            }
            Err(err) => Err(err),
        };
        result.inspect_err(|err| {
            error!(endpoint, status = ?err.status(), error = %err, "failed to fetch list");
            self.notifier
                .notify(Notification::error(format!("Error al cargar datos: {err}")));
        })
    }

    /// Fetch one record by id; `None` on failure or when nothing came back.
    pub async fn get<R: Record>(&self, endpoint: &str, id: i64) -> Option<R> {
        let result = match self.fetch(self.client.build_get(endpoint, id)).await {
            Ok(payload) => record_from_payload(payload),
            Err(err) => Err(err),
        };
        match result {
            Ok(record) => record,
            Err(err) => {
                error!(endpoint, id, status = ?err.status(), error = %err, "failed to fetch record");
                self.notifier
                    .notify(Notification::error(format!("Error al cargar datos: {err}")));
                None
            }
        }
    }

    /// Create a record and return it as echoed by the server.
    ///
    /// When the server acknowledges without a JSON object, the submitted
    /// record is returned.
    pub async fn create<R: Record + Clone>(&self, endpoint: &str, input: &R) -> Option<R> {
        debug!(endpoint, "creating record");
        let result = match self.client.build_create(endpoint, input) {
            Ok(request) => match self.fetch(request).await {
                Ok(payload) => record_from_payload(payload),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        match result {
            Ok(created) => {
                self.notifier.notify(Notification::success(MSG_CREATED));
                Some(created.unwrap_or_else(|| input.clone()))
            }
            Err(err) => {
                error!(endpoint, status = ?err.status(), error = %err, "failed to create record");
                self.notifier
                    .notify(Notification::error(format!("Error al crear registro: {err}")));
                None
            }
        }
    }

    /// Update a record; its id travels in the body. A 409 becomes
    /// `ApiError::DuplicateEmail` before generic status handling.
    pub async fn update<R: Record + Clone>(&self, endpoint: &str, input: &R) -> Option<R> {
        debug!(endpoint, "updating record");
        let result = match self.client.build_update(endpoint, input) {
            Ok(request) => match self.send(request).await {
                Ok(response) if response.status == 409 => Err(ApiError::DuplicateEmail),
                Ok(response) => self.decode(response).and_then(record_from_payload),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        match result {
            Ok(updated) => {
                self.notifier.notify(Notification::success(MSG_UPDATED));
                Some(updated.unwrap_or_else(|| input.clone()))
            }
            Err(err) => {
                error!(endpoint, status = ?err.status(), error = %err, "update error");
                self.notifier
                    .notify(Notification::error(format!("Error al actualizar: {err}")));
                None
            }
        }
    }

    /// Delete by id, passed as the `id` query parameter.
    pub async fn delete(&self, endpoint: &str, id: i64) -> bool {
        debug!(endpoint, id, "deleting record");
        match self.fetch(self.client.build_delete(endpoint, id)).await {
            Ok(_) => {
                self.notifier.notify(Notification::success(MSG_DELETED));
                true
            }
            Err(err) => {
                error!(endpoint, id, status = ?err.status(), error = %err, "failed to delete record");
                self.notifier
                    .notify(Notification::error(format!("Error al eliminar registro: {err}")));
                false
            }
        }
    }

    pub fn resource<R: Resource + Clone>(&self) -> ResourceApi<'_, R, T, N> {
        ResourceApi {
            dashboard: self,
            _resource: PhantomData,
        }
    }

    pub fn usuarios(&self) -> ResourceApi<'_, Usuario, T, N> {
        self.resource()
    }

    pub fn empresas(&self) -> ResourceApi<'_, Empresa, T, N> {
        self.resource()
    }

    pub fn localidades(&self) -> ResourceApi<'_, Localidad, T, N> {
        self.resource()
    }

    pub fn residuos(&self) -> ResourceApi<'_, Residuo, T, N> {
        self.resource()
    }

    pub fn recolecciones(&self) -> ResourceApi<'_, Recoleccion, T, N> {
        self.resource()
    }

    pub fn puntos_usuario(&self) -> ResourceApi<'_, PuntosUsuario, T, N> {
        self.resource()
    }

    pub fn canjes(&self) -> ResourceApi<'_, Canje, T, N> {
        self.resource()
    }
}

/// The five operations of one resource, endpoints filled in.
///
/// Methods take `self` by value so their futures own the handle and can be
/// joined directly.
pub struct ResourceApi<'a, R, T, N> {
    dashboard: &'a Dashboard<T, N>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T, N> Clone for ResourceApi<'_, R, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T, N> Copy for ResourceApi<'_, R, T, N> {}

impl<R: Resource + Clone, T: Transport, N: Notifier> ResourceApi<'_, R, T, N> {
    pub fn list_endpoint() -> String {
        format!("{}/Lista", R::NAME)
    }

    pub fn create_endpoint() -> String {
        format!("{}/Nuevo", R::NAME)
    }

    pub fn update_endpoint() -> String {
        format!("{}/Editar", R::NAME)
    }

    pub async fn all(self) -> Result<Vec<R>, ApiError> {
        self.dashboard.list(&Self::list_endpoint()).await
    }

    pub async fn by_id(self, id: i64) -> Option<R> {
        self.dashboard.get(R::NAME, id).await
    }

    pub async fn create(self, record: &R) -> Option<R> {
        self.dashboard.create(&Self::create_endpoint(), record).await
    }

    pub async fn update(self, record: &R) -> Option<R> {
        self.dashboard.update(&Self::update_endpoint(), record).await
    }

    pub async fn delete(self, id: i64) -> bool {
        self.dashboard.delete(R::NAME, id).await
    }

    /// Delete a loaded record. Records without an id are refused locally.
    pub async fn remove(self, record: &R) -> bool {
        match record.id() {
            Some(id) => self.delete(id).await,
            None => {
                warn!(resource = R::NAME, "delete requested for record without id");
                self.dashboard.notifier.notify(Notification::error(
                    "No se puede eliminar: registro sin identificador",
                ));
                false
            }
        }
    }
}
