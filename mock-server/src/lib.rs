//! In-memory stand-in for the recycling-rewards backend.
//!
//! Follows the backend's conventions rather than REST defaults:
//! - `GET  /{Resource}/Lista` lists, `GET /{Resource}/{id}` fetches one.
//! - `POST /{Resource}/Nuevo` creates and assigns the id.
//! - `POST /{Resource}/Editar` replaces the record whose id is in the body.
//! - `POST /{Resource}?id={id}` deletes.
//!
//! It also reproduces the quirks clients must tolerate: `Usuarios/Lista`
//! answers with lowercase keys, `Localidades/Lista` sends JSON labelled as
//! `text/plain`, deletes answer with plain text, and a user email that is
//! already taken yields 409.

use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Resource path segment and the name of its id field.
pub const RESOURCES: &[(&str, &str)] = &[
    ("Usuarios", "idUsuario"),
    ("Empresas", "idEmpresa"),
    ("Localidades", "idLocalidad"),
    ("Residuos", "idResiduo"),
    ("Recolecciones", "idRecoleccion"),
    ("PuntosUsuario", "idPuntosUsuario"),
    ("Canjes", "idCanje"),
];

#[derive(Debug, Default)]
pub struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

pub type Db = Arc<RwLock<HashMap<String, Table>>>;

#[derive(Deserialize)]
pub struct DeleteParams {
    pub id: i64,
}

fn id_field(resource: &str) -> Option<&'static str> {
    RESOURCES
        .iter()
        .find(|(name, _)| *name == resource)
        .map(|(_, field)| *field)
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(
        RESOURCES
            .iter()
            .map(|(name, _)| (name.to_string(), Table::default()))
            .collect(),
    ));
    Router::new()
        .route("/{resource}", post(delete_record))
        .route("/{resource}/{action}", get(read_action).post(write_action))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

async fn read_action(
    State(db): State<Db>,
    Path((resource, action)): Path<(String, String)>,
) -> Response {
    let Some(field) = id_field(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let tables = db.read().await;
    let Some(table) = tables.get(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if action == "Lista" {
        let rows: Vec<Value> = table.rows.values().cloned().map(Value::Object).collect();
        tracing::debug!(%resource, count = rows.len(), "list");
        return match resource.as_str() {
            "Usuarios" => Json(rows.into_iter().map(lowercase_keys).collect::<Vec<_>>()).into_response(),
            "Localidades" => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Value::Array(rows).to_string(),
            )
                .into_response(),
            _ => Json(rows).into_response(),
        };
    }

    let Ok(id) = action.parse::<i64>() else {
        return (StatusCode::BAD_REQUEST, format!("invalid id `{action}`")).into_response();
    };
    tracing::debug!(%resource, id, id_field = field, "get");
    match table.rows.get(&id) {
        Some(row) => Json(Value::Object(row.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, "Registro no encontrado").into_response(),
    }
}

async fn write_action(
    State(db): State<Db>,
    Path((resource, action)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(field) = id_field(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Value::Object(mut record) = body else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "expected a JSON object").into_response();
    };
    let mut tables = db.write().await;
    let Some(table) = tables.get_mut(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match action.as_str() {
        "Nuevo" => {
            if resource == "Usuarios" && email_taken(table, &record, None) {
                return (StatusCode::CONFLICT, "El correo ya existe").into_response();
            }
            table.next_id += 1;
            let id = table.next_id;
            record.insert(field.to_string(), Value::from(id));
            table.rows.insert(id, record.clone());
            tracing::info!(%resource, id, "created");
            Json(Value::Object(record)).into_response()
        }
        "Editar" => {
            let Some(id) = record.get(field).and_then(Value::as_i64) else {
                return (StatusCode::BAD_REQUEST, format!("missing `{field}`")).into_response();
            };
            if !table.rows.contains_key(&id) {
                return (StatusCode::NOT_FOUND, "Registro no encontrado").into_response();
            }
            if resource == "Usuarios" && email_taken(table, &record, Some(id)) {
                return (StatusCode::CONFLICT, "El correo ya existe").into_response();
            }
            table.rows.insert(id, record.clone());
            tracing::info!(%resource, id, "updated");
            Json(Value::Object(record)).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_record(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let mut tables = db.write().await;
    let Some(table) = tables.get_mut(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match table.rows.remove(&params.id) {
        Some(_) => {
            tracing::info!(%resource, id = params.id, "deleted");
            (StatusCode::OK, "Registro eliminado").into_response()
        }
        None => (StatusCode::NOT_FOUND, "Registro no encontrado").into_response(),
    }
}

fn email_taken(table: &Table, record: &Map<String, Value>, except: Option<i64>) -> bool {
    let Some(email) = record.get("email").and_then(Value::as_str) else {
        return false;
    };
    table.rows.iter().any(|(id, row)| {
        Some(*id) != except
            && row
                .get("email")
                .and_then(Value::as_str)
                .is_some_and(|other| other.eq_ignore_ascii_case(email))
    })
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
        ),
        other => other,
    }
}
