//! Domain DTOs for the recycling-rewards backend.
//!
//! # Design
//! Entities are plain records: every field the backend may omit is an
//! `Option`, identifiers are assigned by the server and never generated
//! here. Each entity declares its canonical camelCase fields as a
//! `normalize::Field` table so inconsistent casing is fixed once, at the
//! client boundary, before serde sees the record.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::normalize::Field;

/// A record that can cross the client boundary.
pub trait Record: Serialize + DeserializeOwned {
    /// Canonical field table used by `normalize`.
    const FIELDS: &'static [Field];
}

/// A backend resource with its own endpoint family.
pub trait Resource: Record {
    /// Path segment, e.g. `Usuarios`.
    const NAME: &'static str;

    /// Server-assigned identifier, if the record has one yet.
    fn id(&self) -> Option<i64>;
}

/// Untyped records pass through unnormalized.
impl Record for Value {
    const FIELDS: &'static [Field] = &[];
}

/// Keep only the date part of an ISO-8601 timestamp.
pub fn date_only(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_localidad: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
}

impl Record for Usuario {
    const FIELDS: &'static [Field] = &[
        Field::integer("idUsuario"),
        Field::integer("idLocalidad"),
        Field::text("nombre"),
        Field::text("apellidos"),
        Field::text("telefono"),
        Field::text("email"),
        Field::text("direccion"),
        Field::text("rol"),
    ];
}

impl Resource for Usuario {
    const NAME: &'static str = "Usuarios";

    fn id(&self) -> Option<i64> {
        self.id_usuario
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_empresa: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

impl Record for Empresa {
    const FIELDS: &'static [Field] = &[
        Field::integer("idEmpresa"),
        Field::text("nombre"),
        Field::text("telefono"),
        Field::text("email"),
        Field::text("direccion"),
    ];
}

impl Resource for Empresa {
    const NAME: &'static str = "Empresas";

    fn id(&self) -> Option<i64> {
        self.id_empresa
    }
}

/// A locality. The identifier is always present once normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localidad {
    pub id_localidad: i64,
    #[serde(default)]
    pub nombre: String,
}

impl Record for Localidad {
    const FIELDS: &'static [Field] = &[
        Field::integer("idLocalidad").required(),
        Field::text("nombre"),
    ];
}

impl Resource for Localidad {
    const NAME: &'static str = "Localidades";

    fn id(&self) -> Option<i64> {
        Some(self.id_localidad)
    }
}

/// Waste categories offered by the backend. Literals outside the known
/// set are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TipoResiduo {
    #[default]
    Organico,
    InorganicoReciclable,
    Peligroso,
    Other(String),
}

impl TipoResiduo {
    pub const ALL: [TipoResiduo; 3] = [
        TipoResiduo::Organico,
        TipoResiduo::InorganicoReciclable,
        TipoResiduo::Peligroso,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TipoResiduo::Organico => "Orgánico",
            TipoResiduo::InorganicoReciclable => "Inorgánico Reciclable",
            TipoResiduo::Peligroso => "Peligroso",
            TipoResiduo::Other(literal) => literal,
        }
    }

    /// Case-insensitive match against the known literals.
    pub fn from_literal(literal: &str) -> Self {
        let wanted = literal.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tipo| tipo.as_str().to_lowercase() == wanted)
            .unwrap_or_else(|| TipoResiduo::Other(literal.to_string()))
    }
}

impl fmt::Display for TipoResiduo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TipoResiduo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TipoResiduo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|literal| Self::from_literal(&literal))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Residuo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_residuo: Option<i64>,
    #[serde(default)]
    pub tipo_residuo: TipoResiduo,
}

impl Record for Residuo {
    const FIELDS: &'static [Field] = &[Field::integer("idResiduo"), Field::text("tipoResiduo")];
}

impl Resource for Residuo {
    const NAME: &'static str = "Residuos";

    fn id(&self) -> Option<i64> {
        self.id_residuo
    }
}

/// Lifecycle of a collection. Unknown states are kept in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EstadoRecoleccion {
    #[default]
    Programada,
    Completada,
    Cancelada,
    Other(String),
}

impl EstadoRecoleccion {
    pub const ALL: [EstadoRecoleccion; 3] = [
        EstadoRecoleccion::Programada,
        EstadoRecoleccion::Completada,
        EstadoRecoleccion::Cancelada,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EstadoRecoleccion::Programada => "Programada",
            EstadoRecoleccion::Completada => "Completada",
            EstadoRecoleccion::Cancelada => "Cancelada",
            EstadoRecoleccion::Other(literal) => literal,
        }
    }

    pub fn from_literal(literal: &str) -> Self {
        let wanted = literal.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|estado| estado.as_str().to_lowercase() == wanted)
            .unwrap_or_else(|| EstadoRecoleccion::Other(literal.to_string()))
    }
}

impl fmt::Display for EstadoRecoleccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EstadoRecoleccion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EstadoRecoleccion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|literal| Self::from_literal(&literal))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recoleccion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_recoleccion: Option<i64>,
    #[serde(default)]
    pub id_usuario: i64,
    #[serde(default)]
    pub id_empresa: i64,
    #[serde(default)]
    pub id_residuo: i64,
    #[serde(default)]
    pub fecha_recoleccion: String,
    #[serde(default)]
    pub peso_kg: f64,
    #[serde(default)]
    pub estado: EstadoRecoleccion,
}

impl Recoleccion {
    /// A new, not yet persisted collection in the `Programada` state.
    pub fn nueva(id_usuario: i64, id_empresa: i64, id_residuo: i64, fecha: &str, peso_kg: f64) -> Self {
        Self {
            id_recoleccion: None,
            id_usuario,
            id_empresa,
            id_residuo,
            fecha_recoleccion: date_only(fecha).to_string(),
            peso_kg,
            estado: EstadoRecoleccion::Programada,
        }
    }

    /// Form rule: every reference set, a date present and a positive weight.
    pub fn is_valid(&self) -> bool {
        self.id_usuario != 0
            && self.id_empresa != 0
            && self.id_residuo != 0
            && !self.fecha_recoleccion.is_empty()
            && self.peso_kg > 0.0
    }
}

impl Record for Recoleccion {
    const FIELDS: &'static [Field] = &[
        Field::integer("idRecoleccion"),
        Field::integer("idUsuario").required(),
        Field::integer("idEmpresa").required(),
        Field::integer("idResiduo").required(),
        Field::text("fechaRecoleccion"),
        Field::decimal("pesoKg").required(),
        Field::text("estado"),
    ];
}

impl Resource for Recoleccion {
    const NAME: &'static str = "Recolecciones";

    fn id(&self) -> Option<i64> {
        self.id_recoleccion
    }
}

/// Point balance entry for a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuntosUsuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_puntos_usuario: Option<i64>,
    #[serde(default)]
    pub id_usuario: i64,
    #[serde(default)]
    pub puntos: i64,
    #[serde(default)]
    pub fecha_canje: String,
}

impl PuntosUsuario {
    pub fn nuevo(id_usuario: i64, puntos: i64, fecha: &str) -> Self {
        Self {
            id_puntos_usuario: None,
            id_usuario,
            puntos,
            fecha_canje: date_only(fecha).to_string(),
        }
    }
}

impl Record for PuntosUsuario {
    const FIELDS: &'static [Field] = &[
        Field::integer("idPuntosUsuario"),
        Field::integer("idUsuario").required(),
        Field::integer("puntos").required(),
        Field::text("fechaCanje"),
    ];
}

impl Resource for PuntosUsuario {
    const NAME: &'static str = "PuntosUsuario";

    fn id(&self) -> Option<i64> {
        self.id_puntos_usuario
    }
}

/// Points exchanged by a user for a reward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canje {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_canje: Option<i64>,
    #[serde(default)]
    pub id_usuario: i64,
    #[serde(default)]
    pub puntos_canjeados: i64,
    #[serde(default)]
    pub fecha_canje: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl Record for Canje {
    const FIELDS: &'static [Field] = &[
        Field::integer("idCanje"),
        Field::integer("idUsuario").required(),
        Field::integer("puntosCanjeados").required(),
        Field::text("fechaCanje"),
        Field::text("descripcion"),
    ];
}

impl Resource for Canje {
    const NAME: &'static str = "Canjes";

    fn id(&self) -> Option<i64> {
        self.id_canje
    }
}
