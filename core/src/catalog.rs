//! Reference data for the management screens.
//!
//! Each screen needs its main list plus the lists its foreign keys point
//! into. They are fetched concurrently with `try_join!`: the first failure
//! aborts the whole load and no partial data is returned. Foreign keys that
//! do not resolve render as `N/A`.

use futures::try_join;

use crate::dashboard::Dashboard;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::transport::Transport;
use crate::types::{Empresa, Localidad, PuntosUsuario, Recoleccion, Residuo, Resource, Usuario};

pub const MISSING_LABEL: &str = "N/A";

/// Human-readable name of a record, as shown in place of its id.
pub trait Label {
    fn label(&self) -> String;
}

impl Label for Usuario {
    fn label(&self) -> String {
        [self.nombre.as_deref(), self.apellidos.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Label for Empresa {
    fn label(&self) -> String {
        self.nombre.clone().unwrap_or_default()
    }
}

impl Label for Localidad {
    fn label(&self) -> String {
        self.nombre.clone()
    }
}

impl Label for Residuo {
    fn label(&self) -> String {
        self.tipo_residuo.to_string()
    }
}

/// Label of the record with `id`, or `N/A` when absent or unnamed.
pub fn label_for<R: Resource + Label>(records: &[R], id: Option<i64>) -> String {
    id.and_then(|id| records.iter().find(|r| r.id() == Some(id)))
        .map(Label::label)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| MISSING_LABEL.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct UsuariosCatalog {
    pub usuarios: Vec<Usuario>,
    pub localidades: Vec<Localidad>,
}

impl UsuariosCatalog {
    pub async fn load<T: Transport, N: Notifier>(dashboard: &Dashboard<T, N>) -> Result<Self, ApiError> {
        let (usuarios, localidades) = try_join!(dashboard.usuarios().all(), dashboard.localidades().all())?;
        tracing::debug!(usuarios = usuarios.len(), localidades = localidades.len(), "usuarios catalog loaded");
        Ok(Self {
            usuarios,
            localidades,
        })
    }

    pub fn localidad_de(&self, usuario: &Usuario) -> String {
        label_for(&self.localidades, usuario.id_localidad)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PuntosCatalog {
    pub puntos: Vec<PuntosUsuario>,
    pub usuarios: Vec<Usuario>,
}

impl PuntosCatalog {
    pub async fn load<T: Transport, N: Notifier>(dashboard: &Dashboard<T, N>) -> Result<Self, ApiError> {
        let (puntos, usuarios) = try_join!(dashboard.puntos_usuario().all(), dashboard.usuarios().all())?;
        Ok(Self { puntos, usuarios })
    }

    pub fn usuario_de(&self, puntos: &PuntosUsuario) -> String {
        label_for(&self.usuarios, Some(puntos.id_usuario))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecoleccionesCatalog {
    pub recolecciones: Vec<Recoleccion>,
    pub usuarios: Vec<Usuario>,
    pub empresas: Vec<Empresa>,
    pub residuos: Vec<Residuo>,
}

impl RecoleccionesCatalog {
    pub async fn load<T: Transport, N: Notifier>(dashboard: &Dashboard<T, N>) -> Result<Self, ApiError> {
        let (recolecciones, usuarios, empresas, residuos) = try_join!(
            dashboard.recolecciones().all(),
            dashboard.usuarios().all(),
            dashboard.empresas().all(),
            dashboard.residuos().all()
        )?;
        tracing::debug!(
            recolecciones = recolecciones.len(),
            usuarios = usuarios.len(),
            empresas = empresas.len(),
            residuos = residuos.len(),
            "recolecciones catalog loaded"
        );
        Ok(Self {
            recolecciones,
            usuarios,
            empresas,
            residuos,
        })
    }

    pub fn usuario_de(&self, recoleccion: &Recoleccion) -> String {
        label_for(&self.usuarios, Some(recoleccion.id_usuario))
    }

    pub fn empresa_de(&self, recoleccion: &Recoleccion) -> String {
        label_for(&self.empresas, Some(recoleccion.id_empresa))
    }

    pub fn residuo_de(&self, recoleccion: &Recoleccion) -> String {
        label_for(&self.residuos, Some(recoleccion.id_residuo))
    }

    /// Defaults for the "new collection" form: first known reference of
    /// each kind, or zero when a list is empty.
    pub fn nueva_recoleccion(&self, fecha: &str) -> Recoleccion {
        Recoleccion::nueva(
            self.usuarios.first().and_then(Usuario::id).unwrap_or(0),
            self.empresas.first().and_then(Empresa::id).unwrap_or(0),
            self.residuos.first().and_then(Residuo::id).unwrap_or(0),
            fecha,
            0.0,
        )
    }
}
