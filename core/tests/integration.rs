//! End-to-end tests against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port. The sans-IO `ApiClient` is
//! exercised with ureq executing each request; the async `Dashboard` runs
//! over the reqwest transport, including joined catalog loads and the
//! notification policy.

use std::net::SocketAddr;

use reciclaje_core::{
    ApiClient, ApiError, ClientConfig, Dashboard, Empresa, EstadoRecoleccion, HttpMethod, HttpRequest,
    HttpResponse, Level, Localidad, MemoryNotifier, RecoleccionesCatalog, ReqwestTransport, Residuo,
    TipoResiduo, UsuariosCatalog, Usuario,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers,
        body,
    }
}

fn start_blocking_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
    addr
}

fn dashboard(base_url: &str) -> Dashboard<ReqwestTransport, MemoryNotifier> {
    Dashboard::new(ApiClient::new(base_url), ReqwestTransport::new(), MemoryNotifier::new())
}

#[test]
fn sans_io_crud_lifecycle() {
    let addr = start_blocking_server();
    let client = ApiClient::new(&format!("http://{addr}"));

    // list — should be empty.
    let residuos: Vec<Residuo> = client.parse_list(execute(client.build_list("Residuos/Lista"))).unwrap();
    assert!(residuos.is_empty(), "expected empty list");

    // create.
    let input = Residuo {
        id_residuo: None,
        tipo_residuo: TipoResiduo::Organico,
    };
    let req = client.build_create("Residuos/Nuevo", &input).unwrap();
    let created: Residuo = client.parse_create(execute(req)).unwrap().unwrap();
    assert_eq!(created.tipo_residuo, TipoResiduo::Organico);
    let id = created.id_residuo.unwrap();

    // get.
    let fetched: Option<Residuo> = client.parse_get(execute(client.build_get("Residuos", id))).unwrap();
    assert_eq!(fetched, Some(created.clone()));

    // update, id in the body.
    let changed = Residuo {
        tipo_residuo: TipoResiduo::Peligroso,
        ..created
    };
    let req = client.build_update("Residuos/Editar", &changed).unwrap();
    let updated: Residuo = client.parse_update(execute(req)).unwrap().unwrap();
    assert_eq!(updated.tipo_residuo, TipoResiduo::Peligroso);

    // list — one item.
    let residuos: Vec<Residuo> = client.parse_list(execute(client.build_list("Residuos/Lista"))).unwrap();
    assert_eq!(residuos, vec![updated]);

    // delete via query parameter.
    client.parse_delete(execute(client.build_delete("Residuos", id))).unwrap();

    // get after delete — 404.
    let err = client
        .parse_get::<Residuo>(execute(client.build_get("Residuos", id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    // delete again — 404.
    let err = client
        .parse_delete(execute(client.build_delete("Residuos", id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[test]
fn sans_io_tolerates_text_labelled_json() {
    let addr = start_blocking_server();
    let client = ApiClient::new(&format!("http://{addr}"));

    let req = client
        .build_create("Localidades/Nuevo", &Localidad { id_localidad: 0, nombre: "Cuenca".into() })
        .unwrap();
    client.parse_create::<Localidad>(execute(req)).unwrap();

    let response = execute(client.build_list("Localidades/Lista"));
    assert!(response.header("content-type").unwrap().starts_with("text/plain"));
    let localidades: Vec<Localidad> = client.parse_list(response).unwrap();
    assert_eq!(localidades.len(), 1);
    assert_eq!(localidades[0].nombre, "Cuenca");
    assert_eq!(localidades[0].id_localidad, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_usuarios_flow() {
    let addr = start_server().await;
    let d = dashboard(&format!("http://{addr}"));

    let quito = d
        .localidades()
        .create(&Localidad { id_localidad: 0, nombre: "Quito".into() })
        .await
        .unwrap();
    let ana = d
        .usuarios()
        .create(&Usuario {
            id_localidad: Some(quito.id_localidad),
            nombre: Some("Ana".into()),
            apellidos: Some("Paz".into()),
            email: Some("ana@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let luis = d
        .usuarios()
        .create(&Usuario {
            nombre: Some("Luis".into()),
            email: Some("luis@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    // The backend lists users with lowercase keys; they come back canonical.
    let catalog = UsuariosCatalog::load(&d).await.unwrap();
    assert_eq!(catalog.usuarios.len(), 2);
    let listed_ana = catalog
        .usuarios
        .iter()
        .find(|u| u.id_usuario == ana.id_usuario)
        .unwrap();
    assert_eq!(listed_ana.id_localidad, Some(quito.id_localidad));
    assert_eq!(catalog.localidad_de(listed_ana), "Quito");
    assert_eq!(catalog.localidad_de(&luis), "N/A");

    d.notifier().clear();
    let taken = Usuario {
        email: Some("ana@example.com".into()),
        ..luis.clone()
    };
    assert!(d.usuarios().update(&taken).await.is_none());
    let errors = d.notifier().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("correo electrónico ya está registrado"));

    let fetched = d.usuarios().by_id(luis.id_usuario.unwrap()).await.unwrap();
    assert_eq!(fetched.email.as_deref(), Some("luis@example.com"));

    assert!(d.usuarios().remove(&luis).await);
    assert!(d.usuarios().by_id(luis.id_usuario.unwrap()).await.is_none());
    assert_eq!(d.notifier().notifications().last().unwrap().level, Level::Error);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_recolecciones_flow() {
    let addr = start_server().await;
    let d = dashboard(&format!("http://{addr}"));

    d.usuarios()
        .create(&Usuario {
            nombre: Some("Eva".into()),
            apellidos: Some("Ruiz".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    d.empresas()
        .create(&Empresa {
            nombre: Some("EcoRuta".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    d.residuos()
        .create(&Residuo {
            id_residuo: None,
            tipo_residuo: TipoResiduo::InorganicoReciclable,
        })
        .await
        .unwrap();

    let catalog = RecoleccionesCatalog::load(&d).await.unwrap();
    let mut nueva = catalog.nueva_recoleccion("2024-05-01T09:30:00Z");
    assert!(!nueva.is_valid());
    nueva.peso_kg = 12.5;
    assert!(nueva.is_valid());

    let created = d.recolecciones().create(&nueva).await.unwrap();
    assert_eq!(created.estado, EstadoRecoleccion::Programada);
    assert_eq!(created.fecha_recoleccion, "2024-05-01");

    let completed = d
        .recolecciones()
        .update(&reciclaje_core::Recoleccion {
            estado: EstadoRecoleccion::Completada,
            ..created.clone()
        })
        .await
        .unwrap();
    assert_eq!(completed.estado, EstadoRecoleccion::Completada);

    let catalog = RecoleccionesCatalog::load(&d).await.unwrap();
    assert_eq!(catalog.recolecciones.len(), 1);
    let r = &catalog.recolecciones[0];
    assert_eq!(catalog.usuario_de(r), "Eva Ruiz");
    assert_eq!(catalog.empresa_de(r), "EcoRuta");
    assert_eq!(catalog.residuo_de(r), "Inorgánico Reciclable");

    assert!(d.recolecciones().delete(created.id_recoleccion.unwrap()).await);
    assert!(d.recolecciones().all().await.unwrap().is_empty());
    assert!(d.notifier().errors().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn joined_load_fails_as_a_whole() {
    let addr = start_server().await;
    let d = dashboard(&format!("http://{addr}/no/existe"));

    let err = RecoleccionesCatalog::load(&d).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    let errors = d.notifier().errors();
    assert!(!errors.is_empty());
    assert!(errors[0].message.starts_with("Error al cargar datos: "));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_backend_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let d = dashboard(&format!("http://{addr}"));

    let err = d.residuos().all().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!d.residuos().delete(1).await);
    assert_eq!(d.notifier().errors().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_from_config() {
    let addr = start_server().await;
    let config = ClientConfig::new(format!("http://{addr}/"));
    let d = Dashboard::from_config(&config).unwrap();
    assert_eq!(d.client().base_url(), format!("http://{addr}"));
    assert!(d.canjes().all().await.unwrap().is_empty());
    assert!(d.puntos_usuario().all().await.unwrap().is_empty());

    let bad = ClientConfig::new("");
    assert!(matches!(Dashboard::from_config(&bad), Err(ApiError::Config(_))));
}
