use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gate_control::config::{DatabaseConfig, EnvironmentConfig};
use gate_control::database::DatabaseConnection;
use gate_control::repositories::{GateStore, MemoryStore, PgStore};
use gate_control::storage::{ExportStorage, MemoryStorage, SupabaseStorage};
use gate_control::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gate_control=debug,tower_http=info")),
        )
        .init();

    info!("🚧 Gate Control - API de portería");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);
    info!("🏢 Empresa: {}", config.company_id);
    match config.default_branch_id {
        Some(branch_id) => info!("🏬 Filial: {}", branch_id),
        None => warn!("⚠️ DEFAULT_BRANCH_ID no configurado; las visitas responderán 500"),
    }
    if config.api_token.is_none() {
        warn!("⚠️ API_TOKEN no configurado; todas las rutas /api responderán 401");
    }

    // Inicializar base de datos
    let store: Arc<dyn GateStore> = match DatabaseConfig::from_environment(&config) {
        Some(db_config) => {
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            if config.run_migrations {
                connection.run_migrations().await?;
            }
            Arc::new(PgStore::new(connection.into_pool()))
        }
        None if config.is_production() => {
            error!("❌ DATABASE_URL es obligatoria en producción");
            return Err(anyhow::anyhow!("DATABASE_URL must be set in production"));
        }
        None => {
            warn!("⚠️ DATABASE_URL no configurada; usando almacenamiento en memoria");
            Arc::new(MemoryStore::new())
        }
    };

    // Almacenamiento de los PDF exportados
    let storage: Arc<dyn ExportStorage> = match &config.supabase {
        Some(supabase) => {
            info!("🗄️ Exportaciones en Supabase Storage (bucket {})", config.exports_bucket);
            Arc::new(SupabaseStorage::new(
                &supabase.url,
                &supabase.service_role_key,
                &config.exports_bucket,
            )?)
        }
        None => {
            warn!("⚠️ Supabase no configurado; las exportaciones quedan en memoria");
            Arc::new(MemoryStorage::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(store, storage, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Personas:");
    info!("   GET|POST /api/people - Listar / crear");
    info!("   PUT|DELETE /api/people/:id - Actualizar / eliminar");
    info!("🚗 Vehículos:");
    info!("   GET|POST /api/vehicles - Listar / crear");
    info!("   PUT|DELETE /api/vehicles/:id - Actualizar / eliminar");
    info!("   GET|POST|DELETE /api/vehicle-people - Vínculos vehículo-persona");
    info!("✅ Autorizados:");
    info!("   GET|POST /api/authorized - Listar / autorizar placa");
    info!("   PUT|DELETE /api/authorized/:id - Actualizar / eliminar");
    info!("🔎 GET  /api/lookup/plate/:plate - Consulta de placa");
    info!("🚪 Visitas:");
    info!("   POST /api/visits/checkin - Registrar entrada");
    info!("   POST /api/visits/:id/checkout - Registrar salida");
    info!("   GET  /api/visits/open - Visitas en curso");
    info!("   GET  /api/visits/history - Historial paginado");
    info!("📄 Reportes:");
    info!("   POST /api/pdf/visit/:id - PDF de una visita");
    info!("   POST /api/pdf/history - PDF del historial");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
