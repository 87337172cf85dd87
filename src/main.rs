// src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod dock;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod storage;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

// Uploads multipart (nota fiscal, documentos) passam do limite padrão de 2MB.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice=info,tower_http=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let me_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let merchant_routes = Router::new()
        .route("/", get(handlers::merchants::list_merchants))
        .route("/{id}", get(handlers::merchants::get_merchant))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let category_routes = Router::new()
        .route("/"
               , post(handlers::categories::create_category)
               .get(handlers::categories::list_categories)
        )
        .route("/{id}", put(handlers::categories::update_category))
        .route("/{id}/fees"
               , get(handlers::categories::get_category_fees)
               .put(handlers::categories::upsert_category_fees)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let solicitation_routes = Router::new()
        .route("/"
               , post(handlers::solicitations::create_solicitation)
               .get(handlers::solicitations::list_solicitations)
        )
        .route("/{id}", get(handlers::solicitations::get_solicitation))
        .route("/{id}/submit", post(handlers::solicitations::submit_solicitation))
        .route("/{id}/review", post(handlers::solicitations::review_solicitation))
        .route("/{id}/approve", post(handlers::solicitations::approve_solicitation))
        .route("/{id}/decline", post(handlers::solicitations::decline_solicitation))
        .route("/{id}/complete", post(handlers::solicitations::complete_solicitation))
        .route("/{id}/documents", post(handlers::solicitations::attach_document))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let transaction_routes = Router::new()
        .route("/", get(handlers::transactions::list_transactions))
        .route("/grouped", get(handlers::transactions::grouped_transactions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let fechamento_routes = Router::new()
        .route("/", get(handlers::fechamento::get_fechamento))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let repasse_routes = Router::new()
        .route("/", get(handlers::repasse::get_repasse))
        .route("/upload", post(handlers::repasse::upload_invoice))
        .route("/consolidate", post(handlers::repasse::consolidate_period))
        .route("/{settlementId}/pay", post(handlers::repasse::pay_settlement))
        .route(
            "/invoices/{invoiceId}/revalidate",
            post(handlers::repasse::revalidate_invoice),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let bi_routes = Router::new()
        .route("/", get(handlers::bi::get_bi))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let file_routes = Router::new()
        .route("/{entity}/{id}"
               , post(handlers::files::upload_file)
               .get(handlers::files::list_files)
        )
        .route("/{fileId}", axum::routing::delete(handlers::files::delete_file))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dock_routes = Router::new()
        .route("/sync", post(handlers::dock::trigger_sync))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", me_routes)
        .nest("/api/merchants", merchant_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/solicitations", solicitation_routes)
        .nest("/api/transactions", transaction_routes)
        .nest("/api/fechamento", fechamento_routes)
        .nest("/api/repasse", repasse_routes)
        .nest("/api/bi", bi_routes)
        .nest("/api/files", file_routes)
        .nest("/api/dock", dock_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
