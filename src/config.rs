// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::i18n::I18nStore,
    db::{
        BiRepository, CategoryRepository, DockRepository, FileRepository, MerchantRepository,
        SettlementRepository, SolicitationRepository, TransactionRepository, UserRepository,
    },
    dock::{client::DockApiClient, fiscal::FiscalApiClient},
    services::{
        AuthService, BiService, CategoryService, DockSyncService, FileService, MerchantService,
        SettlementService, SolicitationService, TransactionService,
    },
    storage::{HttpObjectStorage, ObjectStorage},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub merchant_service: MerchantService,
    pub category_service: CategoryService,
    pub solicitation_service: SolicitationService,
    pub transaction_service: TransactionService,
    pub settlement_service: SettlementService,
    pub bi_service: BiService,
    pub file_service: FileService,
    pub dock_sync_service: DockSyncService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Object storage (obrigatório: uploads de nota e documentos)
        let storage_base_url =
            env::var("STORAGE_BASE_URL").expect("STORAGE_BASE_URL deve ser definida");
        let storage_bucket = env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET deve ser definido");
        let storage_token = env::var("STORAGE_ACCESS_TOKEN").ok();
        let storage: Arc<dyn ObjectStorage> = Arc::new(HttpObjectStorage::new(
            storage_base_url,
            storage_bucket,
            storage_token,
        )?);

        // Validação fiscal (opcional: sem ela as notas ficam pendentes até o
        // revalidate)
        let fiscal = match env::var("FISCAL_API_URL") {
            Ok(url) => Some(FiscalApiClient::new(url)?),
            Err(_) => {
                tracing::warn!("FISCAL_API_URL ausente; validação de notas ficará pendente");
                None
            }
        };

        // Sync Dock: desabilitado por padrão
        let dock_sync_enabled = env::var("DOCK_SYNC_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let dock_client = match (env::var("DOCK_API_URL"), env::var("DOCK_API_TOKEN")) {
            (Ok(url), Ok(token)) => Some(DockApiClient::new(url, token)?),
            _ => None,
        };

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let merchant_repo = MerchantRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let solicitation_repo = SolicitationRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let settlement_repo = SettlementRepository::new(db_pool.clone());
        let bi_repo = BiRepository::new(db_pool.clone());
        let file_repo = FileRepository::new(db_pool.clone());
        let dock_repo = DockRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let merchant_service = MerchantService::new(merchant_repo);
        let category_service = CategoryService::new(category_repo);
        let solicitation_service = SolicitationService::new(solicitation_repo);
        let transaction_service =
            TransactionService::new(transaction_repo, settlement_repo.clone());
        let settlement_service =
            SettlementService::new(settlement_repo, storage.clone(), fiscal);
        let bi_service = BiService::new(bi_repo);
        let file_service = FileService::new(file_repo, storage);
        let dock_sync_service = DockSyncService::new(dock_repo, dock_client, dock_sync_enabled);

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            auth_service,
            merchant_service,
            category_service,
            solicitation_service,
            transaction_service,
            settlement_service,
            bi_service,
            file_service,
            dock_sync_service,
        })
    }
}
