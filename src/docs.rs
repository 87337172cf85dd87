// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::common::labels;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Merchants ---
        handlers::merchants::list_merchants,
        handlers::merchants::get_merchant,

        // --- Categories ---
        handlers::categories::create_category,
        handlers::categories::list_categories,
        handlers::categories::update_category,
        handlers::categories::get_category_fees,
        handlers::categories::upsert_category_fees,

        // --- Solicitations ---
        handlers::solicitations::create_solicitation,
        handlers::solicitations::list_solicitations,
        handlers::solicitations::get_solicitation,
        handlers::solicitations::submit_solicitation,
        handlers::solicitations::review_solicitation,
        handlers::solicitations::approve_solicitation,
        handlers::solicitations::decline_solicitation,
        handlers::solicitations::complete_solicitation,
        handlers::solicitations::attach_document,

        // --- Transactions ---
        handlers::transactions::list_transactions,
        handlers::transactions::grouped_transactions,

        // --- Fechamento ---
        handlers::fechamento::get_fechamento,

        // --- Repasse ---
        handlers::repasse::get_repasse,
        handlers::repasse::upload_invoice,
        handlers::repasse::pay_settlement,
        handlers::repasse::revalidate_invoice,
        handlers::repasse::consolidate_period,

        // --- BI ---
        handlers::bi::get_bi,

        // --- Files ---
        handlers::files::upload_file,
        handlers::files::list_files,
        handlers::files::delete_file,

        // --- Dock ---
        handlers::dock::trigger_sync,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Vocabulário ---
            labels::TransactionStatus,
            labels::ProductType,
            labels::CardBrand,
            labels::CaptureChannel,

            // --- Merchants ---
            models::merchant::KycStatus,
            models::merchant::MerchantListRow,
            models::merchant::MerchantDetail,
            models::merchant::MerchantSummary,
            models::merchant::MerchantListResponse,

            // --- Categories ---
            models::category::MerchantCategory,
            models::category::CategoryFee,
            models::category::CategoryWithFees,
            models::category::CreateCategoryPayload,
            models::category::UpdateCategoryPayload,
            models::category::FeeCellPayload,
            models::category::UpsertFeeSchedulePayload,

            // --- Solicitations ---
            models::solicitation::SolicitationStatus,
            models::solicitation::Solicitation,
            models::solicitation::SolicitationFee,
            models::solicitation::SolicitationDetail,
            models::solicitation::RequestedFeeCell,
            models::solicitation::CreateSolicitationPayload,
            models::solicitation::ReviewSolicitationPayload,
            models::solicitation::DeclineSolicitationPayload,
            models::solicitation::CompleteSolicitationPayload,

            // --- Transactions / Fechamento ---
            models::transaction::Pagination,
            models::transaction::TransactionItem,
            models::transaction::LabeledGroupedTotal,
            models::transaction::GroupBy,
            models::transaction::FechamentoSummary,
            models::transaction::DailyPoint,
            models::transaction::FechamentoResponse,

            // --- Repasse ---
            models::settlement::SettlementStatus,
            models::settlement::InvoiceValidationStatus,
            models::settlement::ReportedStatus,
            models::settlement::MonthlySettlement,
            models::settlement::SettlementInvoice,
            models::settlement::YearSummary,
            models::settlement::RepasseMonth,
            models::settlement::RepasseYearResponse,
            services::settlement_service::InvoiceUploadResponse,
            handlers::repasse::ConsolidatePayload,

            // --- BI ---
            models::bi::ExecutiveKpis,
            models::bi::HourlyCell,
            models::bi::WeekdayShiftCell,
            models::bi::TopMerchant,
            models::bi::SettlementKpis,
            models::bi::MdrMargin,
            models::bi::BiDashboardResponse,

            // --- Files ---
            models::file::StoredFile,
            models::file::FileOwner,

            // --- Dock ---
            models::dock::SyncCounter,
            models::dock::SyncReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessão"),
        (name = "Merchants", description = "Diretório de estabelecimentos (ECs)"),
        (name = "Categories", description = "Categorias CNAE/MCC e grades de taxa"),
        (name = "Solicitations", description = "Solicitações de pricing"),
        (name = "Transactions", description = "Relatórios de transações"),
        (name = "Fechamento", description = "Fechamento do período"),
        (name = "Repasse", description = "Repasse mensal de comissão e notas fiscais"),
        (name = "BI", description = "Painel de indicadores"),
        (name = "Files", description = "Documentos e arquivos"),
        (name = "Dock", description = "Sincronismo com o processador")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
