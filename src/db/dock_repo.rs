// src/db/dock_repo.rs

// Replicação do cadastro da Dock. Cada upsert é o par explícito
// busca-pela-chave-natural (slug) -> atualiza-ou-insere, o que mantém o
// re-sync idempotente: rodar duas vezes não duplica nada.

use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    models::dock::{
        DockAddress, DockCategory, DockConfiguration, DockLegalNature, DockMerchant,
        DockMerchantPrice, DockPixAccount, DockSalesAgent,
    },
};

// Resultado de um upsert: o id local e se a linha foi inserida agora.
pub struct Upserted {
    pub id: i64,
    pub inserted: bool,
}

#[derive(Clone)]
pub struct DockRepository {
    pool: PgPool,
}

impl DockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_id_by_slug(
        &self,
        conn: &mut PgConnection,
        table: &str,
        slug: &str,
    ) -> Result<Option<i64>, AppError> {
        // `table` vem sempre de literais internos, nunca do payload.
        let sql = format!("SELECT id FROM {table} WHERE slug = $1");
        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    pub async fn find_customer_by_slug(
        &self,
        conn: &mut PgConnection,
        slug: &str,
    ) -> Result<Option<i64>, AppError> {
        self.find_id_by_slug(conn, "customers", slug).await
    }

    pub async fn upsert_address(
        &self,
        conn: &mut PgConnection,
        address: &DockAddress,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "addresses", &address.slug).await? {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE addresses SET
                        street = $2, number = $3, complement = $4, district = $5,
                        city = $6, state = $7, zip_code = $8
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&address.street)
                .bind(&address.number)
                .bind(&address.complement)
                .bind(&address.district)
                .bind(&address.city)
                .bind(&address.state)
                .bind(&address.zip_code)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO addresses
                        (slug, street, number, complement, district, city, state, zip_code)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    RETURNING id
                    "#,
                )
                .bind(&address.slug)
                .bind(&address.street)
                .bind(&address.number)
                .bind(&address.complement)
                .bind(&address.district)
                .bind(&address.city)
                .bind(&address.state)
                .bind(&address.zip_code)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_category(
        &self,
        conn: &mut PgConnection,
        category: &DockCategory,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "merchant_categories", &category.slug).await? {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE merchant_categories SET
                        cnae = $2, mcc = $3, description = $4,
                        risk_factor = COALESCE($5, risk_factor)
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&category.cnae)
                .bind(&category.mcc)
                .bind(&category.description)
                .bind(category.risk_factor)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO merchant_categories (slug, cnae, mcc, description, risk_factor)
                    VALUES ($1, $2, $3, $4, COALESCE($5, 0))
                    RETURNING id
                    "#,
                )
                .bind(&category.slug)
                .bind(&category.cnae)
                .bind(&category.mcc)
                .bind(&category.description)
                .bind(category.risk_factor)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_configuration(
        &self,
        conn: &mut PgConnection,
        configuration: &DockConfiguration,
    ) -> Result<Upserted, AppError> {
        match self
            .find_id_by_slug(&mut *conn, "merchant_configurations", &configuration.slug)
            .await?
        {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE merchant_configurations SET
                        anticipation_enabled = $2,
                        anticipation_fee = COALESCE($3, anticipation_fee),
                        settlement_days = $4,
                        pix_enabled = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(configuration.anticipation_enabled)
                .bind(configuration.anticipation_fee)
                .bind(configuration.settlement_days)
                .bind(configuration.pix_enabled)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO merchant_configurations
                        (slug, anticipation_enabled, anticipation_fee, settlement_days, pix_enabled)
                    VALUES ($1, $2, COALESCE($3, 0), $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&configuration.slug)
                .bind(configuration.anticipation_enabled)
                .bind(configuration.anticipation_fee)
                .bind(configuration.settlement_days)
                .bind(configuration.pix_enabled)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_sales_agent(
        &self,
        conn: &mut PgConnection,
        agent: &DockSalesAgent,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "sales_agents", &agent.slug).await? {
            Some(id) => {
                sqlx::query(
                    "UPDATE sales_agents SET name = $2, email = $3, phone = $4 WHERE id = $1",
                )
                .bind(id)
                .bind(&agent.name)
                .bind(&agent.email)
                .bind(&agent.phone)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO sales_agents (slug, name, email, phone)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&agent.slug)
                .bind(&agent.name)
                .bind(&agent.email)
                .bind(&agent.phone)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_legal_nature(
        &self,
        conn: &mut PgConnection,
        nature: &DockLegalNature,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "legal_natures", &nature.slug).await? {
            Some(id) => {
                sqlx::query("UPDATE legal_natures SET code = $2, description = $3 WHERE id = $1")
                    .bind(id)
                    .bind(&nature.code)
                    .bind(&nature.description)
                    .execute(&mut *conn)
                    .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO legal_natures (slug, code, description)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(&nature.slug)
                .bind(&nature.code)
                .bind(&nature.description)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_merchant(
        &self,
        conn: &mut PgConnection,
        merchant: &DockMerchant,
        customer_id: i64,
        category_id: Option<i64>,
        address_id: Option<i64>,
        configuration_id: Option<i64>,
        sales_agent_id: Option<i64>,
        legal_nature_id: Option<i64>,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "merchants", &merchant.slug).await? {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE merchants SET
                        customer_id = $2, name = $3, trade_name = $4, document = $5,
                        email = $6, phone = $7, active = $8,
                        category_id = COALESCE($9, category_id),
                        address_id = COALESCE($10, address_id),
                        configuration_id = COALESCE($11, configuration_id),
                        sales_agent_id = COALESCE($12, sales_agent_id),
                        legal_nature_id = COALESCE($13, legal_nature_id),
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(customer_id)
                .bind(&merchant.name)
                .bind(&merchant.trade_name)
                .bind(&merchant.document)
                .bind(&merchant.email)
                .bind(&merchant.phone)
                .bind(merchant.active)
                .bind(category_id)
                .bind(address_id)
                .bind(configuration_id)
                .bind(sales_agent_id)
                .bind(legal_nature_id)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO merchants (
                        slug, customer_id, name, trade_name, document, email, phone, active,
                        category_id, address_id, configuration_id, sales_agent_id, legal_nature_id
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                    RETURNING id
                    "#,
                )
                .bind(&merchant.slug)
                .bind(customer_id)
                .bind(&merchant.name)
                .bind(&merchant.trade_name)
                .bind(&merchant.document)
                .bind(&merchant.email)
                .bind(&merchant.phone)
                .bind(merchant.active)
                .bind(category_id)
                .bind(address_id)
                .bind(configuration_id)
                .bind(sales_agent_id)
                .bind(legal_nature_id)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_pix_account(
        &self,
        conn: &mut PgConnection,
        merchant_id: i64,
        account: &DockPixAccount,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "merchant_pix_accounts", &account.slug).await? {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE merchant_pix_accounts SET
                        merchant_id = $2, key_type = $3, key_value = $4, bank_code = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(merchant_id)
                .bind(&account.key_type)
                .bind(&account.key_value)
                .bind(&account.bank_code)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO merchant_pix_accounts (slug, merchant_id, key_type, key_value, bank_code)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&account.slug)
                .bind(merchant_id)
                .bind(&account.key_type)
                .bind(&account.key_value)
                .bind(&account.bank_code)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }

    pub async fn upsert_merchant_price(
        &self,
        conn: &mut PgConnection,
        merchant_id: i64,
        price: &DockMerchantPrice,
    ) -> Result<Upserted, AppError> {
        match self.find_id_by_slug(&mut *conn, "merchant_prices", &price.slug).await? {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE merchant_prices SET
                        merchant_id = $2, brand = $3, product_type = $4, fee_percent = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(merchant_id)
                .bind(&price.brand)
                .bind(&price.product_type)
                .bind(price.fee_percent)
                .execute(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: false })
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO merchant_prices (slug, merchant_id, brand, product_type, fee_percent)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&price.slug)
                .bind(merchant_id)
                .bind(&price.brand)
                .bind(&price.product_type)
                .bind(price.fee_percent)
                .fetch_one(&mut *conn)
                .await?;
                Ok(Upserted { id, inserted: true })
            }
        }
    }
}
