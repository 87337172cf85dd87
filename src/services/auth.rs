// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{AuthResponse, Claims, Role, User},
        scope::AccessScope,
    },
};

// Sessão vale um turno de trabalho.
const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register(
        &self,
        pool: &PgPool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        // Hashing em thread separada: bcrypt é caro e bloquearia o runtime
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(pool, name, email, &password_hash, Role::Customer)
            .await?;

        tracing::info!("Usuário registrado: {}", user.email);
        Ok(user)
    }

    pub async fn login(
        &self,
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || {
            bcrypt::verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let exp = (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
        let claims = Claims { sub: user.id, role: user.role, exp };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub async fn validate_token(&self, pool: &PgPool, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        // O usuário pode ter sido desativado depois de emitir o token.
        self.user_repo
            .find_by_id(pool, data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    // Escopo de clientes do usuário, resolvido uma vez por requisição.
    pub async fn resolve_scope(&self, pool: &PgPool, user: &User) -> Result<AccessScope, AppError> {
        if user.role == Role::SuperAdmin {
            return Ok(AccessScope::Unrestricted);
        }
        let allowed = self.user_repo.allowed_customers(pool, user.id).await?;
        Ok(AccessScope::Customers(allowed))
    }

    // "Visualizar como": SUPER_ADMIN pode assumir o escopo de outro usuário.
    // A identidade efetiva é passada adiante como parâmetro, nunca por
    // contexto ambiente.
    pub async fn resolve_effective_scope(
        &self,
        pool: &PgPool,
        caller: &User,
        simulated_user_id: Option<Uuid>,
    ) -> Result<AccessScope, AppError> {
        match simulated_user_id {
            None => self.resolve_scope(pool, caller).await,
            Some(simulated) => {
                if caller.role != Role::SuperAdmin {
                    return Err(AppError::AccessDenied);
                }
                let user = self
                    .user_repo
                    .find_by_id(pool, simulated)
                    .await?
                    .ok_or(AppError::UserNotFound)?;
                self.resolve_scope(pool, &user).await
            }
        }
    }
}

// Guarda de papel para operações administrativas.
pub fn ensure_admin(user: &User) -> Result<(), AppError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

pub fn ensure_super_admin(user: &User) -> Result<(), AppError> {
    if user.role == Role::SuperAdmin {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}
