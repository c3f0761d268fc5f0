// src/services/auth.rs
//
// Orquestra os três fluxos de autenticação (register, login, refresh)
// compondo o diretório de usuários, o hasher de senha e o serviço de
// tokens. Nenhuma dependência é global: tudo chega pelo construtor.

use sqlx::PgPool;

use crate::{
    common::{error::AppError, password::PasswordHasher, strings},
    db::UserRepository,
    models::auth::{AuthResponse, RegisterUserPayload, TokenKind, User},
    services::tokens::TokenService,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenService,
    hasher: PasswordHasher,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tokens: TokenService,
        hasher: PasswordHasher,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            hasher,
            pool,
        }
    }

    // Registro NÃO é idempotente: segunda chamada com o mesmo e-mail
    // falha com Conflict.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let email = strings::normalize_email(&payload.email);

        // Fast path de UX; a corrida de verdade é fechada pelo índice
        // único (o repo traduz a violação para o mesmo erro).
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::EmailAlreadyExists(email));
        }

        // Hashing fora da transação: caro e não toca no banco.
        let password_hash = self.hasher.hash(&payload.password).await?;

        let first_name = strings::capitalize_first(&payload.first_name);
        let last_name = strings::capitalize_first(&payload.last_name);
        let phone_number = payload
            .phone_number
            .as_deref()
            .and_then(strings::normalize_phone);

        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(
                &mut *tx,
                &email,
                &password_hash,
                &first_name,
                &last_name,
                phone_number.as_deref(),
                payload.role,
            )
            .await?;

        tx.commit().await?;

        self.issue_pair(new_user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let email = strings::normalize_email(email);

        // Mesmo erro para "não existe" e "senha errada": não dá pistas
        // de quais e-mails estão cadastrados.
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let is_password_valid = self.hasher.verify(password, &user.password_hash).await?;
        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        self.issue_pair(user)
    }

    // Troca refresh token por um novo access token. O refresh NÃO é
    // rotacionado: o mesmo continua valendo até a própria expiração.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        // Primeiro só decodifica (assinatura conferida, expiração não)
        // para saber QUEM está pedindo...
        let claims = self
            .tokens
            .extract_claims_unchecked_expiry(refresh_token)
            .map_err(|_| AppError::InvalidRefreshToken)?;

        // ...e recarrega o usuário: um usuário desativado depois da
        // emissão não pode renovar access token.
        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        // Agora sim a validação completa, contra o snapshot atual.
        let claims = self
            .tokens
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|e| match e {
                AppError::TokenKindMismatch => AppError::TokenKindMismatch,
                _ => AppError::InvalidRefreshToken,
            })?;

        // E-mail trocado desde a emissão invalida o token antigo.
        if claims.email != user.email {
            return Err(AppError::InvalidRefreshToken);
        }

        let access_token = self.tokens.issue_access_token(&user)?;

        Ok(AuthResponse {
            access_token,
            refresh_token: refresh_token.to_string(),
            user,
        })
    }

    // Usado pelo guard de rotas: valida o access token E reconfere o
    // estado atual do usuário no banco.
    pub async fn authenticate_access_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.validate(token, TokenKind::Access)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        Ok(user)
    }

    fn issue_pair(&self, user: User) -> Result<AuthResponse, AppError> {
        let access_token = self.tokens.issue_access_token(&user)?;
        let refresh_token = self.tokens.issue_refresh_token(&user)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user,
        })
    }
}
