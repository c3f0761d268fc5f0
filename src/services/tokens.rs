// src/services/tokens.rs
//
// Emissão e validação de JWTs. Tudo aqui é função pura sobre o segredo do
// processo: nenhum estado compartilhado, seguro para rodar em paralelo.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, TokenKind, User},
};

#[derive(Clone)]
pub struct TokenService {
    jwt_secret: String,
    access_minutes: i64,
    refresh_days: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String, access_minutes: i64, refresh_days: i64) -> Self {
        Self {
            jwt_secret,
            access_minutes,
            refresh_days,
        }
    }

    // Access: curto, autoriza requisições individuais.
    pub fn issue_access_token(&self, user: &User) -> Result<String, AppError> {
        self.issue(user, TokenKind::Access, chrono::Duration::minutes(self.access_minutes))
    }

    // Refresh: longo, só serve para emitir um novo access.
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, AppError> {
        self.issue(user, TokenKind::Refresh, chrono::Duration::days(self.refresh_days))
    }

    fn issue(
        &self,
        user: &User,
        kind: TokenKind,
        lifetime: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + lifetime;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            kind,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Verifica assinatura, expiração e tipo, nessa ordem. Os três erros
    // são distinguíveis para quem chama.
    pub fn validate(&self, token: &str, expected_kind: TokenKind) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenMalformed,
        })?;

        if token_data.claims.kind != expected_kind {
            return Err(AppError::TokenKindMismatch);
        }

        Ok(token_data.claims)
    }

    // Decodifica SEM validar expiração (assinatura ainda é conferida).
    // Só o fluxo de refresh usa isso, para recarregar o usuário do banco
    // antes de decidir a validade contra o estado atual dele.
    pub fn extract_claims_unchecked_expiry(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::TokenMalformed)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "tech1@techyeah.com".into(),
            password_hash: "$2b$04$hash".into(),
            first_name: "Tech".into(),
            last_name: "One".into(),
            phone_number: None,
            role: Role::Technician,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service() -> TokenService {
        TokenService::new("segredo-de-teste".into(), 15, 7)
    }

    #[test]
    fn access_token_roundtrip_preserves_subject_and_role() {
        let svc = service();
        let user = test_user();

        let token = svc.issue_access_token(&user).unwrap();
        let claims = svc.validate(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, user.role);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn access_token_where_refresh_expected_fails_kind_mismatch() {
        let svc = service();
        let user = test_user();

        let access = svc.issue_access_token(&user).unwrap();
        let err = svc.validate(&access, TokenKind::Refresh).unwrap_err();

        assert!(matches!(err, AppError::TokenKindMismatch));
    }

    #[test]
    fn expired_token_fails_as_expired_not_malformed() {
        // Lifetime negativo bem além do leeway padrão de 60s do jsonwebtoken
        let svc = TokenService::new("segredo-de-teste".into(), -5, 7);
        let user = test_user();

        let token = svc.issue_access_token(&user).unwrap();
        let err = svc.validate(&token, TokenKind::Access).unwrap_err();

        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn tampered_token_fails_as_malformed() {
        let svc = service();
        let user = test_user();

        let mut token = svc.issue_access_token(&user).unwrap();
        token.push('x');
        let err = svc.validate(&token, TokenKind::Access).unwrap_err();

        assert!(matches!(err, AppError::TokenMalformed));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new("outro-segredo".into(), 15, 7);
        let user = test_user();

        let token = other.issue_access_token(&user).unwrap();
        let err = svc.validate(&token, TokenKind::Access).unwrap_err();

        assert!(matches!(err, AppError::TokenMalformed));
    }

    #[test]
    fn subject_is_extractable_from_expired_token() {
        // O fluxo de refresh precisa ler o sub mesmo de token vencido
        let svc = TokenService::new("segredo-de-teste".into(), 15, 7);
        let expired_issuer = TokenService::new("segredo-de-teste".into(), -5, -1);
        let user = test_user();

        let token = expired_issuer.issue_refresh_token(&user).unwrap();
        let claims = svc.extract_claims_unchecked_expiry(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.kind, TokenKind::Refresh);
    }
}
