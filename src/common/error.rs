use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante é um "kind" checável por máquina; a mensagem humana
// fica no IntoResponse.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Conflitos (unicidade) ---
    #[error("E-mail já existe: {0}")]
    EmailAlreadyExists(String),

    #[error("Tipo de serviço já existe: {0}")]
    ServiceTypeNameTaken(String),

    // --- Autenticação ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta desativada")]
    AccountDisabled,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token expirado")]
    TokenExpired,

    #[error("Token malformado")]
    TokenMalformed,

    #[error("Tipo de token incorreto")]
    TokenKindMismatch,

    #[error("Refresh token inválido")]
    InvalidRefreshToken,

    #[error("Acesso negado")]
    Forbidden,

    // --- Não encontrados ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Endereço de atendimento não encontrado")]
    LocationNotFound,

    #[error("Tipo de serviço não encontrado")]
    ServiceTypeNotFound,

    // --- Regras pontuais ---
    #[error("O novo e-mail é igual ao atual")]
    EmailUnchanged,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message): (StatusCode, String) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists(email) => (
                StatusCode::CONFLICT,
                format!("O e-mail '{}' já está em uso.", email),
            ),
            AppError::ServiceTypeNameTaken(name) => (
                StatusCode::CONFLICT,
                format!("Já existe um tipo de serviço chamado '{}'.", name),
            ),

            // Mensagem genérica de propósito: não revela se o e-mail existe.
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".into())
            }
            AppError::AccountDisabled => {
                (StatusCode::UNAUTHORIZED, "Esta conta está desativada.".into())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".into(),
            ),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expirado.".into()),
            AppError::TokenMalformed => (StatusCode::UNAUTHORIZED, "Token malformado.".into()),
            AppError::TokenKindMismatch => (
                StatusCode::UNAUTHORIZED,
                "O token apresentado não é do tipo esperado.".into(),
            ),
            AppError::InvalidRefreshToken => {
                (StatusCode::UNAUTHORIZED, "Refresh token inválido.".into())
            }
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para realizar esta ação.".into(),
            ),

            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".into())
            }
            AppError::CustomerNotFound => {
                (StatusCode::NOT_FOUND, "Cliente não encontrado.".into())
            }
            AppError::LocationNotFound => (
                StatusCode::NOT_FOUND,
                "Endereço de atendimento não encontrado.".into(),
            ),
            AppError::ServiceTypeNotFound => {
                (StatusCode::NOT_FOUND, "Tipo de serviço não encontrado.".into())
            }

            AppError::EmailUnchanged => (
                StatusCode::BAD_REQUEST,
                "O novo e-mail deve ser diferente do atual.".into(),
            ),

            // Todos os outros (DatabaseError, InternalServerError, etc.) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".into(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
