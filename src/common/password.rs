use bcrypt::{hash, verify};

use crate::common::error::AppError;

// Guarda e confere senhas com bcrypt (salt embutido no digest).
// O custo é parâmetro do construtor: DEFAULT_COST em produção, custo
// mínimo nos testes para não arrastar a suíte.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn with_default_cost() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }

    // bcrypt é caro de propósito; roda em thread separada para não
    // bloquear o runtime.
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            .map_err(AppError::from)
    }

    // Senha errada retorna Ok(false), nunca erro: quem chama decide o que
    // fazer com a falha de autenticação.
    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || verify(&password, &digest))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[tokio::test]
    async fn hash_then_verify_roundtrip() {
        let h = hasher();
        let digest = h.hash("s3nha-forte").await.unwrap();
        assert_ne!(digest, "s3nha-forte");
        assert!(h.verify("s3nha-forte", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_returns_false_not_error() {
        let h = hasher();
        let digest = h.hash("correta").await.unwrap();
        assert!(!h.verify("errada", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        // Salt embutido: dois digests da mesma senha não coincidem.
        let h = hasher();
        let a = h.hash("mesma").await.unwrap();
        let b = h.hash("mesma").await.unwrap();
        assert_ne!(a, b);
    }
}
