//! # Erros do Resolvedor de Spans
//!
//! Todas as falhas são locais a um único registro. Quem processa lotes decide se
//! descarta o registro ou aborta o lote inteiro (ver `span-batch`).

/// Resultado padrão das operações do crate.
pub type Result<T> = std::result::Result<T, SpanError>;

#[derive(Debug, thiserror::Error)]
pub enum SpanError {
    /// Sequências de tokens e tags com tamanhos diferentes. Nunca truncamos nem completamos.
    #[error("Input length mismatch: {tokens} tokens but {tags} tags")]
    InputLengthMismatch { tokens: usize, tags: usize },

    /// Tag que não é `O`, `B-<tipo>` nem `I-<tipo>` (modo BIO).
    #[error("Unrecognized tag format at index {index}: '{tag}'")]
    UnrecognizedTagFormat { index: usize, tag: String },

    /// O sufixo do token `index` não foi encontrado no texto reconstruído.
    #[error("Offset resolution failure for token at index {index}")]
    OffsetResolutionFailure { index: usize },

    /// `I-<tipo>` sem entidade aberta do mesmo tipo, com `OrphanPolicy::Reject`.
    #[error("Orphan continuation tag at index {index}: '{tag}'")]
    OrphanContinuation { index: usize, tag: String },

    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl SpanError {
    /// Índice do token que causou a falha, quando houver um.
    pub fn index(&self) -> Option<usize> {
        match self {
            SpanError::UnrecognizedTagFormat { index, .. }
            | SpanError::OffsetResolutionFailure { index }
            | SpanError::OrphanContinuation { index, .. } => Some(*index),
            SpanError::InputLengthMismatch { .. } | SpanError::InvalidConfig(_) => None,
        }
    }
}

/// Garante que tokens e tags são paralelos.
pub(crate) fn check_lengths(tokens: usize, tags: usize) -> Result<()> {
    if tokens != tags {
        return Err(SpanError::InputLengthMismatch { tokens, tags });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_lengths() {
        assert!(check_lengths(3, 3).is_ok());
        assert!(check_lengths(0, 0).is_ok());
        let err = check_lengths(3, 2).unwrap_err();
        assert!(matches!(err, SpanError::InputLengthMismatch { tokens: 3, tags: 2 }));
        assert_eq!(err.index(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = SpanError::UnrecognizedTagFormat { index: 4, tag: "E-PER".to_string() };
        assert_eq!(err.to_string(), "Unrecognized tag format at index 4: 'E-PER'");
        assert_eq!(err.index(), Some(4));
    }
}
