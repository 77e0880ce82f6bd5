//! # Esquema de Tags BIO
//!
//! - `B-<tipo>`: Begin — primeiro token de uma entidade
//! - `I-<tipo>`: Inside — tokens subsequentes da mesma entidade
//! - `O`: Outside — não é parte de nenhuma entidade
//!
//! O `<tipo>` é um identificador arbitrário (PER, LOC, GENE, ...). Diferente de um
//! modelo com vocabulário fechado, aqui qualquer tipo não vazio é aceito.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanError};

const BEGIN_PREFIX: &str = "B-";
const INSIDE_PREFIX: &str = "I-";
const OUTSIDE: &str = "O";

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: início de uma entidade. Ex: **Empire** (B-LOC) State Building.
    Begin(String),
    /// **Inside**: continuação de uma entidade. Ex: Empire **State** (I-LOC) Building.
    Inside(String),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin("PER")).
    ///
    /// Retorna `None` para qualquer outra forma, inclusive `B-` com tipo vazio.
    pub fn from_label(s: &str) -> Option<Self> {
        if s == OUTSIDE {
            return Some(Tag::Outside);
        }
        if let Some(kind) = s.strip_prefix(BEGIN_PREFIX) {
            return (!kind.is_empty()).then(|| Tag::Begin(kind.to_string()));
        }
        if let Some(kind) = s.strip_prefix(INSIDE_PREFIX) {
            return (!kind.is_empty()).then(|| Tag::Inside(kind.to_string()));
        }
        None
    }

    /// Como `from_label`, mas falha com o índice e o valor cru da tag.
    pub fn parse_at(index: usize, s: &str) -> Result<Self> {
        Tag::from_label(s).ok_or_else(|| SpanError::UnrecognizedTagFormat {
            index,
            tag: s.to_string(),
        })
    }

    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(kind) => format!("{BEGIN_PREFIX}{kind}"),
            Tag::Inside(kind) => format!("{INSIDE_PREFIX}{kind}"),
            Tag::Outside => OUTSIDE.to_string(),
        }
    }

    /// Tipo da entidade (se for B- ou I-)
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Tag::Begin(kind) | Tag::Inside(kind) => Some(kind.as_str()),
            Tag::Outside => None,
        }
    }

    /// Verifica se esta tag continua uma entidade aberta do tipo `open_type`.
    pub fn continues(&self, open_type: &str) -> bool {
        matches!(self, Tag::Inside(kind) if kind == open_type)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
