//! # Decodificador BIO
//!
//! Converte tags BIO por token em spans de caracteres sobre o texto reconstruído.
//! Um span é emitido por sequência maximal `B-X I-X*` do mesmo tipo.
//!
//! ## Máquina de Estados
//!
//! ```text
//!                 B-X                      I-X (mesmo tipo)
//!   NoEntity ───────────▶ OpenEntity{X} ◀──────────┐
//!      ▲                      │  └─────────────────┘
//!      │   O, B-Y, I-Y, fim   │
//!      └──────────────────────┘  (emite o span ao fechar)
//! ```
//!
//! Para cada token, a verificação de **fechamento** acontece antes da de **abertura**:
//! um `B-Y` logo após uma entidade aberta fecha a anterior e abre a nova no mesmo passo.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use span_core::bio::{decode_bio, DecoderConfig};
//! use span_core::Span;
//!
//! let tokens = ["Paris", "and", "Berlin"];
//! let tags = ["B-LOC", "O", "B-LOC"];
//! let record = decode_bio(&tokens, &tags, &DecoderConfig::default()).unwrap();
//!
//! assert_eq!(record.text, "Paris and Berlin");
//! assert_eq!(record.spans, vec![Span::new("LOC", 0, 5), Span::new("LOC", 10, 16)]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_lengths, Result, SpanError};
use crate::offsets::{place_tokens, reconstruct_text, OffsetStrategy, Token};
use crate::record::{ResolvedRecord, Span};
use crate::tags::Tag;

/// Onde termina uma entidade que atravessa o último token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalTokenPolicy {
    /// O span inclui os caracteres do último token (termina no fim do texto).
    Include,
    /// Comportamento histórico: o span termina em `start(último) - 1`, excluindo o último token.
    Exclude,
}

impl Default for FinalTokenPolicy {
    fn default() -> Self {
        FinalTokenPolicy::Include
    }
}

/// O que fazer com um `I-X` sem entidade `X` aberta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Trata o token como fora de entidade.
    Ignore,
    /// Falha com `SpanError::OrphanContinuation`.
    Reject,
}

impl Default for OrphanPolicy {
    fn default() -> Self {
        OrphanPolicy::Ignore
    }
}

/// Configuração do decodificador.
///
/// Todos os campos são opcionais no JSON:
///
/// ```json
/// { "strategy": "suffix_search", "final_token": "exclude", "orphans": "reject" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    pub strategy: OffsetStrategy,
    pub final_token: FinalTokenPolicy,
    pub orphans: OrphanPolicy,
}

impl DecoderConfig {
    /// Carrega a configuração de uma string JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Estado do decodificador entre tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderState {
    /// Nenhuma entidade em andamento.
    NoEntity,
    /// Entidade aberta: tipo e offset inicial.
    OpenEntity { label: String, start: usize },
}

impl Default for DecoderState {
    fn default() -> Self {
        DecoderState::NoEntity
    }
}

impl DecoderState {
    /// Transição para um token: verifica fechamento, depois abertura.
    ///
    /// Spans fechados neste passo são empurrados em `out`.
    pub fn step(
        self,
        token: &Token,
        tag: &Tag,
        is_last: bool,
        config: &DecoderConfig,
        out: &mut Vec<Span>,
    ) -> Result<Self> {
        if let DecoderState::OpenEntity { label, start } = self {
            if tag.continues(&label) {
                if !is_last {
                    return Ok(DecoderState::OpenEntity { label, start });
                }
                let end = match config.final_token {
                    FinalTokenPolicy::Include => token.end,
                    FinalTokenPolicy::Exclude => token.start.saturating_sub(1),
                };
                out.push(Span { label, start, end });
                return Ok(DecoderState::NoEntity);
            }
            // O offset anterior ao token atual é o espaço separador
            out.push(Span { label, start, end: token.start.saturating_sub(1) });
        }

        match tag {
            Tag::Begin(kind) => Ok(DecoderState::OpenEntity {
                label: kind.clone(),
                start: token.start,
            }),
            Tag::Inside(_) => match config.orphans {
                OrphanPolicy::Ignore => {
                    debug!(index = token.index, tag = %tag, "ignoring orphan continuation tag");
                    Ok(DecoderState::NoEntity)
                }
                OrphanPolicy::Reject => Err(SpanError::OrphanContinuation {
                    index: token.index,
                    tag: tag.label(),
                }),
            },
            Tag::Outside => Ok(DecoderState::NoEntity),
        }
    }

    /// Fecha uma entidade ainda aberta após o último token (ex: `B-X` no último índice).
    pub fn finish(self, text_end: usize) -> Option<Span> {
        match self {
            DecoderState::OpenEntity { label, start } => Some(Span { label, start, end: text_end }),
            DecoderState::NoEntity => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DecoderState::OpenEntity { .. })
    }
}

/// Decodifica tokens e tags BIO paralelos em spans de entidades.
///
/// Falha com `InputLengthMismatch` se os tamanhos diferem e com `UnrecognizedTagFormat`
/// na primeira tag que não seja `O`, `B-<tipo>` ou `I-<tipo>`. Uma sequência vazia
/// retorna texto vazio e nenhum span.
pub fn decode_bio<S, T>(
    tokens: &[S],
    tags: &[T],
    config: &DecoderConfig,
) -> Result<ResolvedRecord>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    check_lengths(tokens.len(), tags.len())?;
    if tokens.is_empty() {
        return Ok(ResolvedRecord::default());
    }

    let parsed = tags
        .iter()
        .enumerate()
        .map(|(i, t)| Tag::parse_at(i, t.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let placed = place_tokens(tokens, &config.strategy)?;
    let text = reconstruct_text(tokens);

    let last = placed.len() - 1;
    let mut spans = Vec::new();
    let mut state = DecoderState::NoEntity;
    for (token, tag) in placed.iter().zip(&parsed) {
        state = state.step(token, tag, token.index == last, config, &mut spans)?;
    }
    let text_end = placed[last].end;
    spans.extend(state.finish(text_end));

    Ok(ResolvedRecord { text, spans })
}
