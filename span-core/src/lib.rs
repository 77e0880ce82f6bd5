//! # span-core — Resolvedor de Spans para Classificação de Tokens
//!
//! Converte anotações por token (tokens + tags) em spans de caracteres sobre um texto
//! reconstruído, o formato esperado por ferramentas de anotação e armazenamento.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: tokens e tags paralelos ([`Record`]).
//! 2.  **Offsets** ([`offsets`]): o texto é reconstruído unindo os tokens com um espaço e cada
//!     token recebe seu offset inicial (cursor incremental ou busca de sufixo).
//! 3.  **Decodificação**:
//!     *   **BIO** ([`bio`]): uma máquina de estados explícita emite um span por entidade.
//!     *   **Uniforme** ([`uniform`]): um span por token, sem semântica de prefixos.
//! 4.  **Saída**: [`ResolvedRecord`] com o texto reconstruído e a lista de [`Span`].
//!
//! Lotes são processados em paralelo ([`batch`]) e podem ser resumidos em contagens de
//! menções por rótulo ([`aggregations`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use span_core::{decode_bio, DecoderConfig, Span};
//!
//! let tokens = ["Empire", "State", "Building"];
//! let tags = ["B-LOC", "I-LOC", "I-LOC"];
//!
//! let record = decode_bio(&tokens, &tags, &DecoderConfig::default()).unwrap();
//! assert_eq!(record.spans, vec![Span::new("LOC", 0, 21)]);
//! assert_eq!(record.mention(&record.spans[0]), "Empire State Building");
//! ```

pub mod aggregations;
pub mod batch;
pub mod bio;
pub mod error;
pub mod offsets;
pub mod record;
pub mod tags;
pub mod uniform;

#[cfg(test)]
mod proptests;

pub use aggregations::MentionAggregation;
pub use batch::resolve_batch;
pub use bio::{decode_bio, DecoderConfig, DecoderState, FinalTokenPolicy, OrphanPolicy};
pub use error::{Result, SpanError};
pub use offsets::{reconstruct_text, OffsetResolver, OffsetStrategy, Token};
pub use record::{Mode, Record, ResolvedRecord, Span};
pub use tags::Tag;
pub use uniform::tag_uniform;
