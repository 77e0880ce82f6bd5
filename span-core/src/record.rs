//! # Registros de Entrada e Saída
//!
//! Entrada: pares paralelos `(tokens, tags)` vindos de quem carrega o corpus.
//! Saída: o texto reconstruído **junto** com os spans `(label, start, end)`, já que os
//! offsets só fazem sentido sobre esse texto.

use serde::{Deserialize, Serialize};

use crate::bio::{decode_bio, DecoderConfig};
use crate::error::Result;
use crate::uniform::tag_uniform;

/// Um intervalo de caracteres no texto reconstruído com um rótulo.
///
/// Invariante: `0 <= start <= end <= len(texto)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Rótulo (tipo da entidade no modo BIO, rótulo cru no modo uniforme)
    pub label: String,
    /// Offset inicial em caracteres (inclusivo)
    pub start: usize,
    /// Offset final em caracteres (exclusivo)
    pub end: usize,
}

impl Span {
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self { label: label.into(), start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resultado de uma chamada ao resolvedor: texto reconstruído + spans ordenados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub text: String,
    pub spans: Vec<Span>,
}

impl ResolvedRecord {
    /// Trecho do texto coberto pelo span (offsets em caracteres).
    ///
    /// Spans fora dos limites do texto são truncados ao seu final.
    pub fn mention(&self, span: &Span) -> &str {
        let byte_at = |offset: usize| {
            self.text
                .char_indices()
                .nth(offset)
                .map(|(b, _)| b)
                .unwrap_or(self.text.len())
        };
        let start = byte_at(span.start);
        let end = byte_at(span.end).max(start);
        &self.text[start..end]
    }

    /// Pares `(span, trecho)` na ordem dos spans.
    pub fn mentions(&self) -> impl Iterator<Item = (&Span, &str)> {
        self.spans.iter().map(move |s| (s, self.mention(s)))
    }
}

/// Modo de operação do resolvedor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// **BIO**: um span por sequência maximal `B-X I-X*`.
    Bio,
    /// **Uniforme**: um span por token, sem semântica de prefixo (ex: POS tagging).
    Uniform,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Bio
    }
}

/// Um registro de entrada: tokens e tags paralelos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl Record {
    pub fn new<T, G>(tokens: T, tags: G) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve o registro no modo pedido.
    pub fn resolve(&self, mode: Mode, config: &DecoderConfig) -> Result<ResolvedRecord> {
        match mode {
            Mode::Bio => decode_bio(&self.tokens, &self.tags, config),
            Mode::Uniform => tag_uniform(&self.tokens, &self.tags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new("LOC", 10, 16);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(Span::new("X", 3, 3).is_empty());
    }

    #[test]
    fn test_mention_multibyte() {
        let record = ResolvedRecord {
            text: "Visitei São Paulo ontem".to_string(),
            spans: vec![Span::new("LOC", 8, 17)],
        };
        assert_eq!(record.mention(&record.spans[0]), "São Paulo");
        assert_eq!(record.mention(&Span::new("X", 18, 99)), "ontem");
    }

    #[test]
    fn test_record_resolve_modes() {
        let record = Record::new(["A", "dog", "runs"], ["DT", "NN", "VBZ"]);
        let uniform = record.resolve(Mode::Uniform, &DecoderConfig::default()).unwrap();
        assert_eq!(uniform.spans.len(), 3);

        // Os mesmos rótulos não são tags BIO válidas
        assert!(record.resolve(Mode::Bio, &DecoderConfig::default()).is_err());
    }

    #[test]
    fn test_record_serde() {
        let json = r#"{"tokens":["Paris"],"tags":["B-LOC"]}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record, Record::new(["Paris"], ["B-LOC"]));

        let out = record.resolve(Mode::Bio, &DecoderConfig::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"text":"Paris","spans":[{"label":"LOC","start":0,"end":5}]}"#
        );
    }
}
