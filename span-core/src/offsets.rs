//! # Resolvedor de Offsets de Tokens
//!
//! Dada uma sequência de tokens, reconstrói o texto unindo-os com **exatamente um espaço ASCII**
//! e calcula o offset (em caracteres) onde cada token começa nesse texto.
//!
//! ## Estratégias
//!
//! | Estratégia          | Custo      | Quando usar                                            |
//! |---------------------|------------|--------------------------------------------------------|
//! | `IncrementalCursor` | O(n)       | Padrão. Cursor corrente: `cursor += len(token) + 1`.   |
//! | `SuffixSearch`      | O(n²)      | Busca a ocorrência **mais à direita** do sufixo `i..n`. |
//!
//! A busca pela direita é o ponto central do `SuffixSearch`: o sufixo do token `i` é, por
//! construção, a cauda literal do texto, então a ocorrência mais à direita é sempre a
//! verdadeira, mesmo quando uma palavra se repete antes no texto.
//!
//! Ambas assumem a mesma convenção de junção. Textos destokenizados com outro espaçamento
//! produzem offsets degradados e precisam ser reconstruídos com esta convenção.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use span_core::offsets::{reconstruct_text, OffsetResolver, OffsetStrategy};
//!
//! let tokens = ["o", "cão", "e", "o", "gato"];
//! assert_eq!(reconstruct_text(&tokens), "o cão e o gato");
//!
//! let starts = OffsetStrategy::SuffixSearch.resolve(&tokens).unwrap();
//! assert_eq!(starts, vec![0, 2, 6, 8, 10]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanError};

/// Separador usado na reconstrução do texto.
pub const SEPARATOR: &str = " ";

/// Um token posicionado no texto reconstruído.
///
/// Os offsets são contados em caracteres (valores escalares Unicode), não em bytes,
/// para que "São" ocupe 3 posições e não 4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// O texto do token (ex: "Paris", ",").
    pub text: String,
    /// Offset inicial no texto reconstruído (inclusivo).
    pub start: usize,
    /// Offset final no texto reconstruído (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Une os tokens com um único espaço. O texto é sempre derivado, nunca armazenado à parte.
pub fn reconstruct_text<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Comprimento em caracteres, a unidade de todos os offsets deste crate.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Interface comum às estratégias de resolução de offsets.
pub trait OffsetResolver {
    /// Retorna, para cada índice `i`, o offset onde o token `i` começa no texto reconstruído.
    fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>>;
}

/// Cursor corrente: largura do token mais um para o espaço.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncrementalCursor;

impl OffsetResolver for IncrementalCursor {
    fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        let mut starts = Vec::with_capacity(tokens.len());
        let mut cursor = 0;
        for token in tokens {
            starts.push(cursor);
            cursor += char_len(token.as_ref()) + SEPARATOR.len();
        }
        Ok(starts)
    }
}

/// Busca do sufixo `tokens[i..]` mais à direita no texto completo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuffixSearch;

impl OffsetResolver for SuffixSearch {
    fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        let text = reconstruct_text(tokens);
        let mut starts = Vec::with_capacity(tokens.len());
        for index in 0..tokens.len() {
            let suffix = reconstruct_text(&tokens[index..]);
            let byte_pos = text
                .rfind(suffix.as_str())
                .ok_or(SpanError::OffsetResolutionFailure { index })?;
            starts.push(char_len(&text[..byte_pos]));
        }
        Ok(starts)
    }
}

/// Estratégias de resolução selecionáveis pelo chamador (ex: via configuração JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStrategy {
    /// **Cursor incremental**: linear, imune a palavras repetidas. Recomendado.
    IncrementalCursor,
    /// **Busca de sufixo**: quadrática. Só para textos cuja destokenização não permite
    /// uma varredura ingênua da esquerda para a direita.
    SuffixSearch,
}

impl Default for OffsetStrategy {
    fn default() -> Self {
        OffsetStrategy::IncrementalCursor
    }
}

impl OffsetResolver for OffsetStrategy {
    fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        match self {
            OffsetStrategy::IncrementalCursor => IncrementalCursor.resolve(tokens),
            OffsetStrategy::SuffixSearch => SuffixSearch.resolve(tokens),
        }
    }
}

/// Posiciona os tokens no texto reconstruído usando a estratégia escolhida.
pub fn place_tokens<S, R>(tokens: &[S], resolver: &R) -> Result<Vec<Token>>
where
    S: AsRef<str>,
    R: OffsetResolver,
{
    let starts = resolver.resolve(tokens)?;
    Ok(tokens
        .iter()
        .zip(starts)
        .enumerate()
        .map(|(index, (token, start))| {
            let text = token.as_ref().to_string();
            let end = start + char_len(&text);
            Token { text, start, end, index }
        })
        .collect())
}
