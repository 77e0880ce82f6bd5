//! # Tagger Uniforme
//!
//! Um span por token, sem interpretação de prefixos (POS tagging, por exemplo).
//! O cursor corrente reconstrói os offsets diretamente, com a mesma convenção de
//! junção por um espaço usada em [`crate::offsets`].

use crate::error::{check_lengths, Result};
use crate::offsets::{char_len, reconstruct_text, SEPARATOR};
use crate::record::{ResolvedRecord, Span};

/// Emite `(label_i, cursor, cursor + len(token_i))` para cada token.
///
/// # Exemplo
///
/// ```rust
/// use span_core::{tag_uniform, Span};
///
/// let record = tag_uniform(&["A", "dog", "runs"], &["DT", "NN", "VBZ"]).unwrap();
/// assert_eq!(record.spans[2], Span::new("VBZ", 6, 10));
/// ```
pub fn tag_uniform<S, L>(tokens: &[S], labels: &[L]) -> Result<ResolvedRecord>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    check_lengths(tokens.len(), labels.len())?;

    let mut cursor = 0;
    let spans = tokens
        .iter()
        .zip(labels)
        .map(|(token, label)| {
            let start = cursor;
            let end = start + char_len(token.as_ref());
            cursor = end + SEPARATOR.len();
            Span::new(label.as_ref(), start, end)
        })
        .collect();

    Ok(ResolvedRecord { text: reconstruct_text(tokens), spans })
}
