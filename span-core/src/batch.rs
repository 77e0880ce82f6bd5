//! # Processamento em Lote
//!
//! O resolvedor é uma função pura: cada registro carrega seu próprio estado local
//! (cursor, entidade aberta). Por isso os registros são processados em paralelo via Rayon,
//! sem sincronização. A ordem da saída é a ordem da entrada.

use rayon::prelude::*;
use tracing::debug;

use crate::bio::DecoderConfig;
use crate::error::Result;
use crate::record::{Mode, Record, ResolvedRecord};

/// Resolve todos os registros em paralelo.
///
/// Falhas ficam por registro: decidir entre descartar o registro ou abortar o lote
/// é responsabilidade de quem chama.
pub fn resolve_batch(
    records: &[Record],
    mode: Mode,
    config: &DecoderConfig,
) -> Vec<Result<ResolvedRecord>> {
    debug!(records = records.len(), ?mode, "resolving batch");
    records
        .par_iter()
        .map(|record| record.resolve(mode, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpanError;
    use crate::record::Span;

    #[test]
    fn test_batch_preserves_order() {
        let records: Vec<Record> = (0..200)
            .map(|i| {
                let tokens = vec!["x".repeat(i % 7 + 1), "em".to_string(), "Lisboa".to_string()];
                Record::new(tokens, ["O", "O", "B-LOC"])
            })
            .collect();

        let results = resolve_batch(&records, Mode::Bio, &DecoderConfig::default());
        assert_eq!(results.len(), records.len());
        for (i, result) in results.iter().enumerate() {
            let resolved = result.as_ref().unwrap();
            let width = i % 7 + 1;
            // "xxx em Lisboa": Lisboa começa após a palavra de largura variável
            assert_eq!(resolved.spans, vec![Span::new("LOC", width + 4, width + 10)]);
        }
    }

    #[test]
    fn test_batch_failures_are_per_record() {
        let records = vec![
            Record::new(["A", "dog"], ["DT", "NN"]),
            Record::new(["A"], ["DT", "NN"]),
            Record::new(["runs"], ["VBZ"]),
        ];
        let results = resolve_batch(&records, Mode::Uniform, &DecoderConfig::default());
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SpanError::InputLengthMismatch { .. })));
        assert!(results[2].is_ok());
    }
}
