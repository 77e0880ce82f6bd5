//! # Agregação de Menções
//!
//! Conta quantas vezes cada trecho de texto aparece com cada rótulo em um conjunto de
//! registros resolvidos: `rótulo -> { menção -> contagem }`.
//!
//! Usa `BTreeMap` para que a serialização seja determinística (mesma entrada, mesmos bytes).

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::record::ResolvedRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionAggregation {
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl MentionAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega vários registros em paralelo (reduce de agregações parciais).
    pub fn from_records(records: &[ResolvedRecord]) -> Self {
        records
            .par_iter()
            .fold(Self::new, |mut acc, record| {
                acc.add(record);
                acc
            })
            .reduce(Self::new, |mut a, b| {
                a.merge(b);
                a
            })
    }

    /// Conta as menções de um registro.
    pub fn add(&mut self, record: &ResolvedRecord) {
        for (span, mention) in record.mentions() {
            *self
                .counts
                .entry(span.label.clone())
                .or_default()
                .entry(mention.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Soma outra agregação nesta.
    pub fn merge(&mut self, other: MentionAggregation) {
        for (label, mentions) in other.counts {
            let target = self.counts.entry(label).or_default();
            for (mention, count) in mentions {
                *target.entry(mention).or_insert(0) += count;
            }
        }
    }

    pub fn count(&self, label: &str, mention: &str) -> usize {
        self.counts
            .get(label)
            .and_then(|m| m.get(mention))
            .copied()
            .unwrap_or(0)
    }

    /// Rótulos vistos, em ordem lexicográfica.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Menções de um rótulo com suas contagens.
    pub fn mentions(&self, label: &str) -> Option<&BTreeMap<String, usize>> {
        self.counts.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
