use proptest::prelude::*;

use crate::bio::{decode_bio, DecoderConfig, FinalTokenPolicy, OrphanPolicy};
use crate::error::SpanError;
use crate::offsets::{IncrementalCursor, OffsetResolver, OffsetStrategy, SuffixSearch};
use crate::record::Span;
use crate::uniform::tag_uniform;

// -- Strategy helpers --

fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Zãçéô0-9.,]{1,8}", 1..24)
}

fn arb_bio_tag() -> impl Strategy<Value = String> {
    let kind = prop_oneof![Just("PER"), Just("LOC"), Just("ORG")];
    (0u8..3, kind).prop_map(|(prefix, kind)| match prefix {
        0 => "O".to_string(),
        1 => format!("B-{kind}"),
        _ => format!("I-{kind}"),
    })
}

fn arb_bio_record() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    arb_tokens().prop_flat_map(|tokens| {
        let n = tokens.len();
        (Just(tokens), prop::collection::vec(arb_bio_tag(), n))
    })
}

fn arb_config() -> impl Strategy<Value = DecoderConfig> {
    let strategy = prop_oneof![
        Just(OffsetStrategy::IncrementalCursor),
        Just(OffsetStrategy::SuffixSearch)
    ];
    let final_token = prop_oneof![
        Just(FinalTokenPolicy::Include),
        Just(FinalTokenPolicy::Exclude)
    ];
    let orphans = prop_oneof![Just(OrphanPolicy::Ignore), Just(OrphanPolicy::Reject)];
    (strategy, final_token, orphans).prop_map(|(strategy, final_token, orphans)| DecoderConfig {
        strategy,
        final_token,
        orphans,
    })
}

/// Spans esperados: cada `B-X` seguido de zero ou mais `I-X`.
fn expected_runs(tokens: &[String], tags: &[String]) -> Vec<Span> {
    let starts = IncrementalCursor.resolve(tokens).unwrap_or_default();
    let end_of = |i: usize| starts[i] + tokens[i].chars().count();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < tags.len() {
        if let Some(kind) = tags[i].strip_prefix("B-") {
            let inside = format!("I-{kind}");
            let mut j = i + 1;
            while j < tags.len() && tags[j] == inside {
                j += 1;
            }
            spans.push(Span::new(kind, starts[i], end_of(j - 1)));
            i = j;
        } else {
            i += 1;
        }
    }
    spans
}

proptest! {
    #[test]
    fn text_length_counts_one_separator_per_gap(tokens in arb_tokens()) {
        let labels = vec!["X"; tokens.len()];
        let record = tag_uniform(&tokens, &labels).unwrap();
        let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
        prop_assert_eq!(record.text.chars().count(), total + tokens.len() - 1);
    }

    #[test]
    fn uniform_spans_match_token_widths(tokens in arb_tokens()) {
        let labels: Vec<String> = (0..tokens.len()).map(|i| format!("L{i}")).collect();
        let record = tag_uniform(&tokens, &labels).unwrap();
        prop_assert_eq!(record.spans.len(), tokens.len());
        for (span, token) in record.spans.iter().zip(&tokens) {
            prop_assert_eq!(span.len(), token.chars().count());
            prop_assert_eq!(record.mention(span), token.as_str());
        }
        for pair in record.spans.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn strategies_agree(tokens in arb_tokens()) {
        prop_assert_eq!(
            IncrementalCursor.resolve(&tokens).unwrap(),
            SuffixSearch.resolve(&tokens).unwrap()
        );
    }

    #[test]
    fn bio_spans_cover_exact_runs((tokens, tags) in arb_bio_record()) {
        let record = decode_bio(&tokens, &tags, &DecoderConfig::default()).unwrap();
        let text_len = record.text.chars().count();
        for span in &record.spans {
            prop_assert!(span.start <= span.end && span.end <= text_len);
        }
        prop_assert_eq!(record.spans, expected_runs(&tokens, &tags));
    }

    #[test]
    fn resolving_is_idempotent((tokens, tags) in arb_bio_record()) {
        let config = DecoderConfig::default();
        let first = decode_bio(&tokens, &tags, &config).unwrap();
        let second = decode_bio(&tokens, &tags, &config).unwrap();
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        prop_assert_eq!(
            tag_uniform(&tokens, &tags).unwrap(),
            tag_uniform(&tokens, &tags).unwrap()
        );
    }

    #[test]
    fn spans_stay_within_text_under_any_config(
        (tokens, tags) in arb_bio_record(),
        config in arb_config(),
    ) {
        match decode_bio(&tokens, &tags, &config) {
            Ok(record) => {
                let text_len = record.text.chars().count();
                for span in &record.spans {
                    prop_assert!(span.start <= span.end && span.end <= text_len);
                }
                for pair in record.spans.windows(2) {
                    prop_assert!(pair[0].end < pair[1].start);
                }
            }
            Err(SpanError::OrphanContinuation { index, .. }) => {
                prop_assert_eq!(config.orphans, OrphanPolicy::Reject);
                prop_assert!(tags[index].starts_with("I-"));
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}
