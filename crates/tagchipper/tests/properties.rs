#![allow(missing_docs)]

use std::sync::Arc;

use proptest::prelude::*;
use tagchipper::{
    detokenize::Canonicalizer,
    evaluation::normalized_edit_distance,
    labels::{LabelEncoder, LabelEncoderOptions},
    schema::{Field, Receipt, Tag, TagGrammar},
    vocab::{BaseTokenizer, ByteTokenizer, TagVocab},
};

const FIELD_TEXT: &str = "[a-zA-Z0-9 .,:/-]{0,24}";

const PIECES: &[&str] = &[
    "<s>",
    "</s>",
    "<s_company>",
    "</s_company>",
    "<s_total>",
    "</s_total>",
    "<pad>",
    "<pa",
    "d>",
    " ",
    "  ",
    "\n",
    "\t",
    "ACME",
    "10.00",
    "a b",
];

fn arb_receipt() -> impl Strategy<Value = Receipt> {
    (FIELD_TEXT, FIELD_TEXT, FIELD_TEXT, FIELD_TEXT)
        .prop_map(|(company, date, address, total)| Receipt::new(company, date, address, total))
}

fn arb_raw_output() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(PIECES), 0..40).prop_map(|p| p.concat())
}

fn arb_grammar() -> impl Strategy<Value = TagGrammar> {
    proptest::sample::subsequence(Field::CANONICAL.to_vec(), 1..=Field::CANONICAL.len())
        .prop_map(|fields| TagGrammar::new(fields).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn fields_serialize_in_canonical_order(receipt in arb_receipt()) {
        let tagged = receipt.tagged();
        let positions = Field::CANONICAL
            .iter()
            .map(|&f| tagged.find(&Tag::Open(f).text()).unwrap())
            .collect::<Vec<_>>();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(tagged.starts_with("<s><s_company>"));
        prop_assert!(tagged.ends_with("</s_total></s>"));
    }

    #[test]
    fn canonicalize_is_idempotent(raw in arb_raw_output()) {
        let canon = Canonicalizer::default();
        let once = canon.canonicalize(&raw);
        prop_assert_eq!(canon.canonicalize(&once), once.clone());
        prop_assert!(!once.contains("<pad>"));
    }

    #[test]
    fn only_end_is_terminal(grammar in arb_grammar()) {
        for tag in grammar.tags() {
            let legal = grammar.legal_next(tag).unwrap();
            prop_assert_eq!(legal.is_empty(), tag == Tag::End);
            prop_assert!(legal.len() <= 1);
        }
    }

    #[test]
    fn labels_have_fixed_length(receipt in arb_receipt(), max_length in 1..200usize) {
        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        TagVocab::register(&TagGrammar::receipt(), &mut tokenizer).unwrap();
        let tokenizer: Arc<dyn BaseTokenizer<u32>> = Arc::new(tokenizer);

        let options = LabelEncoderOptions::default().with_max_length(max_length);
        let encoder = LabelEncoder::new(tokenizer, options).unwrap();
        let encoded = encoder.encode(&receipt.tagged()).unwrap();

        prop_assert_eq!(encoded.labels.len(), max_length);
        prop_assert!(encoded.token_count <= max_length);

        let ignored = encoded.labels.iter().filter(|&&l| l == options.ignore_id).count();
        prop_assert_eq!(ignored, max_length - encoded.token_count);
        prop_assert!(encoded.labels[..encoded.token_count].iter().all(|&l| l >= 0));
    }

    #[test]
    fn edit_distance_is_symmetric(a in "\\PC{0,30}", b in "\\PC{0,30}") {
        let ab = normalized_edit_distance(&a, &b);
        prop_assert_eq!(ab, normalized_edit_distance(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(normalized_edit_distance(&a, &a), 0.0);
    }
}
