//! Serializing any valid tree and parsing it back yields a tree that
//! serializes to the same text.

use proptest::collection::vec;
use proptest::prelude::*;
use sfcodec::{
    decode_dictionary, decode_item, decode_list, encode_dictionary, encode_item, encode_list,
    Dictionary, Item, List, Parameters, Token, Value, MAX_INTEGER, MIN_INTEGER,
};

const KEY: &str = "[a-z*][a-z0-9_.*-]{0,6}";
const TOKEN: &str = "[A-Za-z*][A-Za-z0-9:/!#$%&'*+.^_`|~-]{0,8}";

fn bare_item() -> impl Strategy<Value = Value> {
    prop_oneof![
        (MIN_INTEGER..=MAX_INTEGER).prop_map(Value::Integer),
        (MIN_INTEGER..=MAX_INTEGER).prop_map(|n| Value::Decimal(n as f64 / 1000.0)),
        "[ -~]{0,16}".prop_map(Value::String),
        TOKEN.prop_map(|s| Value::Token(Token::from(s))),
        vec(any::<u8>(), 0..16).prop_map(Value::ByteSeq),
        any::<bool>().prop_map(Value::Bool),
        (MIN_INTEGER..=MAX_INTEGER).prop_map(Value::Date),
        any::<String>().prop_map(Value::DispString),
    ]
}

fn params() -> impl Strategy<Value = Parameters> {
    vec((KEY, bare_item()), 0..4).prop_map(|v| v.into_iter().collect())
}

fn item() -> impl Strategy<Value = Item> {
    (bare_item(), params()).prop_map(|(v, p)| Item::with_params(v, p))
}

fn item_or_inner_list() -> impl Strategy<Value = Item> {
    prop_oneof![
        3 => item(),
        1 => (vec(item(), 0..4), params()).prop_map(|(l, p)| Item::with_params(l, p)),
    ]
}

fn list() -> impl Strategy<Value = List> {
    vec(item_or_inner_list(), 0..4)
}

fn dict() -> impl Strategy<Value = Dictionary> {
    vec((KEY, item_or_inner_list()), 0..4).prop_map(|v| v.into_iter().collect())
}

proptest! {
    #[test]
    fn item_round_trip(item in item()) {
        let s = encode_item(&item).unwrap();
        let decoded = decode_item(&[&s]).unwrap();
        let again = encode_item(&decoded).unwrap();

        prop_assert_eq!(&s, &again);
        prop_assert_eq!(decoded, decode_item(&[&again]).unwrap());
    }

    #[test]
    fn list_round_trip(list in list()) {
        let s = encode_list(&list).unwrap();
        let decoded = decode_list(&[&s]).unwrap();
        let again = encode_list(&decoded).unwrap();

        prop_assert_eq!(list.len(), decoded.len());
        prop_assert_eq!(&s, &again);
        prop_assert_eq!(decoded, decode_list(&[&again]).unwrap());
    }

    #[test]
    fn dict_round_trip(dict in dict()) {
        let s = encode_dictionary(&dict).unwrap();
        let decoded = decode_dictionary(&[&s]).unwrap();
        let again = encode_dictionary(&decoded).unwrap();

        prop_assert_eq!(dict.len(), decoded.len());
        prop_assert_eq!(&s, &again);
        prop_assert_eq!(decoded, decode_dictionary(&[&again]).unwrap());
    }

    #[test]
    fn list_split_across_fields(list in list()) {
        let fields = list
            .iter()
            .map(|item| encode_list(&vec![item.clone()]))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        prop_assert_eq!(
            decode_list(&[encode_list(&list).unwrap()]).unwrap(),
            decode_list(&fields).unwrap()
        );
    }

    #[test]
    fn decode_never_panics(s in "\\PC{0,32}") {
        let _ = decode_item(&[&s]);
        let _ = decode_list(&[&s]);
        let _ = decode_dictionary(&[&s, &s]);
    }
}

#[test]
fn decoded_tree_is_stable() {
    let inputs = [
        "1.1, 2.25, 3.125, 999999999999.999",
        r#"a;b="c", (d e;f=:Zg==:);g=@-1, %"%e2%82%ac""#,
    ];

    for s in inputs {
        let decoded = decode_list(&[s]).unwrap();
        let again = decode_list(&[encode_list(&decoded).unwrap()]).unwrap();

        assert_eq!(decoded, again, "{s}");
    }
}

#[test]
fn decoded_dictionary_is_stable() {
    let inputs = [
        r#"a=1.1, b=(2.25 @-5);x=%"%c3%bc", c;d=:AA==:"#,
        r#"u=2, i, a=?0;z, k="v\"w""#,
    ];

    for s in inputs {
        let decoded = decode_dictionary(&[s]).unwrap();
        let again = decode_dictionary(&[encode_dictionary(&decoded).unwrap()]).unwrap();

        assert_eq!(decoded, again, "{s}");
    }
}
