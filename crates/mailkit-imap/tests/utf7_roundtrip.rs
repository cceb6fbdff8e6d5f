//! Property tests for the modified UTF-7 codec.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use mailkit_imap::utf7;

proptest! {
    #[test]
    fn decode_inverts_encode(s in "\\PC*") {
        let encoded = utf7::encode(&s);
        prop_assert_eq!(utf7::decode(&encoded).unwrap(), s);
    }

    #[test]
    fn encoded_form_is_printable_ascii(s in any::<String>()) {
        let encoded = utf7::encode(&s);
        prop_assert!(encoded.iter().all(|&b| (0x20..=0x7e).contains(&b)));
    }

    #[test]
    fn printable_ascii_without_ampersand_is_unchanged(s in "[ -%'-~]*") {
        prop_assert_eq!(utf7::encode(&s), s.as_bytes());
    }

    #[test]
    fn mixed_scripts_round_trip(
        parts in prop::collection::vec(
            prop_oneof!["[a-zA-Z0-9 /&-]{0,6}", "[а-яё]{1,6}", "[ぁ-ゖ]{1,4}", "[😀-🙏]{1,3}"],
            0..8,
        )
    ) {
        let s: String = parts.concat();
        prop_assert_eq!(utf7::decode(&utf7::encode(&s)).unwrap(), s);
    }
}

#[test]
fn ampersand_escaping() {
    assert_eq!(utf7::encode("Q&A"), b"Q&-A");
    assert_eq!(utf7::decode(b"Q&-A").unwrap(), "Q&A");
    assert_eq!(utf7::encode("&&"), b"&-&-");
}

#[test]
fn known_folder_names() {
    for (plain, wire) in [
        ("Входящие/Отчёты", "&BBIERQQ+BDQETwRJBDgENQ-/&BB4EQgRHBFEEQgRL-"),
        ("Кафе", "&BBoEMAREBDU-"),
        ("Archiv/Wichtig ✓", "Archiv/Wichtig &JxM-"),
    ] {
        assert_eq!(utf7::encode(plain), wire.as_bytes());
        assert_eq!(utf7::decode(wire.as_bytes()).unwrap(), plain);
    }
}
