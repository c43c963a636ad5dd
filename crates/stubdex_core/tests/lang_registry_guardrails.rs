use std::collections::HashMap;

use stubdex_core::lang::{builtin_types, doc_tags, keywords, markers, punctuation};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }

        for &alias in info.aliases {
            assert_eq!(
                keywords::from_str(alias),
                Some(info.id),
                "keyword alias not resolvable: {}",
                alias
            );
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!("duplicate keyword alias spelling {:?}: {:?} and {:?}", alias, prev, info.id);
            }
        }
    }
}

#[test]
fn doc_tags_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, doc_tags::DocTagId> = HashMap::new();

    for info in doc_tags::DOC_TAGS {
        let item = &info.item;
        assert_eq!(
            doc_tags::from_str(item.canonical),
            Some(item.id),
            "doc tag canonical spelling not resolvable: {}",
            item.canonical
        );
        assert_eq!(doc_tags::as_str(item.id), item.canonical);
        assert!(!item.description.is_empty(), "doc tag {:?} is missing a description", item.id);

        if let Some(prev) = seen.insert(item.canonical, item.id) {
            panic!("duplicate doc tag spelling {:?}: {:?} and {:?}", item.canonical, prev, item.id);
        }
        for &alias in item.aliases {
            assert_eq!(doc_tags::from_str(alias), Some(item.id), "doc tag alias not resolvable: {}", alias);
            if let Some(prev) = seen.insert(alias, item.id) {
                panic!("duplicate doc tag alias spelling {:?}: {:?} and {:?}", alias, prev, item.id);
            }
        }
    }
}

#[test]
fn builtin_types_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, builtin_types::BuiltinTypeId> = HashMap::new();

    for info in builtin_types::BUILTIN_TYPES {
        assert_eq!(builtin_types::from_str(info.canonical), Some(info.id));
        assert_eq!(builtin_types::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate builtin type spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
        for &alias in info.aliases {
            assert_eq!(builtin_types::from_str(alias), Some(info.id), "builtin alias not resolvable: {}", alias);
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!("duplicate builtin type alias {:?}: {:?} and {:?}", alias, prev, info.id);
            }
        }
    }
}

#[test]
fn punctuation_is_single_char_and_resolvable() {
    for info in punctuation::PUNCTUATION {
        assert_eq!(info.canonical.chars().count(), 1, "punctuation must be one char: {:?}", info.id);
        let c = info.canonical.chars().next().unwrap();
        assert_eq!(punctuation::from_char(c), Some(info.id));
        assert_eq!(punctuation::as_str(info.id), info.canonical);
    }
}

#[test]
fn markers_do_not_collide_with_keywords() {
    for info in markers::MARKERS {
        assert_eq!(markers::from_str(info.canonical), Some(info.id));
        assert!(
            keywords::from_str(info.canonical).is_none(),
            "marker {:?} must stay an identifier, not a keyword",
            info.canonical
        );
    }
}
