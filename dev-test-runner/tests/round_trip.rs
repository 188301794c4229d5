use dev_test_runner::{fixture, library, library_document_order, people, profile};
use json_typegen::path_de::from_str_with_path;
use serde_json::{json, Value};

#[test]
fn profile_round_trips_exactly() {
    let source = fixture("profile");
    let parsed = profile::parse(&source).expect("sample parses with its own types");
    assert_eq!(parsed.handle, "ada");
    assert_eq!(parsed.display_name, "Ada L.");
    assert_eq!(parsed.score, 97.25);
    assert!(!parsed.verified);
    assert_eq!(parsed.aliases, ["countess", "enchantress of numbers"]);
    assert_eq!(parsed.weights, [1.5, 2.25]);
    // integers stay integers, including ones past f64's exact range
    assert_eq!(parsed.id, 9_007_199_254_740_993_i64);
    assert_eq!(parsed.followers, 1200);
    assert_eq!(parsed.karma, -3);
    assert_eq!(parsed.badges, [3, 14, 15]);
    // keys named like the type and like the entry point are plain fields
    assert_eq!(parsed.profile, "public");
    assert_eq!(parsed.parse, "strict");

    let original: Value = serde_json::from_str(&source).unwrap();
    assert_eq!(serde_json::to_value(&parsed).unwrap(), original);
}

#[test]
fn library_hoists_shared_types() {
    let parsed = library::parse(&fixture("library")).expect("sample parses");
    assert_eq!(parsed.id, "https://example.org/library/1");
    assert!(parsed.open);
    assert_eq!(parsed.rating, 4.5);
    assert_eq!(parsed.hours, [9.5, 17.5]);
    assert_eq!(parsed.address.city, "Springfield");

    // director, archivist and featured.author share one `Person` declaration
    let people: [&library::Person; 3] = [&parsed.director, &parsed.archivist, &parsed.featured.author];
    let names: Vec<_> = people.iter().map(|p| p.given_name.as_str()).collect();
    assert_eq!(names, ["Jane", "Ada", "Frank"]);
    assert_eq!(parsed.archivist.family_name, "Byron");
    assert_eq!(parsed.featured.title, "Dune");
    assert_eq!(parsed.featured.pages, 412.0);
}

#[test]
fn original_keys_survive_serialization() {
    let parsed = library::parse(&fixture("library")).unwrap();
    let out = serde_json::to_value(&parsed).unwrap();
    assert_eq!(out["@id"], json!("https://example.org/library/1"));
    assert_eq!(out["director"]["givenName"], json!("Jane"));
    // dropped from the schema: null and empty-array fields
    assert!(out.get("notes").is_none());
    assert!(out.get("shelves").is_none());
}

#[test]
fn absent_fields_take_defaults() {
    let parsed = library::parse(r#"{"name": "Annex"}"#).unwrap();
    assert_eq!(parsed.name, "Annex");
    assert_eq!(parsed.id, "");
    assert_eq!(parsed.rating, 0.0);
    assert!(!parsed.open);
    assert!(parsed.tags.is_empty());
    assert_eq!(parsed.director, library::Person::default());
}

#[test]
fn mismatched_documents_parse_to_none() {
    assert!(library::parse(r#"{"name": 7}"#).is_none());
    assert!(library::parse("not json").is_none());
    assert!(profile::parse(r#"{"aliases": "one"}"#).is_none());

    let err = from_str_with_path::<library::Library>(r#"{"director": {"givenName": false}}"#).unwrap_err();
    assert_eq!(err.path, "director.givenName");
}

#[test]
fn document_order_spills_fields_seen_before_the_discriminator() {
    let parsed = library_document_order::parse(&fixture("library")).unwrap();
    // "givenName" precedes "@type" in `archivist`, so it was declared on the
    // root, where the sample has no such key
    assert_eq!(parsed.given_name, "");
    assert_eq!(parsed.archivist.family_name, "Byron");
    // `Person` still has the field because `director` declared it first
    assert_eq!(parsed.archivist.given_name, "Ada");
    assert_eq!(parsed.director.given_name, "Jane");
}

#[test]
fn integers_serialize_without_a_fraction() {
    let parsed = profile::parse(r#"{"followers": 3, "badges": [1]}"#).unwrap();
    let out = serde_json::to_string(&parsed).unwrap();
    assert!(out.contains(r#""followers":3,"#), "{out}");
    assert!(out.contains(r#""badges":[1]"#), "{out}");
    assert!(profile::parse(r#"{"followers": 3.5}"#).is_none());
}

#[test]
fn self_referencing_types_parse_their_own_sample() {
    let parsed = people::parse(&fixture("people")).expect("sample parses");
    assert_eq!(parsed.count, 3);
    assert_eq!(parsed.me.name, "Ada");
    assert_eq!(parsed.me.age, 36);

    let charles = parsed.me.friend.as_deref().expect("first friend");
    assert_eq!(charles.name, "Charles");
    let mary = charles.friend.as_deref().expect("second friend");
    assert_eq!(mary.name, "Mary");
    assert!(mary.friend.is_none());
    assert_eq!(people::Person::default().friend, None);

    // the chain ends where the sample ends; no `"friend": null` is added
    let out = serde_json::to_value(&parsed).unwrap();
    assert_eq!(out["me"]["friend"]["friend"], json!({"name": "Mary", "age": 0}));
}
