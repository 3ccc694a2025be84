use std::collections::HashMap;

use dg_voice_rs::protocol::listen::ListenOptions;
use dg_voice_rs::protocol::manage::UsageRequestsOptions;
use dg_voice_rs::protocol::read::ReadOptions;
use dg_voice_rs::protocol::speak::SpeakOptions;
use dg_voice_rs::transport::query;

fn as_map(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    pairs.into_iter().collect()
}

#[test]
fn test_only_set_fields_become_pairs() {
    let options = ListenOptions {
        model: Some("nova-2".to_string()),
        punctuate: Some(true),
        ..ListenOptions::default()
    };

    let pairs = query::pairs(&options).expect("Encode options");
    assert_eq!(pairs.len(), 2);
    let map = as_map(pairs);
    assert_eq!(map.get("model").map(String::as_str), Some("nova-2"));
    assert_eq!(map.get("punctuate").map(String::as_str), Some("true"));
}

#[test]
fn test_lists_join_with_commas_and_empty_lists_vanish() {
    let options = ListenOptions {
        redact: vec!["pci".to_string(), "ssn".to_string()],
        keywords: vec!["deepgram:2".to_string()],
        ..ListenOptions::default()
    };

    let map = as_map(query::pairs(&options).expect("Encode options"));
    assert_eq!(map.get("redact").map(String::as_str), Some("pci,ssn"));
    assert_eq!(map.get("keywords").map(String::as_str), Some("deepgram:2"));
    // The other list fields were empty and never serialized.
    assert!(!map.contains_key("search"));
    assert!(!map.contains_key("tag"));
}

#[test]
fn test_numbers_render_as_decimal_strings() {
    let options = ListenOptions {
        encoding: Some("linear16".to_string()),
        channels: Some(2),
        sample_rate: Some(16_000),
        endpointing: Some(300),
        ..ListenOptions::default()
    };

    let map = as_map(query::pairs(&options).expect("Encode options"));
    assert_eq!(map.get("channels").map(String::as_str), Some("2"));
    assert_eq!(map.get("sample_rate").map(String::as_str), Some("16000"));
    assert_eq!(map.get("endpointing").map(String::as_str), Some("300"));
}

#[test]
fn test_speak_options_flatten_like_listen_options() {
    let options = SpeakOptions {
        model: Some("aura-2-thalia-en".to_string()),
        encoding: Some("mp3".to_string()),
        bit_rate: Some(48_000),
        ..SpeakOptions::default()
    };

    let pairs = query::pairs(&options).expect("Encode options");
    assert_eq!(pairs.len(), 3);
    let map = as_map(pairs);
    assert_eq!(map.get("model").map(String::as_str), Some("aura-2-thalia-en"));
    assert_eq!(map.get("bit_rate").map(String::as_str), Some("48000"));
}

#[test]
fn test_read_and_usage_options_flatten() {
    let read = ReadOptions {
        language: Some("en".to_string()),
        sentiment: Some(true),
        custom_topic: vec!["billing".to_string(), "cancellation".to_string()],
        ..ReadOptions::default()
    };
    let map = as_map(query::pairs(&read).expect("Encode options"));
    assert_eq!(
        map.get("custom_topic").map(String::as_str),
        Some("billing,cancellation")
    );
    assert_eq!(map.get("sentiment").map(String::as_str), Some("true"));

    let usage = UsageRequestsOptions {
        start: Some("2026-01-01".to_string()),
        end: Some("2026-02-01".to_string()),
        limit: Some(50),
        status: None,
    };
    let pairs = query::pairs(&usage).expect("Encode options");
    assert_eq!(pairs.len(), 3);
    let map = as_map(pairs);
    assert_eq!(map.get("limit").map(String::as_str), Some("50"));
    assert!(!map.contains_key("status"));
}

#[test]
fn test_unsupported_value_shapes_are_dropped() {
    #[derive(serde::Serialize)]
    struct Odd {
        model: &'static str,
        extras: HashMap<String, u32>,
        missing: Option<String>,
    }

    let mut extras = HashMap::new();
    extras.insert("depth".to_string(), 3);
    let odd = Odd {
        model: "nova-2",
        extras,
        missing: None,
    };

    let pairs = query::pairs(&odd).expect("Encode options");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0], ("model".to_string(), "nova-2".to_string()));
}
