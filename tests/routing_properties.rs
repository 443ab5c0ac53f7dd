//! Routing invariants checked over every kind and a vocabulary of tag sets

use lab_router::config::{PolicyConfig, LAB_RELAY, PUBLIC_RELAYS};
use lab_router::privacy::{Classifier, PrivacyClass, SharingPolicy};
use lab_router::{Kind, RelayResolver, Tags};

/// Tag rows covering every rule plus harmless and malformed rows
fn tag_vocabulary() -> Vec<Vec<&'static str>> {
    vec![
        vec![],
        vec!["h"],
        vec!["h", "morning-risers"],
        vec!["t", "journal"],
        vec!["t", "lab-note"],
        vec!["t", "big-dreams"],
        vec!["t", "daily-practice"],
        vec!["t", "experiment-progress"],
        vec!["t", "nostr"],
        vec!["d", "lab-progress-42"],
        vec!["d", "journal-2024"],
        vec!["d", "progress-week-1"],
        vec!["d", "profile"],
        vec!["p", "abcdef"],
        vec!["e", "123", "wss://relay.example"],
        vec!["t"],
        vec!["d"],
    ]
}

/// Empty set, every single row, and every pair of rows
fn tag_sets() -> Vec<Tags> {
    let vocab = tag_vocabulary();
    let mut sets = vec![Tags::new()];
    for a in &vocab {
        sets.push(Tags::from_rows([a.clone()]));
        for b in &vocab {
            sets.push(Tags::from_rows([a.clone(), b.clone()]));
        }
    }
    sets
}

fn is_private_indicator(row: &[String]) -> bool {
    let defaults = PolicyConfig::default();
    match row {
        [name, value, ..] if name == "t" => defaults.private_topics.contains(value),
        [name, value, ..] if name == "d" => defaults
            .private_identifier_prefixes
            .iter()
            .any(|p| value.starts_with(p.as_str())),
        _ => false,
    }
}

fn interesting_kinds() -> impl Iterator<Item = Kind> {
    (0u16..=1100)
        .chain([10002, 20000, 30023, 30078, 39000, 39001, u16::MAX])
        .map(Kind)
}

#[test]
fn never_shareable_kinds_never_go_public() {
    let resolver = RelayResolver::default();
    let policy = resolver.policy();
    for kind in PolicyConfig::default().never_shareable_kinds {
        for tags in tag_sets() {
            assert!(!policy.can_publish_publicly(kind, &tags), "kind {} tags {:?}", kind, tags);
            assert_eq!(
                resolver.resolve_relays(kind, &tags, true).into_vec(),
                vec![LAB_RELAY.to_string()]
            );
        }
    }
}

#[test]
fn group_tag_blocks_every_kind() {
    let policy = SharingPolicy::default();
    let group_sets: Vec<Tags> = tag_sets()
        .into_iter()
        .filter(|tags| tags.as_rows().iter().any(|row| row.first().map(String::as_str) == Some("h")))
        .collect();
    assert!(!group_sets.is_empty());

    for kind in interesting_kinds() {
        for tags in &group_sets {
            assert!(!policy.can_publish_publicly(kind, tags), "kind {} tags {:?}", kind, tags);
        }
    }
}

#[test]
fn shareable_kinds_without_indicators_are_shareable() {
    let policy = SharingPolicy::default();
    for kind in PolicyConfig::default().shareable_kinds {
        for tags in tag_sets() {
            let blocked = tags
                .as_rows()
                .iter()
                .any(|row| row.first().map(String::as_str) == Some("h") || is_private_indicator(row));
            assert_eq!(
                policy.can_publish_publicly(kind, &tags),
                !blocked,
                "kind {} tags {:?}",
                kind,
                tags
            );
        }
    }
}

#[test]
fn private_relay_always_first_and_unique() {
    let resolver = RelayResolver::default();
    for kind in interesting_kinds() {
        for tags in tag_sets().iter().take(40) {
            for wants_public in [true, false] {
                let set = resolver.resolve_relays(kind, tags, wants_public);
                assert_eq!(set.as_slice()[0], LAB_RELAY);
                assert_eq!(set.iter().filter(|r| *r == LAB_RELAY).count(), 1);

                let public = set.public_relays();
                assert!(public.is_empty() || public.len() == PUBLIC_RELAYS.len());
                assert_eq!(set.includes_public(), !public.is_empty());
            }
        }
    }
}

#[test]
fn no_public_relays_without_intent() {
    let resolver = RelayResolver::default();
    for kind in interesting_kinds() {
        for tags in tag_sets().iter().take(40) {
            assert_eq!(
                resolver.resolve_relays(kind, tags, false).into_vec(),
                vec![LAB_RELAY.to_string()]
            );
        }
    }
}

#[test]
fn decisions_are_repeatable() {
    let classifier = Classifier::default();
    let resolver = RelayResolver::default();
    for kind in [Kind(1), Kind(11), Kind(30078), Kind(4242)] {
        for tags in tag_sets() {
            assert_eq!(classifier.classify(kind, &tags), classifier.classify(kind, &tags));
            assert_eq!(
                resolver.policy().can_publish_publicly(kind, &tags),
                resolver.policy().can_publish_publicly(kind, &tags)
            );
            assert_eq!(
                resolver.resolve_relays(kind, &tags, true),
                resolver.resolve_relays(kind, &tags, true)
            );
        }
    }
}

#[test]
fn unknown_kinds_without_tags_are_unclassified() {
    let classifier = Classifier::default();
    let defaults = PolicyConfig::default();
    for kind in interesting_kinds() {
        let listed = defaults.never_shareable_kinds.contains(&kind)
            || defaults.private_kinds.contains(&kind)
            || defaults.shareable_kinds.contains(&kind);
        if !listed {
            assert_eq!(classifier.classify(kind, &Tags::new()), PrivacyClass::Unclassified);
        }
    }
}

#[test]
fn documented_scenarios() {
    let classifier = Classifier::default();
    let resolver = RelayResolver::default();
    let policy = resolver.policy();
    let lab_only = vec![LAB_RELAY.to_string()];

    // Group message kind
    assert_eq!(classifier.classify(Kind(11), &Tags::new()), PrivacyClass::NeverShareable);
    assert_eq!(resolver.resolve_relays(Kind(11), &Tags::new(), true).into_vec(), lab_only);

    // Plain note tagged to a group
    let group = Tags::from_rows([["h", "morning-risers"]]);
    assert_eq!(classifier.classify(Kind(1), &group), PrivacyClass::NeverShareable);
    assert_eq!(resolver.resolve_relays(Kind(1), &group, true).into_vec(), lab_only);

    // Journal note
    let journal = Tags::from_rows([["t", "journal"]]);
    assert_eq!(classifier.classify(Kind(1), &journal), PrivacyClass::PrivateByDefault);
    assert!(!policy.should_publish_publicly(Kind(1), &journal, true));

    // Plain note
    assert_eq!(classifier.classify(Kind(1), &Tags::new()), PrivacyClass::Shareable);
    let expected: Vec<String> = std::iter::once(LAB_RELAY)
        .chain(PUBLIC_RELAYS)
        .map(String::from)
        .collect();
    assert_eq!(resolver.resolve_relays(Kind(1), &Tags::new(), true).into_vec(), expected);

    // Not requested
    assert_eq!(resolver.resolve_relays(Kind(1), &Tags::new(), false).into_vec(), lab_only);

    // App data with a lab identifier
    let progress = Tags::from_rows([["d", "lab-progress-42"]]);
    assert_eq!(classifier.classify(Kind(30078), &progress), PrivacyClass::PrivateByDefault);
    assert!(!policy.should_publish_publicly(Kind(30078), &progress, true));
}
