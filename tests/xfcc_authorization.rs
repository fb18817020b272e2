use xfcc_authz::authz::{compile_rules, Action, Condition, Model, Principal, Rule};
use xfcc_authz::constants::XFCC_ANNOTATION;
use xfcc_authz::matcher::HeaderMatchSpecifier;
use xfcc_authz::serviceaccount::{Annotations, Event, ServiceAccount, ServiceAccountCache};
use xfcc_authz::Error;

fn xfcc_annotations(value: &str) -> Annotations {
    Annotations::from([(XFCC_ANNOTATION.to_string(), value.to_string())])
}

fn conditions_rule() -> Rule {
    serde_json::from_str(
        r#"{
            "when": [
                {
                    "key": "request.headers[\"X-Forwarded-Client-Cert\"]",
                    "values": ["*URI=com.example.nfType:smf*"],
                    "notValues": ["*DNS=sleep.example.com*"]
                },
                {
                    "key": "request.headers[\"X-FORWARDED-CLIENT-CERT\"]",
                    "values": ["*DNS=httpbin.example.com*"]
                },
                {
                    "key": "request.headers[\"x-forwarded-client-cert\"]",
                    "notValues": ["*URI=com.example.productpage*"]
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn xfcc_conditions_generate_contains_matchers() {
    let policy = Model::new(&conditions_rule(), &xfcc_annotations("true"))
        .unwrap()
        .generate(false)
        .unwrap();
    let json = serde_json::to_string(&policy).unwrap();

    for want in [
        "URI=com.example.nfType:smf",
        "DNS=sleep.example.com",
        "DNS=httpbin.example.com",
        "URI=com.example.productpage",
        "\"contains\"",
    ] {
        assert!(json.contains(want), "{json} does not contain {want}");
    }
    for not_want in [
        "URI=com.example.nfType:smf*",
        "DNS=sleep.example.com*",
        "DNS=httpbin.example.com*",
        "URI=com.example.productpage*",
        "\"suffix\"",
    ] {
        assert!(!json.contains(not_want), "{json} contains {not_want}");
    }
}

#[test]
fn xfcc_conditions_are_exact_without_annotation() {
    for annotations in [Annotations::new(), xfcc_annotations("false"), xfcc_annotations("nope")] {
        let policy = Model::new(&conditions_rule(), &annotations)
            .unwrap()
            .generate(false)
            .unwrap();
        let json = serde_json::to_string(&policy).unwrap();

        assert!(json.contains("\"exact\":\"*URI=com.example.nfType:smf*\""), "{json}");
        assert!(!json.contains("\"contains\""), "{json}");
    }
}

#[test]
fn end_to_end_through_service_account_cache() {
    let cache = ServiceAccountCache::new();
    let sa = ServiceAccount::new("smf", "core", xfcc_annotations("true"));
    let rule = Rule {
        when: vec![Condition {
            key: "request.headers[x-forwarded-client-cert]".to_string(),
            values: vec!["*URI=com.example.nfType:smf*".to_string()],
            not_values: vec![],
        }],
    };

    // Not yet delivered by the watch: exact matching.
    let before = Model::for_service_account(&rule, &cache, "smf", "core")
        .unwrap()
        .generate(false)
        .unwrap();
    let Principal::AndIds(ids) = &before.principals[0] else {
        panic!("unexpected principal {:?}", before.principals[0]);
    };
    assert_eq!(
        ids[0].as_header().unwrap().specifier(),
        &HeaderMatchSpecifier::Exact("*URI=com.example.nfType:smf*".into())
    );

    cache.on_event(None, &sa, Event::Add);

    let after = Model::for_service_account(&rule, &cache, "smf", "core")
        .unwrap()
        .generate(false)
        .unwrap();
    let Principal::AndIds(ids) = &after.principals[0] else {
        panic!("unexpected principal {:?}", after.principals[0]);
    };
    let header = ids[0].as_header().unwrap();
    assert_eq!(header.name(), "x-forwarded-client-cert");
    assert_eq!(
        header.specifier(),
        &HeaderMatchSpecifier::Contains("URI=com.example.nfType:smf".into())
    );

    cache.on_event(None, &sa, Event::Delete);
    assert!(cache.get_annotations("smf", "core").is_none());
}

#[test]
fn tcp_rules_are_dropped_individually() {
    let rules = vec![conditions_rule(), Rule::default()];

    let rbac = compile_rules(
        "ns[core]-policy[xfcc]",
        Action::Allow,
        &rules,
        &xfcc_annotations("true"),
        true,
    );

    assert_eq!(rbac.policies.len(), 1);
    assert!(rbac.policies.contains_key("ns[core]-policy[xfcc]-rule[1]"));

    let err = Model::new(&conditions_rule(), &xfcc_annotations("true"))
        .unwrap()
        .generate(true)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedProtocol { .. }));
}
