//! Extra SAN entries requested through ServiceAccount annotations.

use crate::constants::CUSTOM_FIELDS_ANNOTATION;
use crate::error::{Error, Result};
use crate::serviceaccount::Annotations;
use serde::Deserialize;

const URI_PREFIX: &str = "uri://";

/// Subject alternative names requested for a workload certificate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct San {
    /// DNS names.
    #[serde(rename = "DNS", default)]
    pub dns: Vec<String>,
    /// URIs, without scheme normalization.
    #[serde(rename = "URI", default)]
    pub uri: Vec<String>,
}

/// Body of the `certificate.aspenmesh.io/customFields` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CertificateCustomFields {
    /// Requested SAN entries.
    #[serde(rename = "SAN", default)]
    pub san: Option<San>,
}

/// Custom certificate fields of one ServiceAccount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFields {
    fields: CertificateCustomFields,
    namespace: String,
    service_account: String,
}

impl CustomFields {
    /// Parses the custom fields JSON of `service_account` in `namespace`.
    ///
    /// An empty `custom_fields` string means no custom fields.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingServiceAccount`] if `service_account` is empty.
    /// - [`Error::MissingNamespace`] if `namespace` is empty.
    /// - [`Error::InvalidCustomFields`] if `custom_fields` is not valid JSON.
    pub fn new(service_account: &str, namespace: &str, custom_fields: &str) -> Result<Self> {
        if service_account.is_empty() {
            return Err(Error::MissingServiceAccount);
        }
        if namespace.is_empty() {
            return Err(Error::MissingNamespace);
        }

        let fields = if custom_fields.is_empty() {
            CertificateCustomFields::default()
        } else {
            serde_json::from_str(custom_fields)
                .map_err(|e| Error::InvalidCustomFields(e.to_string()))?
        };

        Ok(Self {
            fields,
            namespace: namespace.to_string(),
            service_account: service_account.to_string(),
        })
    }

    /// Reads the custom fields from ServiceAccount `annotations`.
    ///
    /// # Errors
    ///
    /// Same as [`CustomFields::new`].
    pub fn from_annotations(service_account: &str, namespace: &str, annotations: &Annotations) -> Result<Self> {
        let custom_fields = annotations
            .get(CUSTOM_FIELDS_ANNOTATION)
            .map_or("", String::as_str);
        Self::new(service_account, namespace, custom_fields)
    }

    /// DNS SANs, sorted.
    ///
    /// Falls back to `<service account>.<namespace>.svc.cluster.local` when no
    /// DNS name is configured.
    pub fn san_dns_names(&self) -> Vec<String> {
        let mut fqdns: Vec<String> = self
            .fields
            .san
            .as_ref()
            .map(|san| san.dns.clone())
            .unwrap_or_default();

        if fqdns.is_empty() {
            fqdns.push(format!(
                "{}.{}.svc.cluster.local",
                self.service_account, self.namespace
            ));
        }

        fqdns.sort();
        fqdns
    }

    /// URI SANs, each prefixed with `uri://`, sorted.
    pub fn san_uri_names(&self) -> Vec<String> {
        let mut uris: Vec<String> = self
            .fields
            .san
            .iter()
            .flat_map(|san| san.uri.iter())
            .map(|uri| format!("{URI_PREFIX}{uri}"))
            .collect();

        uris.sort();
        uris
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_identity() {
        assert_eq!(
            CustomFields::new("", "default", "").unwrap_err(),
            Error::MissingServiceAccount
        );
        assert_eq!(
            CustomFields::new("sleep", "", "").unwrap_err(),
            Error::MissingNamespace
        );
    }

    #[test]
    fn new_rejects_invalid_json() {
        assert!(matches!(
            CustomFields::new("sleep", "default", "aspenmesh stuff"),
            Err(Error::InvalidCustomFields(_))
        ));
    }

    #[test]
    fn new_accepts_valid_json() {
        assert!(CustomFields::new("sleep", "default", "").is_ok());
        assert!(CustomFields::new("sleep", "default", r#"{ "SAN": { "DNS": [ "foo.com" ] } }"#).is_ok());
        assert!(CustomFields::new(
            "sleep",
            "default",
            r#"{ "SAN": { "DNS": [ "foo.com" ], "URI": [ "1eb1f8fa-5607-4783-9a73-3e7630140833" ] } }"#
        )
        .is_ok());
    }

    macro_rules! san_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (sa, ns, custom_fields, dns, uri): (&str, &str, &str, &[&str], &[&str]) = $value;

                    let cf = CustomFields::new(sa, ns, custom_fields).unwrap();

                    assert_eq!(cf.san_dns_names(), dns);
                    assert_eq!(cf.san_uri_names(), uri);
                }
            )*
        }
    }

    san_tests! {
        san_not_set: ("httpbin", "httpbin-ns", "", &["httpbin.httpbin-ns.svc.cluster.local"], &[]),
        san_unknown_fields: ("sleep", "sleep-ns", r#"{ "foo": "bar" }"#, &["sleep.sleep-ns.svc.cluster.local"], &[]),
        san_without_dns: ("sleep", "sleep-ns", r#"{ "SAN": { "foo": [ "bar" ] } }"#, &["sleep.sleep-ns.svc.cluster.local"], &[]),
        san_single_dns: ("sleep", "default", r#"{ "SAN": { "DNS": [ "foo.com" ] } }"#, &["foo.com"], &[]),
        san_multiple_dns_sorted: (
            "sleep",
            "default",
            r#"{ "SAN": { "DNS": [ "foo.com", "my.aspenmesh.io", "zoo.gz" ] } }"#,
            &["foo.com", "my.aspenmesh.io", "zoo.gz"],
            &[],
        ),
        san_single_uri: (
            "sleep",
            "default",
            r#"{ "SAN": { "URI": [ "a94907d5-42b7-477e-96f6-81036e0bf989" ] } }"#,
            &["sleep.default.svc.cluster.local"],
            &["uri://a94907d5-42b7-477e-96f6-81036e0bf989"],
        ),
        san_empty_object: ("sleep", "default", r#"{ "SAN": { } }"#, &["sleep.default.svc.cluster.local"], &[]),
        san_uri_with_scheme_kept: (
            "sleep",
            "default",
            r#"{ "SAN": { "URI": [ "uuid://a94907d5-42b7-477e-96f6-81036e0bf989" ] } }"#,
            &["sleep.default.svc.cluster.local"],
            &["uri://uuid://a94907d5-42b7-477e-96f6-81036e0bf989"],
        ),
        san_uri_with_spaces_kept: (
            "sleep",
            "default",
            r#"{ "SAN": { "URI": [ "uuid:  a94907d5-42b7-477e-96f6-81036e0bf989" ] } }"#,
            &["sleep.default.svc.cluster.local"],
            &["uri://uuid:  a94907d5-42b7-477e-96f6-81036e0bf989"],
        ),
        san_multiple_uris_sorted: (
            "sleep",
            "default",
            r#"{ "SAN": { "URI": [ "uuid://a94907d5-42b7-477e-96f6-81036e0bf989", "uuid: 6017cc85-73c7-4fbc-9b6f-bede62d06300" ] } }"#,
            &["sleep.default.svc.cluster.local"],
            &["uri://uuid: 6017cc85-73c7-4fbc-9b6f-bede62d06300", "uri://uuid://a94907d5-42b7-477e-96f6-81036e0bf989"],
        ),
    }

    #[test]
    fn from_annotations() {
        let annotations = Annotations::from([(
            CUSTOM_FIELDS_ANNOTATION.to_string(),
            r#"{ "SAN": { "DNS": [ "foo.com" ] , "URI": [ "http://test.example.com/get" ] } }"#.to_string(),
        )]);

        let cf = CustomFields::from_annotations("sa-1", "default", &annotations).unwrap();
        assert_eq!(cf.san_dns_names(), ["foo.com"]);
        assert_eq!(cf.san_uri_names(), ["uri://http://test.example.com/get"]);

        let cf = CustomFields::from_annotations("sa-1", "default", &Annotations::new()).unwrap();
        assert_eq!(cf.san_dns_names(), ["sa-1.default.svc.cluster.local"]);
    }
}
