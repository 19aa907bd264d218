// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Namespace Mapper
//!
//! Assigns a short code to every namespace URI. Codes disambiguate
//! identically named types from different namespaces in generated
//! identifiers, so the mapping is a bijection and is identical across
//! runs for the same input.

use crate::generator::naming::is_cpp_keyword;
use crate::schema::qualified_name::SOAP11_ENCODING;
use crate::schema::qualified_name::SOAP11_ENVELOPE;
use crate::schema::qualified_name::SOAP12_ENCODING;
use crate::schema::qualified_name::SOAP12_ENVELOPE;
use crate::schema::qualified_name::WSDL;
use crate::schema::qualified_name::WSDL_SOAP11;
use crate::schema::qualified_name::WSDL_SOAP12;
use crate::schema::qualified_name::XML;
use crate::schema::qualified_name::XSD;
use crate::schema::qualified_name::XSI;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::debug;
use tracing::warn;

/// Immutable mapping from namespace URI to code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    codes: BTreeMap<String, String>,
}

impl NamespaceMap {
    /// Assign codes to `namespaces`. User mappings take precedence;
    /// remaining namespaces get derived codes in sorted URI order.
    /// Duplicate codes are suffixed with a number.
    #[must_use]
    pub fn build<'a>(
        namespaces: impl IntoIterator<Item = &'a str>,
        user: &BTreeMap<String, String>,
    ) -> Self {
        let namespaces: BTreeSet<&str> = namespaces.into_iter().collect();
        let mut taken = BTreeSet::new();
        let mut codes = BTreeMap::new();
        let (mapped, derived): (Vec<&str>, Vec<&str>) =
            namespaces.iter().copied().partition(|ns| user.contains_key(*ns));
        let candidates = mapped
            .into_iter()
            .filter_map(|ns| user.get(ns).map(|code| (ns, sanitize_code(code))))
            .chain(derived.into_iter().map(|ns| (ns, derive_code(ns))));
        for (ns, candidate) in candidates {
            let code = unique_code(&taken, &candidate);
            if user.contains_key(ns) && code != candidate {
                warn!(namespace = ns, requested = %candidate, assigned = %code, "namespace code is already taken");
            }
            debug!(namespace = ns, %code, "namespace code");
            taken.insert(code.clone());
            codes.insert(ns.to_string(), code);
        }
        Self { codes }
    }

    /// Code of the namespace.
    #[must_use]
    pub fn code_for(&self, namespace: &str) -> Option<&str> {
        self.codes.get(namespace).map(String::as_str)
    }

    /// All pairs in URI order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(ns, code)| (ns.as_str(), code.as_str()))
    }

    /// Number of mapped namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// No namespace is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn unique_code(taken: &BTreeSet<String>, candidate: &str) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{candidate}{n}"))
        .find(|code| !taken.contains(code))
        .unwrap_or_else(|| candidate.to_string())
}

/// Derive code from namespace URI.
#[must_use]
pub fn derive_code(uri: &str) -> String {
    let fixed = match uri {
        "" => Some("ns"),
        XSD => Some("xsd"),
        XSI => Some("xsi"),
        SOAP11_ENCODING | SOAP12_ENCODING => Some("soapenc"),
        WSDL_SOAP11 | SOAP11_ENVELOPE => Some("soap"),
        WSDL_SOAP12 | SOAP12_ENVELOPE => Some("soap12"),
        WSDL => Some("wsdl"),
        XML => Some("xml"),
        _ => None,
    };
    if let Some(code) = fixed {
        return code.to_string();
    }
    let segment = if let Some(rest) = uri.strip_prefix("urn:") {
        rest.rsplit(':').find(|s| s.chars().any(|c| c.is_ascii_alphabetic()))
    } else {
        let path = uri.split_once("://").map_or(uri, |(_, rest)| rest);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/')
            .find(|s| s.chars().any(|c| c.is_ascii_alphabetic()))
    };
    let segment = segment.map_or("", |s| match s.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && ext.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => s,
    });
    sanitize_code(&segment.to_ascii_lowercase())
}

/// Make `code` usable inside C++ identifiers.
#[must_use]
pub fn sanitize_code(code: &str) -> String {
    let mut code: String = code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if code.is_empty() {
        return "ns".into();
    }
    if code.starts_with(|c: char| c.is_ascii_digit()) {
        code.insert_str(0, "ns");
    }
    if is_cpp_keyword(&code) {
        code.push('_');
    }
    code
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_codes() {
        assert_eq!(derive_code(XSD), "xsd");
        assert_eq!(derive_code(SOAP11_ENCODING), "soapenc");
        assert_eq!(derive_code(""), "ns");
        assert_eq!(derive_code("urn:weather"), "weather");
        assert_eq!(derive_code("urn:example:billing:2010"), "billing");
        assert_eq!(derive_code("http://tempuri.org/"), "tempuri");
        assert_eq!(derive_code("http://example.com/Orders/2014/04"), "orders");
        assert_eq!(derive_code("http://example.com/types.xsd"), "types");
        assert_eq!(derive_code("http://example.com/my-api/v2?x=1"), "v2");
        assert_eq!(derive_code("http://example.com/class"), "class_");
        assert_eq!(derive_code("http://example.com/x.y/z.v1"), "z_v1");
    }

    #[test]
    fn codes_are_unique_and_deterministic() {
        let namespaces = [
            "http://b.example.com/status",
            "http://a.example.com/status",
            "urn:status",
            XSD,
        ];
        let map = NamespaceMap::build(namespaces, &BTreeMap::new());
        assert_eq!(map.code_for("http://a.example.com/status"), Some("status"));
        assert_eq!(map.code_for("http://b.example.com/status"), Some("status2"));
        assert_eq!(map.code_for("urn:status"), Some("status3"));
        assert_eq!(map.code_for(XSD), Some("xsd"));
        let codes: BTreeSet<_> = map.iter().map(|(_, code)| code).collect();
        assert_eq!(codes.len(), map.len());

        let reversed = NamespaceMap::build(namespaces.into_iter().rev(), &BTreeMap::new());
        assert_eq!(map, reversed);
    }

    #[test]
    fn user_codes_are_sanitized() {
        let user = BTreeMap::from([
            ("urn:a".to_string(), "my-ns".to_string()),
            ("urn:b".to_string(), "2024".to_string()),
            ("urn:c".to_string(), "namespace".to_string()),
            ("urn:d".to_string(), "Geo".to_string()),
        ]);
        let map = NamespaceMap::build(["urn:a", "urn:b", "urn:c", "urn:d"], &user);
        assert_eq!(map.code_for("urn:a"), Some("my_ns"));
        assert_eq!(map.code_for("urn:b"), Some("ns2024"));
        assert_eq!(map.code_for("urn:c"), Some("namespace_"));
        assert_eq!(map.code_for("urn:d"), Some("Geo"));
    }

    #[test]
    fn user_mapping_takes_precedence() {
        let user = BTreeMap::from([
            ("urn:b:status".to_string(), "status".to_string()),
            ("urn:unused".to_string(), "unused".to_string()),
        ]);
        let map = NamespaceMap::build(["urn:a:status", "urn:b:status"], &user);
        assert_eq!(map.code_for("urn:b:status"), Some("status"));
        assert_eq!(map.code_for("urn:a:status"), Some("status2"));
        assert_eq!(map.code_for("urn:unused"), None);
        assert_eq!(map.len(), 2);
    }
}
