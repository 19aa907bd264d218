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

//! Import Resolver.
//!
//! Computes the closure of documents reachable from the start locator
//! through `wsdl:import`, `xs:import`, `xs:include` and `xs:redefine`.
//! Each canonical locator is parsed once, so import cycles terminate.

/// Document store.
pub mod store;

use crate::schema;
use crate::schema::qualified_name::is_builtin_namespace;
use crate::schema::xsd::TypeDecl;
use crate::schema::ImportKind;
use crate::schema::SchemaDocument;
use crate::schema::SyntaxError;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use store::DocumentStore;
use tracing::debug;
use tracing::info;
use tracing::warn;
use wsdlc_core::locator::Error as LocatorError;
use wsdlc_core::Fetcher;
use wsdlc_core::Locator;

#[doc(inline)]
pub use store::FetchError;
#[doc(inline)]
pub use store::StoreConfig;

/// Document loading error.
#[derive(Debug)]
pub enum LoadError {
    /// Document cannot be obtained.
    Fetch(FetchError),
    /// Document cannot be parsed.
    Syntax(SyntaxError),
    /// Import location is not a valid URL reference.
    InvalidLocation {
        /// Importing document.
        document: Locator,
        /// Location as written.
        location: String,
        /// Parse error.
        err: LocatorError,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Syntax(err) => write!(f, "syntax error: {err}"),
            Self::InvalidLocation {
                document,
                location,
                err,
            } => write!(f, "{document}: invalid import location {location:?}: {err}"),
        }
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Syntax(err) => Some(err),
            Self::InvalidLocation { err, .. } => Some(err),
        }
    }
}

/// All documents of the compilation, in load order.
#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<SchemaDocument>,
}

impl DocumentSet {
    /// Create set from already parsed documents.
    #[must_use]
    pub const fn new(documents: Vec<SchemaDocument>) -> Self {
        Self { documents }
    }

    /// Documents in load order. The first one is the start document.
    #[must_use]
    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// Target namespaces declared by loaded documents and their schemas.
    #[must_use]
    pub fn namespaces(&self) -> BTreeSet<&str> {
        self.documents
            .iter()
            .flat_map(|doc| {
                std::iter::once(doc.target_namespace.as_str())
                    .chain(doc.schemas.iter().map(|s| s.target_namespace.as_str()))
            })
            .collect()
    }

    /// Names of all top-level types grouped by namespace.
    #[must_use]
    pub fn known_types(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut result: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for schema in self.documents.iter().flat_map(|doc| &doc.schemas) {
            let names = result.entry(schema.target_namespace.as_str()).or_default();
            names.extend(schema.types.iter().filter_map(TypeDecl::name));
        }
        result
    }

    /// Imports without location whose namespace is declared by no
    /// loaded document: `(importing document, namespace)`.
    #[must_use]
    pub fn unsatisfied_imports(&self) -> Vec<(&Locator, &str)> {
        let declared = self.namespaces();
        self.documents
            .iter()
            .flat_map(|doc| doc.all_imports().map(move |import| (&doc.locator, import)))
            .filter(|(_, import)| import.location.is_none())
            .filter_map(|(locator, import)| {
                let ns = import.namespace.as_deref()?;
                (!declared.contains(ns) && !is_builtin_namespace(ns)).then_some((locator, ns))
            })
            .collect()
    }
}

/// Load the closure of documents reachable from `start`.
///
/// # Errors
///
/// Returns error if any reachable document cannot be fetched or parsed.
pub async fn load<F: Fetcher>(
    start: &Locator,
    fetcher: &F,
    config: StoreConfig,
) -> Result<DocumentSet, LoadError> {
    let mut store = DocumentStore::new(fetcher, config);
    let mut visited = HashSet::from([start.clone()]);
    let mut queue: VecDeque<(Locator, Option<String>)> = VecDeque::from([(start.clone(), None)]);
    let mut documents = Vec::new();
    while let Some((locator, chameleon)) = queue.pop_front() {
        let bytes = store.resolve(&locator).await.map_err(LoadError::Fetch)?;
        let doc = schema::parse_with_namespace(&bytes, &locator, chameleon.as_deref())
            .map_err(LoadError::Syntax)?;
        for import in doc.all_imports() {
            let included = matches!(import.kind, ImportKind::Include | ImportKind::Redefine);
            if !included && import.namespace.as_deref().is_some_and(is_builtin_namespace) {
                debug!(namespace = ?import.namespace, "skipping builtin namespace import");
                continue;
            }
            let Some(location) = &import.location else {
                continue;
            };
            let target = locator
                .join(location)
                .map_err(|err| LoadError::InvalidLocation {
                    document: locator.clone(),
                    location: location.clone(),
                    err,
                })?;
            if visited.insert(target.clone()) {
                let chameleon = included
                    .then(|| import.importer_namespace.clone())
                    .filter(|ns| !ns.is_empty());
                queue.push_back((target, chameleon));
            }
        }
        documents.push(doc);
    }
    let set = DocumentSet::new(documents);
    for (locator, namespace) in set.unsatisfied_imports() {
        warn!(%locator, namespace, "import without location is not satisfied by any loaded document");
    }
    info!(documents = set.documents().len(), fetched = store.len(), "documents loaded");
    Ok(set)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Error as IoError;
    use store::FetchErrorReason;
    use wsdlc_fetch_mock::Expect;
    use wsdlc_fetch_mock::Fetcher as MockFetcher;

    const ROOT: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:root">
  <types>
    <xs:schema targetNamespace="urn:root">
      <xs:import namespace="urn:a" schemaLocation="schemas/a.xsd"/>
      <xs:import namespace="http://schemas.xmlsoap.org/soap/encoding/"
                 schemaLocation="http://schemas.xmlsoap.org/soap/encoding/"/>
    </xs:schema>
  </types>
</definitions>"#;

    const A: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
  <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
  <xs:include schemaLocation="common.xsd#ignored"/>
  <xs:complexType name="A"/>
</xs:schema>"#;

    const B: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:b">
  <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
  <xs:import namespace="urn:missing"/>
  <xs:simpleType name="B"><xs:restriction base="xs:string"/></xs:simpleType>
</xs:schema>"#;

    const COMMON: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType name="Common"/>
</xs:schema>"#;

    fn fetcher() -> MockFetcher<IoError> {
        let fetcher = MockFetcher::new();
        fetcher.expect(Expect::fetch("http://example.com/root.wsdl", ROOT));
        fetcher.expect(Expect::fetch("http://example.com/schemas/a.xsd", A));
        fetcher.expect(Expect::fetch("http://example.com/schemas/b.xsd", B));
        fetcher.expect(Expect::fetch("http://example.com/schemas/common.xsd", COMMON));
        fetcher
    }

    #[tokio::test]
    async fn closure_terminates_on_cycles() {
        let fetcher = fetcher();
        let start = Locator::parse("http://example.com/root.wsdl").unwrap();
        let set = load(&start, &fetcher, StoreConfig::default()).await.unwrap();
        assert_eq!(set.documents().len(), 4);
        assert_eq!(fetcher.pending(), 0);
        assert_eq!(fetcher.history().len(), 4);

        let common = set
            .documents()
            .iter()
            .find(|doc| doc.locator.file_name() == "common.xsd")
            .unwrap();
        assert_eq!(common.target_namespace, "urn:a");

        let known = set.known_types();
        assert_eq!(
            known.get("urn:a").unwrap().iter().copied().collect::<Vec<_>>(),
            vec!["A", "Common"]
        );
        assert!(known.get("urn:b").unwrap().contains("B"));

        let unsatisfied = set.unsatisfied_imports();
        assert_eq!(unsatisfied.len(), 1);
        assert_eq!(unsatisfied[0].1, "urn:missing");
    }

    #[tokio::test]
    async fn fetch_failure_stops_loading() {
        let fetcher = MockFetcher::new();
        fetcher.expect(Expect::fetch("http://example.com/root.wsdl", ROOT));
        fetcher.expect(Expect::fail(
            "http://example.com/schemas/a.xsd",
            IoError::other("connection reset"),
        ));
        let start = Locator::parse("http://example.com/root.wsdl").unwrap();
        let err = load(&start, &fetcher, StoreConfig::default())
            .await
            .unwrap_err();
        let LoadError::Fetch(err) = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(err.locator.to_string(), "http://example.com/schemas/a.xsd");
        assert!(matches!(err.reason, FetchErrorReason::Remote(_)));
    }

    #[tokio::test]
    async fn syntax_error_names_document() {
        let fetcher = MockFetcher::<IoError>::new();
        fetcher.expect(Expect::fetch("http://example.com/root.wsdl", "<definitions"));
        let start = Locator::parse("http://example.com/root.wsdl").unwrap();
        let err = load(&start, &fetcher, StoreConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Syntax(_)));
        assert!(err.to_string().contains("http://example.com/root.wsdl"));
    }
}
