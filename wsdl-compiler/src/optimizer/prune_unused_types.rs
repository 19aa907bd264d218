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

//! Prune unused types optimization.
//!
//! Only types reachable from parts of operations that are going to be
//! generated are needed. Everything else declared by imported schemas
//! is dropped.

use super::Config;
use crate::compiler::Compiled;
use crate::compiler::TypeGraph;
use std::collections::BTreeMap;
use tracing::info;

pub fn prune_unused_types(input: Compiled, config: &Config) -> Compiled {
    if config.keep_unused_types {
        return input;
    }
    let roots = input.root_types();
    let reachable = input.graph.reachable(&roots);
    let total = input.graph.types.len();
    let types = input
        .graph
        .types
        .into_iter()
        .filter(|(id, _)| reachable.contains(id))
        .collect::<BTreeMap<_, _>>();
    info!(kept = types.len(), pruned = total - types.len(), "unused types pruned");
    Compiled {
        graph: TypeGraph {
            types,
            elements: input.graph.elements,
        },
        namespaces: input.namespaces,
        services: input.services,
        diagnostics: input.diagnostics,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler;
    use crate::compiler::TypeId;
    use crate::loader::DocumentSet;
    use crate::schema;
    use crate::schema::QualifiedName;
    use wsdlc_core::Locator;

    const WSDL: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:tns="urn:shop" targetNamespace="urn:shop">
  <types>
    <xs:schema targetNamespace="urn:shop" elementFormDefault="qualified">
      <xs:complexType name="Money"><xs:sequence>
        <xs:element name="amount" type="xs:decimal"/>
      </xs:sequence></xs:complexType>
      <xs:complexType name="Item"><xs:complexContent><xs:extension base="tns:Base">
        <xs:sequence><xs:element name="price" type="tns:Money"/></xs:sequence>
      </xs:extension></xs:complexContent></xs:complexType>
      <xs:complexType name="Base"><xs:sequence>
        <xs:element name="id" type="xs:string"/>
      </xs:sequence></xs:complexType>
      <xs:complexType name="Unused"><xs:sequence>
        <xs:element name="x" type="xs:string"/>
      </xs:sequence></xs:complexType>
      <xs:complexType name="Broken"><xs:sequence>
        <xs:element name="x" type="tns:Missing"/>
      </xs:sequence></xs:complexType>
    </xs:schema>
  </types>
  <message name="ItemIn"><part name="item" type="tns:Item"/></message>
  <message name="BrokenIn"><part name="b" type="tns:Broken"/></message>
  <portType name="Shop">
    <operation name="Add"><input message="tns:ItemIn"/></operation>
    <operation name="Fail"><input message="tns:BrokenIn"/></operation>
  </portType>
  <binding name="ShopSoap" type="tns:Shop">
    <soap:binding style="rpc" transport="http://schemas.xmlsoap.org/soap/http"/>
  </binding>
</definitions>"#;

    fn compiled() -> Compiled {
        let locator = Locator::parse("http://example.com/shop.wsdl").unwrap();
        let docs = DocumentSet::new(vec![schema::parse(WSDL.as_bytes(), &locator).unwrap()]);
        compiler::compile(&docs, &compiler::Config::default()).unwrap()
    }

    fn names(compiled: &Compiled) -> Vec<&str> {
        compiled.graph.types.keys().map(TypeId::local_name).collect()
    }

    #[test]
    fn unused_types_are_pruned() {
        let result = prune_unused_types(compiled(), &Config::default());
        assert_eq!(names(&result), vec!["Base", "Item", "Money"]);
        assert!(result
            .graph
            .get(&TypeId::Named(QualifiedName::new("urn:shop", "Item")))
            .is_some());
        // Diagnostics survive pruning.
        assert_eq!(result.diagnostics.invalid_operations.len(), 1);
    }

    #[test]
    fn keep_unused_types() {
        let result = prune_unused_types(
            compiled(),
            &Config {
                keep_unused_types: true,
            },
        );
        assert_eq!(names(&result), vec!["Base", "Broken", "Item", "Money", "Unused"]);
    }
}
