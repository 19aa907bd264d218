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

//! Binding Resolver
//!
//! Walks service → port → binding → port type → operations and binds
//! every message part to a type of the graph. Operations that cannot be
//! fully bound are kept with the list of problems and excluded from
//! generation.

use crate::compiler::diagnostics::ReferenceKind;
use crate::compiler::diagnostics::Unresolved;
use crate::compiler::BuiltinType;
use crate::compiler::Error;
use crate::compiler::TypeGraph;
use crate::compiler::TypeId;
use crate::compiler::TypeRef;
use crate::loader::DocumentSet;
use crate::schema::wsdl::Binding;
use crate::schema::wsdl::BindingProtocol;
use crate::schema::wsdl::BodyUse;
use crate::schema::wsdl::Message;
use crate::schema::wsdl::OperationPattern;
use crate::schema::wsdl::Part;
use crate::schema::wsdl::PartReference;
use crate::schema::wsdl::PortType;
use crate::schema::wsdl::Service;
use crate::schema::wsdl::SoapStyle;
use crate::schema::QualifiedName;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::debug;
use tracing::info;

/// Message part bound to a type.
#[derive(Debug, Clone, PartialEq)]
pub struct PartBinding {
    /// Part name.
    pub name: String,
    /// Element of document-style parts.
    pub element: Option<QualifiedName>,
    /// Type of the part.
    pub type_ref: TypeRef,
}

/// Message bound to types.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBinding {
    /// Message name.
    pub name: QualifiedName,
    /// Parts in document order.
    pub parts: Vec<PartBinding>,
}

/// Operation with its messages bound to types.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBinding {
    /// Operation name.
    pub name: String,
    /// Documentation.
    pub documentation: Option<String>,
    /// Exchange pattern.
    pub pattern: OperationPattern,
    /// `soapAction`.
    pub soap_action: Option<String>,
    /// Effective style.
    pub style: SoapStyle,
    /// Body use of the input.
    pub body_use: BodyUse,
    /// Input.
    pub input: Option<MessageBinding>,
    /// Output.
    pub output: Option<MessageBinding>,
    /// Faults.
    pub faults: Vec<MessageBinding>,
    /// Why the operation cannot be generated.
    pub problems: Vec<String>,
}

impl OperationBinding {
    /// Operation can be generated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Operation has no response.
    #[must_use]
    pub fn is_one_way(&self) -> bool {
        self.pattern == OperationPattern::OneWay
    }

    /// Types of all parts of all messages.
    pub fn part_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.input
            .iter()
            .chain(self.output.iter())
            .chain(self.faults.iter())
            .flat_map(|m| m.parts.iter().map(|p| &p.type_ref))
    }
}

/// Operations reachable through one service port.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBinding {
    /// Service name (binding or port type name without services).
    pub service: String,
    /// Port name.
    pub port: String,
    /// Namespace of the service definitions.
    pub namespace: String,
    /// Port type.
    pub port_type: QualifiedName,
    /// Binding.
    pub binding: Option<QualifiedName>,
    /// Protocol.
    pub protocol: Option<BindingProtocol>,
    /// Endpoint address.
    pub address: Option<String>,
    /// Documentation.
    pub documentation: Option<String>,
    /// Operations in port type order.
    pub operations: Vec<OperationBinding>,
}

impl ServiceBinding {
    /// Operations that can be generated.
    pub fn valid_operations(&self) -> impl Iterator<Item = &OperationBinding> {
        self.operations.iter().filter(|op| op.is_valid())
    }
}

/// WSDL declarations of all documents by qualified name.
#[derive(Default)]
struct WsdlIndex<'a> {
    messages: BTreeMap<QualifiedName, &'a Message>,
    port_types: BTreeMap<QualifiedName, &'a PortType>,
    bindings: BTreeMap<QualifiedName, &'a Binding>,
    services: Vec<(QualifiedName, &'a Service)>,
}

impl<'a> WsdlIndex<'a> {
    fn build(docs: &'a DocumentSet) -> Self {
        docs.documents()
            .iter()
            .fold(Self::default(), |mut index, doc| {
                for v in &doc.messages {
                    index.messages.entry(doc.qualify(&v.name)).or_insert(v);
                }
                for v in &doc.port_types {
                    index.port_types.entry(doc.qualify(&v.name)).or_insert(v);
                }
                for v in &doc.bindings {
                    index.bindings.entry(doc.qualify(&v.name)).or_insert(v);
                }
                for v in &doc.services {
                    let name = doc.qualify(&v.name);
                    if index.services.iter().all(|(n, _)| *n != name) {
                        index.services.push((name, v));
                    }
                }
                index
            })
    }
}

fn is_soap(protocol: &BindingProtocol) -> bool {
    matches!(protocol, BindingProtocol::Soap11 | BindingProtocol::Soap12)
}

struct Resolver<'a, 'u> {
    index: WsdlIndex<'a>,
    graph: &'a TypeGraph,
    tainted: BTreeSet<TypeId>,
    unresolved: &'u mut BTreeSet<Unresolved>,
}

/// Resolve operations of the selected services.
///
/// # Errors
///
/// Returns [`Error::ServiceNotFound`] if `service` does not name a
/// service of the documents.
pub fn resolve(
    docs: &DocumentSet,
    graph: &TypeGraph,
    service: Option<&str>,
    unresolved: &mut BTreeSet<Unresolved>,
) -> Result<Vec<ServiceBinding>, Error> {
    let mut resolver = Resolver {
        index: WsdlIndex::build(docs),
        graph,
        tainted: graph.tainted(),
        unresolved,
    };
    let result = resolver.resolve(service)?;
    info!(
        ports = result.len(),
        operations = result.iter().map(|s| s.operations.len()).sum::<usize>(),
        valid = result.iter().map(|s| s.valid_operations().count()).sum::<usize>(),
        "operations bound"
    );
    Ok(result)
}

impl<'a> Resolver<'a, '_> {
    fn resolve(&mut self, filter: Option<&str>) -> Result<Vec<ServiceBinding>, Error> {
        let services = match filter {
            Some(name) => {
                let service = self
                    .index
                    .services
                    .iter()
                    .find(|(qname, _)| qname.name == name)
                    .ok_or_else(|| Error::ServiceNotFound {
                        name: name.to_string(),
                        available: self
                            .index
                            .services
                            .iter()
                            .map(|(qname, _)| qname.name.clone())
                            .collect(),
                    })?;
                vec![service.clone()]
            }
            None => self.index.services.clone(),
        };
        if !services.is_empty() {
            let mut result = Vec::new();
            for (name, service) in services {
                let mut port_types = BTreeSet::new();
                for port in &service.ports {
                    let context = format!("port {} of service {}", port.name, service.name);
                    let Some(binding) = self.index.bindings.get(&port.binding).copied() else {
                        self.unresolved(&port.binding, ReferenceKind::Binding, &context);
                        continue;
                    };
                    if !is_soap(&binding.protocol) {
                        debug!(port = %port.name, binding = %port.binding, "skipping non-SOAP port");
                        continue;
                    }
                    if !port_types.insert(binding.port_type.clone()) {
                        debug!(port = %port.name, "port type is already bound by another port");
                        continue;
                    }
                    if let Some(bound) = self.bind(
                        &service.name,
                        &port.name,
                        &name.namespace,
                        Some((&port.binding, binding)),
                        &binding.port_type,
                        &context,
                    ) {
                        result.push(ServiceBinding {
                            address: port.address.clone(),
                            documentation: service.documentation.clone(),
                            ..bound
                        });
                    }
                }
            }
            return Ok(result);
        }
        let bindings = self
            .index
            .bindings
            .iter()
            .filter(|(_, b)| is_soap(&b.protocol))
            .map(|(name, b)| (name.clone(), *b))
            .collect::<Vec<_>>();
        if !bindings.is_empty() {
            return Ok(bindings
                .iter()
                .filter_map(|(name, binding)| {
                    let context = format!("binding {name}");
                    self.bind(
                        &name.name,
                        &name.name,
                        &name.namespace,
                        Some((name, binding)),
                        &binding.port_type,
                        &context,
                    )
                })
                .collect());
        }
        let port_types = self.index.port_types.keys().cloned().collect::<Vec<_>>();
        Ok(port_types
            .iter()
            .filter_map(|name| {
                self.bind(&name.name, &name.name, &name.namespace, None, name, "")
            })
            .collect())
    }

    fn unresolved(&mut self, name: &QualifiedName, kind: ReferenceKind, context: &str) {
        self.unresolved.insert(Unresolved {
            reference: name.clone(),
            kind,
            context: context.to_string(),
        });
    }

    fn bind(
        &mut self,
        service: &str,
        port: &str,
        namespace: &str,
        binding: Option<(&QualifiedName, &Binding)>,
        port_type_name: &QualifiedName,
        context: &str,
    ) -> Option<ServiceBinding> {
        let Some(port_type) = self.index.port_types.get(port_type_name).copied() else {
            self.unresolved(port_type_name, ReferenceKind::PortType, context);
            return None;
        };
        let operations = port_type
            .operations
            .iter()
            .map(|op| {
                let bound = binding.and_then(|(_, b)| b.operations.iter().find(|o| o.name == op.name));
                let mut problems = Vec::new();
                if matches!(
                    op.pattern,
                    OperationPattern::SolicitResponse | OperationPattern::Notification
                ) {
                    problems.push(format!("unsupported operation pattern {:?}", op.pattern));
                }
                let context = format!("operation {}", op.name);
                let input = op
                    .input
                    .as_ref()
                    .and_then(|m| self.bind_message(&m.message, &context, &mut problems));
                let output = op
                    .output
                    .as_ref()
                    .and_then(|m| self.bind_message(&m.message, &context, &mut problems));
                let faults = op
                    .faults
                    .iter()
                    .filter_map(|m| self.bind_message(&m.message, &context, &mut problems))
                    .collect();
                OperationBinding {
                    name: op.name.clone(),
                    documentation: op.documentation.clone(),
                    pattern: op.pattern,
                    soap_action: bound.and_then(|o| o.soap_action.clone()),
                    style: bound
                        .and_then(|o| o.style)
                        .or_else(|| binding.and_then(|(_, b)| b.style))
                        .unwrap_or(SoapStyle::Document),
                    body_use: bound.and_then(|o| o.input).unwrap_or(BodyUse::Literal),
                    input,
                    output,
                    faults,
                    problems,
                }
            })
            .collect();
        Some(ServiceBinding {
            service: service.to_string(),
            port: port.to_string(),
            namespace: namespace.to_string(),
            port_type: port_type_name.clone(),
            binding: binding.map(|(name, _)| name.clone()),
            protocol: binding.map(|(_, b)| b.protocol.clone()),
            address: None,
            documentation: None,
            operations,
        })
    }

    fn bind_message(
        &mut self,
        name: &QualifiedName,
        context: &str,
        problems: &mut Vec<String>,
    ) -> Option<MessageBinding> {
        let Some(message) = self.index.messages.get(name).copied() else {
            self.unresolved(name, ReferenceKind::Message, context);
            problems.push(format!("message not found: {name}"));
            return None;
        };
        let parts = message
            .parts
            .iter()
            .map(|part| self.bind_part(part, context, problems))
            .collect();
        Some(MessageBinding {
            name: name.clone(),
            parts,
        })
    }

    fn bind_part(&mut self, part: &Part, context: &str, problems: &mut Vec<String>) -> PartBinding {
        let (element, type_ref) = match &part.reference {
            PartReference::Element(name) => match self.graph.elements.get(name) {
                Some(element) => (Some(name.clone()), element.type_ref.clone()),
                None => {
                    self.unresolved(name, ReferenceKind::Element, context);
                    (Some(name.clone()), TypeRef::Unresolved(name.clone()))
                }
            },
            PartReference::Type(name) => {
                let type_ref = if let Some(builtin) = BuiltinType::from_qualified_name(name) {
                    TypeRef::Builtin(builtin)
                } else if self.graph.types.contains_key(&TypeId::Named(name.clone())) {
                    TypeRef::Node(TypeId::Named(name.clone()))
                } else {
                    self.unresolved(name, ReferenceKind::Type, context);
                    TypeRef::Unresolved(name.clone())
                };
                (None, type_ref)
            }
        };
        match &type_ref {
            TypeRef::Unresolved(name) => {
                problems.push(format!("part {}: unresolved {name}", part.name));
            }
            TypeRef::Node(id) if self.tainted.contains(id) => {
                problems.push(format!(
                    "part {}: type {id} references unresolved declarations",
                    part.name
                ));
            }
            _ => {}
        }
        PartBinding {
            name: part.name.clone(),
            element,
            type_ref,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler::builder::Builder;
    use crate::compiler::symbols::SymbolTable;
    use crate::schema;
    use crate::schema::qualified_name::XSD;
    use wsdlc_core::locator::Locator;

    const NS: &str = "urn:stock";

    const STOCK: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:http="http://schemas.xmlsoap.org/wsdl/http/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:tns="urn:stock" targetNamespace="urn:stock">
  <types>
    <xs:schema targetNamespace="urn:stock" elementFormDefault="qualified">
      <xs:element name="Quote" type="xs:string"/>
      <xs:element name="Price" type="xs:double"/>
      <xs:complexType name="Broken">
        <xs:sequence><xs:element name="x" type="tns:Missing"/></xs:sequence>
      </xs:complexType>
    </xs:schema>
  </types>
  <message name="QuoteIn"><part name="body" element="tns:Quote"/></message>
  <message name="QuoteOut"><part name="body" element="tns:Price"/></message>
  <message name="BrokenIn"><part name="value" type="tns:Broken"/></message>
  <message name="Ping"><part name="count" type="xs:int"/></message>
  <portType name="StockPort">
    <operation name="GetQuote"><input message="tns:QuoteIn"/><output message="tns:QuoteOut"/></operation>
    <operation name="Broken"><input message="tns:BrokenIn"/></operation>
    <operation name="Lost"><input message="tns:Nowhere"/></operation>
    <operation name="Notify"><output message="tns:Ping"/></operation>
    <operation name="Ping"><input message="tns:Ping"/></operation>
  </portType>
  <binding name="StockSoap" type="tns:StockPort">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="GetQuote"><soap:operation soapAction="urn:stock#GetQuote"/></operation>
  </binding>
  <binding name="StockHttp" type="tns:StockPort">
    <http:binding verb="GET"/>
  </binding>
  <service name="StockService">
    <port name="Http" binding="tns:StockHttp"><http:address location="http://example.com/http"/></port>
    <port name="Soap" binding="tns:StockSoap"><soap:address location="http://example.com/soap"/></port>
    <port name="Soap2" binding="tns:StockSoap"><soap:address location="http://example.com/soap2"/></port>
  </service>
  <service name="Other">
    <port name="Gone" binding="tns:Gone"/>
  </service>
</definitions>"#;

    fn resolve_text(
        text: &str,
        service: Option<&str>,
    ) -> (Result<Vec<ServiceBinding>, Error>, BTreeSet<Unresolved>) {
        let locator = Locator::parse("http://example.com/stock.wsdl").unwrap();
        let docs = DocumentSet::new(vec![schema::parse(text.as_bytes(), &locator).unwrap()]);
        let symbols = SymbolTable::build(&docs).unwrap();
        let (graph, mut unresolved) = Builder::build(&symbols).unwrap();
        let result = resolve(&docs, &graph, service, &mut unresolved);
        (result, unresolved)
    }

    fn operation<'a>(service: &'a ServiceBinding, name: &str) -> &'a OperationBinding {
        service.operations.iter().find(|op| op.name == name).unwrap()
    }

    #[test]
    fn first_soap_port_is_bound() {
        let (result, unresolved) = resolve_text(STOCK, Some("StockService"));
        let services = result.unwrap();
        assert_eq!(services.len(), 1);
        let service = &services[0];
        assert_eq!(service.service, "StockService");
        assert_eq!(service.port, "Soap");
        assert_eq!(service.namespace, NS);
        assert_eq!(service.address.as_deref(), Some("http://example.com/soap"));
        assert_eq!(service.protocol, Some(BindingProtocol::Soap11));
        assert!(unresolved.iter().all(|u| u.kind != ReferenceKind::Binding));

        let quote = operation(service, "GetQuote");
        assert!(quote.is_valid());
        assert_eq!(quote.soap_action.as_deref(), Some("urn:stock#GetQuote"));
        assert_eq!(quote.style, SoapStyle::Document);
        let input = quote.input.as_ref().unwrap();
        assert_eq!(input.parts[0].element, Some(QualifiedName::new(NS, "Quote")));
        assert_eq!(input.parts[0].type_ref, TypeRef::Builtin(BuiltinType::String));
        let output = quote.output.as_ref().unwrap();
        assert_eq!(output.parts[0].type_ref, TypeRef::Builtin(BuiltinType::Double));

        let ping = operation(service, "Ping");
        assert!(ping.is_valid());
        assert!(ping.is_one_way());
        assert_eq!(
            ping.input.as_ref().unwrap().parts[0].type_ref,
            TypeRef::Builtin(BuiltinType::Int)
        );
    }

    #[test]
    fn invalid_operations_are_kept_with_problems() {
        let (result, unresolved) = resolve_text(STOCK, Some("StockService"));
        let services = result.unwrap();
        let service = &services[0];

        let broken = operation(service, "Broken");
        assert!(!broken.is_valid());
        assert!(broken.problems[0].contains("references unresolved declarations"));

        let lost = operation(service, "Lost");
        assert!(!lost.is_valid());
        assert!(lost.input.is_none());
        assert!(unresolved.contains(&Unresolved {
            reference: QualifiedName::new(NS, "Nowhere"),
            kind: ReferenceKind::Message,
            context: "operation Lost".to_string(),
        }));

        let notify = operation(service, "Notify");
        assert_eq!(notify.pattern, OperationPattern::Notification);
        assert!(!notify.is_valid());

        assert_eq!(
            service.valid_operations().map(|op| op.name.as_str()).collect::<Vec<_>>(),
            vec!["GetQuote", "Ping"]
        );
    }

    #[test]
    fn all_services_without_filter() {
        let (result, unresolved) = resolve_text(STOCK, None);
        let services = result.unwrap();
        assert_eq!(services.len(), 1);
        assert!(unresolved.contains(&Unresolved {
            reference: QualifiedName::new(NS, "Gone"),
            kind: ReferenceKind::Binding,
            context: "port Gone of service Other".to_string(),
        }));
    }

    #[test]
    fn unknown_service_lists_available() {
        let (result, _) = resolve_text(STOCK, Some("Missing"));
        match result {
            Err(Error::ServiceNotFound { name, available }) => {
                assert_eq!(name, "Missing");
                assert_eq!(available, vec!["StockService".to_string(), "Other".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn port_types_without_bindings() {
        let text = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:tns="urn:stock" targetNamespace="urn:stock">
  <message name="In"><part name="symbol" type="xs:string"/></message>
  <portType name="Quotes">
    <operation name="Lookup"><input message="tns:In"/><output message="tns:In"/></operation>
  </portType>
</definitions>"#;
        let (result, unresolved) = resolve_text(text, None);
        let services = result.unwrap();
        assert!(unresolved.is_empty());
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].service, "Quotes");
        assert_eq!(services[0].binding, None);
        assert_eq!(services[0].port_type, QualifiedName::new(NS, "Quotes"));
        assert!(services[0].operations[0].is_valid());
        assert_eq!(
            services[0].operations[0].input.as_ref().unwrap().parts[0].type_ref,
            TypeRef::Builtin(BuiltinType::from_qualified_name(&QualifiedName::new(XSD, "string")).unwrap())
        );
    }
}
