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

//! Schema Parser.
//!
//! Turns the bytes of one WSDL or XSD document into a [`SchemaDocument`].
//! The parser only resolves document-local references: namespace
//! prefixes of QName values and inline (anonymous) declarations.
//! Cross-document references are left to the compiler.

/// Schema error.
pub mod error;
/// Qualified names and well-known namespaces.
pub mod qualified_name;
/// WSDL definitions.
pub mod wsdl;
/// Namespace-aware XML element tree.
pub mod xml;
/// XML Schema declarations.
pub mod xsd;

use crate::schema::qualified_name::WSDL;
use crate::schema::qualified_name::XSD;
use crate::schema::xml::Element;
use crate::schema::xsd::Form;
use tracing::debug;
use wsdlc_core::Locator;

#[doc(inline)]
pub use error::SyntaxError;
#[doc(inline)]
pub use error::SyntaxErrorKind;
#[doc(inline)]
pub use qualified_name::QualifiedName;

/// Kind of the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `wsdl:definitions`.
    Wsdl,
    /// `xs:schema`.
    Schema,
}

/// Kind of reference to another document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `xs:import`.
    Import,
    /// `xs:include`.
    Include,
    /// `xs:redefine`, processed as include.
    Redefine,
    /// `wsdl:import`.
    Wsdl,
}

/// Reference to another document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Kind.
    pub kind: ImportKind,
    /// Imported namespace. For includes this is the includer namespace.
    pub namespace: Option<String>,
    /// Location as written in the document.
    pub location: Option<String>,
    /// Target namespace of the importing schema.
    pub importer_namespace: String,
}

/// Construct that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    /// Construct description.
    pub construct: String,
    /// Byte offset.
    pub position: u64,
}

/// Parsed WSDL or XSD document.
#[derive(Debug)]
pub struct SchemaDocument {
    /// Source of the document.
    pub locator: Locator,
    /// Kind of the root element.
    pub kind: DocumentKind,
    /// Target namespace of the root element.
    pub target_namespace: String,
    /// `wsdl:import` declarations.
    pub imports: Vec<Import>,
    /// Schemas (embedded in `wsdl:types` or the document itself).
    pub schemas: Vec<xsd::Schema>,
    /// Messages.
    pub messages: Vec<wsdl::Message>,
    /// Port types.
    pub port_types: Vec<wsdl::PortType>,
    /// Bindings.
    pub bindings: Vec<wsdl::Binding>,
    /// Services.
    pub services: Vec<wsdl::Service>,
    /// Skipped constructs.
    pub unsupported: Vec<Unsupported>,
}

impl SchemaDocument {
    /// All references to other documents: WSDL imports and the imports
    /// of every schema.
    pub fn all_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports
            .iter()
            .chain(self.schemas.iter().flat_map(|s| s.imports.iter()))
    }

    /// Qualified name in the document target namespace.
    #[must_use]
    pub fn qualify(&self, name: &str) -> QualifiedName {
        QualifiedName::new(&self.target_namespace, name)
    }
}

/// Parse a document.
///
/// # Errors
///
/// Returns error if the document is not well-formed XML or a construct
/// required for typing cannot be parsed.
pub fn parse(bytes: &[u8], locator: &Locator) -> Result<SchemaDocument, SyntaxError> {
    parse_with_namespace(bytes, locator, None)
}

/// Parse a document reached through `xs:include`.
///
/// A schema without `targetNamespace` adopts `default_namespace`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_namespace(
    bytes: &[u8],
    locator: &Locator,
    default_namespace: Option<&str>,
) -> Result<SchemaDocument, SyntaxError> {
    let text = std::str::from_utf8(bytes).map_err(|e| SyntaxError {
        locator: locator.clone(),
        construct: "document".into(),
        position: e.valid_up_to() as u64,
        kind: SyntaxErrorKind::Encoding,
    })?;
    let root = xml::parse_tree(text).map_err(|e| SyntaxError {
        locator: locator.clone(),
        construct: "document".into(),
        position: e.position,
        kind: SyntaxErrorKind::Xml(e.reason),
    })?;
    let declared = root.attribute("targetNamespace").map(str::trim);
    let mut doc = SchemaDocument {
        locator: locator.clone(),
        kind: DocumentKind::Schema,
        target_namespace: String::new(),
        imports: Vec::new(),
        schemas: Vec::new(),
        messages: Vec::new(),
        port_types: Vec::new(),
        bindings: Vec::new(),
        services: Vec::new(),
        unsupported: Vec::new(),
    };
    if root.is(XSD, "schema") {
        let (namespace, chameleon) = match (declared, default_namespace) {
            (Some(ns), _) => (ns, false),
            (None, Some(ns)) => (ns, true),
            (None, None) => ("", false),
        };
        let schema = parse_schema(&root, locator, namespace, chameleon, &mut doc.unsupported)?;
        doc.target_namespace = schema.target_namespace.clone();
        doc.schemas.push(schema);
    } else if root.is(WSDL, "definitions") {
        doc.kind = DocumentKind::Wsdl;
        doc.target_namespace = declared.unwrap_or_default().to_string();
        parse_definitions(&root, &mut doc)?;
    } else {
        let ctx = Context::new(locator, "", false);
        let name = match &root.namespace {
            Some(ns) => format!("{{{ns}}}{}", root.name),
            None => root.name.clone(),
        };
        return Err(ctx.error(&root, SyntaxErrorKind::UnexpectedRoot(name)));
    }
    debug!(
        locator = %doc.locator,
        namespace = %doc.target_namespace,
        schemas = doc.schemas.len(),
        unsupported = doc.unsupported.len(),
        "parsed document"
    );
    Ok(doc)
}

fn parse_schema(
    e: &Element,
    locator: &Locator,
    namespace: &str,
    chameleon: bool,
    unsupported: &mut Vec<Unsupported>,
) -> Result<xsd::Schema, SyntaxError> {
    let mut ctx = Context::new(locator, namespace, chameleon);
    let (element_form, attribute_form) = xsd::parse_form_defaults(e, &ctx)?;
    ctx.element_form = element_form;
    ctx.attribute_form = attribute_form;
    let schema = xsd::parse_schema(e, &mut ctx)?;
    unsupported.append(&mut ctx.unsupported);
    Ok(schema)
}

fn parse_definitions(root: &Element, doc: &mut SchemaDocument) -> Result<(), SyntaxError> {
    let locator = doc.locator.clone();
    let mut ctx = Context::new(&locator, &doc.target_namespace, false);
    for child in &root.children {
        if child.namespace.as_deref() != Some(WSDL) {
            ctx.unsupported(child);
            continue;
        }
        match child.name.as_str() {
            "documentation" => {}
            "import" => doc.imports.push(Import {
                kind: ImportKind::Wsdl,
                namespace: child.attribute("namespace").map(|v| v.trim().to_string()),
                location: child.attribute("location").map(|v| v.trim().to_string()),
                importer_namespace: doc.target_namespace.clone(),
            }),
            "types" => {
                for schema in &child.children {
                    if schema.is(XSD, "schema") {
                        let namespace = schema
                            .attribute("targetNamespace")
                            .map_or("", str::trim);
                        let schema = parse_schema(
                            schema,
                            &locator,
                            namespace,
                            false,
                            &mut ctx.unsupported,
                        )?;
                        doc.schemas.push(schema);
                    } else if !schema.is(WSDL, "documentation") {
                        ctx.unsupported(schema);
                    }
                }
            }
            "message" => doc.messages.push(wsdl::parse_message(child, &ctx)?),
            "portType" => doc.port_types.push(wsdl::parse_port_type(child, &ctx)?),
            "binding" => doc.bindings.push(wsdl::parse_binding(child, &ctx)?),
            "service" => doc.services.push(wsdl::parse_service(child, &ctx)?),
            _ => ctx.unsupported(child),
        }
    }
    doc.unsupported.append(&mut ctx.unsupported);
    Ok(())
}

/// Parsing context of one schema or WSDL definitions element.
pub(crate) struct Context<'a> {
    locator: &'a Locator,
    pub(crate) target_namespace: String,
    chameleon: bool,
    pub(crate) element_form: Form,
    pub(crate) attribute_form: Form,
    unsupported: Vec<Unsupported>,
}

impl<'a> Context<'a> {
    fn new(locator: &'a Locator, target_namespace: &str, chameleon: bool) -> Self {
        Self {
            locator,
            target_namespace: target_namespace.to_string(),
            chameleon,
            element_form: Form::Unqualified,
            attribute_form: Form::Unqualified,
            unsupported: Vec::new(),
        }
    }

    fn describe(e: &Element) -> String {
        match (e.attribute("name"), e.attribute("ref")) {
            (Some(name), _) => format!("{} {name:?}", e.name),
            (None, Some(reference)) => format!("{} ref {reference:?}", e.name),
            (None, None) => e.name.clone(),
        }
    }

    pub(crate) fn error(&self, e: &Element, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            locator: self.locator.clone(),
            construct: Self::describe(e),
            position: e.position,
            kind,
        }
    }

    pub(crate) fn required<'e>(
        &self,
        e: &'e Element,
        name: &'static str,
    ) -> Result<&'e str, SyntaxError> {
        e.attribute(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| self.error(e, SyntaxErrorKind::MissingAttribute(name)))
    }

    pub(crate) fn qname(&self, e: &Element, value: &str) -> Result<QualifiedName, SyntaxError> {
        let mut qname = e
            .resolve_qname(value)
            .map_err(|prefix| self.error(e, SyntaxErrorKind::UnboundPrefix(prefix)))?;
        if self.chameleon && qname.namespace.is_empty() {
            qname.namespace.clone_from(&self.target_namespace);
        }
        Ok(qname)
    }

    pub(crate) fn qname_attr(
        &self,
        e: &Element,
        name: &str,
    ) -> Result<Option<QualifiedName>, SyntaxError> {
        e.attribute(name).map(|v| self.qname(e, v)).transpose()
    }

    pub(crate) fn bool_attr(&self, e: &Element, name: &'static str) -> Result<bool, SyntaxError> {
        match e.attribute(name).map(str::trim) {
            None | Some("false" | "0") => Ok(false),
            Some("true" | "1") => Ok(true),
            Some(v) => Err(self.error(e, SyntaxErrorKind::InvalidAttribute(name, v.into()))),
        }
    }

    pub(crate) fn unsupported(&mut self, e: &Element) {
        let construct = match &e.namespace {
            Some(ns) if ns != XSD && ns != WSDL => format!("{{{ns}}}{}", Self::describe(e)),
            _ => Self::describe(e),
        };
        debug!(locator = %self.locator, position = e.position, %construct, "skipping unsupported construct");
        self.unsupported.push(Unsupported {
            construct,
            position: e.position,
        });
    }

    /// Text of `xs:annotation/xs:documentation` or `wsdl:documentation`.
    pub(crate) fn documentation(e: &Element) -> Option<String> {
        let text = e
            .child(XSD, "annotation")
            .and_then(|a| a.child(XSD, "documentation"))
            .or_else(|| e.child(WSDL, "documentation"))
            .map(|d| d.text.trim())?;
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::wsdl::OperationPattern;
    use crate::schema::wsdl::PartReference;
    use crate::schema::xsd::ComplexContent;
    use crate::schema::xsd::ElementItem;
    use crate::schema::xsd::GroupItem;
    use crate::schema::xsd::MaxOccurs;
    use crate::schema::xsd::SimpleDerivation;
    use crate::schema::xsd::TypeDecl;
    use crate::schema::xsd::TypeUse;

    const WEATHER: &str = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:tns="urn:weather"
             targetNamespace="urn:weather">
  <types>
    <xs:schema targetNamespace="urn:weather" elementFormDefault="qualified">
      <xs:element name="GetWeatherRequest">
        <xs:complexType>
          <xs:sequence><xs:element name="city" type="xs:string"/></xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="GetWeatherResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="temp" type="xs:float"/>
            <xs:element name="conditions" type="xs:string"/>
            <xs:element name="humidity" type="xs:int" minOccurs="0"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:key name="k"><xs:selector xpath="."/><xs:field xpath="@a"/></xs:key>
    </xs:schema>
  </types>
  <message name="GetWeatherIn"><part name="parameters" element="tns:GetWeatherRequest"/></message>
  <message name="GetWeatherOut"><part name="parameters" element="tns:GetWeatherResponse"/></message>
  <portType name="WeatherPort">
    <operation name="GetWeather">
      <documentation>Current weather</documentation>
      <input message="tns:GetWeatherIn"/>
      <output message="tns:GetWeatherOut"/>
    </operation>
  </portType>
  <binding name="WeatherBinding" type="tns:WeatherPort">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="GetWeather">
      <soap:operation soapAction="urn:weather#GetWeather"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="WeatherService">
    <port name="WeatherPort" binding="tns:WeatherBinding">
      <soap:address location="http://example.com/weather"/>
    </port>
  </service>
</definitions>"#;

    fn locator() -> Locator {
        Locator::parse("http://example.com/weather.wsdl").expect("valid url")
    }

    #[test]
    fn weather_definitions() {
        let doc = parse(WEATHER.as_bytes(), &locator()).expect("parses");
        assert_eq!(doc.kind, DocumentKind::Wsdl);
        assert_eq!(doc.target_namespace, "urn:weather");
        assert_eq!(doc.schemas.len(), 1);
        let schema = &doc.schemas[0];
        assert_eq!(schema.elements.len(), 2);
        let response = &schema.elements[1];
        let Some(TypeUse::Inline(decl)) = &response.type_use else {
            panic!("expected inline type");
        };
        let TypeDecl::Complex(complex) = decl.as_ref() else {
            panic!("expected complex type");
        };
        let ComplexContent::Group(group) = &complex.content else {
            panic!("expected model group");
        };
        let GroupItem::Element(humidity) = &group.items[2] else {
            panic!("expected element");
        };
        assert_eq!(humidity.occurs.min, 0);
        let ElementItem::Local(humidity) = &humidity.element else {
            panic!("expected local element");
        };
        assert_eq!(humidity.namespace.as_deref(), Some("urn:weather"));
        assert_eq!(
            humidity.type_use,
            Some(TypeUse::Named(QualifiedName::new(XSD, "int")))
        );

        assert_eq!(
            doc.messages[0].parts[0].reference,
            PartReference::Element(QualifiedName::new("urn:weather", "GetWeatherRequest"))
        );
        let operation = &doc.port_types[0].operations[0];
        assert_eq!(operation.pattern, OperationPattern::RequestResponse);
        assert_eq!(operation.documentation.as_deref(), Some("Current weather"));
        assert_eq!(
            doc.bindings[0].operations[0].soap_action.as_deref(),
            Some("urn:weather#GetWeather")
        );
        assert_eq!(
            doc.services[0].ports[0].address.as_deref(),
            Some("http://example.com/weather")
        );
        assert_eq!(doc.unsupported.len(), 1);
        assert_eq!(doc.unsupported[0].construct, "key \"k\"");
    }

    #[test]
    fn missing_name_is_syntax_error() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType><xs:sequence/></xs:complexType>
</xs:schema>"#;
        let err = parse(text.as_bytes(), &locator()).expect_err("must fail");
        assert_eq!(err.kind, SyntaxErrorKind::MissingAttribute("name"));
        assert_eq!(err.construct, "complexType");
        assert!(err.to_string().starts_with("http://example.com/weather.wsdl: byte "));
    }

    #[test]
    fn part_requires_element_or_type() {
        let text = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/">
  <message name="M"><part name="p"/></message>
</definitions>"#;
        let err = parse(text.as_bytes(), &locator()).expect_err("must fail");
        assert_eq!(err.kind, SyntaxErrorKind::MissingOneOf("element", "type"));
        assert_eq!(err.construct, "part \"p\"");
    }

    #[test]
    fn malformed_occurs_and_unbound_prefix() {
        let occurs = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType name="T"><xs:sequence>
    <xs:element name="a" type="xs:int" maxOccurs="many"/>
  </xs:sequence></xs:complexType>
</xs:schema>"#;
        let err = parse(occurs.as_bytes(), &locator()).expect_err("must fail");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::InvalidAttribute("maxOccurs", "many".into())
        );

        let prefix = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="a" type="q:T"/>
</xs:schema>"#;
        let err = parse(prefix.as_bytes(), &locator()).expect_err("must fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnboundPrefix("q".into()));
    }

    #[test]
    fn chameleon_include_adopts_namespace() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="Color">
    <xs:restriction base="xs:string">
      <xs:enumeration value="red"/><xs:enumeration value="green"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:element name="paint" type="Color"/>
</xs:schema>"#;
        let doc = parse_with_namespace(text.as_bytes(), &locator(), Some("urn:paint"))
            .expect("parses");
        assert_eq!(doc.target_namespace, "urn:paint");
        assert_eq!(
            doc.schemas[0].elements[0].type_use,
            Some(TypeUse::Named(QualifiedName::new("urn:paint", "Color")))
        );
        let TypeDecl::Simple(color) = &doc.schemas[0].types[0] else {
            panic!("expected simple type");
        };
        let SimpleDerivation::Restriction { facets, .. } = &color.derivation else {
            panic!("expected restriction");
        };
        assert_eq!(facets.enumeration, vec!["red", "green"]);
    }

    #[test]
    fn imports_and_groups() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:o="urn:other" targetNamespace="urn:main">
  <xs:import namespace="urn:other" schemaLocation="other.xsd"/>
  <xs:include schemaLocation="common.xsd"/>
  <xs:group name="G"><xs:choice>
    <xs:element name="a" type="xs:int"/>
    <xs:element ref="o:b" maxOccurs="unbounded"/>
  </xs:choice></xs:group>
</xs:schema>"#;
        let doc = parse(text.as_bytes(), &locator()).expect("parses");
        let imports: Vec<_> = doc.all_imports().collect();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].kind, ImportKind::Import);
        assert_eq!(imports[0].namespace.as_deref(), Some("urn:other"));
        assert_eq!(imports[1].kind, ImportKind::Include);
        assert_eq!(imports[1].namespace.as_deref(), Some("urn:main"));
        let GroupItem::Element(b) = &doc.schemas[0].groups[0].group.items[1] else {
            panic!("expected element");
        };
        assert_eq!(b.occurs.max, MaxOccurs::Unbounded);
        assert_eq!(b.element, ElementItem::Ref(QualifiedName::new("urn:other", "b")));
    }

    #[test]
    fn unexpected_root() {
        let err = parse(b"<html/>", &locator()).expect_err("must fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedRoot("html".into()));
    }
}
