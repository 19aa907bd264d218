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

//! Namespace-aware XML element tree.
//!
//! Schema documents are small, so the parser first builds a complete
//! element tree with `quick-xml` and then walks it. Each element keeps
//! the namespace scope that was in effect where it appeared, which is
//! needed to resolve prefixed QName values such as `type="tns:Foo"`.

use crate::schema::qualified_name::XML;
use crate::schema::QualifiedName;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::escape::unescape;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::rc::Rc;

/// Low-level XML error.
#[derive(Debug, PartialEq, Eq)]
pub struct XmlError {
    /// Byte offset in the document.
    pub position: u64,
    /// Reason of the failure.
    pub reason: String,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: Vec<(Option<String>, String)>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML);
        }
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, ns)| ns.as_str())
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(prefix)))
    }
}

/// Attribute of an element.
#[derive(Debug)]
pub struct Attribute {
    /// Namespace of the attribute (only for prefixed attributes).
    pub namespace: Option<String>,
    /// Local name.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

/// XML element with resolved names.
#[derive(Debug)]
pub struct Element {
    /// Namespace of the element.
    pub namespace: Option<String>,
    /// Local name of the element.
    pub name: String,
    /// Attributes except namespace declarations.
    pub attributes: Vec<Attribute>,
    /// Child elements in document order.
    pub children: Vec<Element>,
    /// Concatenated text content.
    pub text: String,
    /// Byte offset of the start tag.
    pub position: u64,
    scope: Rc<Scope>,
}

impl Element {
    /// Check namespace and local name of the element.
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Value of unqualified attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of namespace-qualified attribute.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Child elements from the namespace.
    pub fn children_in<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter(move |c| c.namespace.as_deref() == Some(namespace))
    }

    /// First child element with the given name.
    #[must_use]
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// Resolve a QName value using namespace declarations in scope.
    /// Unprefixed values use the default namespace.
    ///
    /// # Errors
    ///
    /// Returns the prefix if it is not bound.
    pub fn resolve_qname(&self, value: &str) -> Result<QualifiedName, String> {
        let value = value.trim();
        match value.split_once(':') {
            Some((prefix, local)) => self
                .scope
                .lookup(Some(prefix))
                .map(|ns| QualifiedName::new(ns, local))
                .ok_or_else(|| prefix.to_string()),
            None => Ok(QualifiedName::new(
                self.scope.lookup(None).unwrap_or_default(),
                value,
            )),
        }
    }
}

/// Parse the document into an element tree.
///
/// # Errors
///
/// Returns error if XML is malformed or uses undeclared prefixes.
pub fn parse_tree(text: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));

    let root_scope = Rc::new(Scope::default());
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let scope = stack.last().map_or(&root_scope, |e| &e.scope);
                let element = open_element(&start, scope, position)?;
                stack.push(element);
            }
            Ok(Event::Empty(start)) => {
                let scope = stack.last().map_or(&root_scope, |e| &e.scope);
                let element = open_element(&start, scope, position)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| XmlError {
                    position,
                    reason: "unexpected closing tag".into(),
                })?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&decode(&text));
                }
            }
            Ok(Event::GeneralRef(reference)) => {
                let resolved = resolve_reference(&reference).ok_or_else(|| XmlError {
                    position,
                    reason: format!(
                        "unknown entity reference &{};",
                        String::from_utf8_lossy(&reference)
                    ),
                })?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&resolved);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(XmlError {
                    position: reader.error_position() as u64,
                    reason: err.to_string(),
                })
            }
        }
    }
    if let Some(unclosed) = stack.last() {
        return Err(XmlError {
            position: unclosed.position,
            reason: format!("element {} is not closed", unclosed.name),
        });
    }
    root.ok_or_else(|| XmlError {
        position: 0,
        reason: "document has no root element".into(),
    })
}

/// Character or predefined entity reference in text.
fn resolve_reference(reference: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = String::from_utf8_lossy(reference);
    resolve_predefined_entity(&name).map(str::to_string)
}

fn decode(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    unescape(&raw).map_or_else(|_| raw.to_string(), |text| text.into_owned())
}

fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    name.split_once(':')
        .map_or((None, name), |(prefix, local)| (Some(prefix), local))
}

fn open_element(start: &BytesStart<'_>, parent: &Rc<Scope>, position: u64) -> Result<Element, XmlError> {
    let error = |reason: String| XmlError { position, reason };
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut bindings = Vec::new();
    let mut raw_attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| error(err.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = decode(&attribute.value);
        if key == "xmlns" {
            bindings.push((None, value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            bindings.push((Some(prefix.to_string()), value));
        } else {
            raw_attributes.push((key, value));
        }
    }
    let scope = if bindings.is_empty() {
        Rc::clone(parent)
    } else {
        Rc::new(Scope {
            bindings,
            parent: Some(Rc::clone(parent)),
        })
    };

    let (prefix, name) = split_prefixed(&raw_name);
    let namespace = match prefix {
        Some(prefix) => Some(
            scope
                .lookup(Some(prefix))
                .ok_or_else(|| error(format!("unbound namespace prefix {prefix}")))?
                .to_string(),
        ),
        None => scope
            .lookup(None)
            .filter(|ns| !ns.is_empty())
            .map(ToString::to_string),
    };

    let attributes = raw_attributes
        .into_iter()
        .map(|(key, value)| -> Result<Attribute, XmlError> {
            let (prefix, name) = split_prefixed(&key);
            let namespace = prefix
                .map(|prefix| {
                    scope
                        .lookup(Some(prefix))
                        .map(ToString::to_string)
                        .ok_or_else(|| error(format!("unbound namespace prefix {prefix}")))
                })
                .transpose()?;
            Ok(Attribute {
                namespace,
                name: name.to_string(),
                value,
            })
        })
        .collect::<Result<Vec<_>, XmlError>>()?;

    Ok(Element {
        namespace,
        name: name.to_string(),
        attributes,
        children: Vec::new(),
        text: String::new(),
        position,
        scope,
    })
}

fn close_element(
    mut element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err(XmlError {
            position: element.position,
            reason: "multiple root elements".into(),
        })
    } else {
        *root = Some(element);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::parse_tree;
    use crate::schema::qualified_name::XSD;
    use crate::schema::QualifiedName;

    #[test]
    fn namespaces_are_scoped() {
        let root = parse_tree(
            r#"<?xml version="1.0"?>
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:a">
              <xs:element name="a" type="tns:A"/>
              <xs:element name="b" xmlns:tns="urn:b" type="tns:B"/>
              <xs:element name="c" type="C"/>
            </xs:schema>"#,
        )
        .unwrap();
        assert!(root.is(XSD, "schema"));
        assert_eq!(root.children.len(), 3);
        let a = &root.children[0];
        let b = &root.children[1];
        let c = &root.children[2];
        assert_eq!(
            a.resolve_qname(a.attribute("type").unwrap()),
            Ok(QualifiedName::new("urn:a", "A"))
        );
        assert_eq!(
            b.resolve_qname(b.attribute("type").unwrap()),
            Ok(QualifiedName::new("urn:b", "B"))
        );
        assert_eq!(
            c.resolve_qname(c.attribute("type").unwrap()),
            Ok(QualifiedName::new("", "C"))
        );
        assert_eq!(a.resolve_qname("other:X"), Err("other".to_string()));
    }

    #[test]
    fn default_namespace_applies_to_elements_and_values() {
        let root = parse_tree(
            r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"><message name="m"/></definitions>"#,
        )
        .unwrap();
        assert!(root.is("http://schemas.xmlsoap.org/wsdl/", "definitions"));
        assert_eq!(
            root.children[0].resolve_qname("x"),
            Ok(QualifiedName::new("http://schemas.xmlsoap.org/wsdl/", "x"))
        );
    }

    #[test]
    fn text_and_cdata_are_collected() {
        let root = parse_tree("<doc>\n  Current weather\n  <![CDATA[for a city]]></doc>").unwrap();
        assert_eq!(root.text, "Current weather\n  for a city");
    }

    #[test]
    fn entity_references_are_resolved() {
        let root = parse_tree("<doc>Wind &amp; rain &lt;10&#176;&#x43;&gt;</doc>").unwrap();
        assert_eq!(root.text, "Wind & rain <10\u{b0}C>");
    }

    #[test]
    fn unknown_entity_is_error() {
        assert!(parse_tree("<doc>&nbsp;</doc>").is_err());
    }

    #[test]
    fn malformed_documents_report_position() {
        let err = parse_tree("<a><b></a>").unwrap_err();
        assert!(err.position > 0);
        assert!(parse_tree("<p:a/>").unwrap_err().reason.contains("p"));
        assert!(parse_tree("").is_err());
    }
}
