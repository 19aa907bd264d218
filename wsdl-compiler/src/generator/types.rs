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

//! Classes of types.

use crate::compiler::type_graph::Content;
use crate::compiler::type_graph::Derivation;
use crate::compiler::type_graph::EdgeKind;
use crate::compiler::type_graph::Particle;
use crate::compiler::type_graph::ParticleKind;
use crate::compiler::type_graph::TypeKind;
use crate::compiler::TypeId;
use crate::compiler::TypeNode;
use crate::compiler::TypeRef;
use crate::generator::casemungler::to_lower_camel;
use crate::generator::casemungler::to_upper_camel;
use crate::generator::class::ClassKind;
use crate::generator::class::EnumValue;
use crate::generator::class::GeneratedClass;
use crate::generator::class::Member;
use crate::generator::class::Method;
use crate::generator::class::MethodKind;
use crate::generator::class::Storage;
use crate::generator::class::XmlName;
use crate::generator::cpp_type::member_type;
use crate::generator::naming::NameRegistry;
use crate::generator::Generator;
use crate::schema::xsd::MaxOccurs;
use crate::schema::xsd::Occurs;
use std::collections::BTreeSet;
use tracing::warn;

const TYPE_METHODS: &[&str] = &["serialize", "deserialize"];
const ENUM_METHODS: &[&str] = &["serialize", "deserialize", "toString", "fromString", "type", "Type"];

impl Generator<'_> {
    pub(super) fn type_class(&self, id: &TypeId) -> Option<GeneratedClass> {
        let node = self.graph.get(id)?;
        let name = self.type_names.get(id)?.clone();
        let code = self.code(id.namespace());
        let mut class = match &node.kind {
            TypeKind::Complex {
                content,
                attributes,
                ..
            } => self.complex_class(name, node, content, attributes, code),
            TypeKind::Simple { base, .. } => {
                self.wrapper_class(name, node, ClassKind::SimpleWrapper, "value", base, code)
            }
            TypeKind::List { item } => {
                self.wrapper_class(name, node, ClassKind::List, "entries", item, code)
            }
            TypeKind::Enumeration { values, .. } => enum_class(name, values, code),
        };
        if let TypeId::Named(qname) = id {
            class.xml = Some(XmlName {
                name: qname.name.clone(),
                namespace: Some(qname.namespace.clone()),
            });
        }
        class.documentation.clone_from(&node.documentation);
        class.forward_declarations = class
            .members
            .iter()
            .filter(|m| matches!(m.storage, Storage::Shared | Storage::SharedList))
            .map(|m| m.value_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        class.methods.push(
            Method::new("serialize", MethodKind::Serialize, "KDSoapValue")
                .with_parameter("valueName", "const QString&")
                .constant(),
        );
        class.methods.push(
            Method::new("deserialize", MethodKind::Deserialize, "void")
                .with_parameter("mainValue", "const KDSoapValue&"),
        );
        Some(class)
    }

    fn complex_class(
        &self,
        name: String,
        node: &TypeNode,
        content: &Content,
        attributes: &[Particle],
        code: &str,
    ) -> GeneratedClass {
        let mut registry = NameRegistry::with_reserved(TYPE_METHODS.iter().copied());
        registry.take(&name, code);
        let mut class = GeneratedClass::new(name, ClassKind::Complex);
        class.base = node
            .base
            .as_ref()
            .filter(|base| base.derivation == Derivation::Extension)
            .and_then(|base| base.type_ref.node())
            .and_then(|base| self.type_names.get(base))
            .cloned();
        if let Content::SimpleValue(value) = content {
            let value = Particle {
                name: "value".to_string(),
                namespace: None,
                kind: ParticleKind::Element,
                type_ref: value.clone(),
                occurs: Occurs::ONCE,
                nillable: false,
                edge: EdgeKind::ByValue,
                documentation: None,
            };
            class.members.extend(
                self.member(&mut registry, &node.id, &value, code)
                    .map(|member| Member {
                        is_content: true,
                        ..member
                    }),
            );
        }
        for particle in content.particles().iter().chain(attributes) {
            class
                .members
                .extend(self.member(&mut registry, &node.id, particle, code));
        }
        class
    }

    fn wrapper_class(
        &self,
        name: String,
        node: &TypeNode,
        kind: ClassKind,
        member: &str,
        value: &TypeRef,
        code: &str,
    ) -> GeneratedClass {
        let mut registry = NameRegistry::with_reserved(TYPE_METHODS.iter().copied());
        registry.take(&name, code);
        let mut class = GeneratedClass::new(name, kind);
        let particle = Particle {
            name: member.to_string(),
            namespace: None,
            kind: ParticleKind::Element,
            type_ref: value.clone(),
            occurs: if kind == ClassKind::List {
                Occurs {
                    min: 0,
                    max: MaxOccurs::Unbounded,
                }
            } else {
                Occurs::ONCE
            },
            nillable: false,
            edge: EdgeKind::ByValue,
            documentation: None,
        };
        class.members.extend(
            self.member(&mut registry, &node.id, &particle, code)
                .map(|member| Member {
                    is_content: true,
                    ..member
                }),
        );
        class
    }

    /// Member of a particle; `None` if its type is unresolved.
    pub(super) fn member(
        &self,
        registry: &mut NameRegistry,
        owner: &TypeId,
        particle: &Particle,
        code: &str,
    ) -> Option<Member> {
        let Some((value_type, value_kind)) = self.value_of(&particle.type_ref) else {
            warn!(
                owner = %owner,
                member = %particle.name,
                reference = %particle.type_ref,
                "member with unresolved type is skipped"
            );
            return None;
        };
        let storage = Storage::of(
            particle.is_optional(),
            particle.is_repeated(),
            particle.edge == EdgeKind::ByReference,
        );
        let code = particle
            .namespace
            .as_deref()
            .map_or(code, |ns| self.code(ns));
        let name = registry.take(&to_lower_camel(&particle.name), code);
        let setter = registry.take(&format!("set{}", to_upper_camel(&name)), code);
        Some(Member {
            name,
            setter,
            xml: XmlName {
                name: particle.name.clone(),
                namespace: particle.namespace.clone(),
            },
            is_attribute: particle.kind == ParticleKind::Attribute,
            is_content: false,
            cpp_type: member_type(&value_type, storage, self.config.optional_element_type),
            value_type,
            value_kind,
            storage,
            documentation: particle.documentation.clone(),
        })
    }
}

fn enum_class(name: String, values: &[String], code: &str) -> GeneratedClass {
    let mut registry = NameRegistry::with_reserved(ENUM_METHODS.iter().copied());
    registry.take(&name, code);
    let mut class = GeneratedClass::new(name, ClassKind::Enumeration);
    class.enum_values = values
        .iter()
        .map(|literal| {
            let candidate = to_upper_camel(literal);
            let candidate = if candidate.is_empty() {
                "Value".to_string()
            } else {
                candidate
            };
            EnumValue {
                name: registry.take(&candidate, code),
                literal: literal.clone(),
            }
        })
        .collect();
    class.methods.push(Method::new("toString", MethodKind::ToString, "QString").constant());
    class.methods.push(
        Method::new("fromString", MethodKind::FromString, "bool")
            .with_parameter("text", "const QString&"),
    );
    class
}

#[cfg(test)]
mod test {
    use crate::compiler::BuiltinType;
    use crate::generator::class::ClassKind;
    use crate::generator::class::Storage;
    use crate::generator::class::ValueKind;
    use crate::generator::testing::generate_schema;
    use crate::generator::Config;
    use crate::generator::OptionalElementType;

    #[test]
    fn complex_type_members() {
        let classes = generate_schema(
            r#"<xs:complexType name="Reading"><xs:sequence>
                 <xs:element name="temp" type="xs:float"/>
                 <xs:element name="humidity" type="xs:int" minOccurs="0"/>
                 <xs:element name="tags" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
                 <xs:element name="class" type="xs:string"/>
                 <xs:element name="serialize" type="xs:string"/>
               </xs:sequence>
               <xs:attribute name="unit" type="xs:string"/>
               </xs:complexType>"#,
            &Config::default(),
        );
        let reading = &classes[0];
        assert_eq!(reading.name, "Reading");
        assert_eq!(reading.kind, ClassKind::Complex);
        assert_eq!(reading.xml.as_ref().unwrap().name, "Reading");
        let names = reading.members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["temp", "humidity", "tags", "class_", "serialize_test", "unit"]);
        let temp = reading.member("temp").unwrap();
        assert_eq!(temp.cpp_type, "float");
        assert_eq!(temp.setter, "setTemp");
        assert_eq!(temp.value_kind, ValueKind::Builtin(BuiltinType::Float));
        assert_eq!(reading.member("humidity").unwrap().cpp_type, "std::optional<int>");
        let tags = reading.member("tags").unwrap();
        assert_eq!(tags.storage, Storage::List);
        assert_eq!(tags.cpp_type, "QList<QString>");
        let unit = reading.member("unit").unwrap();
        assert!(unit.is_attribute);
        assert_eq!(unit.cpp_type, "std::optional<QString>");
        assert!(reading.method("serialize").is_some());
        assert!(reading.method("deserialize").is_some());
    }

    #[test]
    fn optional_strategy_is_uniform() {
        let body = r#"<xs:complexType name="T"><xs:sequence>
                 <xs:element name="a" type="xs:int" minOccurs="0"/>
                 <xs:element name="b" type="xs:string" nillable="true"/>
                 <xs:element name="c" type="xs:int"/>
               </xs:sequence></xs:complexType>"#;
        let config = Config {
            optional_element_type: OptionalElementType::RawPointer,
            ..Config::default()
        };
        let classes = generate_schema(body, &config);
        let types = classes[0]
            .members
            .iter()
            .map(|m| m.cpp_type.as_str())
            .collect::<Vec<_>>();
        assert_eq!(types, vec!["int*", "QString*", "int"]);

        let config = Config {
            optional_element_type: OptionalElementType::BoostOptional,
            ..Config::default()
        };
        let classes = generate_schema(body, &config);
        assert_eq!(classes[0].members[0].cpp_type, "boost::optional<int>");
        assert_eq!(classes[0].members[2].cpp_type, "int");
    }

    #[test]
    fn inheritance_and_simple_content() {
        let classes = generate_schema(
            r#"<xs:complexType name="Base"><xs:sequence>
                 <xs:element name="id" type="xs:string"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Derived"><xs:complexContent><xs:extension base="t:Base">
                 <xs:sequence><xs:element name="extra" type="xs:int"/></xs:sequence>
               </xs:extension></xs:complexContent></xs:complexType>
               <xs:complexType name="Restricted"><xs:complexContent><xs:restriction base="t:Base">
                 <xs:sequence><xs:element name="id" type="xs:string"/></xs:sequence>
               </xs:restriction></xs:complexContent></xs:complexType>
               <xs:complexType name="Price"><xs:simpleContent><xs:extension base="xs:double">
                 <xs:attribute name="currency" type="xs:string" use="required"/>
               </xs:extension></xs:simpleContent></xs:complexType>"#,
            &Config::default(),
        );
        let find = |name: &str| classes.iter().find(|c| c.name == name).unwrap();
        assert_eq!(find("Derived").base.as_deref(), Some("Base"));
        assert_eq!(find("Derived").members.len(), 1);
        assert_eq!(find("Restricted").base, None);
        assert_eq!(find("Restricted").members.len(), 1);
        let price = find("Price");
        assert_eq!(price.members[0].name, "value");
        assert_eq!(price.members[0].cpp_type, "double");
        assert_eq!(price.members[1].name, "currency");
        assert_eq!(price.members[1].cpp_type, "QString");
        let position = |name: &str| classes.iter().position(|c| c.name == name).unwrap();
        assert!(position("Base") < position("Derived"));
    }

    #[test]
    fn enumerations_lists_and_wrappers() {
        let classes = generate_schema(
            r#"<xs:simpleType name="Color"><xs:restriction base="xs:string">
                 <xs:enumeration value="red"/>
                 <xs:enumeration value="dark-blue"/>
                 <xs:enumeration value="Red"/>
                 <xs:enumeration value="1"/>
               </xs:restriction></xs:simpleType>
               <xs:simpleType name="Ids"><xs:list itemType="xs:int"/></xs:simpleType>
               <xs:simpleType name="Code"><xs:restriction base="xs:string">
                 <xs:maxLength value="3"/>
               </xs:restriction></xs:simpleType>"#,
            &Config::default(),
        );
        let find = |name: &str| classes.iter().find(|c| c.name == name).unwrap();
        let color = find("Color");
        assert_eq!(color.kind, ClassKind::Enumeration);
        let names = color
            .enum_values
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Red", "DarkBlue", "Red_test", "_1"]);
        assert!(color.method("toString").is_some());
        let ids = find("Ids");
        assert_eq!(ids.kind, ClassKind::List);
        assert_eq!(ids.members[0].cpp_type, "QList<int>");
        let code = find("Code");
        assert_eq!(code.kind, ClassKind::SimpleWrapper);
        assert_eq!(code.members[0].cpp_type, "QString");
    }

    #[test]
    fn recursive_member_uses_indirection() {
        let classes = generate_schema(
            r#"<xs:complexType name="Node"><xs:sequence>
                 <xs:element name="name" type="xs:string"/>
                 <xs:element name="children" type="t:Node" minOccurs="0" maxOccurs="unbounded"/>
                 <xs:element name="parent" type="t:Node" minOccurs="0"/>
               </xs:sequence></xs:complexType>"#,
            &Config::default(),
        );
        let node = &classes[0];
        let children = node.member("children").unwrap();
        assert_eq!(children.storage, Storage::SharedList);
        assert_eq!(children.cpp_type, "QList<QSharedPointer<Node>>");
        assert_eq!(node.member("parent").unwrap().cpp_type, "QSharedPointer<Node>");
        assert_eq!(node.forward_declarations, vec!["Node".to_string()]);
    }

    #[test]
    fn unresolved_member_is_skipped() {
        let classes = generate_schema(
            r#"<xs:complexType name="T"><xs:sequence>
                 <xs:element name="ok" type="xs:int"/>
                 <xs:element name="lost" type="t:Missing"/>
               </xs:sequence></xs:complexType>"#,
            &Config::default(),
        );
        assert_eq!(classes[0].members.len(), 1);
        assert_eq!(classes[0].members[0].name, "ok");
    }

    #[test]
    fn anonymous_types_are_named_by_path() {
        let classes = generate_schema(
            r#"<xs:element name="order"><xs:complexType><xs:sequence>
                 <xs:element name="line"><xs:complexType><xs:sequence>
                   <xs:element name="qty" type="xs:int"/>
                 </xs:sequence></xs:complexType></xs:element>
               </xs:sequence></xs:complexType></xs:element>"#,
            &Config::default(),
        );
        let names = classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["OrderLine", "Order"]);
        assert_eq!(classes[1].members[0].value_type, "OrderLine");
        assert!(classes[0].xml.is_none());
    }
}
