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

//! XML Schema declarations.
//!
//! Document-local syntax tree of the XSD constructs needed for code
//! generation. QName values are already resolved against in-scope
//! namespace declarations; nothing here refers to other documents.
//!
//! Declarations derive `PartialEq` so that identical declarations
//! reached through different documents can be merged.

use crate::schema::qualified_name::WSDL;
use crate::schema::qualified_name::XSD;
use crate::schema::xml::Element;
use crate::schema::Context;
use crate::schema::Import;
use crate::schema::ImportKind;
use crate::schema::QualifiedName;
use crate::schema::SyntaxError;
use crate::schema::SyntaxErrorKind;

/// Form of local declarations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Form {
    /// Local names are not namespace-qualified.
    #[default]
    Unqualified,
    /// Local names are qualified with the target namespace.
    Qualified,
}

/// Upper bound of occurrences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MaxOccurs {
    /// Finite upper bound.
    Bounded(u32),
    /// `maxOccurs="unbounded"`.
    Unbounded,
}

/// Occurrence range of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occurs {
    /// `minOccurs`.
    pub min: u32,
    /// `maxOccurs`.
    pub max: MaxOccurs,
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONCE
    }
}

impl Occurs {
    /// Exactly one occurrence.
    pub const ONCE: Self = Self {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    /// Can appear more than once.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        match self.max {
            MaxOccurs::Bounded(v) => v > 1,
            MaxOccurs::Unbounded => true,
        }
    }

    /// Can be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.min == 0
    }
}

/// Reference to a type: by name or inline declaration.
#[derive(Debug, PartialEq)]
pub enum TypeUse {
    /// `type="..."`, `base="..."`, `itemType="..."`.
    Named(QualifiedName),
    /// Anonymous type declared in place.
    Inline(Box<TypeDecl>),
}

/// Constraining facet other than enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facet {
    /// Facet element name (`pattern`, `maxLength`, ...).
    pub name: String,
    /// Facet value.
    pub value: String,
}

/// Restriction facets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    /// Enumeration literals in document order.
    pub enumeration: Vec<String>,
    /// All other facets.
    pub others: Vec<Facet>,
}

/// Derivation of a simple type.
#[derive(Debug, PartialEq)]
pub enum SimpleDerivation {
    /// `xs:restriction`.
    Restriction {
        /// Base type.
        base: TypeUse,
        /// Facets.
        facets: Facets,
    },
    /// `xs:list`.
    List {
        /// Item type.
        item: TypeUse,
    },
    /// `xs:union`.
    Union {
        /// Member types.
        members: Vec<TypeUse>,
    },
}

/// `xs:simpleType`.
#[derive(Debug, PartialEq)]
pub struct SimpleType {
    /// Name (absent for anonymous types).
    pub name: Option<String>,
    /// Documentation.
    pub documentation: Option<String>,
    /// Derivation.
    pub derivation: SimpleDerivation,
}

/// Model group compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compositor {
    /// `xs:sequence`.
    Sequence,
    /// `xs:choice`.
    Choice,
    /// `xs:all`.
    All,
}

/// `xs:sequence`, `xs:choice` or `xs:all`.
#[derive(Debug, PartialEq)]
pub struct ModelGroup {
    /// Compositor.
    pub compositor: Compositor,
    /// Occurrence of the whole group.
    pub occurs: Occurs,
    /// Items.
    pub items: Vec<GroupItem>,
}

/// Item of a model group.
#[derive(Debug, PartialEq)]
pub enum GroupItem {
    /// Element particle.
    Element(ElementParticle),
    /// Nested model group.
    Group(ModelGroup),
    /// `xs:group ref="..."`.
    GroupRef {
        /// Referenced group.
        reference: QualifiedName,
        /// Occurrence.
        occurs: Occurs,
    },
    /// `xs:any`.
    Any {
        /// Occurrence.
        occurs: Occurs,
    },
}

/// Element inside a model group.
#[derive(Debug, PartialEq)]
pub struct ElementParticle {
    /// Occurrence.
    pub occurs: Occurs,
    /// Declaration or reference.
    pub element: ElementItem,
}

/// Local element declaration or reference to a global one.
#[derive(Debug, PartialEq)]
pub enum ElementItem {
    /// Local declaration.
    Local(ElementDecl),
    /// `ref="..."`.
    Ref(QualifiedName),
}

/// `xs:element`.
#[derive(Debug, PartialEq)]
pub struct ElementDecl {
    /// Local name.
    pub name: String,
    /// Namespace of the element name (`None` for unqualified locals).
    pub namespace: Option<String>,
    /// Type (absent means `xs:anyType`).
    pub type_use: Option<TypeUse>,
    /// `nillable`.
    pub nillable: bool,
    /// `abstract`.
    pub is_abstract: bool,
    /// `substitutionGroup`.
    pub substitution_group: Option<QualifiedName>,
    /// `default`.
    pub default: Option<String>,
    /// `fixed`.
    pub fixed: Option<String>,
    /// Documentation.
    pub documentation: Option<String>,
}

/// `use` of an attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttributeUsage {
    /// `use="optional"`.
    #[default]
    Optional,
    /// `use="required"`.
    Required,
    /// `use="prohibited"`.
    Prohibited,
}

/// `xs:attribute`.
#[derive(Debug, PartialEq)]
pub struct AttributeDecl {
    /// Local name.
    pub name: String,
    /// Namespace of the attribute name.
    pub namespace: Option<String>,
    /// Type (absent means `xs:anySimpleType`).
    pub type_use: Option<TypeUse>,
    /// Usage.
    pub usage: AttributeUsage,
    /// `default`.
    pub default: Option<String>,
    /// `fixed`.
    pub fixed: Option<String>,
}

/// Attribute-related item of a complex type or attribute group.
#[derive(Debug, PartialEq)]
pub enum AttributeItem {
    /// Local attribute.
    Local(AttributeDecl),
    /// Reference to a global attribute.
    Ref {
        /// Referenced attribute.
        reference: QualifiedName,
        /// Usage.
        usage: AttributeUsage,
    },
    /// `xs:attributeGroup ref="..."`.
    GroupRef(QualifiedName),
}

/// Content model of a complex type.
#[derive(Debug, PartialEq)]
pub enum ComplexContent {
    /// No element content.
    Empty,
    /// Direct model group.
    Group(ModelGroup),
    /// `xs:complexContent/xs:extension`.
    Extension {
        /// Base type.
        base: QualifiedName,
        /// Added particles.
        group: Option<ModelGroup>,
    },
    /// `xs:complexContent/xs:restriction`.
    Restriction {
        /// Base type.
        base: QualifiedName,
        /// Restated particles.
        group: Option<ModelGroup>,
    },
    /// `xs:simpleContent/xs:extension`.
    SimpleExtension {
        /// Base type.
        base: QualifiedName,
    },
    /// `xs:simpleContent/xs:restriction`.
    SimpleRestriction {
        /// Base type.
        base: QualifiedName,
        /// Facets.
        facets: Facets,
    },
}

/// `xs:complexType`.
#[derive(Debug, PartialEq)]
pub struct ComplexType {
    /// Name (absent for anonymous types).
    pub name: Option<String>,
    /// Documentation.
    pub documentation: Option<String>,
    /// `abstract`.
    pub is_abstract: bool,
    /// `mixed`.
    pub mixed: bool,
    /// Content.
    pub content: ComplexContent,
    /// Attributes, attribute group references.
    pub attributes: Vec<AttributeItem>,
    /// `xs:anyAttribute` is present.
    pub any_attribute: bool,
    /// Item type of a SOAP-encoded array (`wsdl:arrayType="tns:T[]"`).
    pub array_item: Option<QualifiedName>,
}

/// Simple or complex type declaration.
#[derive(Debug, PartialEq)]
pub enum TypeDecl {
    /// `xs:simpleType`.
    Simple(SimpleType),
    /// `xs:complexType`.
    Complex(ComplexType),
}

impl TypeDecl {
    /// Name of the declaration.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Simple(v) => v.name.as_deref(),
            Self::Complex(v) => v.name.as_deref(),
        }
    }
}

/// Top-level `xs:group`.
#[derive(Debug, PartialEq)]
pub struct GroupDecl {
    /// Name.
    pub name: String,
    /// Content.
    pub group: ModelGroup,
}

/// Top-level `xs:attributeGroup`.
#[derive(Debug, PartialEq)]
pub struct AttributeGroupDecl {
    /// Name.
    pub name: String,
    /// Attributes.
    pub attributes: Vec<AttributeItem>,
}

/// `xs:schema`.
#[derive(Debug, Default)]
pub struct Schema {
    /// Target namespace (possibly adopted from an including schema).
    pub target_namespace: String,
    /// `elementFormDefault`.
    pub element_form: Form,
    /// `attributeFormDefault`.
    pub attribute_form: Form,
    /// `xs:import`, `xs:include`, `xs:redefine`.
    pub imports: Vec<Import>,
    /// Named types.
    pub types: Vec<TypeDecl>,
    /// Global elements.
    pub elements: Vec<ElementDecl>,
    /// Global attributes.
    pub attributes: Vec<AttributeDecl>,
    /// Named model groups.
    pub groups: Vec<GroupDecl>,
    /// Named attribute groups.
    pub attribute_groups: Vec<AttributeGroupDecl>,
}

const FACETS: &[&str] = &[
    "pattern",
    "length",
    "minLength",
    "maxLength",
    "minInclusive",
    "maxInclusive",
    "minExclusive",
    "maxExclusive",
    "totalDigits",
    "fractionDigits",
    "whiteSpace",
];

fn xsd_children(e: &Element) -> impl Iterator<Item = &Element> {
    e.children_in(XSD).filter(|c| c.name != "annotation")
}

/// Parse `xs:schema` element.
pub(crate) fn parse_schema(e: &Element, ctx: &mut Context<'_>) -> Result<Schema, SyntaxError> {
    let mut schema = Schema {
        target_namespace: ctx.target_namespace.clone(),
        element_form: ctx.element_form,
        attribute_form: ctx.attribute_form,
        ..Schema::default()
    };
    for child in &e.children {
        if child.namespace.as_deref() != Some(XSD) {
            ctx.unsupported(child);
            continue;
        }
        match child.name.as_str() {
            "annotation" => {}
            "import" => schema.imports.push(Import {
                kind: ImportKind::Import,
                namespace: child.attribute("namespace").map(|v| v.trim().to_string()),
                location: child.attribute("schemaLocation").map(|v| v.trim().to_string()),
                importer_namespace: schema.target_namespace.clone(),
            }),
            kind @ ("include" | "redefine") => {
                if kind == "redefine" {
                    ctx.unsupported(child);
                }
                schema.imports.push(Import {
                    kind: if kind == "include" {
                        ImportKind::Include
                    } else {
                        ImportKind::Redefine
                    },
                    namespace: Some(schema.target_namespace.clone()),
                    location: Some(ctx.required(child, "schemaLocation")?.trim().to_string()),
                    importer_namespace: schema.target_namespace.clone(),
                });
            }
            "complexType" => schema
                .types
                .push(TypeDecl::Complex(parse_complex_type(child, ctx, true)?)),
            "simpleType" => schema
                .types
                .push(TypeDecl::Simple(parse_simple_type(child, ctx, true)?)),
            "element" => schema.elements.push(parse_element_decl(child, ctx, true)?),
            "attribute" => schema
                .attributes
                .push(parse_attribute_decl(child, ctx, true)?),
            "group" => {
                let name = ctx.required(child, "name")?.to_string();
                let group = xsd_children(child)
                    .find(|c| matches!(c.name.as_str(), "sequence" | "choice" | "all"))
                    .ok_or_else(|| {
                        ctx.error(child, SyntaxErrorKind::MissingChild("sequence, choice or all"))
                    })?;
                let group = parse_model_group(group, ctx)?;
                schema.groups.push(GroupDecl { name, group });
            }
            "attributeGroup" => {
                let name = ctx.required(child, "name")?.to_string();
                let mut attributes = Vec::new();
                let mut any = false;
                for item in xsd_children(child) {
                    parse_attribute_item(item, ctx, &mut attributes, &mut any)?;
                }
                schema
                    .attribute_groups
                    .push(AttributeGroupDecl { name, attributes });
            }
            _ => ctx.unsupported(child),
        }
    }
    Ok(schema)
}

fn parse_occurs(e: &Element, ctx: &Context<'_>) -> Result<Occurs, SyntaxError> {
    let min = e
        .attribute("minOccurs")
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| {
                ctx.error(e, SyntaxErrorKind::InvalidAttribute("minOccurs", v.into()))
            })
        })
        .transpose()?
        .unwrap_or(1);
    let max = e
        .attribute("maxOccurs")
        .map(|v| match v.trim() {
            "unbounded" => Ok(MaxOccurs::Unbounded),
            n => n.parse::<u32>().map(MaxOccurs::Bounded).map_err(|_| {
                ctx.error(e, SyntaxErrorKind::InvalidAttribute("maxOccurs", v.into()))
            }),
        })
        .transpose()?
        .unwrap_or(MaxOccurs::Bounded(1));
    if let MaxOccurs::Bounded(max) = max {
        if max < min {
            return Err(ctx.error(
                e,
                SyntaxErrorKind::InvalidAttribute("maxOccurs", max.to_string()),
            ));
        }
    }
    Ok(Occurs { min, max })
}

fn parse_form(
    e: &Element,
    ctx: &Context<'_>,
    name: &'static str,
    default: Form,
) -> Result<Form, SyntaxError> {
    match e.attribute(name).map(str::trim) {
        None => Ok(default),
        Some("qualified") => Ok(Form::Qualified),
        Some("unqualified") => Ok(Form::Unqualified),
        Some(v) => Err(ctx.error(e, SyntaxErrorKind::InvalidAttribute(name, v.into()))),
    }
}

/// Parse form defaults of the `xs:schema` element.
pub(crate) fn parse_form_defaults(
    e: &Element,
    ctx: &Context<'_>,
) -> Result<(Form, Form), SyntaxError> {
    Ok((
        parse_form(e, ctx, "elementFormDefault", Form::Unqualified)?,
        parse_form(e, ctx, "attributeFormDefault", Form::Unqualified)?,
    ))
}

fn inline_simple_type(
    e: &Element,
    ctx: &mut Context<'_>,
) -> Result<Option<TypeUse>, SyntaxError> {
    xsd_children(e)
        .find(|c| c.name == "simpleType")
        .map(|c| {
            parse_simple_type(c, ctx, false)
                .map(|t| TypeUse::Inline(Box::new(TypeDecl::Simple(t))))
        })
        .transpose()
}

fn parse_facets(e: &Element, ctx: &Context<'_>) -> Result<Facets, SyntaxError> {
    xsd_children(e).try_fold(Facets::default(), |mut facets, c| {
        if c.name == "enumeration" {
            facets
                .enumeration
                .push(ctx.required(c, "value")?.to_string());
        } else if FACETS.contains(&c.name.as_str()) {
            facets.others.push(Facet {
                name: c.name.clone(),
                value: ctx.required(c, "value")?.to_string(),
            });
        }
        Ok(facets)
    })
}

fn parse_simple_type(
    e: &Element,
    ctx: &mut Context<'_>,
    top_level: bool,
) -> Result<SimpleType, SyntaxError> {
    let name = if top_level {
        Some(ctx.required(e, "name")?.to_string())
    } else {
        e.attribute("name").map(ToString::to_string)
    };
    let derivation = xsd_children(e)
        .find(|c| matches!(c.name.as_str(), "restriction" | "list" | "union"))
        .ok_or_else(|| ctx.error(e, SyntaxErrorKind::MissingChild("restriction, list or union")))?;
    let derivation = match derivation.name.as_str() {
        "restriction" => {
            let base = match ctx.qname_attr(derivation, "base")? {
                Some(base) => TypeUse::Named(base),
                None => inline_simple_type(derivation, ctx)?.ok_or_else(|| {
                    ctx.error(
                        derivation,
                        SyntaxErrorKind::MissingOneOf("base", "simpleType"),
                    )
                })?,
            };
            SimpleDerivation::Restriction {
                base,
                facets: parse_facets(derivation, ctx)?,
            }
        }
        "list" => {
            let item = match ctx.qname_attr(derivation, "itemType")? {
                Some(item) => TypeUse::Named(item),
                None => inline_simple_type(derivation, ctx)?.ok_or_else(|| {
                    ctx.error(
                        derivation,
                        SyntaxErrorKind::MissingOneOf("itemType", "simpleType"),
                    )
                })?,
            };
            SimpleDerivation::List { item }
        }
        _ => {
            let mut members = derivation
                .attribute("memberTypes")
                .unwrap_or_default()
                .split_whitespace()
                .map(|v| ctx.qname(derivation, v).map(TypeUse::Named))
                .collect::<Result<Vec<_>, _>>()?;
            for c in xsd_children(derivation).filter(|c| c.name == "simpleType") {
                members.push(TypeUse::Inline(Box::new(TypeDecl::Simple(
                    parse_simple_type(c, ctx, false)?,
                ))));
            }
            SimpleDerivation::Union { members }
        }
    };
    Ok(SimpleType {
        name,
        documentation: Context::documentation(e),
        derivation,
    })
}

fn parse_complex_type(
    e: &Element,
    ctx: &mut Context<'_>,
    top_level: bool,
) -> Result<ComplexType, SyntaxError> {
    let name = if top_level {
        Some(ctx.required(e, "name")?.to_string())
    } else {
        e.attribute("name").map(ToString::to_string)
    };
    let mut result = ComplexType {
        name,
        documentation: Context::documentation(e),
        is_abstract: ctx.bool_attr(e, "abstract")?,
        mixed: ctx.bool_attr(e, "mixed")?,
        content: ComplexContent::Empty,
        attributes: Vec::new(),
        any_attribute: false,
        array_item: None,
    };
    for child in xsd_children(e) {
        match child.name.as_str() {
            "sequence" | "choice" | "all" => {
                result.content = ComplexContent::Group(parse_model_group(child, ctx)?);
            }
            "group" => {
                result.content = ComplexContent::Group(ModelGroup {
                    compositor: Compositor::Sequence,
                    occurs: Occurs::ONCE,
                    items: vec![parse_group_ref(child, ctx)?],
                });
            }
            "complexContent" | "simpleContent" => {
                result.mixed |= ctx.bool_attr(child, "mixed")?;
                let derivation = xsd_children(child)
                    .find(|c| matches!(c.name.as_str(), "extension" | "restriction"))
                    .ok_or_else(|| {
                        ctx.error(child, SyntaxErrorKind::MissingChild("extension or restriction"))
                    })?;
                let base = ctx
                    .qname_attr(derivation, "base")?
                    .ok_or_else(|| ctx.error(derivation, SyntaxErrorKind::MissingAttribute("base")))?;
                if let Some((c, array_type)) = xsd_children(derivation)
                    .filter(|c| c.name == "attribute")
                    .find_map(|c| c.attribute_ns(WSDL, "arrayType").map(|v| (c, v)))
                {
                    let item = array_type.trim().trim_end_matches(['[', ']', ',']);
                    result.array_item = Some(ctx.qname(c, item)?);
                }
                let mut group = None;
                for item in xsd_children(derivation) {
                    match item.name.as_str() {
                        "sequence" | "choice" | "all" => {
                            group = Some(parse_model_group(item, ctx)?);
                        }
                        "group" => {
                            group = Some(ModelGroup {
                                compositor: Compositor::Sequence,
                                occurs: Occurs::ONCE,
                                items: vec![parse_group_ref(item, ctx)?],
                            });
                        }
                        _ => {
                            parse_attribute_item(
                                item,
                                ctx,
                                &mut result.attributes,
                                &mut result.any_attribute,
                            )?;
                        }
                    }
                }
                result.content = match (child.name.as_str(), derivation.name.as_str()) {
                    ("complexContent", "extension") => ComplexContent::Extension { base, group },
                    ("complexContent", _) => ComplexContent::Restriction { base, group },
                    (_, "extension") => ComplexContent::SimpleExtension { base },
                    _ => ComplexContent::SimpleRestriction {
                        base,
                        facets: parse_facets(derivation, ctx)?,
                    },
                };
            }
            "attribute" | "attributeGroup" | "anyAttribute" => {
                parse_attribute_item(child, ctx, &mut result.attributes, &mut result.any_attribute)?;
            }
            _ => ctx.unsupported(child),
        }
    }
    Ok(result)
}

fn parse_group_ref(e: &Element, ctx: &Context<'_>) -> Result<GroupItem, SyntaxError> {
    let reference = ctx
        .qname_attr(e, "ref")?
        .ok_or_else(|| ctx.error(e, SyntaxErrorKind::MissingAttribute("ref")))?;
    Ok(GroupItem::GroupRef {
        reference,
        occurs: parse_occurs(e, ctx)?,
    })
}

fn parse_model_group(e: &Element, ctx: &mut Context<'_>) -> Result<ModelGroup, SyntaxError> {
    let compositor = match e.name.as_str() {
        "choice" => Compositor::Choice,
        "all" => Compositor::All,
        _ => Compositor::Sequence,
    };
    let mut items = Vec::new();
    for child in xsd_children(e) {
        match child.name.as_str() {
            "element" => items.push(GroupItem::Element(parse_element_particle(child, ctx)?)),
            "sequence" | "choice" | "all" => {
                items.push(GroupItem::Group(parse_model_group(child, ctx)?));
            }
            "group" => items.push(parse_group_ref(child, ctx)?),
            "any" => items.push(GroupItem::Any {
                occurs: parse_occurs(child, ctx)?,
            }),
            _ => ctx.unsupported(child),
        }
    }
    Ok(ModelGroup {
        compositor,
        occurs: parse_occurs(e, ctx)?,
        items,
    })
}

fn parse_element_particle(
    e: &Element,
    ctx: &mut Context<'_>,
) -> Result<ElementParticle, SyntaxError> {
    let occurs = parse_occurs(e, ctx)?;
    let element = match ctx.qname_attr(e, "ref")? {
        Some(reference) => ElementItem::Ref(reference),
        None if e.attribute("name").is_some() => ElementItem::Local(parse_element_decl(e, ctx, false)?),
        None => return Err(ctx.error(e, SyntaxErrorKind::MissingOneOf("name", "ref"))),
    };
    Ok(ElementParticle { occurs, element })
}

fn parse_element_decl(
    e: &Element,
    ctx: &mut Context<'_>,
    top_level: bool,
) -> Result<ElementDecl, SyntaxError> {
    let name = ctx.required(e, "name")?.trim().to_string();
    let namespace = if top_level
        || parse_form(e, ctx, "form", ctx.element_form)? == Form::Qualified
    {
        Some(ctx.target_namespace.clone())
    } else {
        None
    };
    let type_use = match ctx.qname_attr(e, "type")? {
        Some(t) => Some(TypeUse::Named(t)),
        None => match xsd_children(e).find(|c| matches!(c.name.as_str(), "complexType" | "simpleType")) {
            Some(c) if c.name == "complexType" => Some(TypeUse::Inline(Box::new(
                TypeDecl::Complex(parse_complex_type(c, ctx, false)?),
            ))),
            Some(c) => Some(TypeUse::Inline(Box::new(TypeDecl::Simple(
                parse_simple_type(c, ctx, false)?,
            )))),
            None => None,
        },
    };
    for c in xsd_children(e) {
        if matches!(c.name.as_str(), "key" | "keyref" | "unique") {
            ctx.unsupported(c);
        }
    }
    Ok(ElementDecl {
        name,
        namespace,
        type_use,
        nillable: ctx.bool_attr(e, "nillable")?,
        is_abstract: ctx.bool_attr(e, "abstract")?,
        substitution_group: ctx.qname_attr(e, "substitutionGroup")?,
        default: e.attribute("default").map(ToString::to_string),
        fixed: e.attribute("fixed").map(ToString::to_string),
        documentation: Context::documentation(e),
    })
}

fn parse_usage(e: &Element, ctx: &Context<'_>) -> Result<AttributeUsage, SyntaxError> {
    match e.attribute("use").map(str::trim) {
        None | Some("optional") => Ok(AttributeUsage::Optional),
        Some("required") => Ok(AttributeUsage::Required),
        Some("prohibited") => Ok(AttributeUsage::Prohibited),
        Some(v) => Err(ctx.error(e, SyntaxErrorKind::InvalidAttribute("use", v.into()))),
    }
}

fn parse_attribute_decl(
    e: &Element,
    ctx: &mut Context<'_>,
    top_level: bool,
) -> Result<AttributeDecl, SyntaxError> {
    let name = ctx.required(e, "name")?.trim().to_string();
    let namespace = if top_level
        || parse_form(e, ctx, "form", ctx.attribute_form)? == Form::Qualified
    {
        Some(ctx.target_namespace.clone())
    } else {
        None
    };
    let type_use = match ctx.qname_attr(e, "type")? {
        Some(t) => Some(TypeUse::Named(t)),
        None => inline_simple_type(e, ctx)?,
    };
    Ok(AttributeDecl {
        name,
        namespace,
        type_use,
        usage: parse_usage(e, ctx)?,
        default: e.attribute("default").map(ToString::to_string),
        fixed: e.attribute("fixed").map(ToString::to_string),
    })
}

fn parse_attribute_item(
    e: &Element,
    ctx: &mut Context<'_>,
    attributes: &mut Vec<AttributeItem>,
    any_attribute: &mut bool,
) -> Result<(), SyntaxError> {
    match e.name.as_str() {
        "attribute" => match ctx.qname_attr(e, "ref")? {
            Some(reference) => attributes.push(AttributeItem::Ref {
                reference,
                usage: parse_usage(e, ctx)?,
            }),
            None => attributes.push(AttributeItem::Local(parse_attribute_decl(e, ctx, false)?)),
        },
        "attributeGroup" => {
            let reference = ctx
                .qname_attr(e, "ref")?
                .ok_or_else(|| ctx.error(e, SyntaxErrorKind::MissingAttribute("ref")))?;
            attributes.push(AttributeItem::GroupRef(reference));
        }
        "anyAttribute" => *any_attribute = true,
        _ => ctx.unsupported(e),
    }
    Ok(())
}
