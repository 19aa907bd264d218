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

//! WSDL 1.1 definitions: messages, port types, bindings and services.

use crate::schema::qualified_name::WSDL;
use crate::schema::qualified_name::WSDL_SOAP11;
use crate::schema::qualified_name::WSDL_SOAP12;
use crate::schema::xml::Element;
use crate::schema::Context;
use crate::schema::QualifiedName;
use crate::schema::SyntaxError;
use crate::schema::SyntaxErrorKind;

/// Reference of a message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartReference {
    /// `element="..."` (document style).
    Element(QualifiedName),
    /// `type="..."` (RPC style).
    Type(QualifiedName),
}

/// `wsdl:part`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part name.
    pub name: String,
    /// Element or type of the part.
    pub reference: PartReference,
}

/// `wsdl:message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message name.
    pub name: String,
    /// Parts in document order.
    pub parts: Vec<Part>,
}

/// Message exchange pattern derived from input/output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPattern {
    /// Input only.
    OneWay,
    /// Input followed by output.
    RequestResponse,
    /// Output followed by input.
    SolicitResponse,
    /// Output only.
    Notification,
}

/// Input, output or fault of an abstract operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMessage {
    /// Optional `name` attribute.
    pub name: Option<String>,
    /// Referenced message.
    pub message: QualifiedName,
}

/// Abstract operation of a port type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name.
    pub name: String,
    /// Documentation.
    pub documentation: Option<String>,
    /// Input.
    pub input: Option<OperationMessage>,
    /// Output.
    pub output: Option<OperationMessage>,
    /// Faults.
    pub faults: Vec<OperationMessage>,
    /// Exchange pattern.
    pub pattern: OperationPattern,
}

/// `wsdl:portType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortType {
    /// Name.
    pub name: String,
    /// Operations in document order.
    pub operations: Vec<Operation>,
}

/// Protocol of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingProtocol {
    /// SOAP 1.1.
    Soap11,
    /// SOAP 1.2.
    Soap12,
    /// Any other binding extension, identified by its namespace.
    Other(String),
}

/// SOAP binding style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapStyle {
    /// `style="document"`.
    Document,
    /// `style="rpc"`.
    Rpc,
}

/// `use` of a SOAP body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyUse {
    /// `use="literal"`.
    Literal,
    /// `use="encoded"`.
    Encoded,
}

/// Operation of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOperation {
    /// Name of the bound operation.
    pub name: String,
    /// `soapAction`.
    pub soap_action: Option<String>,
    /// Per-operation style override.
    pub style: Option<SoapStyle>,
    /// Input body use.
    pub input: Option<BodyUse>,
    /// Output body use.
    pub output: Option<BodyUse>,
}

/// `wsdl:binding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Name.
    pub name: String,
    /// Bound port type.
    pub port_type: QualifiedName,
    /// Protocol.
    pub protocol: BindingProtocol,
    /// Default style.
    pub style: Option<SoapStyle>,
    /// Transport URI.
    pub transport: Option<String>,
    /// Operations.
    pub operations: Vec<BindingOperation>,
}

/// `wsdl:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Name.
    pub name: String,
    /// Binding used by the port.
    pub binding: QualifiedName,
    /// Endpoint address.
    pub address: Option<String>,
}

/// `wsdl:service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Name.
    pub name: String,
    /// Documentation.
    pub documentation: Option<String>,
    /// Ports in document order.
    pub ports: Vec<Port>,
}

fn is_soap(e: &Element, name: &str) -> bool {
    e.is(WSDL_SOAP11, name) || e.is(WSDL_SOAP12, name)
}

fn parse_style(e: &Element, ctx: &Context<'_>) -> Result<Option<SoapStyle>, SyntaxError> {
    match e.attribute("style").map(str::trim) {
        None => Ok(None),
        Some("document") => Ok(Some(SoapStyle::Document)),
        Some("rpc") => Ok(Some(SoapStyle::Rpc)),
        Some(v) => Err(ctx.error(e, SyntaxErrorKind::InvalidAttribute("style", v.into()))),
    }
}

fn parse_body_use(e: &Element, ctx: &Context<'_>) -> Result<Option<BodyUse>, SyntaxError> {
    let Some(body) = e.children.iter().find(|c| is_soap(c, "body")) else {
        return Ok(None);
    };
    match body.attribute("use").map(str::trim) {
        None | Some("literal") => Ok(Some(BodyUse::Literal)),
        Some("encoded") => Ok(Some(BodyUse::Encoded)),
        Some(v) => Err(ctx.error(body, SyntaxErrorKind::InvalidAttribute("use", v.into()))),
    }
}

pub(crate) fn parse_message(e: &Element, ctx: &Context<'_>) -> Result<Message, SyntaxError> {
    let parts = e
        .children_in(WSDL)
        .filter(|c| c.name == "part")
        .map(|part| {
            let name = ctx.required(part, "name")?.to_string();
            let reference = match (ctx.qname_attr(part, "element")?, ctx.qname_attr(part, "type")?) {
                (Some(element), _) => PartReference::Element(element),
                (None, Some(ty)) => PartReference::Type(ty),
                (None, None) => {
                    return Err(ctx.error(part, SyntaxErrorKind::MissingOneOf("element", "type")))
                }
            };
            Ok(Part { name, reference })
        })
        .collect::<Result<_, _>>()?;
    Ok(Message {
        name: ctx.required(e, "name")?.to_string(),
        parts,
    })
}

fn parse_operation_message(
    e: &Element,
    ctx: &Context<'_>,
) -> Result<OperationMessage, SyntaxError> {
    Ok(OperationMessage {
        name: e.attribute("name").map(ToString::to_string),
        message: ctx
            .qname_attr(e, "message")?
            .ok_or_else(|| ctx.error(e, SyntaxErrorKind::MissingAttribute("message")))?,
    })
}

pub(crate) fn parse_port_type(e: &Element, ctx: &Context<'_>) -> Result<PortType, SyntaxError> {
    let mut operations = Vec::new();
    for op in e.children_in(WSDL).filter(|c| c.name == "operation") {
        let mut input = None;
        let mut output = None;
        let mut faults = Vec::new();
        let mut input_first = None;
        for c in op.children_in(WSDL) {
            match c.name.as_str() {
                "input" => {
                    input_first.get_or_insert(true);
                    input = Some(parse_operation_message(c, ctx)?);
                }
                "output" => {
                    input_first.get_or_insert(false);
                    output = Some(parse_operation_message(c, ctx)?);
                }
                "fault" => faults.push(parse_operation_message(c, ctx)?),
                _ => {}
            }
        }
        let pattern = match (input.is_some(), output.is_some(), input_first) {
            (true, false, _) => OperationPattern::OneWay,
            (false, true, _) => OperationPattern::Notification,
            (true, true, Some(true)) => OperationPattern::RequestResponse,
            (true, true, _) => OperationPattern::SolicitResponse,
            (false, false, _) => {
                return Err(ctx.error(op, SyntaxErrorKind::MissingChild("input or output")))
            }
        };
        operations.push(Operation {
            name: ctx.required(op, "name")?.to_string(),
            documentation: Context::documentation(op),
            input,
            output,
            faults,
            pattern,
        });
    }
    Ok(PortType {
        name: ctx.required(e, "name")?.to_string(),
        operations,
    })
}

pub(crate) fn parse_binding(e: &Element, ctx: &Context<'_>) -> Result<Binding, SyntaxError> {
    let port_type = ctx
        .qname_attr(e, "type")?
        .ok_or_else(|| ctx.error(e, SyntaxErrorKind::MissingAttribute("type")))?;
    let mut protocol = None;
    let mut style = None;
    let mut transport = None;
    let mut operations = Vec::new();
    for c in &e.children {
        if c.name == "binding" && c.namespace.as_deref() != Some(WSDL) {
            protocol = Some(match c.namespace.as_deref() {
                Some(WSDL_SOAP11) => BindingProtocol::Soap11,
                Some(WSDL_SOAP12) => BindingProtocol::Soap12,
                ns => BindingProtocol::Other(ns.unwrap_or_default().to_string()),
            });
            style = parse_style(c, ctx)?;
            transport = c.attribute("transport").map(ToString::to_string);
        } else if c.is(WSDL, "operation") {
            let soap_operation = c.children.iter().find(|o| is_soap(o, "operation"));
            operations.push(BindingOperation {
                name: ctx.required(c, "name")?.to_string(),
                soap_action: soap_operation
                    .and_then(|o| o.attribute("soapAction"))
                    .map(ToString::to_string),
                style: soap_operation
                    .map(|o| parse_style(o, ctx))
                    .transpose()?
                    .flatten(),
                input: c
                    .child(WSDL, "input")
                    .map(|i| parse_body_use(i, ctx))
                    .transpose()?
                    .flatten(),
                output: c
                    .child(WSDL, "output")
                    .map(|o| parse_body_use(o, ctx))
                    .transpose()?
                    .flatten(),
            });
        }
    }
    Ok(Binding {
        name: ctx.required(e, "name")?.to_string(),
        port_type,
        protocol: protocol.unwrap_or_else(|| BindingProtocol::Other(String::new())),
        style,
        transport,
        operations,
    })
}

pub(crate) fn parse_service(e: &Element, ctx: &Context<'_>) -> Result<Service, SyntaxError> {
    let ports = e
        .children_in(WSDL)
        .filter(|c| c.name == "port")
        .map(|port| {
            Ok(Port {
                name: ctx.required(port, "name")?.to_string(),
                binding: ctx
                    .qname_attr(port, "binding")?
                    .ok_or_else(|| ctx.error(port, SyntaxErrorKind::MissingAttribute("binding")))?,
                address: port
                    .children
                    .iter()
                    .find(|a| a.name == "address")
                    .and_then(|a| a.attribute("location"))
                    .map(|v| v.trim().to_string()),
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(Service {
        name: ctx.required(e, "name")?.to_string(),
        documentation: Context::documentation(e),
        ports,
    })
}
