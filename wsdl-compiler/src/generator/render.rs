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

//! C++ text renderer.
//!
//! [`Header`] and [`Implementation`] render generated classes in the
//! order they were generated. Classes use `KDSoap` value and message
//! types for (de)serialization.

use crate::generator::class::Call;
use crate::generator::class::CallStyle;
use crate::generator::class::ClassKind;
use crate::generator::class::GeneratedClass;
use crate::generator::class::Member;
use crate::generator::class::Method;
use crate::generator::class::MethodKind;
use crate::generator::class::PartValue;
use crate::generator::class::SoapVersion;
use crate::generator::class::Storage;
use crate::generator::class::ValueKind;
use crate::generator::cpp_type::input_parameter;
use crate::generator::cpp_type::is_scalar;
use crate::generator::cpp_type::xsd_name;
use crate::compiler::BuiltinType;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

const BANNER: &str = "// Generated by wsdl2cpp. Do not edit.";

/// Renderer parameters.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// C++ namespace wrapping all classes.
    pub namespace: Option<String>,
    /// Export macro of class declarations.
    pub export_macro: Option<String>,
    /// File name of the header; implementation includes it.
    pub header_file: String,
}

/// Header with class declarations.
pub struct Header<'a> {
    classes: &'a [GeneratedClass],
    config: &'a Config,
}

impl<'a> Header<'a> {
    /// Create header renderer.
    #[must_use]
    pub const fn new(classes: &'a [GeneratedClass], config: &'a Config) -> Self {
        Self { classes, config }
    }
}

/// Implementation with method definitions.
pub struct Implementation<'a> {
    classes: &'a [GeneratedClass],
    config: &'a Config,
}

impl<'a> Implementation<'a> {
    /// Create implementation renderer.
    #[must_use]
    pub const fn new(classes: &'a [GeneratedClass], config: &'a Config) -> Self {
        Self { classes, config }
    }
}

/// `QString::fromLatin1("...")` literal.
struct Latin1<'a>(&'a str);

impl Display for Latin1<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "QString::fromLatin1(\"")?;
        for c in self.0.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                c => write!(f, "{c}")?,
            }
        }
        write!(f, "\")")
    }
}

fn guard(header_file: &str) -> String {
    let guard = header_file
        .rsplit('/')
        .next()
        .unwrap_or(header_file)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect::<String>();
    if guard.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{guard}")
    } else {
        guard
    }
}

fn includes(classes: &[GeneratedClass]) -> BTreeSet<&'static str> {
    let mut result = BTreeSet::from([
        "<QList>",
        "<QString>",
        "<KDSoapClient/KDSoapValue.h>",
    ]);
    let types = classes.iter().flat_map(|class| {
        class
            .members
            .iter()
            .map(|m| m.cpp_type.as_str())
            .chain(class.methods.iter().flat_map(|m| {
                std::iter::once(m.return_type.as_str())
                    .chain(m.parameters.iter().map(|p| p.cpp_type.as_str()))
            }))
    });
    for cpp_type in types {
        for (needle, include) in [
            ("QSharedPointer", "<QSharedPointer>"),
            ("std::optional", "<optional>"),
            ("boost::optional", "<boost/optional.hpp>"),
            ("KDDateTime", "<KDSoapClient/KDDateTime.h>"),
            ("KDQName", "<KDSoapClient/KDQName.h>"),
            ("QDate", "<QDate>"),
            ("QTime", "<QTime>"),
            ("QByteArray", "<QByteArray>"),
            ("QVariant", "<QVariant>"),
        ] {
            if cpp_type.contains(needle) {
                result.insert(include);
            }
        }
    }
    for class in classes {
        match class.kind {
            ClassKind::ClientService | ClassKind::Job => {
                result.extend([
                    "<QObject>",
                    "<KDSoapClient/KDSoapClientInterface.h>",
                    "<KDSoapClient/KDSoapMessage.h>",
                ]);
            }
            ClassKind::ServerBase => {
                result.extend([
                    "<QObject>",
                    "<KDSoapClient/KDSoapMessage.h>",
                    "<KDSoapServer/KDSoapServerObjectInterface.h>",
                ]);
            }
            ClassKind::Complex
            | ClassKind::SimpleWrapper
            | ClassKind::Enumeration
            | ClassKind::List => {}
        }
    }
    result
}

impl Display for Header<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let guard = guard(&self.config.header_file);
        writeln!(f, "{BANNER}")?;
        writeln!(f, "#ifndef {guard}")?;
        writeln!(f, "#define {guard}")?;
        writeln!(f)?;
        for include in includes(self.classes) {
            writeln!(f, "#include {include}")?;
        }
        writeln!(f)?;
        if let Some(ns) = &self.config.namespace {
            writeln!(f, "namespace {ns} {{")?;
            writeln!(f)?;
        }
        let forward = self
            .classes
            .iter()
            .flat_map(|c| &c.forward_declarations)
            .collect::<BTreeSet<_>>();
        for name in &forward {
            writeln!(f, "class {name};")?;
        }
        if !forward.is_empty() {
            writeln!(f)?;
        }
        let export = self
            .config
            .export_macro
            .as_ref()
            .map(|m| format!("{m} "))
            .unwrap_or_default();
        for class in self.classes {
            declaration(f, class, &export)?;
            writeln!(f)?;
        }
        if let Some(ns) = &self.config.namespace {
            writeln!(f, "}} // namespace {ns}")?;
            writeln!(f)?;
        }
        writeln!(f, "#endif // {guard}")
    }
}

fn documentation(f: &mut Formatter<'_>, indent: &str, doc: Option<&String>) -> FmtResult {
    if let Some(doc) = doc {
        writeln!(f, "{indent}/**")?;
        for line in doc.lines() {
            writeln!(f, "{indent} * {}", line.trim())?;
        }
        writeln!(f, "{indent} */")?;
    }
    Ok(())
}

fn parameters(method: &Method) -> String {
    method
        .parameters
        .iter()
        .map(|p| {
            if p.name == "parent" && method.kind == MethodKind::Constructor {
                format!("{} {} = nullptr", p.cpp_type, p.name)
            } else {
                format!("{} {}", p.cpp_type, p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn definition_parameters(method: &Method) -> String {
    method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.cpp_type, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn method_declaration(f: &mut Formatter<'_>, method: &Method) -> FmtResult {
    documentation(f, "    ", method.documentation.as_ref())?;
    let constant = if method.is_const { " const" } else { "" };
    match method.kind {
        MethodKind::Constructor => {
            let explicit = if method.parameters.is_empty() { "" } else { "explicit " };
            writeln!(f, "    {explicit}{}({});", method.name, parameters(method))
        }
        MethodKind::PureVirtual => writeln!(
            f,
            "    virtual {} {}({}) = 0;",
            method.return_type,
            method.name,
            parameters(method)
        ),
        MethodKind::Dispatch => writeln!(
            f,
            "    {} {}({}) override;",
            method.return_type,
            method.name,
            parameters(method)
        ),
        _ => writeln!(
            f,
            "    {} {}({}){constant};",
            method.return_type,
            method.name,
            parameters(method)
        ),
    }
}

/// Optional member stored as an owning raw pointer.
fn is_raw_pointer(member: &Member) -> bool {
    member.storage == Storage::Optional && member.cpp_type.ends_with('*')
}

fn owns_pointers(class: &GeneratedClass) -> bool {
    class.members.iter().any(is_raw_pointer)
}

fn setter_parameter(member: &Member) -> String {
    match member.storage {
        Storage::Value => input_parameter(&member.cpp_type, is_scalar(member.value_kind)),
        Storage::Optional if member.cpp_type.ends_with('*') => member.cpp_type.clone(),
        Storage::Optional | Storage::List | Storage::Shared | Storage::SharedList => {
            input_parameter(&member.cpp_type, false)
        }
    }
}

fn accessor_declarations(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    for member in &class.members {
        documentation(f, "    ", member.documentation.as_ref())?;
        writeln!(
            f,
            "    void {}({} {});",
            member.setter,
            setter_parameter(member),
            member.name
        )?;
        writeln!(f, "    {} {}() const;", member.cpp_type, member.name)?;
    }
    Ok(())
}

fn member_fields(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    for member in &class.members {
        if member.cpp_type.ends_with('*') {
            writeln!(f, "    {} m_{} = nullptr;", member.cpp_type, member.name)?;
        } else if member.storage == Storage::Value && is_scalar(member.value_kind) {
            writeln!(f, "    {} m_{}{{}};", member.cpp_type, member.name)?;
        } else {
            writeln!(f, "    {} m_{};", member.cpp_type, member.name)?;
        }
    }
    Ok(())
}

fn declaration(f: &mut Formatter<'_>, class: &GeneratedClass, export: &str) -> FmtResult {
    documentation(f, "", class.documentation.as_ref())?;
    let name = &class.name;
    match class.kind {
        ClassKind::Complex | ClassKind::SimpleWrapper | ClassKind::List => {
            let base = class
                .base
                .as_ref()
                .map(|b| format!(" : public {b}"))
                .unwrap_or_default();
            writeln!(f, "class {export}{name}{base}\n{{\npublic:")?;
            writeln!(f, "    {name}();")?;
            if owns_pointers(class) {
                writeln!(f, "    {name}(const {name}& other);")?;
                writeln!(f, "    {name}& operator=(const {name}& other);")?;
                writeln!(f, "    ~{name}();")?;
            }
            accessor_declarations(f, class)?;
            for method in &class.methods {
                method_declaration(f, method)?;
            }
            if !class.members.is_empty() {
                writeln!(f, "\nprivate:")?;
                member_fields(f, class)?;
            }
            writeln!(f, "}};")
        }
        ClassKind::Enumeration => {
            writeln!(f, "class {export}{name}\n{{\npublic:")?;
            writeln!(f, "    enum Type {{")?;
            for value in &class.enum_values {
                writeln!(f, "        {},", value.name)?;
            }
            writeln!(f, "    }};")?;
            writeln!(f, "    {name}();")?;
            writeln!(f, "    {name}(Type type);")?;
            writeln!(f, "    operator Type() const;")?;
            writeln!(f, "    Type type() const;")?;
            for method in &class.methods {
                method_declaration(f, method)?;
            }
            writeln!(f, "\nprivate:")?;
            match class.enum_values.first() {
                Some(first) => writeln!(f, "    Type m_type = {};", first.name)?,
                None => writeln!(f, "    Type m_type{{}};")?,
            }
            writeln!(f, "}};")
        }
        ClassKind::ClientService => {
            writeln!(f, "class {export}{name} : public QObject\n{{\n    Q_OBJECT\npublic:")?;
            for method in class.methods.iter().filter(|m| m.kind != MethodKind::Signal) {
                method_declaration(f, method)?;
            }
            writeln!(f, "    ~{name}();")?;
            writeln!(f, "    KDSoapClientInterface* clientInterface();")?;
            signals(f, class)?;
            writeln!(f, "\nprivate:")?;
            writeln!(f, "    QString m_endPoint;")?;
            writeln!(f, "    KDSoapClientInterface* m_clientInterface = nullptr;")?;
            writeln!(f, "    KDSoapMessage m_lastReply;")?;
            writeln!(f, "}};")
        }
        ClassKind::Job => {
            writeln!(f, "class {export}{name} : public QObject\n{{\n    Q_OBJECT\npublic:")?;
            accessor_declarations(f, class)?;
            for method in class.methods.iter().filter(|m| m.kind != MethodKind::Signal) {
                method_declaration(f, method)?;
            }
            signals(f, class)?;
            writeln!(f, "\nprivate:")?;
            if let Some(service) = class
                .methods
                .iter()
                .find(|m| m.kind == MethodKind::Constructor)
                .and_then(|m| m.parameters.first())
            {
                writeln!(f, "    {} m_service;", service.cpp_type)?;
            }
            member_fields(f, class)?;
            writeln!(f, "}};")
        }
        ClassKind::ServerBase => {
            writeln!(
                f,
                "class {export}{name} : public QObject, public KDSoapServerObjectInterface\n{{"
            )?;
            writeln!(f, "    Q_OBJECT\n    Q_INTERFACES(KDSoapServerObjectInterface)\npublic:")?;
            for method in &class.methods {
                method_declaration(f, method)?;
            }
            writeln!(f, "}};")
        }
    }
}

fn signals(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let mut signals = class
        .methods
        .iter()
        .filter(|m| m.kind == MethodKind::Signal)
        .peekable();
    if signals.peek().is_some() {
        writeln!(f, "\nQ_SIGNALS:")?;
        for method in signals {
            method_declaration(f, method)?;
        }
    }
    Ok(())
}

impl Display for Implementation<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{BANNER}")?;
        writeln!(f, "#include \"{}\"", self.config.header_file)?;
        writeln!(f)?;
        writeln!(f, "#include <KDSoapClient/KDSoapNamespaceManager.h>")?;
        if self
            .classes
            .iter()
            .any(|c| matches!(c.kind, ClassKind::ClientService | ClassKind::Job))
        {
            writeln!(f, "#include <KDSoapClient/KDSoapPendingCallWatcher.h>")?;
        }
        writeln!(f, "#include <QStringList>")?;
        writeln!(f)?;
        if let Some(ns) = &self.config.namespace {
            writeln!(f, "namespace {ns} {{")?;
            writeln!(f)?;
        }
        for class in self.classes {
            definition(f, class)?;
        }
        if let Some(ns) = &self.config.namespace {
            writeln!(f, "}} // namespace {ns}")?;
        }
        Ok(())
    }
}

fn definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    match class.kind {
        ClassKind::Complex | ClassKind::SimpleWrapper | ClassKind::List => {
            writeln!(f, "{0}::{0}() = default;\n", class.name)?;
            if owns_pointers(class) {
                ownership_definitions(f, class)?;
            }
            accessor_definitions(f, class)?;
            serialize_definition(f, class)?;
            deserialize_definition(f, class)
        }
        ClassKind::Enumeration => enumeration_definition(f, class),
        ClassKind::ClientService => client_definition(f, class),
        ClassKind::Job => job_definition(f, class),
        ClassKind::ServerBase => server_definition(f, class),
    }
}

fn copy_expr(member: &Member) -> String {
    if is_raw_pointer(member) {
        format!(
            "other.m_{0} ? new {1}(*other.m_{0}) : nullptr",
            member.name, member.value_type
        )
    } else {
        format!("other.m_{}", member.name)
    }
}

/// Copy constructor, copy assignment and destructor of a class owning the
/// pointees of its raw-pointer members.
fn ownership_definitions(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let name = &class.name;
    let initializers = class
        .base
        .iter()
        .map(|base| format!("{base}(other)"))
        .chain(
            class
                .members
                .iter()
                .map(|m| format!("m_{}({})", m.name, copy_expr(m))),
        )
        .collect::<Vec<_>>();
    writeln!(
        f,
        "{name}::{name}(const {name}& other)\n    : {}\n{{\n}}\n",
        initializers.join("\n    , ")
    )?;
    writeln!(f, "{name}& {name}::operator=(const {name}& other)\n{{")?;
    writeln!(f, "    if (this == &other) {{\n        return *this;\n    }}")?;
    if let Some(base) = &class.base {
        writeln!(f, "    {base}::operator=(other);")?;
    }
    for member in &class.members {
        if is_raw_pointer(member) {
            writeln!(f, "    delete m_{};", member.name)?;
        }
        writeln!(f, "    m_{} = {};", member.name, copy_expr(member))?;
    }
    writeln!(f, "    return *this;\n}}\n")?;
    writeln!(f, "{name}::~{name}()\n{{")?;
    for member in class.members.iter().filter(|m| is_raw_pointer(m)) {
        writeln!(f, "    delete m_{};", member.name)?;
    }
    writeln!(f, "}}\n")
}

fn accessor_definitions(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    for member in &class.members {
        if is_raw_pointer(member) {
            writeln!(
                f,
                "void {}::{}({} {})\n{{\n    if (m_{3} != {3}) {{\n        delete m_{3};\n        m_{3} = {3};\n    }}\n}}\n",
                class.name,
                member.setter,
                setter_parameter(member),
                member.name
            )?;
            writeln!(
                f,
                "{} {}::{}() const\n{{\n    return m_{2};\n}}\n",
                member.cpp_type, class.name, member.name
            )?;
            continue;
        }
        writeln!(
            f,
            "void {}::{}({} {})\n{{\n    m_{3} = {3};\n}}\n",
            class.name,
            member.setter,
            setter_parameter(member),
            member.name
        )?;
        writeln!(
            f,
            "{} {}::{}() const\n{{\n    return m_{2};\n}}\n",
            member.cpp_type, class.name, member.name
        )?;
    }
    Ok(())
}

/// Expression creating `KDSoapValue` named `name` of one value `expr`.
fn value_expr(kind: ValueKind, value_type: &str, name: &str, expr: &str) -> String {
    match kind {
        ValueKind::Builtin(BuiltinType::AnyType) => format!(
            "KDSoapValue({}, {expr}.value(), {expr}.namespaceUri(), {expr}.type())",
            Latin1(name)
        ),
        ValueKind::Builtin(builtin) => format!(
            "KDSoapValue({}, QVariant::fromValue<{value_type}>({expr}), KDSoapNamespaceManager::xmlSchema2001(), {})",
            Latin1(name),
            Latin1(xsd_name(builtin))
        ),
        ValueKind::Class | ValueKind::Enumeration => {
            format!("{expr}.serialize({})", Latin1(name))
        }
    }
}

/// Statements declaring `item` read from `source`.
fn read_item(f: &mut Formatter<'_>, indent: &str, kind: ValueKind, value_type: &str, source: &str) -> FmtResult {
    match kind {
        ValueKind::Builtin(BuiltinType::AnyType) => {
            writeln!(f, "{indent}const KDSoapValue item = {source};")
        }
        ValueKind::Builtin(_) => writeln!(
            f,
            "{indent}const {value_type} item = {source}.value().value<{value_type}>();"
        ),
        ValueKind::Class | ValueKind::Enumeration => {
            writeln!(f, "{indent}{value_type} item;")?;
            writeln!(f, "{indent}item.deserialize({source});")
        }
    }
}

fn serialize_member(f: &mut Formatter<'_>, member: &Member) -> FmtResult {
    let list = if member.is_attribute { "attribs" } else { "args" };
    let append = |f: &mut Formatter<'_>, indent: &str, expr: &str| -> FmtResult {
        writeln!(
            f,
            "{indent}KDSoapValue value = {};",
            value_expr(member.value_kind, &member.value_type, &member.xml.name, expr)
        )?;
        if let Some(ns) = &member.xml.namespace {
            writeln!(f, "{indent}value.setNamespaceUri({});", Latin1(ns))?;
            writeln!(f, "{indent}value.setQualified(true);")?;
        }
        writeln!(f, "{indent}{list}.append(value);")
    };
    let field = format!("m_{}", member.name);
    match member.storage {
        Storage::Value => {
            writeln!(f, "    {{")?;
            append(f, "        ", &field)?;
            writeln!(f, "    }}")
        }
        Storage::Optional | Storage::Shared => {
            writeln!(f, "    if ({field}) {{")?;
            append(f, "        ", &format!("(*{field})"))?;
            writeln!(f, "    }}")
        }
        Storage::List => {
            writeln!(f, "    for (const auto& item : {field}) {{")?;
            append(f, "        ", "item")?;
            writeln!(f, "    }}")
        }
        Storage::SharedList => {
            writeln!(f, "    for (const auto& item : {field}) {{")?;
            writeln!(f, "        if (!item) {{\n            continue;\n        }}")?;
            append(f, "        ", "(*item)")?;
            writeln!(f, "    }}")
        }
    }
}

fn type_name_args(class: &GeneratedClass) -> String {
    class.xml.as_ref().map_or_else(
        || "QString(), QString()".to_string(),
        |xml| {
            format!(
                "{}, {}",
                Latin1(xml.namespace.as_deref().unwrap_or_default()),
                Latin1(&xml.name)
            )
        },
    )
}

fn serialize_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    writeln!(
        f,
        "KDSoapValue {}::serialize(const QString& valueName) const\n{{",
        class.name
    )?;
    let content = class.members.iter().find(|m| m.is_content);
    let type_args = type_name_args(class);
    match (&class.base, content) {
        (Some(base), _) => {
            writeln!(f, "    KDSoapValue mainValue = {base}::serialize(valueName);")?;
            if let Some(xml) = &class.xml {
                writeln!(
                    f,
                    "    mainValue.setType({}, {});",
                    Latin1(xml.namespace.as_deref().unwrap_or_default()),
                    Latin1(&xml.name)
                )?;
            }
        }
        (None, Some(content)) if content.storage == Storage::List => {
            writeln!(f, "    QStringList entries;")?;
            writeln!(f, "    for (const auto& item : m_{}) {{", content.name)?;
            let text = match content.value_kind {
                ValueKind::Builtin(_) => {
                    format!("QVariant::fromValue<{}>(item).toString()", content.value_type)
                }
                ValueKind::Class | ValueKind::Enumeration => {
                    "item.serialize(QString()).value().toString()".to_string()
                }
            };
            writeln!(f, "        entries.append({text});\n    }}")?;
            writeln!(
                f,
                "    KDSoapValue mainValue(valueName, entries.join(QLatin1Char(' ')), {type_args});"
            )?;
        }
        (None, Some(content)) => {
            let value = match content.value_kind {
                ValueKind::Builtin(_) => format!(
                    "QVariant::fromValue<{}>(m_{})",
                    content.value_type, content.name
                ),
                ValueKind::Class | ValueKind::Enumeration => {
                    format!("m_{}.serialize(QString()).value()", content.name)
                }
            };
            writeln!(f, "    KDSoapValue mainValue(valueName, {value}, {type_args});")?;
        }
        (None, None) => {
            writeln!(f, "    KDSoapValue mainValue(valueName, QVariant(), {type_args});")?;
        }
    }
    let fields = class.members.iter().filter(|m| !m.is_content);
    if class.members.iter().any(|m| !m.is_content && !m.is_attribute) {
        writeln!(f, "    KDSoapValueList& args = mainValue.childValues();")?;
    }
    if class.members.iter().any(|m| m.is_attribute) {
        writeln!(f, "    QList<KDSoapValue>& attribs = mainValue.childValues().attributes();")?;
    }
    for member in fields {
        serialize_member(f, member)?;
    }
    writeln!(f, "    return mainValue;\n}}\n")
}

fn store_item(f: &mut Formatter<'_>, indent: &str, member: &Member) -> FmtResult {
    let field = format!("m_{}", member.name);
    let value_type = &member.value_type;
    match member.storage {
        Storage::Optional if member.cpp_type.ends_with('*') => {
            writeln!(f, "{indent}delete {field};")?;
            writeln!(f, "{indent}{field} = new {value_type}(item);")
        }
        Storage::Value | Storage::Optional => writeln!(f, "{indent}{field} = item;"),
        Storage::List => writeln!(f, "{indent}{field}.append(item);"),
        Storage::Shared => {
            writeln!(f, "{indent}{field} = QSharedPointer<{value_type}>::create(item);")
        }
        Storage::SharedList => writeln!(
            f,
            "{indent}{field}.append(QSharedPointer<{value_type}>::create(item));"
        ),
    }
}

fn deserialize_fields<'a>(
    f: &mut Formatter<'_>,
    source: &str,
    members: impl Iterator<Item = &'a Member>,
) -> FmtResult {
    let members = members.collect::<Vec<_>>();
    if members.is_empty() {
        return Ok(());
    }
    for member in members.iter().filter(|m| matches!(m.storage, Storage::List | Storage::SharedList)) {
        writeln!(f, "    m_{}.clear();", member.name)?;
    }
    writeln!(f, "    for (const KDSoapValue& val : {source}) {{")?;
    writeln!(f, "        const QString name = val.name();")?;
    for (i, member) in members.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "} else if" };
        writeln!(
            f,
            "        {keyword} (name == QLatin1String(\"{}\")) {{",
            member.xml.name
        )?;
        read_item(f, "            ", member.value_kind, &member.value_type, "val")?;
        store_item(f, "            ", member)?;
    }
    writeln!(f, "        }}\n    }}")
}

fn deserialize_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    writeln!(
        f,
        "void {}::deserialize(const KDSoapValue& mainValue)\n{{",
        class.name
    )?;
    if let Some(base) = &class.base {
        writeln!(f, "    {base}::deserialize(mainValue);")?;
    }
    if let Some(content) = class.members.iter().find(|m| m.is_content) {
        if content.storage == Storage::List {
            writeln!(
                f,
                "    const QStringList entries = mainValue.value().toString().split(QLatin1Char(' '), Qt::SkipEmptyParts);"
            )?;
            writeln!(f, "    m_{}.clear();", content.name)?;
            writeln!(f, "    for (const QString& entry : entries) {{")?;
            read_item(
                f,
                "        ",
                content.value_kind,
                &content.value_type,
                "KDSoapValue(QString(), entry)",
            )?;
            writeln!(f, "        m_{}.append(item);\n    }}", content.name)?;
        } else {
            writeln!(f, "    {{")?;
            read_item(f, "        ", content.value_kind, &content.value_type, "mainValue")?;
            writeln!(f, "        m_{} = item;\n    }}", content.name)?;
        }
    }
    deserialize_fields(
        f,
        "mainValue.childValues()",
        class.members.iter().filter(|m| !m.is_content && !m.is_attribute),
    )?;
    deserialize_fields(
        f,
        "mainValue.childValues().attributes()",
        class.members.iter().filter(|m| m.is_attribute),
    )?;
    writeln!(f, "}}\n")
}

fn enumeration_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let name = &class.name;
    writeln!(f, "{name}::{name}() = default;\n")?;
    writeln!(f, "{name}::{name}(Type type)\n    : m_type(type)\n{{\n}}\n")?;
    writeln!(f, "{name}::operator Type() const\n{{\n    return m_type;\n}}\n")?;
    writeln!(f, "{name}::Type {name}::type() const\n{{\n    return m_type;\n}}\n")?;
    writeln!(f, "QString {name}::toString() const\n{{\n    switch (m_type) {{")?;
    for value in &class.enum_values {
        writeln!(f, "    case {}:\n        return {};", value.name, Latin1(&value.literal))?;
    }
    writeln!(f, "    }}\n    return QString();\n}}\n")?;
    writeln!(f, "bool {name}::fromString(const QString& text)\n{{")?;
    for value in &class.enum_values {
        writeln!(
            f,
            "    if (text == {}) {{\n        m_type = {};\n        return true;\n    }}",
            Latin1(&value.literal),
            value.name
        )?;
    }
    writeln!(f, "    return false;\n}}\n")?;
    writeln!(
        f,
        "KDSoapValue {name}::serialize(const QString& valueName) const\n{{\n    return KDSoapValue(valueName, toString(), {});\n}}\n",
        type_name_args(class)
    )?;
    writeln!(
        f,
        "void {name}::deserialize(const KDSoapValue& mainValue)\n{{\n    fromString(mainValue.value().toString());\n}}\n"
    )
}

/// Statements filling `message` with request parts.
fn encode(f: &mut Formatter<'_>, indent: &str, call: &Call, target: &str, args: &[String]) -> FmtResult {
    let parts = call.request.iter().zip(args);
    match (call.style, call.request.len()) {
        (CallStyle::Document, 1) => {
            for (part, arg) in parts {
                writeln!(
                    f,
                    "{indent}{target} = {};",
                    value_expr(part.value_kind, &part.value_type, &part.xml.name, arg)
                )?;
                writeln!(f, "{indent}{target}.setQualified(true);")?;
                if let Some(ns) = &part.xml.namespace {
                    writeln!(f, "{indent}{target}.setNamespaceUri({});", Latin1(ns))?;
                }
            }
        }
        _ => {
            for (part, arg) in parts {
                writeln!(
                    f,
                    "{indent}{target}.childValues().append({});",
                    value_expr(part.value_kind, &part.value_type, &part.xml.name, arg)
                )?;
            }
        }
    }
    if call.encoded {
        writeln!(f, "{indent}{target}.setUse(KDSoapMessage::EncodedUse);")?;
    }
    Ok(())
}

/// Statements assigning response parts read from `source` to `targets`.
fn decode(
    f: &mut Formatter<'_>,
    indent: &str,
    style: CallStyle,
    parts: &[PartValue],
    source: &str,
    targets: &[String],
) -> FmtResult {
    for (part, target) in parts.iter().zip(targets) {
        let source = if style == CallStyle::Document && parts.len() == 1 {
            source.to_string()
        } else {
            format!(
                "{source}.childValues().child(QLatin1String(\"{}\"))",
                part.xml.name
            )
        };
        writeln!(f, "{indent}{{")?;
        read_item(f, &format!("{indent}    "), part.value_kind, &part.value_type, &source)?;
        writeln!(f, "{indent}    {target} = item;\n{indent}}}")?;
    }
    Ok(())
}

fn action(f: &mut Formatter<'_>, call: &Call) -> FmtResult {
    writeln!(
        f,
        "    const QString action = {};",
        Latin1(call.soap_action.as_deref().unwrap_or_default())
    )?;
    writeln!(f, "    KDSoapMessage message;")
}

fn client_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let name = &class.name;
    let (endpoint, namespace, soap12) = class.service.as_ref().map_or(
        (String::new(), String::new(), false),
        |s| {
            (
                s.endpoint.clone().unwrap_or_default(),
                s.namespace.clone(),
                s.soap_version == SoapVersion::Soap12,
            )
        },
    );
    writeln!(
        f,
        "{name}::{name}(QObject* parent)\n    : QObject(parent)\n    , m_endPoint({})\n{{\n}}\n",
        Latin1(&endpoint)
    )?;
    writeln!(f, "{name}::~{name}()\n{{\n    delete m_clientInterface;\n}}\n")?;
    writeln!(
        f,
        "void {name}::setEndPoint(const QString& endPoint)\n{{\n    m_endPoint = endPoint;\n    if (m_clientInterface) {{\n        m_clientInterface->setEndPoint(endPoint);\n    }}\n}}\n"
    )?;
    writeln!(f, "QString {name}::endPoint() const\n{{\n    return m_endPoint;\n}}\n")?;
    writeln!(
        f,
        "QString {name}::lastError() const\n{{\n    return m_lastReply.isFault() ? m_lastReply.faultAsString() : QString();\n}}\n"
    )?;
    writeln!(f, "KDSoapClientInterface* {name}::clientInterface()\n{{")?;
    writeln!(f, "    if (!m_clientInterface) {{")?;
    writeln!(
        f,
        "        m_clientInterface = new KDSoapClientInterface(m_endPoint, {});",
        Latin1(&namespace)
    )?;
    if soap12 {
        writeln!(
            f,
            "        m_clientInterface->setSoapVersion(KDSoapClientInterface::SOAP1_2);"
        )?;
    }
    writeln!(f, "    }}\n    return m_clientInterface;\n}}\n")?;

    for (i, method) in class.methods.iter().enumerate() {
        let Some(call) = &method.call else {
            continue;
        };
        match method.kind {
            MethodKind::Sync => sync_definition(f, name, method, call)?,
            MethodKind::Async => {
                let done = class.methods.get(i + 1).filter(|m| m.kind == MethodKind::Signal);
                let error = class.methods.get(i + 2).filter(|m| m.kind == MethodKind::Signal);
                async_definition(f, name, method, call, done.zip(error))?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn input_names(method: &Method) -> Vec<String> {
    method
        .parameters
        .iter()
        .filter(|p| !p.output)
        .map(|p| p.name.clone())
        .collect()
}

fn sync_definition(f: &mut Formatter<'_>, class: &str, method: &Method, call: &Call) -> FmtResult {
    let returns = method.return_type != "void";
    writeln!(
        f,
        "{} {class}::{}({})\n{{",
        method.return_type,
        method.name,
        definition_parameters(method)
    )?;
    action(f, call)?;
    encode(f, "    ", call, "message", &input_names(method))?;
    if call.one_way {
        writeln!(
            f,
            "    clientInterface()->callNoReply({}, message, action);\n}}\n",
            Latin1(&call.operation)
        )?;
        return Ok(());
    }
    writeln!(
        f,
        "    m_lastReply = clientInterface()->call({}, message, action);",
        Latin1(&call.operation)
    )?;
    if returns {
        writeln!(
            f,
            "    if (m_lastReply.isFault()) {{\n        return {}();\n    }}",
            method.return_type
        )?;
        writeln!(f, "    {} result;", method.return_type)?;
        decode(f, "    ", call.style, &call.response, "m_lastReply", &["result".to_string()])?;
        writeln!(f, "    return result;\n}}\n")
    } else {
        writeln!(f, "    if (m_lastReply.isFault()) {{\n        return;\n    }}")?;
        let outputs = method
            .parameters
            .iter()
            .filter(|p| p.output)
            .map(|p| p.name.clone())
            .collect::<Vec<_>>();
        decode(f, "    ", call.style, &call.response, "m_lastReply", &outputs)?;
        writeln!(f, "}}\n")
    }
}

fn async_definition(
    f: &mut Formatter<'_>,
    class: &str,
    method: &Method,
    call: &Call,
    signals: Option<(&Method, &Method)>,
) -> FmtResult {
    writeln!(
        f,
        "void {class}::{}({})\n{{",
        method.name,
        definition_parameters(method)
    )?;
    action(f, call)?;
    encode(f, "    ", call, "message", &input_names(method))?;
    let Some((done, error)) = signals.filter(|_| !call.one_way) else {
        writeln!(
            f,
            "    clientInterface()->callNoReply({}, message, action);\n}}\n",
            Latin1(&call.operation)
        )?;
        return Ok(());
    };
    writeln!(
        f,
        "    KDSoapPendingCall pendingCall = clientInterface()->asyncCall({}, message, action);",
        Latin1(&call.operation)
    )?;
    writeln!(f, "    auto* watcher = new KDSoapPendingCallWatcher(pendingCall, this);")?;
    writeln!(
        f,
        "    QObject::connect(watcher, &KDSoapPendingCallWatcher::finished, this, [this](KDSoapPendingCallWatcher* watcher) {{"
    )?;
    writeln!(f, "        const KDSoapMessage reply = watcher->returnMessage();")?;
    writeln!(f, "        watcher->deleteLater();")?;
    writeln!(
        f,
        "        if (reply.isFault()) {{\n            Q_EMIT {}(reply);\n            return;\n        }}",
        error.name
    )?;
    let locals = done
        .parameters
        .iter()
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();
    for (local, part) in locals.iter().zip(&call.response) {
        writeln!(f, "        {} {local};", part.value_type)?;
    }
    decode(f, "        ", call.style, &call.response, "reply", &locals)?;
    writeln!(f, "        Q_EMIT {}({});", done.name, locals.join(", "))?;
    writeln!(f, "    }});\n}}\n")
}

fn job_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let name = &class.name;
    let Some(constructor) = class.methods.iter().find(|m| m.kind == MethodKind::Constructor) else {
        return Ok(());
    };
    writeln!(
        f,
        "{name}::{name}({})\n    : QObject(parent)\n    , m_service(service)\n{{\n}}\n",
        definition_parameters(constructor)
    )?;
    accessor_definitions(f, class)?;
    let Some(call) = class
        .methods
        .iter()
        .find(|m| m.kind == MethodKind::Start)
        .and_then(|m| m.call.as_ref())
    else {
        return Ok(());
    };
    let fields = class
        .members
        .iter()
        .map(|m| format!("m_{}", m.name))
        .collect::<Vec<_>>();
    let (request, response) = fields.split_at(call.request.len().min(fields.len()));
    writeln!(f, "void {name}::start()\n{{")?;
    action(f, call)?;
    encode(f, "    ", call, "message", request)?;
    if call.one_way {
        writeln!(
            f,
            "    m_service->clientInterface()->callNoReply({}, message, action);",
            Latin1(&call.operation)
        )?;
        writeln!(f, "    Q_EMIT finished(this);\n}}\n")?;
        return Ok(());
    }
    writeln!(
        f,
        "    KDSoapPendingCall pendingCall = m_service->clientInterface()->asyncCall({}, message, action);",
        Latin1(&call.operation)
    )?;
    writeln!(f, "    auto* watcher = new KDSoapPendingCallWatcher(pendingCall, this);")?;
    writeln!(
        f,
        "    QObject::connect(watcher, &KDSoapPendingCallWatcher::finished, this, [this](KDSoapPendingCallWatcher* watcher) {{"
    )?;
    writeln!(f, "        const KDSoapMessage reply = watcher->returnMessage();")?;
    writeln!(f, "        watcher->deleteLater();")?;
    writeln!(f, "        if (!reply.isFault()) {{")?;
    decode(f, "            ", call.style, &call.response, "reply", response)?;
    writeln!(f, "        }}\n        Q_EMIT finished(this);\n    }});\n}}\n")
}

fn server_definition(f: &mut Formatter<'_>, class: &GeneratedClass) -> FmtResult {
    let name = &class.name;
    writeln!(f, "{name}::{name}() = default;\n")?;
    writeln!(
        f,
        "void {name}::processRequest(const KDSoapMessage& request, KDSoapMessage& response, const QByteArray& soapAction)\n{{"
    )?;
    writeln!(f, "    const QString method = request.name();")?;
    for method in class.methods.iter().filter(|m| m.kind == MethodKind::PureVirtual) {
        let Some(call) = &method.call else {
            continue;
        };
        let dispatch = match (call.style, call.request.as_slice()) {
            (CallStyle::Document, [part]) => part.xml.name.as_str(),
            _ => call.operation.as_str(),
        };
        writeln!(f, "    if (method == QLatin1String(\"{dispatch}\")) {{")?;
        let inputs = method
            .parameters
            .iter()
            .filter(|p| !p.output)
            .collect::<Vec<_>>();
        for (parameter, part) in inputs.iter().zip(&call.request) {
            writeln!(f, "        {} {};", part.value_type, parameter.name)?;
        }
        let input_names = inputs.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        decode(f, "        ", call.style, &call.request, "request", &input_names)?;
        let outputs = method
            .parameters
            .iter()
            .filter(|p| p.output)
            .collect::<Vec<_>>();
        for (parameter, part) in outputs.iter().zip(call.response.iter()) {
            writeln!(f, "        {} {};", part.value_type, parameter.name)?;
        }
        let args = method
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let results = if method.return_type == "void" {
            writeln!(f, "        {}({args});", method.name)?;
            outputs.iter().map(|p| p.name.clone()).collect::<Vec<_>>()
        } else {
            writeln!(f, "        const {} result = {}({args});", method.return_type, method.name)?;
            vec!["result".to_string()]
        };
        if !call.one_way {
            let reply = Call {
                request: call.response.clone(),
                ..call.clone()
            };
            if call.style == CallStyle::Rpc {
                writeln!(
                    f,
                    "        response.setName({});",
                    Latin1(&format!("{}Response", call.operation))
                )?;
            }
            encode(f, "        ", &reply, "response", &results)?;
        }
        writeln!(f, "        return;\n    }}")?;
    }
    writeln!(
        f,
        "    KDSoapServerObjectInterface::processRequest(request, response, soapAction);\n}}\n"
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generator::testing::generate_documents;
    use crate::generator::testing::generate_schema;
    use crate::generator::Config as GeneratorConfig;
    use crate::generator::OptionalElementType;

    const WEATHER: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:tns="urn:weather" targetNamespace="urn:weather">
  <types>
    <xs:schema targetNamespace="urn:weather" elementFormDefault="qualified">
      <xs:element name="GetWeatherRequest"><xs:complexType><xs:sequence>
        <xs:element name="city" type="xs:string"/>
      </xs:sequence></xs:complexType></xs:element>
      <xs:element name="GetWeatherResponse"><xs:complexType><xs:sequence>
        <xs:element name="temp" type="xs:float"/>
        <xs:element name="humidity" type="xs:int" minOccurs="0"/>
      </xs:sequence></xs:complexType></xs:element>
    </xs:schema>
  </types>
  <message name="GetWeatherIn"><part name="parameters" element="tns:GetWeatherRequest"/></message>
  <message name="GetWeatherOut"><part name="parameters" element="tns:GetWeatherResponse"/></message>
  <portType name="WeatherPort">
    <operation name="GetWeather">
      <input message="tns:GetWeatherIn"/><output message="tns:GetWeatherOut"/>
    </operation>
  </portType>
  <binding name="WeatherSoap" type="tns:WeatherPort">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="GetWeather"><soap:operation soapAction="urn:weather#GetWeather"/></operation>
  </binding>
  <service name="Weather">
    <port name="WeatherSoap" binding="tns:WeatherSoap">
      <soap:address location="http://example.com/weather"/>
    </port>
  </service>
</definitions>"#;

    const POINT: &str = r#"
      <xs:complexType name="Point"><xs:sequence>
        <xs:element name="x" type="xs:int"/>
        <xs:element name="y" type="xs:int" minOccurs="0"/>
        <xs:element name="label" type="xs:string" maxOccurs="unbounded"/>
      </xs:sequence></xs:complexType>
      <xs:simpleType name="Color"><xs:restriction base="xs:string">
        <xs:enumeration value="red"/>
        <xs:enumeration value="dark-blue"/>
      </xs:restriction></xs:simpleType>"#;

    fn config() -> Config {
        Config {
            namespace: Some("Geo".into()),
            export_macro: Some("GEO_EXPORT".into()),
            header_file: "out/geo.h".into(),
        }
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(
            Latin1("a\"b\\c").to_string(),
            r#"QString::fromLatin1("a\"b\\c")"#
        );
    }

    #[test]
    fn include_guard_from_file_name() {
        assert_eq!(guard("out/my-file.h"), "MY_FILE_H");
        assert_eq!(guard("1.h"), "_1_H");
    }

    #[test]
    fn header_wraps_namespace_and_exports() {
        let classes = generate_schema(POINT, &GeneratorConfig::default());
        let config = config();
        let header = Header::new(&classes, &config).to_string();
        assert!(header.starts_with(BANNER));
        assert!(header.contains("#ifndef GEO_H\n#define GEO_H"));
        assert!(header.contains("#include <optional>"));
        assert!(header.contains("namespace Geo {"));
        assert!(header.contains("class GEO_EXPORT Point\n{\npublic:"));
        assert!(header.contains("    int m_x{};"));
        assert!(header.contains("    std::optional<int> m_y;"));
        assert!(header.contains("    QList<QString> m_label;"));
        assert!(header.contains("    enum Type {\n        Red,\n        DarkBlue,\n    };"));
        assert!(header.contains("} // namespace Geo"));
        assert!(header.ends_with("#endif // GEO_H\n"));
        let point = header.find("class GEO_EXPORT Point").unwrap();
        let color = header.find("class GEO_EXPORT Color").unwrap();
        assert_eq!(
            point < color,
            classes.iter().position(|c| c.name == "Point") < classes.iter().position(|c| c.name == "Color")
        );
    }

    #[test]
    fn implementation_serializes_by_storage() {
        let classes = generate_schema(POINT, &GeneratorConfig::default());
        let config = config();
        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains("#include \"out/geo.h\""));
        assert!(source.contains("KDSoapValue Point::serialize(const QString& valueName) const"));
        assert!(source.contains("    if (m_y) {"));
        assert!(source.contains("    for (const auto& item : m_label) {"));
        assert!(source.contains("if (name == QLatin1String(\"x\")) {"));
        assert!(source.contains("m_label.append(item);"));
        assert!(source.contains(
            "    case DarkBlue:\n        return QString::fromLatin1(\"dark-blue\");"
        ));
        assert!(source.contains("bool Color::fromString(const QString& text)"));
    }

    #[test]
    fn raw_pointer_members_are_initialized() {
        let classes = generate_schema(
            POINT,
            &GeneratorConfig {
                optional_element_type: OptionalElementType::RawPointer,
                ..GeneratorConfig::default()
            },
        );
        let config = config();
        let header = Header::new(&classes, &config).to_string();
        assert!(header.contains("    int* m_y = nullptr;"));
        assert!(header.contains("    void setY(int* y);"));
        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains("m_y = new int(item);"));
    }

    #[test]
    fn raw_pointer_members_are_owned() {
        let classes = generate_schema(
            POINT,
            &GeneratorConfig {
                optional_element_type: OptionalElementType::RawPointer,
                ..GeneratorConfig::default()
            },
        );
        let config = config();
        let header = Header::new(&classes, &config).to_string();
        assert!(header.contains("    Point(const Point& other);"));
        assert!(header.contains("    Point& operator=(const Point& other);"));
        assert!(header.contains("    ~Point();"));
        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains("Point::~Point()\n{\n    delete m_y;\n}"));
        assert!(source.contains("    , m_y(other.m_y ? new int(*other.m_y) : nullptr)"));
        assert!(source.contains("    delete m_y;\n    m_y = other.m_y ? new int(*other.m_y) : nullptr;"));
        assert!(source.contains("delete m_y;\n            m_y = new int(item);"));
        assert!(source.contains("void Point::setY(int* y)\n{\n    if (m_y != y) {\n        delete m_y;"));
    }

    #[test]
    fn value_members_keep_implicit_copies() {
        let classes = generate_schema(POINT, &GeneratorConfig::default());
        let config = config();
        let header = Header::new(&classes, &config).to_string();
        assert!(!header.contains("~Point();"));
        let source = Implementation::new(&classes, &config).to_string();
        assert!(!source.contains("Point::~Point()"));
    }

    #[test]
    fn lists_are_cleared_before_deserializing() {
        let classes = generate_schema(POINT, &GeneratorConfig::default());
        let config = config();
        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains(
            "    m_label.clear();\n    for (const KDSoapValue& val : mainValue.childValues()) {"
        ));
    }

    #[test]
    fn client_and_job() {
        let classes = generate_documents(&[WEATHER], &GeneratorConfig::default(), false);
        let config = Config {
            header_file: "weather.h".into(),
            ..Config::default()
        };
        let header = Header::new(&classes, &config).to_string();
        assert!(!header.contains("namespace"));
        assert!(header.contains("class Weather : public QObject\n{\n    Q_OBJECT"));
        assert!(header.contains("    explicit Weather(QObject* parent = nullptr);"));
        assert!(header.contains("Q_SIGNALS:\n    void getWeatherDone(const GetWeatherResponse& getWeatherResponse);"));
        assert!(header.contains("    Weather* m_service;"));
        assert!(header.contains("#include <KDSoapClient/KDSoapClientInterface.h>"));

        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains("#include <KDSoapClient/KDSoapPendingCallWatcher.h>"));
        assert!(source.contains("    , m_endPoint(QString::fromLatin1(\"http://example.com/weather\"))"));
        assert!(source.contains(
            "    m_lastReply = clientInterface()->call(QString::fromLatin1(\"GetWeather\"), message, action);"
        ));
        assert!(source.contains("const QString action = QString::fromLatin1(\"urn:weather#GetWeather\");"));
        assert!(source.contains("            Q_EMIT getWeatherError(reply);"));
        assert!(source.contains("m_service->clientInterface()->asyncCall("));
        assert!(source.contains("        Q_EMIT finished(this);"));
    }

    #[test]
    fn server_dispatches_by_element() {
        let classes = generate_documents(
            &[WEATHER],
            &GeneratorConfig {
                server: true,
                ..GeneratorConfig::default()
            },
            false,
        );
        let config = Config {
            header_file: "weather.h".into(),
            ..Config::default()
        };
        let header = Header::new(&classes, &config).to_string();
        assert!(header.contains(
            "class WeatherServerBase : public QObject, public KDSoapServerObjectInterface"
        ));
        assert!(header.contains(
            "    virtual GetWeatherResponse getWeather(const GetWeatherRequest& getWeatherRequest) = 0;"
        ));
        assert!(header.contains("#include <KDSoapServer/KDSoapServerObjectInterface.h>"));
        let source = Implementation::new(&classes, &config).to_string();
        assert!(source.contains("    if (method == QLatin1String(\"GetWeatherRequest\")) {"));
        assert!(source.contains(
            "        const GetWeatherResponse result = getWeather(getWeatherRequest);"
        ));
        assert!(source.contains(
            "    KDSoapServerObjectInterface::processRequest(request, response, soapAction);"
        ));
    }
}
