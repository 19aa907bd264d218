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

//! Classes of services: clients with their jobs, or server bases.

use crate::compiler::binding::MessageBinding;
use crate::compiler::binding::OperationBinding;
use crate::compiler::binding::ServiceBinding;
use crate::generator::casemungler::to_lower_camel;
use crate::generator::casemungler::to_upper_camel;
use crate::generator::class::Call;
use crate::generator::class::CallStyle;
use crate::generator::class::ClassKind;
use crate::generator::class::GeneratedClass;
use crate::generator::class::Member;
use crate::generator::class::Method;
use crate::generator::class::MethodKind;
use crate::generator::class::Parameter;
use crate::generator::class::PartValue;
use crate::generator::class::ServiceInfo;
use crate::generator::class::SoapVersion;
use crate::generator::class::Storage;
use crate::generator::class::XmlName;
use crate::generator::cpp_type::input_parameter;
use crate::generator::cpp_type::is_scalar;
use crate::generator::naming::NameRegistry;
use crate::generator::Generator;
use crate::schema::wsdl::BindingProtocol;
use crate::schema::wsdl::BodyUse;
use crate::schema::wsdl::SoapStyle;
use tracing::warn;

const CLIENT_METHODS: &[&str] = &["setEndPoint", "endPoint", "lastError", "clientInterface"];
const SERVER_METHODS: &[&str] = &["processRequest"];
const JOB_METHODS: &[&str] = &["start", "finished", "service"];

impl Generator<'_> {
    pub(super) fn client_classes(
        &mut self,
        service: &ServiceBinding,
        all: &[ServiceBinding],
    ) -> (GeneratedClass, Vec<GeneratedClass>) {
        let code = self.code(&service.namespace);
        let name = self.classes.take(&service_candidate(service, all, ""), code);
        let mut class = self.service_class(name.clone(), ClassKind::ClientService, service);
        let mut methods = NameRegistry::with_reserved(CLIENT_METHODS.iter().copied());
        methods.take(&name, code);
        class.methods.extend([
            Method::new(name.clone(), MethodKind::Constructor, "")
                .with_parameter("parent", "QObject*"),
            Method::new("setEndPoint", MethodKind::Utility, "void")
                .with_parameter("endPoint", "const QString&"),
            Method::new("endPoint", MethodKind::Utility, "QString").constant(),
            Method::new("lastError", MethodKind::Utility, "QString").constant(),
        ]);
        let mut jobs = Vec::new();
        for op in service.valid_operations() {
            let call = self.call(service, op);
            let base = to_lower_camel(&op.name);
            if !self.config.no_sync {
                let (parameters, return_type) = signature(&call, code, true);
                class.methods.push(Method {
                    name: methods.take(&base, code),
                    kind: MethodKind::Sync,
                    return_type,
                    parameters,
                    is_const: false,
                    call: Some(call.clone()),
                    documentation: op.documentation.clone(),
                });
            }
            if !self.config.no_async {
                let (parameters, _) = signature(&call, code, false);
                class.methods.push(Method {
                    name: methods.take(&format!("async{}", to_upper_camel(&op.name)), code),
                    kind: MethodKind::Async,
                    return_type: "void".to_string(),
                    parameters,
                    is_const: false,
                    call: Some(call.clone()),
                    documentation: op.documentation.clone(),
                });
                if !call.one_way {
                    let mut done = Method::new(
                        methods.take(&format!("{base}Done"), code),
                        MethodKind::Signal,
                        "void",
                    );
                    done.parameters = parameters_of(&call.response, code, false);
                    class.methods.push(done);
                    class.methods.push(
                        Method::new(
                            methods.take(&format!("{base}Error"), code),
                            MethodKind::Signal,
                            "void",
                        )
                        .with_parameter("fault", "const KDSoapMessage&"),
                    );
                }
            }
            if !self.config.no_async_jobs {
                jobs.push(self.job_class(&name, op, call, code));
            }
        }
        (class, jobs)
    }

    pub(super) fn server_class(
        &mut self,
        service: &ServiceBinding,
        all: &[ServiceBinding],
    ) -> GeneratedClass {
        let code = self.code(&service.namespace);
        let name = self
            .classes
            .take(&service_candidate(service, all, "ServerBase"), code);
        let mut class = self.service_class(name.clone(), ClassKind::ServerBase, service);
        let mut methods = NameRegistry::with_reserved(SERVER_METHODS.iter().copied());
        methods.take(&name, code);
        class.methods.push(Method::new(name, MethodKind::Constructor, ""));
        for op in service.valid_operations() {
            let call = self.call(service, op);
            let (parameters, return_type) = signature(&call, code, true);
            class.methods.push(Method {
                name: methods.take(&to_lower_camel(&op.name), code),
                kind: MethodKind::PureVirtual,
                return_type,
                parameters,
                is_const: false,
                call: Some(call),
                documentation: op.documentation.clone(),
            });
        }
        class.methods.push(
            Method::new("processRequest", MethodKind::Dispatch, "void")
                .with_parameter("request", "const KDSoapMessage&")
                .with_parameter("response", "KDSoapMessage&")
                .with_parameter("soapAction", "const QByteArray&"),
        );
        class
    }

    fn service_class(
        &self,
        name: String,
        kind: ClassKind,
        service: &ServiceBinding,
    ) -> GeneratedClass {
        let mut class = GeneratedClass::new(name, kind);
        class.documentation.clone_from(&service.documentation);
        class.service = Some(ServiceInfo {
            service: service.service.clone(),
            port: service.port.clone(),
            endpoint: service.address.clone(),
            soap_version: match service.protocol {
                Some(BindingProtocol::Soap12) => SoapVersion::Soap12,
                _ => SoapVersion::Soap11,
            },
            namespace: service.namespace.clone(),
        });
        class
    }

    fn job_class(
        &mut self,
        client: &str,
        op: &OperationBinding,
        call: Call,
        code: &str,
    ) -> GeneratedClass {
        let name = self
            .classes
            .take(&format!("{}Job", to_upper_camel(&op.name)), code);
        let mut registry = NameRegistry::with_reserved(JOB_METHODS.iter().copied());
        registry.take(&name, code);
        let mut class = GeneratedClass::new(name.clone(), ClassKind::Job);
        class.documentation.clone_from(&op.documentation);
        let request = call
            .request
            .iter()
            .map(|part| (to_lower_camel(&part.xml.name), part));
        let response = call
            .response
            .iter()
            .map(|part| (format!("result{}", to_upper_camel(&part.xml.name)), part));
        for (candidate, part) in request.chain(response) {
            let member = registry.take(&candidate, code);
            let setter = registry.take(&format!("set{}", to_upper_camel(&member)), code);
            class.members.push(Member {
                name: member,
                setter,
                xml: part.xml.clone(),
                is_attribute: false,
                is_content: false,
                value_type: part.value_type.clone(),
                value_kind: part.value_kind,
                storage: Storage::Value,
                cpp_type: part.value_type.clone(),
                documentation: None,
            });
        }
        class.methods.extend([
            Method::new(name.clone(), MethodKind::Constructor, "")
                .with_parameter("service", format!("{client}*"))
                .with_parameter("parent", "QObject*"),
            Method {
                call: Some(call),
                ..Method::new("start", MethodKind::Start, "void")
            },
            Method::new("finished", MethodKind::Signal, "void")
                .with_parameter("job", format!("{name}*")),
        ]);
        class
    }

    fn call(&self, service: &ServiceBinding, op: &OperationBinding) -> Call {
        Call {
            operation: op.name.clone(),
            soap_action: op.soap_action.clone(),
            namespace: service.namespace.clone(),
            style: match op.style {
                SoapStyle::Document => CallStyle::Document,
                SoapStyle::Rpc => CallStyle::Rpc,
            },
            encoded: op.body_use == BodyUse::Encoded,
            one_way: op.is_one_way(),
            request: self.part_values(op.input.as_ref()),
            response: self.part_values(op.output.as_ref()),
        }
    }

    fn part_values(&self, message: Option<&MessageBinding>) -> Vec<PartValue> {
        message
            .into_iter()
            .flat_map(|m| &m.parts)
            .filter_map(|part| {
                let Some((value_type, value_kind)) = self.value_of(&part.type_ref) else {
                    warn!(part = %part.name, reference = %part.type_ref, "part with unresolved type is skipped");
                    return None;
                };
                let xml = part.element.as_ref().map_or_else(
                    || XmlName {
                        name: part.name.clone(),
                        namespace: None,
                    },
                    |element| XmlName {
                        name: element.name.clone(),
                        namespace: Some(element.namespace.clone()),
                    },
                );
                Some(PartValue {
                    xml,
                    value_type,
                    value_kind,
                })
            })
            .collect()
    }
}

/// Class name candidate of a service port. Services bound through
/// several ports are disambiguated by port name.
fn service_candidate(service: &ServiceBinding, all: &[ServiceBinding], suffix: &str) -> String {
    let shared = all.iter().filter(|s| s.service == service.service).count() > 1;
    if shared {
        format!(
            "{}{}{suffix}",
            to_upper_camel(&service.service),
            to_upper_camel(&service.port)
        )
    } else {
        format!("{}{suffix}", to_upper_camel(&service.service))
    }
}

/// Input parameters of `parts`.
fn parameters_of(parts: &[PartValue], code: &str, output: bool) -> Vec<Parameter> {
    let mut names = NameRegistry::default();
    parts
        .iter()
        .map(|part| Parameter {
            name: names.take(&to_lower_camel(&part.xml.name), code),
            cpp_type: if output {
                format!("{}&", part.value_type)
            } else {
                input_parameter(&part.value_type, is_scalar(part.value_kind))
            },
            output,
            part: Some(part.clone()),
        })
        .collect()
}

/// Parameters and return type of a call. A single response part is
/// returned; several are passed as out parameters when `with_response`.
fn signature(call: &Call, code: &str, with_response: bool) -> (Vec<Parameter>, String) {
    let mut parameters = parameters_of(&call.request, code, false);
    if !with_response {
        return (parameters, "void".to_string());
    }
    match call.response.as_slice() {
        [] => (parameters, "void".to_string()),
        [single] => (parameters, single.value_type.clone()),
        many => {
            let mut names = NameRegistry::with_reserved(parameters.iter().map(|p| p.name.as_str()));
            let outputs = parameters_of(many, code, true)
                .into_iter()
                .map(|p| Parameter {
                    name: names.take(&p.name, code),
                    ..p
                })
                .collect::<Vec<_>>();
            parameters.extend(outputs);
            (parameters, "void".to_string())
        }
    }
}
