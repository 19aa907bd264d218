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

//! WSDL/XSD to C++ SOAP bindings compiler.
//!
//! Pipeline:
//! 1. [`loader`] fetches the start document and everything reachable
//!    through imports and includes.
//! 2. [`compiler`] merges all schemas into a type graph and binds
//!    WSDL operations to the types of their messages.
//! 3. [`optimizer`] drops types no valid operation uses.
//! 4. [`orderer`] puts types into declaration order, breaking by-value
//!    cycles through indirection.
//! 5. [`generator`] produces class descriptions and renders them as
//!    C++ header and implementation.
//!
//! Output files are written only after the whole pipeline succeeds.

/// Schema parser
pub mod schema;

/// Document store and import resolver
pub mod loader;

/// Type graph builder and binding resolver
pub mod compiler;

/// Optimizer of the compiled type graph
pub mod optimizer;

/// Dependency orderer
pub mod orderer;

/// Code generator
pub mod generator;

/// Compilation settings
pub mod settings;

/// Command-line commands
pub mod commands;

/// Error
pub mod error;

use generator::class::GeneratedClass;
use generator::render::Header;
use generator::render::Implementation;
use settings::Settings;
use std::fs::write;
use std::path::PathBuf;
use tracing::info;
use wsdlc_core::Fetcher;

#[doc(inline)]
pub use error::Error;

/// File produced by the compilation.
#[derive(Debug)]
pub struct OutputFile {
    /// Destination.
    pub path: PathBuf,
    /// Content.
    pub content: String,
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    /// Generated classes in output order.
    pub classes: Vec<GeneratedClass>,
    /// Rendered files.
    pub files: Vec<OutputFile>,
    /// Known types listing, non-empty when references were unresolved
    /// and help-on-missing is requested.
    pub help: Vec<String>,
}

impl Compilation {
    /// Write all files.
    ///
    /// # Errors
    ///
    /// Returns error if any file cannot be written.
    pub fn write(&self) -> Result<Vec<String>, Error> {
        self.files
            .iter()
            .map(|file| {
                write(&file.path, &file.content)
                    .map_err(|err| Error::WriteOutput(file.path.clone(), err))?;
                Ok(format!("{} file has been written", file.path.display()))
            })
            .collect()
    }
}

/// Run the pipeline up to rendered output.
///
/// # Errors
///
/// Returns error if documents cannot be loaded, compilation fails or
/// JSON dump cannot be produced. Nothing is written.
pub async fn compile<F: Fetcher>(settings: &Settings, fetcher: &F) -> Result<Compilation, Error> {
    let docs = loader::load(&settings.start, fetcher, settings.store_config())
        .await
        .map_err(Error::Load)?;
    let compiled = compiler::compile(&docs, &settings.compiler_config())
        .map_err(Error::compile_error)?;
    compiled.diagnostics.report();
    let help = compiled.diagnostics.help_on_missing();

    let compiled = optimizer::optimize(compiled, &settings.optimizer_config());
    let ordered =
        orderer::order(compiled.graph, &compiled.namespaces).map_err(Error::compile_error)?;
    let classes = generator::generate(
        &ordered,
        &compiled.services,
        &compiled.namespaces,
        &settings.generator_config(),
    );

    let render = settings.render_config();
    let mut files = Vec::new();
    if let Some(path) = settings.output.header_file() {
        files.push(OutputFile {
            path,
            content: Header::new(&classes, &render).to_string(),
        });
    }
    if let Some(path) = settings.output.implementation_file() {
        files.push(OutputFile {
            path,
            content: Implementation::new(&classes, &render).to_string(),
        });
    }
    if let Some(path) = &settings.emit_json {
        files.push(OutputFile {
            path: path.clone(),
            content: serde_json::to_string_pretty(&classes).map_err(Error::Json)?,
        });
    }
    info!(
        classes = classes.len(),
        files = files.len(),
        "compilation finished"
    );
    Ok(Compilation {
        classes,
        files,
        help,
    })
}
