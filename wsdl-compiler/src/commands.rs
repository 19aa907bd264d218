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

//! Command-line entry point of the compiler.
//!
//! [`CompileArgs`] mirrors the manifest [`Options`]. When a manifest is
//! given, command-line values are applied on top of it. The resulting
//! [`Settings`] drive [`crate::compile`] with the HTTP fetcher for
//! remote imports.

use crate::generator::OptionalElementType;
use crate::settings::Error as SettingsError;
use crate::settings::NamespaceMapping;
use crate::settings::Options;
use crate::settings::Settings;
use crate::Error;
use clap::Args;
use std::path::PathBuf;
use wsdlc_fetch_http::reqwest::Client;

/// Arguments of the compilation.
#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// WSDL document: path or URL.
    pub wsdl: Option<String>,
    /// Output file: header, or implementation together with `--impl`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Generate only the implementation that includes this header.
    #[arg(long = "impl", value_name = "HEADER")]
    pub impl_header: Option<String>,
    /// Generate `<BASE>.h` and `<BASE>.cpp`.
    #[arg(long, value_name = "BASE")]
    pub both: Option<PathBuf>,
    /// Generate server base classes instead of clients.
    #[arg(long)]
    pub server: bool,
    /// Generate only the service with this name.
    #[arg(short, long)]
    pub service: Option<String>,
    /// Namespace code for a namespace URI: `uri=code`, or `@file` with
    /// one mapping per line.
    #[arg(long = "namespace-mapping", value_name = "URI=CODE|@FILE")]
    pub namespace_mapping: Vec<NamespaceMapping>,
    /// Rendering of optional elements and attributes.
    #[arg(long, value_enum)]
    pub optional_element_type: Option<OptionalElementType>,
    /// Generate types that no operation uses.
    #[arg(long)]
    pub keep_unused_types: bool,
    /// Directory mirroring remote documents as `<dir>/<host>/<path>`.
    #[arg(long = "import-path", value_name = "DIR")]
    pub import_paths: Vec<PathBuf>,
    /// Never download remote documents.
    #[arg(long)]
    pub use_local_files_only: bool,
    /// List known types when a reference cannot be resolved.
    #[arg(long)]
    pub help_on_missing: bool,
    /// Do not generate blocking calls.
    #[arg(long)]
    pub no_sync: bool,
    /// Do not generate non-blocking calls.
    #[arg(long)]
    pub no_async: bool,
    /// Do not generate job classes.
    #[arg(long)]
    pub no_async_jobs: bool,
    /// C++ namespace of generated classes.
    #[arg(long)]
    pub namespace: Option<String>,
    /// Export macro of generated class declarations.
    #[arg(long)]
    pub export_macro: Option<String>,
    /// TOML manifest with the same options.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Write JSON description of generated classes.
    #[arg(long, value_name = "FILE")]
    pub emit_json: Option<PathBuf>,
}

impl CompileArgs {
    /// Options given on the command line.
    ///
    /// # Errors
    ///
    /// Returns error if a namespace mapping file cannot be read.
    pub fn options(&self) -> Result<Options, SettingsError> {
        Ok(Options {
            wsdl: self.wsdl.clone(),
            output: self.output.clone(),
            impl_header: self.impl_header.clone(),
            both: self.both.clone(),
            server: self.server.then_some(true),
            service: self.service.clone(),
            namespace_mapping: NamespaceMapping::collect(&self.namespace_mapping)?,
            optional_element_type: self.optional_element_type,
            keep_unused_types: self.keep_unused_types.then_some(true),
            import_paths: self.import_paths.clone(),
            use_local_files_only: self.use_local_files_only.then_some(true),
            help_on_missing: self.help_on_missing.then_some(true),
            no_sync: self.no_sync.then_some(true),
            no_async: self.no_async.then_some(true),
            no_async_jobs: self.no_async_jobs.then_some(true),
            namespace: self.namespace.clone(),
            export_macro: self.export_macro.clone(),
            emit_json: self.emit_json.clone(),
        })
    }

    /// Settings from the manifest (if any) and the command line.
    ///
    /// # Errors
    ///
    /// Returns error on unreadable manifest or mapping file and on
    /// invalid option combinations.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let manifest = self
            .manifest
            .as_deref()
            .map(Options::read)
            .transpose()?
            .unwrap_or_default();
        Settings::try_from(manifest.overlay(self.options()?))
    }
}

/// Process a compilation command.
///
/// # Errors
///
/// Returns an error if command processing fails. No output is written
/// in this case.
pub async fn process_command(args: &CompileArgs) -> Result<Vec<String>, Error> {
    let settings = args.settings().map_err(Error::Config)?;
    let fetcher = Client::new().map_err(|err| Error::Fetcher(Box::new(err)))?;
    let compilation = crate::compile(&settings, &fetcher).await?;
    let mut display_output = compilation.help.clone();
    display_output.extend(compilation.write()?);
    Ok(display_output)
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;
    use std::fs::write;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: CompileArgs,
    }

    #[test]
    fn parse_command_line() {
        let cli = Cli::try_parse_from([
            "wsdl2cpp",
            "--both",
            "weather",
            "--namespace-mapping",
            "urn:weather=w",
            "--optional-element-type",
            "raw-pointer",
            "--import-path",
            "a",
            "--import-path",
            "b",
            "--no-async-jobs",
            "http://example.com/weather.wsdl",
        ])
        .unwrap();
        let settings = cli.args.settings().unwrap();
        assert_eq!(settings.optional_element_type, OptionalElementType::RawPointer);
        assert_eq!(settings.import_paths.len(), 2);
        assert!(settings.no_async_jobs);
        assert!(!settings.no_async);
        assert_eq!(
            settings.namespace_mapping.get("urn:weather").map(String::as_str),
            Some("w")
        );
    }

    #[test]
    fn invalid_mapping_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["wsdl2cpp", "--namespace-mapping", "nocode", "a.wsdl"]).is_err());
    }

    #[test]
    fn manifest_supplies_defaults() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("wsdlc.toml");
        write(
            &manifest,
            "wsdl = \"http://example.com/weather.wsdl\"\noutput = \"weather.h\"\nnamespace = \"Weather\"\n",
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "wsdl2cpp",
            "--manifest",
            manifest.to_str().unwrap(),
            "--export-macro",
            "WEATHER_EXPORT",
        ])
        .unwrap();
        let settings = cli.args.settings().unwrap();
        assert_eq!(settings.namespace.as_deref(), Some("Weather"));
        assert_eq!(settings.export_macro.as_deref(), Some("WEATHER_EXPORT"));
        assert_eq!(settings.start.to_string(), "http://example.com/weather.wsdl");
    }
}
