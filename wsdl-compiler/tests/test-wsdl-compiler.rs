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

use std::fs;
use std::io::Error as IoError;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use wsdlc_compiler::compile;
use wsdlc_compiler::generator::class::ClassKind;
use wsdlc_compiler::generator::class::GeneratedClass;
use wsdlc_compiler::generator::class::Storage;
use wsdlc_compiler::loader::store::FetchErrorReason;
use wsdlc_compiler::loader::LoadError;
use wsdlc_compiler::settings::Options;
use wsdlc_compiler::settings::Settings;
use wsdlc_compiler::Error;
use wsdlc_fetch_mock::Expect;
use wsdlc_fetch_mock::Fetcher as MockFetcher;

fn test_data(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(path)
}

fn options(wsdl: &str, out: &TempDir) -> Options {
    Options {
        wsdl: Some(wsdl.to_string()),
        both: Some(out.path().join("generated")),
        ..Options::default()
    }
}

fn settings(options: Options) -> Settings {
    Settings::try_from(options).unwrap()
}

fn find<'a>(classes: &'a [GeneratedClass], name: &str) -> &'a GeneratedClass {
    classes
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("class {name} is not generated"))
}

#[tokio::test]
async fn test_weather_client() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("weather/Weather.wsdl");
    let fetcher = MockFetcher::<IoError>::new();
    let settings = settings(Options {
        emit_json: Some(out.path().join("classes.json")),
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let compilation = compile(&settings, &fetcher).await.unwrap();
    assert!(fetcher.history().is_empty());

    let names = compilation
        .classes
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["GetWeatherRequest", "GetWeatherResponse", "Weather", "GetWeatherJob"]
    );
    let request = find(&compilation.classes, "GetWeatherRequest");
    assert_eq!(request.member("city").unwrap().cpp_type, "QString");
    let response = find(&compilation.classes, "GetWeatherResponse");
    assert_eq!(response.member("temp").unwrap().cpp_type, "float");
    assert_eq!(response.member("conditions").unwrap().storage, Storage::Value);
    let humidity = response.member("humidity").unwrap();
    assert_eq!(humidity.storage, Storage::Optional);
    assert_eq!(humidity.cpp_type, "std::optional<int>");

    let client = find(&compilation.classes, "Weather");
    assert_eq!(client.kind, ClassKind::ClientService);
    assert!(client.method("getWeather").is_some());
    assert!(client.method("asyncGetWeather").is_some());
    assert!(client.method("getWeatherDone").is_some());
    assert!(client.method("getWeatherError").is_some());
    assert_eq!(find(&compilation.classes, "GetWeatherJob").kind, ClassKind::Job);

    let messages = compilation.write().unwrap();
    assert_eq!(messages.len(), 3);
    let header = fs::read_to_string(out.path().join("generated.h")).unwrap();
    assert!(header.contains("#ifndef GENERATED_H"));
    assert!(header.contains("class GetWeatherResponse\n"));
    let source = fs::read_to_string(out.path().join("generated.cpp")).unwrap();
    assert!(source.contains("#include \"generated.h\""));
    assert!(source.contains("QString::fromLatin1(\"urn:example:weather#GetWeather\")"));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("classes.json")).unwrap())
            .unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(4));
    assert_eq!(json[2]["kind"], "client-service");
}

#[tokio::test]
async fn test_weather_suppressed_variants() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("weather/Weather.wsdl");
    let settings = settings(Options {
        no_async: Some(true),
        no_async_jobs: Some(true),
        keep_unused_types: Some(true),
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let compilation = compile(&settings, &MockFetcher::<IoError>::new())
        .await
        .unwrap();
    assert!(compilation.classes.iter().all(|c| c.kind != ClassKind::Job));
    assert!(compilation.classes.iter().any(|c| c.name == "Forecast"));
    let client = find(&compilation.classes, "Weather");
    assert!(client.method("getWeather").is_some());
    assert!(client.method("asyncGetWeather").is_none());
}

#[tokio::test]
async fn test_weather_from_remote_location() {
    let out = TempDir::new().unwrap();
    let content = fs::read_to_string(test_data("weather/Weather.wsdl")).unwrap();
    let fetcher = MockFetcher::<IoError>::new();
    fetcher.expect(Expect::fetch("http://example.com/Weather.wsdl", content));
    let settings = settings(options("http://example.com/Weather.wsdl", &out));
    let compilation = compile(&settings, &fetcher).await.unwrap();
    assert_eq!(fetcher.pending(), 0);
    assert_eq!(fetcher.history().len(), 1);
    assert_eq!(compilation.files.len(), 2);
}

#[tokio::test]
async fn test_same_name_in_two_namespaces() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("status/Monitor.wsdl");
    let settings = settings(options(wsdl.to_str().unwrap(), &out));
    let compilation = compile(&settings, &MockFetcher::<IoError>::new())
        .await
        .unwrap();
    let statuses = compilation
        .classes
        .iter()
        .filter(|c| c.name.starts_with("Status"))
        .collect::<Vec<_>>();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].name, "Status");
    assert_eq!(statuses[1].name, "Status_beta");
    assert_eq!(
        statuses[0].xml.as_ref().and_then(|x| x.namespace.as_deref()),
        Some("urn:example:alpha")
    );
    assert_eq!(
        find(&compilation.classes, "Query").member("status").unwrap().cpp_type,
        "Status"
    );
    assert_eq!(
        find(&compilation.classes, "Answer").member("status").unwrap().cpp_type,
        "Status_beta"
    );
}

#[tokio::test]
async fn test_namespace_mapping_changes_suffix() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("status/Monitor.wsdl");
    let mut options = options(wsdl.to_str().unwrap(), &out);
    options
        .namespace_mapping
        .insert("urn:example:alpha".into(), "zeta".into());
    let compilation = compile(&settings(options), &MockFetcher::<IoError>::new())
        .await
        .unwrap();
    let names = compilation
        .classes
        .iter()
        .filter(|c| c.name.starts_with("Status"))
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Status", "Status_zeta"]);
}

#[tokio::test]
async fn test_recursive_member_is_indirect() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("node/Tree.wsdl");
    let settings = settings(options(wsdl.to_str().unwrap(), &out));
    let compilation = compile(&settings, &MockFetcher::<IoError>::new())
        .await
        .unwrap();
    let node = find(&compilation.classes, "Node");
    let child = node.member("child").unwrap();
    assert_eq!(child.storage, Storage::SharedList);
    assert_eq!(child.cpp_type, "QList<QSharedPointer<Node>>");
    assert_eq!(node.member("label").unwrap().storage, Storage::Value);
    assert!(node.forward_declarations.contains(&"Node".to_string()));
    let header = &compilation.files[0].content;
    assert!(header.contains("class Node;\n"));
    assert!(header.contains("#include <QSharedPointer>"));
}

#[tokio::test]
async fn test_local_files_only_without_mirror() {
    let out = TempDir::new().unwrap();
    let mirror = TempDir::new().unwrap();
    let wsdl = test_data("remote-import/Inventory.wsdl");
    let fetcher = MockFetcher::<IoError>::new();
    let settings = settings(Options {
        use_local_files_only: Some(true),
        import_paths: vec![mirror.path().to_path_buf()],
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let err = compile(&settings, &fetcher).await.unwrap_err();
    let Error::Load(LoadError::Fetch(err)) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(
        err.locator.to_string(),
        "http://schemas.example.com/inventory/types.xsd"
    );
    let FetchErrorReason::LocalFilesOnly(probed) = &err.reason else {
        panic!("unexpected reason: {}", err.reason);
    };
    assert_eq!(
        probed,
        &vec![mirror
            .path()
            .join("schemas.example.com")
            .join("inventory")
            .join("types.xsd")]
    );
    assert!(fetcher.history().is_empty());
    assert!(!out.path().join("generated.h").exists());
}

#[tokio::test]
async fn test_import_path_mirror() {
    let out = TempDir::new().unwrap();
    let mirror = TempDir::new().unwrap();
    let dir = mirror.path().join("schemas.example.com").join("inventory");
    fs::create_dir_all(&dir).unwrap();
    fs::copy(test_data("remote-import/types.xsd"), dir.join("types.xsd")).unwrap();
    let wsdl = test_data("remote-import/Inventory.wsdl");
    let fetcher = MockFetcher::<IoError>::new();
    let settings = settings(Options {
        use_local_files_only: Some(true),
        import_paths: vec![mirror.path().to_path_buf()],
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let compilation = compile(&settings, &fetcher).await.unwrap();
    assert!(fetcher.history().is_empty());
    assert_eq!(
        find(&compilation.classes, "CountResponse").member("count").unwrap().cpp_type,
        "unsigned int"
    );
}

#[tokio::test]
async fn test_remote_import_is_fetched() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("remote-import/Inventory.wsdl");
    let fetcher = MockFetcher::<IoError>::new();
    fetcher.expect(Expect::fetch(
        "http://schemas.example.com/inventory/types.xsd",
        fs::read_to_string(test_data("remote-import/types.xsd")).unwrap(),
    ));
    let settings = settings(options(wsdl.to_str().unwrap(), &out));
    let compilation = compile(&settings, &fetcher).await.unwrap();
    assert_eq!(fetcher.pending(), 0);
    assert!(compilation.classes.iter().any(|c| c.name == "CountRequest"));
}

#[tokio::test]
async fn test_unknown_service() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("weather/Weather.wsdl");
    let settings = settings(Options {
        service: Some("Forecast".into()),
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let err = compile(&settings, &MockFetcher::<IoError>::new())
        .await
        .unwrap_err();
    let Error::Compile(lines) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(lines[0].contains("service not found: Forecast"));
    assert!(lines[0].contains("Weather"));
}

#[tokio::test]
async fn test_server_mode() {
    let out = TempDir::new().unwrap();
    let wsdl = test_data("weather/Weather.wsdl");
    let settings = settings(Options {
        server: Some(true),
        ..options(wsdl.to_str().unwrap(), &out)
    });
    let compilation = compile(&settings, &MockFetcher::<IoError>::new())
        .await
        .unwrap();
    let kinds = compilation
        .classes
        .iter()
        .map(|c| c.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![ClassKind::Complex, ClassKind::Complex, ClassKind::ServerBase]
    );
    assert_eq!(compilation.classes[2].name, "WeatherServerBase");
}
