// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use rstest::rstest;
use tempfile::TempDir;
use url::Url;

use super::*;
use crate::fs::MemoryFs;
use crate::versions::v100::{ComponentType, Metadata};

/// Transport serving fixed bodies keyed by url.
#[derive(Debug, Default)]
struct MapTransport {
    bodies: HashMap<String, String>,
}

impl MapTransport {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

impl Transport for MapTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        self.bodies
            .get(url.as_str())
            .map(|body| body.clone().into_bytes())
            .ok_or_else(|| Error::Fetch {
                uri: url.to_string(),
                reason: "404 Not Found".to_string(),
                error: None,
            })
    }
}

fn parser(fs: MemoryFs, transport: MapTransport) -> Parser {
    Parser::new(ParseOptions {
        fs: Arc::new(fs),
        transport: Arc::new(transport),
    })
}

const PARENT: &str = r#"
apiVersion: 1.0.0
metadata:
  name: foo
projects:
  - name: a
    source:
      type: git
      location: https://github.com/parent/a.git
  - name: b
    source:
      type: git
      location: https://github.com/parent/b.git
components:
  - type: chePlugin
    id: parent/plugin/latest
  - type: dockerimage
    alias: tools
    image: quay.io/parent/tools
commands:
  - name: build
    actions:
      - type: exec
        component: tools
        command: make parent
  - name: test
    actions:
      - type: exec
        component: tools
        command: make test
"#;

#[rstest]
fn test_parse_without_parent() {
    let content = r#"
apiVersion: 1.0.0
metadata:
  name: standalone
projects:
  - name: app
    source:
      type: zip
      location: https://example.com/app.zip
"#;
    let fs = MemoryFs::new().with_file("/work/devfile.yaml", content);

    let devfile = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .expect("Should parse");

    let mut expected = crate::versions::new_devfile_data("1.0.0").unwrap();
    expected.decode(content.as_bytes(), Path::new("x")).unwrap();
    assert_eq!(devfile.data, expected);
    assert_eq!(devfile.ctx.parent_uri(), None);
}

#[rstest]
fn test_parse_merges_file_parent() {
    let local = r#"
apiVersion: 1.0.0
parent:
  uri: file:///base/devfile.yaml
projects:
  - name: a
    source:
      type: git
      location: https://github.com/local/a.git
components:
  - type: chePlugin
    id: local/plugin/latest
commands:
  - name: build
    actions:
      - type: exec
        command: make local
"#;
    let fs = MemoryFs::new()
        .with_file("/work/devfile.yaml", local)
        .with_file("/base/devfile.yaml", PARENT);

    let devfile = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .expect("Should parse");
    let data = &devfile.data;

    assert_eq!(
        data.metadata(),
        &Metadata {
            name: Some("foo".to_string()),
            version: None
        }
    );

    let projects: Vec<_> = data
        .projects()
        .iter()
        .map(|p| (p.name.as_str(), p.source.location.as_str()))
        .collect();
    assert_eq!(
        projects,
        vec![
            ("a", "https://github.com/local/a.git"),
            ("b", "https://github.com/parent/b.git")
        ]
    );

    let plugins: Vec<_> = data
        .components()
        .iter()
        .filter(|c| c.component_type == ComponentType::ChePlugin)
        .collect();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].id.as_deref(), Some("local/plugin/latest"));
    assert_eq!(data.components().len(), 2);

    let commands: Vec<_> = data.commands().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(commands, vec!["build", "test"]);
    assert_eq!(
        data.commands()[0].actions[0].command.as_deref(),
        Some("make local")
    );
}

#[rstest]
fn test_relative_file_parent_resolved_against_working_dir() {
    let cwd = std::env::current_dir().unwrap();
    let local = "apiVersion: 1.0.0\nparent:\n  uri: file://base/devfile.yaml\n";
    let fs = MemoryFs::new()
        .with_file("/work/devfile.yaml", local)
        .with_file("/work/base/devfile.yaml", "apiVersion: 1.0.0\nmetadata:\n  name: beside-child\n")
        .with_file(cwd.join("base").join("devfile.yaml"), PARENT);

    let devfile = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .expect("Should parse");

    assert_eq!(devfile.data.metadata().name.as_deref(), Some("foo"));
}

#[rstest]
fn test_relative_file_parent_of_remote_devfile_uses_working_dir() {
    let cwd = std::env::current_dir().unwrap();
    let remote = "apiVersion: 1.0.0\nparent:\n  uri: file://base/devfile.yaml\n";
    let fs = MemoryFs::new()
        .with_file(
            "/work/devfile.yaml",
            "apiVersion: 1.0.0\nparent:\n  uri: https://example.com/parent.yaml\n",
        )
        .with_file(cwd.join("base").join("devfile.yaml"), PARENT);
    let transport = MapTransport::default().with("https://example.com/parent.yaml", remote);

    let devfile = parser(fs, transport)
        .parse("/work/devfile.yaml")
        .expect("Should parse");

    assert_eq!(devfile.data.metadata().name.as_deref(), Some("foo"));
    assert_eq!(devfile.data.projects().len(), 2);
}

#[rstest]
fn test_remote_parent_chain() {
    let local = r#"
apiVersion: 1.0.0
parent:
  uri: https://example.com/parent.yaml
commands:
  - name: run
    actions:
      - type: exec
        command: ./run
"#;
    let remote = r#"
apiVersion: 1.0.0
parent:
  uri: file:///grand/devfile.yaml
commands:
  - name: build
    actions:
      - type: exec
        command: make remote
"#;
    let fs = MemoryFs::new()
        .with_file("/work/devfile.yaml", local)
        .with_file("/grand/devfile.yaml", PARENT);
    let transport = MapTransport::default().with("https://example.com/parent.yaml", remote);

    let devfile = parser(fs, transport)
        .parse("/work/devfile.yaml")
        .expect("Should parse");

    let commands: Vec<_> = devfile
        .data
        .commands()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(commands, vec!["run", "build", "test"]);
    assert_eq!(
        devfile.data.commands()[1].actions[0].command.as_deref(),
        Some("make remote")
    );
    assert_eq!(devfile.data.metadata().name.as_deref(), Some("foo"));
    assert_eq!(devfile.data.projects().len(), 2);
}

#[rstest]
fn test_parent_with_unsupported_version_is_never_merged() {
    let fs = MemoryFs::new()
        .with_file(
            "/work/devfile.yaml",
            "apiVersion: 1.0.0\nparent:\n  uri: file:///base.yaml\n",
        )
        .with_file("/base.yaml", "apiVersion: 2.0.0\n");

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(&err, Error::Parent { uri, .. } if uri == "file:///base.yaml"));
    assert!(matches!(err.root(), Error::UnsupportedVersion { version } if version == "2.0.0"));
}

#[rstest]
#[case("1.0.0", "1.0.0", true)]
#[case("1.0.0", "2.0.0", false)]
fn test_ensure_same_version(#[case] local: &str, #[case] parent: &str, #[case] ok: bool) {
    let result = ensure_same_version(local, parent);

    assert_eq!(result.is_ok(), ok);
    if let Err(err) = result {
        assert!(matches!(
            err,
            Error::VersionMismatch { local: l, parent: p } if l == local && p == parent
        ));
    }
}

#[rstest]
fn test_cyclic_parents_detected() {
    let fs = MemoryFs::new()
        .with_file("/a.yaml", "apiVersion: 1.0.0\nparent:\n  uri: file:///b.yaml\n")
        .with_file("/b.yaml", "apiVersion: 1.0.0\nparent:\n  uri: file:///a.yaml\n");

    let err = parser(fs, MapTransport::default())
        .parse("/a.yaml")
        .unwrap_err();

    match err {
        Error::CyclicParent { chain } => assert_eq!(chain, vec!["/a.yaml", "/b.yaml", "/a.yaml"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn test_self_parent_detected() {
    let fs = MemoryFs::new().with_file(
        "/a.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: file:///a.yaml\n",
    );

    let err = parser(fs, MapTransport::default())
        .parse("/a.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::CyclicParent { .. }));
}

#[rstest]
fn test_remote_cycle_detected_by_uri() {
    let fs = MemoryFs::new().with_file(
        "/work/devfile.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: https://example.com/p.yaml\n",
    );
    let transport = MapTransport::default().with(
        "https://example.com/p.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: https://example.com/p.yaml\n",
    );

    let err = parser(fs, transport)
        .parse("/work/devfile.yaml")
        .unwrap_err();

    match err {
        Error::CyclicParent { chain } => assert_eq!(
            chain,
            vec![
                "/work/devfile.yaml",
                "https://example.com/p.yaml",
                "https://example.com/p.yaml"
            ]
        ),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn test_invalid_parent_uri() {
    let fs = MemoryFs::new().with_file(
        "/work/devfile.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: https://example.com/p.yaml?ref=main\n",
    );

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::InvalidUri { .. }), "{err:?}");
}

#[rstest]
fn test_fetch_failure_aborts_parse() {
    let fs = MemoryFs::new().with_file(
        "/work/devfile.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: https://example.com/missing.yaml\n",
    );

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::Fetch { .. }), "{err:?}");
}

#[rstest]
fn test_empty_parent_uri_fails_schema_validation() {
    let fs = MemoryFs::new().with_file(
        "/work/devfile.yaml",
        "apiVersion: 1.0.0\nparent:\n  uri: \"\"\n",
    );

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    match err {
        Error::SchemaValidation { violations, .. } => {
            assert!(violations.iter().any(|v| v.starts_with("/parent/uri")), "{violations:?}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn test_local_schema_violation() {
    let fs = MemoryFs::new().with_file("/work/devfile.yaml", "apiVersion: 1.0.0\nextra: 1\n");

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::SchemaValidation { .. }), "{err:?}");
}

#[rstest]
fn test_parent_schema_violation_reported_through_parent() {
    let fs = MemoryFs::new()
        .with_file(
            "/work/devfile.yaml",
            "apiVersion: 1.0.0\nparent:\n  uri: file:///base.yaml\n",
        )
        .with_file("/base.yaml", "apiVersion: 1.0.0\nextra: 1\n");

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::Parent { .. }));
    assert!(
        matches!(err.root(), Error::SchemaValidation { path, .. } if path == Path::new("/base.yaml"))
    );
}

#[rstest]
fn test_duplicate_local_names_fail_validation() {
    let content = r#"
apiVersion: 1.0.0
commands:
  - name: build
    actions: []
  - name: build
    actions: []
"#;
    let fs = MemoryFs::new().with_file("/work/devfile.yaml", content);

    let err = parser(fs, MapTransport::default())
        .parse("/work/devfile.yaml")
        .unwrap_err();

    assert!(matches!(err, Error::ValidationFailed(_)), "{err:?}");
}

#[rstest]
fn test_parse_from_disk() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("base")).unwrap();
    std::fs::write(tmp.path().join("base").join("devfile.yaml"), PARENT).unwrap();
    let parent_uri = format!("file://{}", tmp.path().join("base").join("devfile.yaml").display());
    std::fs::write(
        tmp.path().join("devfile.yaml"),
        format!("apiVersion: 1.0.0\nparent:\n  uri: {parent_uri}\nmetadata:\n  name: local\n"),
    )
    .unwrap();

    let devfile = parse(tmp.path().join("devfile.yaml")).expect("Should parse");

    assert_eq!(devfile.data.metadata().name.as_deref(), Some("local"));
    assert_eq!(devfile.data.projects().len(), 2);
    assert_eq!(devfile.ctx.parent_uri(), Some(parent_uri.as_str()));
}
