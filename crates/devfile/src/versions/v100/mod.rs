// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Data types for devfiles declaring `apiVersion: 1.0.0`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

mod merge;


/// The version string handled by this module.
pub const API_VERSION: &str = "1.0.0";

/// A 1.0.0 devfile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Devfile100 {
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,

    /// Upstream devfile this one inherits from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Events>,
}

/// Descriptive fields. Merged as a single unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Metadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Parent {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_path: Option<String>,

    pub source: ProjectSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSource {
    #[serde(rename = "type")]
    pub source_type: ProjectSourceType,

    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_checkout_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSourceType {
    Git,
    Github,
    Zip,
}

/// A buildable or runnable piece of the workspace.
///
/// Fields not modelled here are kept in `extra` so they survive a
/// parse/write cycle.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_sources: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Component {
    /// Create a component of the given type with every optional field unset.
    pub fn new(component_type: ComponentType) -> Self {
        Self {
            alias: None,
            component_type,
            id: None,
            reference: None,
            registry_url: None,
            memory_limit: None,
            image: None,
            mount_sources: None,
            extra: BTreeMap::new(),
        }
    }

    /// Editors and plugins are singletons; only one of each is expected.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self.component_type,
            ComponentType::CheEditor | ComponentType::ChePlugin
        )
    }

    /// The key a parent component is looked up by during merge.
    pub fn dedup_key(&self) -> Option<DedupKey<'_>> {
        if self.is_singleton() {
            return Some(DedupKey::Singleton(self.component_type));
        }
        self.alias
            .as_deref()
            .or(self.id.as_deref())
            .map(DedupKey::Named)
    }
}

/// Identity of a component for deduplication.
///
/// Singletons are only ever compared with singletons of the same type, so an
/// alias that happens to read `chePlugin` never shadows a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupKey<'a> {
    Singleton(ComponentType),
    Named(&'a str),
}

impl std::fmt::Display for DedupKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Singleton(component_type) => write!(f, "{component_type}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    CheEditor,
    ChePlugin,
    Dockerimage,
    Kubernetes,
    Openshift,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheEditor => "cheEditor",
            Self::ChePlugin => "chePlugin",
            Self::Dockerimage => "dockerimage",
            Self::Kubernetes => "kubernetes",
            Self::Openshift => "openshift",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,

    #[serde(default)]
    pub actions: Vec<CommandAction>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<PreviewUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAction {
    #[serde(rename = "type")]
    pub action_type: CommandActionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandActionType {
    Exec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PreviewUrl {
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Events {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_start: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_start: Vec<String>,
}

impl Devfile100 {
    /// Check the structural invariants of a (possibly merged) devfile.
    pub fn validate(&self) -> crate::Result<()> {
        let mut problems = Vec::new();

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.is_empty() {
                problems.push("project with empty name".to_string());
            } else if !seen.insert(project.name.as_str()) {
                problems.push(format!("duplicate project name '{}'", project.name));
            }
        }

        let mut seen = HashSet::new();
        for command in &self.commands {
            if command.name.is_empty() {
                problems.push("command with empty name".to_string());
            } else if !seen.insert(command.name.as_str()) {
                problems.push(format!("duplicate command name '{}'", command.name));
            }
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if let Some(key) = component.dedup_key() {
                if !seen.insert(key) {
                    problems.push(format!("duplicate component '{key}'"));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::ValidationFailed(problems.join(", ")))
        }
    }
}
