// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Parent/local merge rules for 1.0.0 devfiles.
//!
//! The local devfile always wins: entities are only ever added from the
//! parent, never replaced or field-merged.

use std::collections::HashSet;

use super::{Command, Component, ComponentType, DedupKey, Devfile100, Metadata, Project};

#[cfg(test)]
#[path = "./merge_test.rs"]
mod merge_test;

impl Devfile100 {
    /// Merge `parent` into this devfile in place.
    pub fn merge(&mut self, parent: Devfile100) {
        merge_metadata(&mut self.metadata, parent.metadata);
        merge_projects(&mut self.projects, parent.projects);
        merge_components(&mut self.components, parent.components);
        merge_commands(&mut self.commands, parent.commands);
    }
}

fn merge_metadata(local: &mut Metadata, parent: Metadata) {
    if local.is_empty() {
        *local = parent;
    }
}

fn merge_projects(local: &mut Vec<Project>, parent: Vec<Project>) {
    merge_by_name(local, parent, |project| project.name.as_str());
}

fn merge_commands(local: &mut Vec<Command>, parent: Vec<Command>) {
    merge_by_name(local, parent, |command| command.name.as_str());
}

/// Append every parent entry whose name is not already used locally.
fn merge_by_name<T, F>(local: &mut Vec<T>, parent: Vec<T>, name: F)
where
    F: Fn(&T) -> &str,
{
    if parent.is_empty() {
        return;
    }
    if local.is_empty() {
        *local = parent;
        return;
    }

    let names: HashSet<String> = local.iter().map(|item| name(item).to_owned()).collect();
    local.extend(
        parent
            .into_iter()
            .filter(|item| !names.contains(name(item))),
    );
}

fn merge_components(local: &mut Vec<Component>, parent: Vec<Component>) {
    if parent.is_empty() {
        return;
    }
    if local.is_empty() {
        *local = parent;
        return;
    }

    // Generic local components register both their alias and their id,
    // while a parent component is looked up by alias first, then id.
    let mut singletons: HashSet<ComponentType> = HashSet::new();
    let mut names: HashSet<String> = HashSet::new();
    for component in local.iter() {
        if component.is_singleton() {
            singletons.insert(component.component_type);
            continue;
        }
        names.extend(component.alias.iter().cloned());
        names.extend(component.id.iter().cloned());
    }

    for component in parent {
        let present = match component.dedup_key() {
            Some(DedupKey::Singleton(component_type)) => singletons.contains(&component_type),
            Some(DedupKey::Named(name)) => names.contains(name),
            None => false,
        };
        if !present {
            local.push(component);
        }
    }
}
