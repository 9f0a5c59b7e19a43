// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `devfile show` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Display the resolved devfile
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    source: crate::SourceFlags,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let devfile = self.source.parser().parse(&self.source.file)?;

        match self.format.as_str() {
            "yaml" => print!("{}", devfile.data.to_yaml()?),
            "json" => println!("{}", devfile.data.to_json()?),
            "table" => self.show_table(&devfile),
            other => {
                return Err(miette::miette!(
                    "Unknown output format '{other}', expected table, yaml or json"
                ));
            }
        }

        Ok(0)
    }

    fn show_table(&self, devfile: &devfile::DevfileObj) {
        let data = &devfile.data;
        let metadata = data.metadata();

        println!("{}", "Devfile:".bold());
        println!();
        println!("  path:       {}", devfile.ctx.abs_path().display().to_string().cyan());
        println!("  apiVersion: {}", data.api_version());
        println!(
            "  name:       {}",
            metadata.name.as_deref().unwrap_or("<unset>").green()
        );
        if let Some(version) = &metadata.version {
            println!("  version:    {version}");
        }
        if let Some(uri) = devfile.ctx.parent_uri() {
            println!("  parent:     {}", uri.yellow());
        }

        println!();
        println!("{}", "Projects:".bold());
        if data.projects().is_empty() {
            println!("  {}", "(no projects)".dimmed());
        }
        for (i, project) in data.projects().iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                project.name.green(),
                project.source.location.dimmed()
            );
        }

        println!();
        println!("{}", "Components:".bold());
        if data.components().is_empty() {
            println!("  {}", "(no components)".dimmed());
        }
        for (i, component) in data.components().iter().enumerate() {
            let key = component
                .alias
                .as_deref()
                .or(component.id.as_deref())
                .unwrap_or("<anonymous>");
            println!(
                "  {}. {} [{}]",
                i + 1,
                key.green(),
                component.component_type.to_string().blue()
            );
        }

        println!();
        println!("{}", "Commands:".bold());
        if data.commands().is_empty() {
            println!("  {}", "(no commands)".dimmed());
        }
        for (i, command) in data.commands().iter().enumerate() {
            println!(
                "  {}. {} ({} action(s))",
                i + 1,
                command.name.green(),
                command.actions.len()
            );
        }
    }
}

