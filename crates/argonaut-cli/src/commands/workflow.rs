//! `argonaut submit | delete | link` — workflow service commands.

use std::path::Path;

use anyhow::Context;
use argonaut_client::{ServiceConfig, WorkflowService};
use argonaut_core::{Affinity, Workflow};
use tracing::info;

fn load_config(path: &str) -> anyhow::Result<ServiceConfig> {
    let config = ServiceConfig::from_file(Path::new(path))
        .with_context(|| format!("loading service config from {path}"))?;
    Ok(config.with_token_from_env())
}

/// Read the manifest and attach the affinity, if one was given.
pub fn prepare_workflow(workflow_path: &str, affinity_path: Option<&str>) -> anyhow::Result<Workflow> {
    let content = std::fs::read_to_string(workflow_path)
        .with_context(|| format!("reading workflow manifest {workflow_path}"))?;
    let workflow = Workflow::from_json_str(&content)
        .with_context(|| format!("parsing workflow manifest {workflow_path}"))?;

    match affinity_path {
        Some(path) => {
            let affinity = Affinity::from_file(Path::new(path))
                .with_context(|| format!("loading affinity from {path}"))?;
            Ok(workflow.with_affinity(&affinity))
        }
        None => Ok(workflow),
    }
}

pub async fn submit(
    config_path: &str,
    workflow_path: &str,
    affinity_path: Option<&str>,
    namespace: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let workflow = prepare_workflow(workflow_path, affinity_path)?;
    let service = WorkflowService::new(config)?;

    let namespace = namespace.unwrap_or(service.namespace()).to_string();
    info!(workflow = workflow.display_name(), %namespace, "submitting workflow");

    let created = service.submit(&workflow, &namespace).await?;
    println!("✓ Submitted {}", created.display_name());
    if let Some(name) = created.metadata.name.as_deref() {
        println!("  {}", service.workflow_link(name)?);
    }
    Ok(())
}

pub async fn delete(config_path: &str, name: &str) -> anyhow::Result<()> {
    let service = WorkflowService::new(load_config(config_path)?)?;
    let response = service.delete(name).await?;
    println!("✓ Deleted {name} ({})", response.status);
    Ok(())
}

pub fn link(config_path: &str, name: &str) -> anyhow::Result<()> {
    println!("{}", link_for(&load_config(config_path)?, name)?);
    Ok(())
}

/// The token is not needed for a link, so only the rest of the config is checked.
fn link_for(config: &ServiceConfig, name: &str) -> anyhow::Result<String> {
    config.validate()?;
    Ok(config.workflow_link(name)?)
}
