//! `argonaut render` — materialize an affinity file to wire JSON.

use std::path::Path;

use anyhow::Context;
use argonaut_core::{Affinity, Materialize};
use tracing::info;

pub fn render(path: &str, compact: bool) -> anyhow::Result<()> {
    let affinity = Affinity::from_file(Path::new(path))
        .with_context(|| format!("loading affinity from {path}"))?;

    if affinity.materialize().is_none() {
        info!(file = path, "affinity is empty; nothing would be submitted");
    }
    println!("{}", render_json(&affinity, compact)?);
    Ok(())
}

/// The wire JSON for `affinity`, or `null` when it has no constraints.
pub fn render_json(affinity: &Affinity, compact: bool) -> anyhow::Result<String> {
    let wire = affinity.materialize();
    let json = if compact {
        serde_json::to_string(&wire)?
    } else {
        serde_json::to_string_pretty(&wire)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_affinity_renders_null() {
        assert_eq!(render_json(&Affinity::new(), true).unwrap(), "null");
    }

    #[test]
    fn renders_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("affinity.toml");
        std::fs::write(
            &path,
            r#"
[[pod_affinity.preferred]]
weight = 50
pod_affinity_term = { topology_key = "kubernetes.io/hostname" }
"#,
        )
        .unwrap();

        let affinity = Affinity::from_file(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&affinity, false).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "podAffinity": {
                    "preferredDuringSchedulingIgnoredDuringExecution": [{
                        "weight": 50,
                        "podAffinityTerm": {"topologyKey": "kubernetes.io/hostname"}
                    }]
                }
            })
        );
    }

    #[test]
    fn pretty_by_default_and_single_line_when_compact() {
        use argonaut_core::{PodAffinity, PodAffinityTerm, TopologyKey};

        let affinity = Affinity::new().with_pod_affinity(
            PodAffinity::new().with_required(PodAffinityTerm::with_topology(TopologyKey::zone())),
        );
        assert!(render_json(&affinity, false).unwrap().contains('\n'));
        assert!(!render_json(&affinity, true).unwrap().contains('\n'));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(render("/nonexistent/affinity.toml", true).is_err());
    }
}
