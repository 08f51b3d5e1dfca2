//! Check operation - manifest summary.

use std::path::Path;

use mga_manifest::Manifest;

use crate::reports::{CheckReport, SectionSummary};

/// Summarize a manifest that parsed and validated successfully.
pub fn check(manifest: &Manifest, config_path: &Path) -> CheckReport {
    let event_dispatchers = manifest
        .event_dispatchers
        .iter()
        .map(|d| SectionSummary {
            name: format!("{}EventDispatcher", d.name),
            items: d.methods.iter().map(|m| m.name.clone()).collect(),
        })
        .collect();
    let services = manifest
        .services
        .iter()
        .map(|s| SectionSummary {
            name: format!("{}.{}", s.package.name, s.name),
            items: s.endpoints.iter().map(|e| e.name.clone()).collect(),
        })
        .collect();

    CheckReport {
        config_path: config_path.to_path_buf(),
        package: manifest.package.path.clone(),
        event_dispatchers,
        services,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_check_summarizes_sections() {
        let manifest = Manifest::from_str(
            r#"
[package]
path = "example.com/app/order/orderdriver"
name = "orderdriver"

[[event_dispatchers]]
name = "Order"

[[event_dispatchers.methods]]
name = "Created"
event = { path = "example.com/app/order", name = "Created" }

[[event_dispatchers.methods]]
name = "Deleted"
event = { path = "example.com/app/order", name = "Deleted" }
"#,
        )
        .unwrap();

        let report = check(&manifest, Path::new("mga.toml"));
        assert_eq!(report.package, "example.com/app/order/orderdriver");
        assert_eq!(report.event_dispatchers[0].name, "OrderEventDispatcher");
        assert_eq!(report.event_dispatchers[0].items, ["Created", "Deleted"]);
        assert!(report.services.is_empty());
    }
}
