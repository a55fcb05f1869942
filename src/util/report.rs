use crate::error::StatError;
use crate::models::filesystem::VolumeUsage;
use crate::models::volume::Volume;
use crate::util::human::{fmt_bytes, fmt_pct};
use serde_json::{json, Value};

/// One row per volume; failures stay failures, never zeroes.
pub type VolumeResult = (Volume, Result<VolumeUsage, StatError>);

/// Generate a human-readable capacity report to a String.
pub fn generate(results: &[VolumeResult]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  volstat report — {}\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    out.push_str(&format!(
        "  {:<10} {:>10} {:>10} {:>10} {:>6}  {}\n",
        "Volume", "Total", "Used", "Free", "Use%", "Root"
    ));
    for (volume, result) in results {
        match result {
            Ok(u) => out.push_str(&format!(
                "  {:<10} {:>10} {:>10} {:>10} {:>6}  {}\n",
                volume.label(),
                format!("{} MiB", u.total_mib),
                format!("{} MiB", u.used_mib),
                format!("{} MiB", u.free_mib),
                fmt_pct(u.use_pct()),
                u.path.display(),
            )),
            Err(e) => out.push_str(&format!("  {:<10} unavailable: {}\n", volume.label(), e)),
        }
    }

    let ok: Vec<&VolumeUsage> = results.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
    if !ok.is_empty() {
        out.push('\n');
        for u in ok {
            out.push_str(&format!(
                "  {}: {} of {} used, {} free\n",
                u.volume.label(),
                fmt_bytes(u.used_bytes),
                fmt_bytes(u.total_bytes),
                fmt_bytes(u.free_bytes),
            ));
        }
    }
    out
}

/// JSON document with one entry per volume.
pub fn json(results: &[VolumeResult]) -> Value {
    let volumes: Vec<Value> = results.iter().map(|(volume, result)| match result {
        Ok(u) => json!({
            "volume":      volume,
            "path":        u.path,
            "total_mib":   u.total_mib,
            "free_mib":    u.free_mib,
            "used_mib":    u.used_mib,
            "total_bytes": u.total_bytes,
            "free_bytes":  u.free_bytes,
            "used_bytes":  u.used_bytes,
            "use_pct":     u.use_pct(),
        }),
        Err(e) => json!({
            "volume": volume,
            "error":  e.to_string(),
        }),
    }).collect();

    json!({
        "volstat_version": env!("CARGO_PKG_VERSION"),
        "timestamp":       chrono::Local::now().to_rfc3339(),
        "volumes":         volumes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filesystem::FsSnapshot;
    use std::path::PathBuf;

    fn sample() -> Vec<VolumeResult> {
        let snap = FsSnapshot { block_size: 4096, blocks: 1000, blocks_available: 500 };
        vec![
            (Volume::Primary, Ok(VolumeUsage::from_snapshot(Volume::Primary, PathBuf::from("/"), &snap))),
            (Volume::Removable, Err(StatError::unavailable(Volume::Removable, "/media/card", "not mounted"))),
        ]
    }

    #[test]
    fn report_lists_both_volumes() {
        let text = generate(&sample());
        assert!(text.contains("primary"));
        assert!(text.contains("3 MiB"));
        assert!(text.contains("removable  unavailable:"));
        assert!(text.contains("not mounted"));
    }

    #[test]
    fn json_keeps_failures_as_errors() {
        let v = json(&sample());
        let vols = v["volumes"].as_array().unwrap();
        assert_eq!(vols.len(), 2);
        assert_eq!(vols[0]["volume"], "primary");
        assert_eq!(vols[0]["total_mib"], 3);
        assert_eq!(vols[0]["used_mib"], 1);
        assert_eq!(vols[1]["volume"], "removable");
        assert!(vols[1].get("total_mib").is_none());
        assert!(vols[1]["error"].as_str().unwrap().contains("not mounted"));
    }
}
