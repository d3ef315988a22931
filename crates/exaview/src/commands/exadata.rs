//! Exadata command handlers.

use tabled::Tabled;

use exaview_core::{
    Category, Command as CoreCommand, CommandResult, Component, Dashboard, RackView, Rdma,
    SearchOutcome, normalize,
};

use crate::cli::{ExadataArgs, ExadataCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RackRow {
    #[tabled(rename = "Rack ID")]
    rack_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    machine_type: String,
    #[tabled(rename = "KVM")]
    kvm: usize,
    #[tabled(rename = "DOM0")]
    dom0: usize,
    #[tabled(rename = "Bare metal")]
    bare_metal: usize,
    #[tabled(rename = "Cells")]
    cells: usize,
    #[tabled(rename = "IB")]
    ib: usize,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&RackView> for RackRow {
    fn from(r: &RackView) -> Self {
        Self {
            rack_id: r.rack_id.clone(),
            name: r.hostname.clone(),
            machine_type: r.machine_type.to_string(),
            kvm: r.kvm_hosts.len(),
            dom0: r.dom0_hosts.len(),
            bare_metal: r.bare_metal_hosts.len(),
            cells: r.storage_cells.len(),
            ib: r.ib_switches.len(),
            updated: r
                .update_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn component_lines(c: &Component, lines: &mut Vec<String>) {
    let clusters = util::join_or_dash(&c.cluster_names);
    lines.push(format!(
        "  {} ({})  model {}  image {}  clusters {}",
        c.hostname,
        c.host_id,
        output::or_dash(c.model.as_deref()),
        output::or_dash(c.image_version.as_deref()),
        clusters
    ));
    for vm in &c.vms {
        lines.push(format!(
            "    vm {}  cpu {}  ram {}  cluster {}",
            vm.name,
            opt(vm.cpu_current.or(vm.cpu_online)),
            opt(vm.ram_current.or(vm.ram_online)),
            output::or_dash(vm.cluster_name.as_deref())
        ));
    }
    for disk in &c.cell_disks {
        lines.push(format!(
            "    disk {}  cell {}  {}  size {}  free {}  errors {}",
            output::or_dash(disk.cell_disk.as_deref()),
            output::or_dash(disk.cell.as_deref()),
            output::or_dash(disk.status.as_deref()),
            output::or_dash(disk.size.as_deref()),
            output::or_dash(disk.free_space.as_deref()),
            opt(disk.error_count)
        ));
    }
}

fn detail(view: &RackView, color: bool) -> String {
    let p = &view.progress;
    let mut lines = vec![
        format!("Rack:      {}", view.rack_id),
        format!("Name:      {}", view.hostname),
        format!("Type:      {}", view.machine_type),
        format!(
            "Updated:   {}",
            opt(view.update_at.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC")))
        ),
        format!(
            "CPU:       {} used / {} total ({} free)",
            opt(p.used_cpu),
            opt(p.total_cpu),
            opt(p.free_cpu)
        ),
        format!(
            "Memory:    {} used / {} total ({} free)",
            opt(p.used_memory),
            opt(p.total_memory),
            opt(p.free_memory)
        ),
        format!(
            "Storage:   {} used / {} total ({} free)",
            opt(p.used_size),
            opt(p.total_size),
            opt(p.free_space)
        ),
    ];
    match &view.rdma {
        Some(r) => lines.push(format!(
            "RDMA:      {} (model {}, sw {})",
            r.switch_name, r.model, r.sw_version
        )),
        None => lines.push("RDMA:      -".into()),
    }

    for category in Category::ALL {
        let members = category.members(view);
        if members.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(output::heading(
            &format!("{} ({})", category.label(), members.len()),
            color,
        ));
        for c in members {
            component_lines(c, &mut lines);
        }
    }
    lines.join("\n")
}

/// Table plus one line per rack whose nested rows matched.
fn expanded(outcome: &SearchOutcome, color: bool) -> String {
    let rows: Vec<RackRow> = outcome.records.iter().map(RackRow::from).collect();
    let mut out = output::render_table(&rows);

    let mut matched = Vec::new();
    for (rack_id, open) in &outcome.open_rows {
        if open.is_empty() {
            continue;
        }
        let mut parts = Vec::new();
        for (label, hosts) in [
            ("KVM", &open.kvm),
            ("DOM0", &open.dom0),
            ("Cells", &open.storage_cell),
        ] {
            if !hosts.is_empty() {
                let names: Vec<String> =
                    hosts.iter().map(|h| output::highlight(h, color)).collect();
                parts.push(format!("{label}: {}", names.join(", ")));
            }
        }
        matched.push(format!("  {rack_id}  {}", parts.join("; ")));
    }

    if !matched.is_empty() {
        out.push_str("\n\n");
        out.push_str(&output::heading("Matched inside", color));
        out.push('\n');
        out.push_str(&matched.join("\n"));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ExadataArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    // Every subcommand works on the current inventory; writes patch it.
    dashboard.fetch_racks(None).await?;

    match args.command {
        ExadataCommand::List { search, expanded: show_expanded } => {
            let outcome = dashboard.search_racks(search.as_deref().unwrap_or(""));
            let out = if show_expanded {
                output::render_single(
                    &global.output,
                    &outcome,
                    |o| expanded(o, color),
                    |o| {
                        o.records
                            .iter()
                            .map(|r| r.rack_id.clone())
                            .collect::<Vec<_>>()
                            .join("\n")
                    },
                )?
            } else {
                output::render_list(
                    &global.output,
                    &outcome.records,
                    |r| RackRow::from(r),
                    |r| r.rack_id.clone(),
                )?
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExadataCommand::Show { rack_id } => {
            let rack = dashboard.rack(&rack_id).map_err(|_| CliError::NotFound {
                resource_type: "rack".into(),
                identifier: rack_id.clone(),
                list_command: "exadata list".into(),
            })?;
            let view = normalize(&rack);
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| v.rack_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExadataCommand::ClusterNames {
            rack_id,
            host_id,
            names,
        } => {
            dashboard
                .execute(CoreCommand::UpdateClusterNames {
                    rack_id,
                    host_id: host_id.clone(),
                    cluster_names: names,
                })
                .await?;
            if !global.quiet {
                eprintln!("Cluster names updated on {host_id}");
            }
            Ok(())
        }

        ExadataCommand::VmCluster {
            rack_id,
            host_id,
            vm,
            name,
        } => {
            dashboard
                .execute(CoreCommand::UpdateVmClusterName {
                    rack_id,
                    host_id,
                    vm_name: vm.clone(),
                    cluster_name: name.clone(),
                })
                .await?;
            if !global.quiet {
                eprintln!("VM {vm} assigned to cluster {name}");
            }
            Ok(())
        }

        ExadataCommand::Rdma {
            rack_id,
            sw_version,
            switch_name,
            model,
        } => {
            let current = dashboard.rack(&rack_id)?;
            if let Some(ref existing) = current.rdma {
                let prompt = format!(
                    "Replace RDMA descriptor {} on rack {rack_id}?",
                    existing.switch_name
                );
                if !util::confirm(&prompt, global.yes)? {
                    return Ok(());
                }
            }

            let CommandResult::Rack(rack) = dashboard
                .execute(CoreCommand::UpdateRdma {
                    rack_id,
                    rdma: Rdma {
                        sw_version,
                        switch_name,
                        model,
                    },
                })
                .await?;
            if !global.quiet {
                eprintln!("RDMA descriptor saved on rack {}", rack.rack_id);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exaview_core::{HostType, Progress, Rack};

    fn view() -> RackView {
        let kvm = Component {
            host_type: HostType::KvmHost,
            host_id: "H1".into(),
            hostname: "kvm01".into(),
            model: None,
            image_version: None,
            kernel: None,
            sw_version: None,
            total_cpu: None,
            used_cpu: None,
            free_cpu: None,
            cpu_enabled: None,
            memory: None,
            used_ram: None,
            free_ram: None,
            cluster_names: vec!["c1".into()],
            vms: Vec::new(),
            cell_disks: Vec::new(),
        };
        normalize(&Rack {
            rack_id: "R1".into(),
            hostname: "exa-milan".into(),
            update_at: None,
            progress: Progress::default(),
            rdma: None,
            components: vec![kvm],
        })
    }

    #[test]
    fn row_counts_components_per_category() {
        let row = RackRow::from(&view());
        assert_eq!(row.kvm, 1);
        assert_eq!(row.cells, 0);
        assert_eq!(row.machine_type, "KVM");
        assert_eq!(row.updated, "-");
    }

    #[test]
    fn detail_lists_only_populated_categories() {
        let text = detail(&view(), false);
        assert!(text.contains("KVM hosts (1)"));
        assert!(text.contains("kvm01 (H1)"));
        assert!(!text.contains("Storage cells"));
        assert!(text.contains("RDMA:      -"));
    }
}
