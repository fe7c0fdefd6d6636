//! systemd user unit text.

use crate::context::{DataKind, ExecutionContext, ServiceKind};

/// The unit file for one daemon of the selected network.
pub fn unit_file(ctx: &ExecutionContext, kind: ServiceKind) -> String {
    let network = &ctx.network().human_name;
    let node = ctx.service_name(ServiceKind::Node);
    let dal = ctx.service_name(ServiceKind::Dal);
    let node_dir = ctx.data_dir(DataKind::Node);
    let client_dir = ctx.data_dir(DataKind::Client);
    let daemon = &ctx.network().last_baking_daemon;

    let (description, exec_start, after, install) = match kind {
        ServiceKind::Node => (
            "Octez Node",
            format!(
                "{} run --data-dir {}",
                ctx.binary("octez-node").display(),
                node_dir.display()
            ),
            None,
            format!(
                "RequiredBy={} {} {}",
                ctx.service_name(ServiceKind::Baker),
                ctx.service_name(ServiceKind::Accuser),
                dal
            ),
        ),
        ServiceKind::Dal => (
            "Octez DAL",
            format!(
                "{} run --data-dir {} {}",
                ctx.binary("octez-dal-node").display(),
                ctx.data_dir(DataKind::Dal).display(),
                ctx.network().ports.dal_args().join(" ")
            ),
            Some(node.to_string()),
            format!("WantedBy={}", node),
        ),
        ServiceKind::Baker => (
            "Octez Baker",
            format!(
                "{} --base-dir {} --endpoint {} run with local node {} --dal-node http://127.0.0.1:{}",
                ctx.binary(&format!("octez-baker-{}", daemon)).display(),
                client_dir.display(),
                ctx.network().ports.node_endpoint(),
                node_dir.display(),
                ctx.network().ports.dal_rpc
            ),
            Some(format!("{} {}", node, dal)),
            format!("WantedBy={} {}", node, dal),
        ),
        ServiceKind::Accuser => (
            "Octez Accuser",
            format!(
                "{} --base-dir {} --endpoint {} run",
                ctx.binary(&format!("octez-accuser-{}", daemon)).display(),
                client_dir.display(),
                ctx.network().ports.node_endpoint()
            ),
            Some(node.to_string()),
            format!("WantedBy={}", node),
        ),
    };

    let binds = after
        .map(|after| format!("After={after}\nBindsTo={after}\n"))
        .unwrap_or_default();

    format!(
        "[Unit]\n\
         Description={description} - {network}\n\
         {binds}\n\
         [Service]\n\
         Type=simple\n\
         ExecStart={exec_start}\n\
         Restart=on-failure\n\
         \n\
         [Install]\n\
         {install}\n"
    )
}
