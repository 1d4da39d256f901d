use crate::conf::types::EdgeConfig;
use crate::server::pid;
use crate::server::proxy::EdgeGateway;
use crate::server::reload::ReloadHandle;
use crate::server::runtime::{RuntimeState, build_runtime_state, origin_kind, reload_runtime_state};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the edge until the process is told to stop.
pub fn run(config_path: PathBuf, config: EdgeConfig) -> Result<()> {
    use tokio::runtime::Builder;

    if let Some(pid_file) = &config.server.pid_file {
        match pid::write_pid(pid_file) {
            Ok(()) => tracing::info!(pid_file, "pid file written"),
            Err(e) => tracing::warn!(error = %e, pid_file, "failed to write pid file; continuing"),
        }
    }

    let initial_state = build_runtime_state(&config)?;
    tracing::info!(
        listen = config.server.listen.as_str(),
        origin = origin_kind(&initial_state.origin),
        devices = initial_state.devices.all().len(),
        "starting edge"
    );
    let state = Arc::new(ArcSwap::from_pointee(initial_state));

    // Signals and reloads only. Pingora owns the data-plane runtimes.
    let control_rt = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to build control-plane runtime")?;

    let reload = ReloadHandle::new();

    control_rt.spawn({
        let reload = reload.clone();
        async move {
            if let Err(e) = reload.install_signal_handler().await {
                tracing::error!(error = %e, "failed to install SIGHUP handler");
            }
        }
    });

    control_rt.spawn({
        let mut reload_rx = reload.subscribe();
        let state = state.clone();

        async move {
            while reload_rx.changed().await.is_ok() {
                let generation = reload_rx.borrow_and_update().generation;
                tracing::info!(generation, "reload requested");

                match reload_runtime_state(&config_path, &state).await {
                    Ok(()) => tracing::info!(generation, "reload successful"),
                    Err(e) => tracing::error!(generation, error = %e, "reload failed"),
                }
            }
        }
    });

    let server = build_edge_server(&config, state)?;

    if let Some(pid_file) = config.server.pid_file.clone() {
        ctrlc::set_handler(move || {
            tracing::info!("shutdown requested, removing pid file");
            pid::remove_pid(&pid_file);
            std::process::exit(0);
        })?;
    }

    // control_rt must outlive run_forever, which never returns.
    server.run_forever();
}

/// Build (but do not start) the Pingora server for `config`.
pub fn build_edge_server(config: &EdgeConfig, state: Arc<ArcSwap<RuntimeState>>) -> Result<Server> {
    let mut server = match config.server.threads {
        Some(threads) => {
            tracing::debug!(threads, "overriding pingora worker threads");
            let mut conf = ServerConf::new().context("failed to build pingora configuration")?;
            conf.threads = threads;
            Server::new_with_opt_and_conf(None, conf)
        }
        // `None` keeps every pingora default.
        None => Server::new(None)?,
    };

    server.bootstrap();

    let mut svc = http_proxy_service(&server.configuration, EdgeGateway::new(state));
    svc.add_tcp(&config.server.listen);
    server.add_service(svc);

    Ok(server)
}
