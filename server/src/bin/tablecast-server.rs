#![warn(rust_2018_idioms)]

use std::str::FromStr;

use flexi_logger::{LogSpecBuilder, LoggerHandle};
use futures::channel::mpsc;
use futures::StreamExt;
use log::{error, info, LevelFilter};

use tablecast_server::{run, settings};

fn main() -> anyhow::Result<()> {
    let settings = settings::load()?;
    let _logger = setup_logger(&settings.logging)?;
    let mut signal_rx = setup_signal()?;
    let runtime = setup_runtime(&settings.runtime)?;

    runtime.block_on(async move {
        // Forward receiving signal to shutdown notification.
        let shutdown = async move {
            signal_rx.next().await;
            info!("sending shutdown notice");
        };
        match run(settings.server, shutdown).await {
            Ok(stats) => info!(
                "served {} connections and {} snapshots",
                stats.total_accepted_connections, stats.total_publications
            ),
            Err(e) => error!("server stopped: {}", e),
        }
    });
    info!("good-bye, world!");
    Ok(())
}

fn setup_logger(l: &settings::Logging) -> anyhow::Result<LoggerHandle> {
    let mut spec_builder = LogSpecBuilder::new();
    spec_builder.default(LevelFilter::from_str(&l.level)?);
    let spec = spec_builder.build();
    let handle = flexi_logger::Logger::with(spec)
        .format(flexi_logger::default_format)
        .start()?;
    Ok(handle)
}

fn setup_signal() -> anyhow::Result<mpsc::Receiver<()>> {
    let (mut signal_tx, signal_rx) = mpsc::channel(2);
    ctrlc::set_handler(move || {
        info!("received interrupt signal");
        signal_tx.try_send(()).ok();
    })?;
    Ok(signal_rx)
}

fn setup_runtime(r: &settings::Runtime) -> anyhow::Result<tokio::runtime::Runtime> {
    let mut builder = if r.threaded {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.worker_threads(r.worker_threads.max(1));
        builder
    } else {
        tokio::runtime::Builder::new_current_thread()
    };
    builder
        .enable_all()
        .max_blocking_threads(r.blocking_threads.max(1))
        .thread_name(&r.thread_name);
    Ok(builder.build()?)
}
