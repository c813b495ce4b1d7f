use std::path::PathBuf;

use anyhow::Context;
use autoraise::common::config::{Config, RaisePolicy};
use autoraise::common::log;
use clap::Parser;

#[derive(Parser)]
#[command(name = "autoraise", version, about = "Raise windows by hovering over them")]
struct Cli {
    /// Read this config file instead of ~/.config/autoraise/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which window to raise.
    #[arg(long, value_enum)]
    policy: Option<RaisePolicy>,

    /// Milliseconds the pointer must rest before raising.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    validate: bool,
}

fn main() -> anyhow::Result<()> {
    sigpipe::reset();
    let cli = Cli::parse();
    log::init_logging();

    let config = load_config(&cli)?;
    if cli.validate {
        print!("{}", config.to_toml().context("Failed to serialize config")?);
        return Ok(());
    }
    run(config)
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(policy) = cli.policy {
        config.settings.policy = policy;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.settings.delay_ms = Some(delay_ms);
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(target_os = "macos")]
fn run(config: Config) -> anyhow::Result<()> {
    use autoraise::actor::event_tap::EventTap;
    use autoraise::actor::reactor::Reactor;
    use autoraise::sys::axuielement;
    use autoraise::sys::mac::MacWindowSystem;
    use autoraise::sys::{run_loop, signal};
    use tracing::{error, info};

    println!(
        "autoraise {}: {} policy, {}ms delay. Press Ctrl-C to quit.",
        env!("CARGO_PKG_VERSION"),
        config.settings.policy,
        config.settings.delay().as_millis(),
    );

    if !axuielement::is_trusted() {
        println!(
            "autoraise needs accessibility access to raise windows. Enable it under \
             System Settings > Privacy & Security > Accessibility, then restart autoraise."
        );
    }

    let events_tx =
        Reactor::spawn(&config, MacWindowSystem::new).context("Failed to start reactor thread")?;

    let tap = EventTap::new(&config, events_tx);
    if tap.install() {
        // Every signal stops the run loop, so one that lands before the loop
        // is running is not the only chance to quit.
        std::thread::Builder::new()
            .name("signals".to_string())
            .spawn(stop_run_loop_on_signals)
            .context("Failed to start signal thread")?;
        info!("Watching mouse movement");
        run_loop::run();
    } else {
        error!("Could not create the event tap; idling until terminated");
        println!("autoraise could not observe the mouse. Check accessibility access.");
        let name = signal_runtime()?
            .block_on(signal::terminated())
            .context("Failed to install signal handlers")?;
        info!("Received {name}, shutting down");
    }

    tap.uninstall();
    info!("Exiting");
    Ok(())
}

#[cfg(target_os = "macos")]
fn signal_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start signal runtime")
}

#[cfg(target_os = "macos")]
fn stop_run_loop_on_signals() {
    use autoraise::sys::{run_loop, signal};
    use tracing::{error, info};

    let runtime = match signal_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{e:#}");
            return;
        }
    };
    let result = runtime.block_on(signal::for_each_termination(|name| {
        info!("Received {name}, shutting down");
        run_loop::stop_main();
    }));
    if let Err(e) = result {
        error!("Failed to install signal handlers: {e}");
    }
}

#[cfg(not(target_os = "macos"))]
fn run(_config: Config) -> anyhow::Result<()> { anyhow::bail!("autoraise only runs on macOS") }
