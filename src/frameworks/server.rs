// Framework bootstrap for the game server runtime.

use crate::frameworks::{arena, config};
use crate::interface_adapters::net::UdpEndpoint;
use crate::use_cases::{FixedStep, SimSettings, Simulation};

use std::io::Result;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::UdpSocket;
use tokio::time::{self, MissedTickBehavior};

pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Settings the server fills in from the environment and command line.
pub fn sim_settings(bot_count: usize) -> SimSettings {
    SimSettings {
        bot_count: bot_count.min(config::MAX_BOTS),
        seed: config::rng_seed(),
        connection_timeout: config::CONNECTION_TIMEOUT_SECS,
        max_players: config::MAX_PLAYERS,
        dt: 1.0 / config::TICK_RATE as f32,
    }
}

/// Runs the tick loop on an already bound socket until Ctrl-C.
pub async fn run(socket: UdpSocket, settings: SimSettings) -> Result<()> {
    let address = socket.local_addr()?;
    let mut endpoint = UdpEndpoint::new(socket, config::RECV_BUFFER_SIZE);
    let mut sim = Simulation::new(arena::arctic(), settings);
    let mut clock = FixedStep::new(config::TICK_INTERVAL, config::MAX_CATCH_UP_STEPS);

    let mut interval = time::interval(clock.step());
    // After a stall, resume on the next boundary instead of bursting.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(%address, tick_rate = config::TICK_RATE, "listening");

    let mut last = Instant::now();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            res = &mut shutdown => {
                if let Err(e) = res {
                    tracing::error!(error = %e, "failed to listen for shutdown signal");
                }
                break;
            }
        }

        let now = Instant::now();
        let due = clock.advance(now - last);
        last = now;

        for _ in 0..due {
            let events = endpoint.drain();
            let output = sim.step(events);
            endpoint.broadcast(&output);
        }
    }

    tracing::info!(
        tick = sim.tick(),
        connections = sim.connection_count(),
        "shutting down"
    );
    Ok(())
}

pub async fn run_with_config(port: Option<u16>, bots: Option<usize>) -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or_else(config::udp_port)));

    // Bind UDP socket with error handling
    let socket = UdpSocket::bind(address).await.inspect_err(|e| {
        tracing::error!(%address, error = %e, "failed to bind");
    })?;

    run(socket, sim_settings(bots.unwrap_or_else(config::bot_count))).await
}
