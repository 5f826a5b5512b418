//! matter-dashboard entry point.
//!
//! Connects to the dashboard server, renders the dashboard to stdout and
//! reads commands from stdin.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use matter_dashboard::config::DashboardConfig;
use matter_dashboard::console::{Command, HELP};
use matter_dashboard::dashboard::{Dashboard, TerminalNotifier, actions};
use matter_dashboard::domain::{DeviceId, EventBus, RedrawReceiver};
use matter_dashboard::view;
use matter_dashboard::ws::{ClientHandle, ConnectionClient, HandlerRegistry, Outbound};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for the dashboard itself
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load configuration
    let config = DashboardConfig::from_env()?;
    tracing::info!(endpoint = %config.endpoint, "starting matter-dashboard");

    // Build dashboard
    let events = EventBus::default();
    let dashboard = Dashboard::new(
        Arc::new(TerminalNotifier),
        events.clone(),
        config.log_capacity,
    );
    let watched = config.device_id.as_deref().map(DeviceId::from);
    dashboard.watch_device(watched.clone());

    // Build client
    let mut registry = HandlerRegistry::new();
    dashboard.install(&mut registry);
    let mut client =
        ConnectionClient::new(config.endpoint.clone(), config.reconnect_policy(), registry);
    if let Some(id) = watched {
        client = client.with_initial_request(Outbound::get_device_detail(id));
    }
    let handle = client.handle();
    let client_task = tokio::spawn(client.run());

    if config.render_on_update {
        tokio::spawn(render_on_change(dashboard.clone(), events.subscribe_redraws()));
    }

    print_lines([HELP]);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tokio::select! {
        joined = client_task => {
            joined??;
        }
        () = console_loop(&dashboard, &handle, &mut lines) => {
            tracing::info!("exiting");
        }
    }

    Ok(())
}

/// Redraws the dashboard after every batch of changes until the bus closes.
async fn render_on_change(dashboard: Dashboard, mut redraws: RedrawReceiver) {
    while redraws.recv().await.is_some() {
        print_lines(dashboard.read(view::render));
    }
}

/// Executes stdin commands until `quit` or end of input.
async fn console_loop(
    dashboard: &Dashboard,
    handle: &ClientHandle,
    lines: &mut Lines<BufReader<Stdin>>,
) {
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stdin");
                break;
            }
        };
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(dashboard, handle, command),
            Err(err) => dashboard.alert(&format!("{err} (type `help`)")),
        }
    }
}

fn execute(dashboard: &Dashboard, handle: &ClientHandle, command: Command) {
    let label = command.to_string();
    let result = match command {
        Command::List => {
            print_lines(dashboard.read(view::render_device_list));
            Ok(())
        }
        Command::Detail(id) => {
            let sent = actions::request_device_detail(dashboard, handle, &id);
            print_lines(dashboard.read(view::render_device_detail));
            sent
        }
        Command::Toggle(id, on) => actions::toggle_device(handle, &id, on),
        // add_device alerts on its own
        Command::Add(code) => {
            let _ = actions::add_device(dashboard, handle, &code);
            Ok(())
        }
        Command::Status => {
            let mut lines = vec![dashboard.read(view::render_server_status)];
            lines.extend(dashboard.read(view::render_server_info));
            lines.push(format!("connection: {}", handle.state()));
            print_lines(lines);
            Ok(())
        }
        Command::Logs => {
            let (held, capacity) = dashboard.read(|s| (s.logs.len(), s.log_capacity()));
            print_lines([format!("logs ({held}/{capacity})")]);
            print_lines(dashboard.read(view::render_logs));
            Ok(())
        }
        Command::Help => {
            print_lines([HELP]);
            Ok(())
        }
        Command::Quit => Ok(()),
    };
    if let Err(err) = result {
        let hint = if err.is_transient() { "; retrying in the background" } else { "" };
        dashboard.alert(&format!("{label}: {err}{hint}"));
    }
}

fn print_lines<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        if writeln!(stdout, "{}", line.as_ref()).is_err() {
            return;
        }
    }
}
