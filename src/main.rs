use clap::Parser;
use climate_controller::climate::{Controller, Topics};
use climate_controller::config::{self, Config, ControllerConfig};
use climate_controller::error::Result;
use climate_controller::http;
use climate_controller::input::mqtt::{
    LinkMonitor, MqttActuatorPublisher, MqttClient, MqttIntegration,
};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Command-line overrides; environment variables and `.env` fill the rest.
#[derive(Parser)]
#[command(name = "climate-controller")]
#[command(about = "Opens and closes room heating valves from MQTT sensor readings")]
struct Cli {
    /// Target room temperature in degrees Celsius
    #[arg(long)]
    desired_temp: Option<f64>,

    /// Address of the status HTTP endpoint
    #[arg(long)]
    http_bind: Option<SocketAddr>,

    /// MQTT broker host
    #[arg(long)]
    mqtt_host: Option<String>,

    /// MQTT broker port
    #[arg(long)]
    mqtt_port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(temp) = self.desired_temp {
            config.controller = ControllerConfig::new(temp)?;
        }
        if let Some(bind) = self.http_bind {
            config.http.bind = bind;
        }
        if let Some(host) = self.mqtt_host {
            config.mqtt.broker_host = host;
        }
        if let Some(port) = self.mqtt_port {
            config.mqtt.broker_port = port;
        }
        Ok(())
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    config::load_dotenv();
    init_logger();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting climate controller");

    let mut config = Config::from_env()?;
    cli.apply(&mut config)?;
    info!("Configuration loaded:");
    info!(
        "  MQTT broker: {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );
    info!("  Desired temperature: {}°C", config.controller.desired_temperature);
    info!("  Status endpoint: {}", config.http.bind);

    let topics = Topics::new(config.mqtt.topic_prefix.clone());
    let mqtt_client = MqttClient::new(&config.mqtt, topics.subscriptions());
    let monitor = LinkMonitor::new();
    let publisher = MqttActuatorPublisher::new(mqtt_client.client(), topics.clone());

    let controller = Arc::new(Controller::new(
        config.controller,
        topics,
        Arc::new(publisher),
        Arc::new(monitor.clone()),
    ));

    let shutdown = CancellationToken::new();
    let mqtt_task = MqttIntegration::new(mqtt_client, monitor, controller.clone())
        .start(shutdown.clone());
    let mut http_task = tokio::spawn(http::serve(
        config.http.bind,
        controller,
        shutdown.clone(),
    ));

    info!("Climate controller is running, press Ctrl+C to exit");

    // Wait for shutdown signal, or for the HTTP server to fail early
    let finished_early = tokio::select! {
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
            None
        }
        result = &mut http_task => Some(result),
    };
    shutdown.cancel();

    let http_result = match finished_early {
        Some(result) => result,
        None => http_task.await,
    };

    if let Err(e) = mqtt_task.await {
        error!("MQTT task failed: {}", e);
    }
    match http_result {
        Ok(result) => result?,
        Err(e) => error!("HTTP task failed: {}", e),
    }

    info!("Climate controller stopped");
    Ok(())
}
