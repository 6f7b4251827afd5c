//! End-to-end check against a running controller.
//!
//! Usage:
//!   cargo run --bin e2e-check -- --room 1
//!
//! Publishes a cold temperature reading and a motion reading for one room,
//! waits for that room's valve to be opened, then reads the controller's
//! status endpoint and checks the room's recorded state.

use clap::Parser;
use climate_controller::climate::actuator::ActuatorPayload;
use climate_controller::climate::{Metric, RoomId, Topics, ValveLevel};
use climate_controller::config::{self, Config};
use climate_controller::input::mqtt::{LinkMonitor, LinkState, MqttClient, MqttMessage};
use log::{error, info, warn};
use rumqttc::QoS;
use std::time::Duration;
use tokio::sync::mpsc;

const TEST_TEMPERATURE: f64 = 10.0;
const TEST_MOTION: bool = true;

#[derive(Parser)]
#[command(name = "e2e-check")]
#[command(about = "Drive a running climate controller through MQTT and verify its reaction")]
struct Cli {
    /// Room to exercise
    #[arg(long, default_value = "1")]
    room: String,

    /// Status endpoint of the controller under test
    #[arg(
        long,
        env = "STATUS_URL",
        default_value = "http://127.0.0.1:8000/health-check"
    )]
    status_url: String,

    /// Seconds to wait for each step
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match check(&cli).await {
        Ok(()) => info!("Test passed"),
        Err(reason) => {
            error!("Test failed: {}", reason);
            std::process::exit(1);
        }
    }
}

async fn check(cli: &Cli) -> Result<(), String> {
    let room = RoomId::new(&cli.room).ok_or_else(|| format!("invalid room id {:?}", cli.room))?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    let mut config = Config::from_env().map_err(|e| e.to_string())?;
    config.mqtt.client_id = format!("e2e-check-{}", uuid::Uuid::new_v4());
    let topics = Topics::new(config.mqtt.topic_prefix.clone());
    let actuator_topic = topics.actuator(&room);

    info!(
        "Connecting to MQTT broker at {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );
    let mqtt_client = MqttClient::new(&config.mqtt, vec![actuator_topic.clone()]);
    let async_client = mqtt_client.client();
    let monitor = LinkMonitor::new();

    let (msg_tx, mut msg_rx) = mpsc::channel::<MqttMessage>(16);
    let mqtt_handle = tokio::spawn(mqtt_client.run(msg_tx, monitor.clone()));

    wait_for_connection(&monitor, timeout).await?;
    // Give the actuator subscription a moment to be acknowledged
    tokio::time::sleep(Duration::from_millis(500)).await;

    let sensor_id = format!("sensor-{}", room);
    let readings = [
        (
            Metric::Temperature,
            serde_json::json!({ "sensorID": sensor_id, "type": "temperature", "value": TEST_TEMPERATURE }),
        ),
        (
            Metric::Motion,
            serde_json::json!({ "sensorID": sensor_id, "type": "motion", "value": TEST_MOTION }),
        ),
    ];
    for (metric, payload) in readings {
        let topic = topics.reading(metric);
        info!("Publishing to {}: {}", topic, payload);
        async_client
            .publish(topic, QoS::AtMostOnce, false, payload.to_string())
            .await
            .map_err(|e| format!("failed to publish {} reading: {}", metric, e))?;
    }

    let level = tokio::time::timeout(timeout, wait_for_open(&mut msg_rx, &actuator_topic))
        .await
        .map_err(|_| format!("no open command on {} within {:?}", actuator_topic, timeout))?;
    info!("Valve for room {} set to {}", room, level.percent());

    let status: serde_json::Value = reqwest::Client::new()
        .get(&cli.status_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| format!("status request failed: {}", e))?
        .json()
        .await
        .map_err(|e| format!("status response is not JSON: {}", e))?;

    mqtt_handle.abort();

    let read_state = &status["state"][room.as_str()];
    info!("Status for room {}: {}", room, read_state);
    if read_state["temperature"].as_f64() == Some(TEST_TEMPERATURE)
        && read_state["motion"].as_bool() == Some(TEST_MOTION)
    {
        Ok(())
    } else {
        Err(format!("unexpected state for room {}: {}", room, read_state))
    }
}

async fn wait_for_connection(monitor: &LinkMonitor, timeout: Duration) -> Result<(), String> {
    let deadline = tokio::time::Instant::now() + timeout;
    while monitor.state() != LinkState::Connected {
        if tokio::time::Instant::now() >= deadline {
            return Err(format!("broker not reachable: {:?}", monitor.state()));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Ok(())
}

/// Read actuator messages until one opens the valve.
async fn wait_for_open(rx: &mut mpsc::Receiver<MqttMessage>, topic: &str) -> ValveLevel {
    while let Some(msg) = rx.recv().await {
        if msg.topic != topic {
            continue;
        }
        match serde_json::from_slice::<ActuatorPayload>(&msg.payload) {
            Ok(payload) => match ValveLevel::from_percent(payload.value) {
                Some(ValveLevel::Open) => return ValveLevel::Open,
                Some(level) => info!("Valve level {} received, waiting for open", level.percent()),
                None => warn!("Unexpected valve level {}", payload.value),
            },
            Err(e) => warn!("Unparseable actuator payload: {}", e),
        }
    }
    // Channel closed: the event loop is gone and no command can arrive
    std::future::pending().await
}
