// End-to-end controller scenarios without a broker

mod common;

use climate_controller::climate::{ActuatorCommand, RoomId, RoomState, ValveLevel};
use climate_controller::error::{DecodeError, HandleError};
use common::{FixedProbe, controller};

fn room(id: &str) -> RoomId {
    RoomId::new(id).unwrap()
}

/// Temperature 10 then motion true opens room 1 and both values show up in status.
#[tokio::test]
async fn test_cold_occupied_room_opens_valve() {
    let (controller, publisher) = controller(22.0, FixedProbe(Ok(true)));

    controller
        .handle(
            "readings/temperature",
            br#"{"sensorID": "sensor-1", "type": "temperature", "value": 10}"#,
        )
        .await
        .unwrap();
    controller
        .handle(
            "readings/motion",
            br#"{"sensorID": "sensor-1", "type": "motion", "value": true}"#,
        )
        .await
        .unwrap();

    let sent = publisher.sent();
    assert_eq!(
        sent.last(),
        Some(&ActuatorCommand::new(room("1"), ValveLevel::Open))
    );
    assert_eq!(serde_json::to_value(sent[1].payload()).unwrap(), serde_json::json!({ "value": 100 }));

    let status = controller.status().await;
    assert_eq!(
        status.state.get(&room("1")),
        Some(&RoomState {
            temperature: Some(10.0),
            motion: Some(true),
        })
    );
}

/// A room leaving occupancy closes, and warming up past the target keeps it closed.
#[tokio::test]
async fn test_valve_follows_room_over_time() {
    let (controller, publisher) = controller(22.0, FixedProbe(Ok(true)));

    let steps: [(&str, &[u8], ValveLevel); 4] = [
        ("readings/temperature", br#"{"sensorID": "s-office", "value": 19.5}"#, ValveLevel::Open),
        ("readings/motion", br#"{"sensorID": "s-office", "value": false}"#, ValveLevel::Closed),
        ("readings/motion", br#"{"sensorID": "s-office", "value": true}"#, ValveLevel::Open),
        ("readings/temperature", br#"{"sensorID": "s-office", "value": 22}"#, ValveLevel::Closed),
    ];

    for (topic, payload, expected) in steps {
        let command = controller.handle(topic, payload).await.unwrap();
        assert_eq!(command, Some(ActuatorCommand::new(room("office"), expected)));
    }
    assert_eq!(publisher.sent().len(), 4);
}

/// Readings for one room never produce commands for another.
#[tokio::test]
async fn test_only_affected_room_is_commanded() {
    let (controller, publisher) = controller(22.0, FixedProbe(Ok(true)));

    controller
        .handle("readings/temperature", br#"{"sensorID": "sensor-1", "value": 15}"#)
        .await
        .unwrap();
    controller
        .handle("readings/temperature", br#"{"sensorID": "sensor-2", "value": 30}"#)
        .await
        .unwrap();

    assert_eq!(
        publisher.sent(),
        vec![
            ActuatorCommand::new(room("1"), ValveLevel::Open),
            ActuatorCommand::new(room("2"), ValveLevel::Closed),
        ]
    );
}

/// Malformed events are rejected and leave every room as it was.
#[tokio::test]
async fn test_malformed_events_change_nothing() {
    let (controller, publisher) = controller(22.0, FixedProbe(Ok(true)));
    controller
        .handle("readings/temperature", br#"{"sensorID": "sensor-1", "value": 15}"#)
        .await
        .unwrap();
    let before = controller.status().await.state;

    let bad: [(&str, &[u8]); 5] = [
        ("readings/temperature", br#"{"type": "temperature", "value": 5}"#),
        ("readings/temperature", br#"{"sensorID": "sensor-1", "value": "5"}"#),
        ("readings/motion", br#"{"sensorID": "sensor1", "value": true}"#),
        ("readings/motion", b"not json"),
        ("readings/humidity", br#"{"sensorID": "sensor-1", "value": 40}"#),
    ];
    for (topic, payload) in bad {
        let result = controller.handle(topic, payload).await;
        assert!(matches!(result, Err(HandleError::Decode(_))), "{topic} accepted");
    }

    assert_eq!(controller.status().await.state, before);
    assert_eq!(publisher.sent().len(), 1);

    // The next valid event is processed normally
    let command = controller
        .handle("readings/motion", br#"{"sensorID": "sensor-1", "value": false}"#)
        .await
        .unwrap();
    assert_eq!(command, Some(ActuatorCommand::new(room("1"), ValveLevel::Closed)));
}

/// Missing sensor id is reported as such.
#[tokio::test]
async fn test_missing_sensor_id_error() {
    let (controller, _) = controller(22.0, FixedProbe(Ok(true)));

    let result = controller
        .handle("readings/motion", br#"{"type": "motion", "value": true}"#)
        .await;

    assert_eq!(
        result,
        Err(HandleError::Decode(DecodeError::MissingField("sensorID")))
    );
    assert!(controller.status().await.state.is_empty());
}

/// Same-room readings racing on different fields are both kept.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_not_lost() {
    let (controller, _) = controller(22.0, FixedProbe(Ok(true)));

    let mut handles = Vec::new();
    for i in 0..20 {
        let controller = controller.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("sensor-{}", i);
            let temperature = serde_json::json!({ "sensorID": id, "value": 18 }).to_string();
            let motion = serde_json::json!({ "sensorID": id, "value": true }).to_string();
            let (a, b) = tokio::join!(
                controller.handle("readings/temperature", temperature.as_bytes()),
                controller.handle("readings/motion", motion.as_bytes()),
            );
            a.unwrap();
            b.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let state = controller.status().await.state;
    assert_eq!(state.len(), 20);
    for room_state in state.values() {
        assert_eq!(room_state.temperature, Some(18.0));
        assert_eq!(room_state.motion, Some(true));
    }
}
