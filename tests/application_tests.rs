use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use swarm_patrol::application::*;
use swarm_patrol::domains::fleet::FleetSettings;
use swarm_patrol::domains::geometry::*;
use swarm_patrol::{CommandRequest, OutboundMessage, ResponseStatus, UAVS_UPDATED};
use tokio::sync::mpsc;

fn ground_control(capacity: usize) -> (Arc<GroundControl>, mpsc::Receiver<OutboundMessage>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Arc::new(GroundControl::new(tx, FleetSettings::default())), rx)
}

fn square() -> Vec<Vec<f64>> {
    vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0]]
}

fn drain(rx: &mut mpsc::Receiver<OutboundMessage>) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

#[tokio::test(start_paused = true)]
async fn test_first_geofence_spawns_swarm_on_buffer() {
    let (gc, _rx) = ground_control(256);
    assert!(!gc.is_initialized().await);

    let snapshot = gc.update_geofence(square()).await.unwrap();
    assert!(snapshot.is_swarm_init);
    assert_eq!(snapshot.fenced_area.len(), 5);
    assert_eq!(snapshot.fenced_area.first(), snapshot.fenced_area.last());

    let geofence = build_polygon(square().iter().map(|p| GeoPoint::new(p[0], p[1])).collect()).unwrap();
    let outer = shrink_polygon(&geofence, 100.0).unwrap();
    let inner = shrink_polygon(&geofence, 400.0).unwrap();

    let uavs = snapshot.swarm.unwrap().uavs;
    assert_eq!(uavs.len(), 6);
    for (index, uav) in uavs.iter().enumerate() {
        assert_eq!(uav.id as usize, index + 1);
        assert!(outer.contains(&uav.uav_coordinates));
        assert!(!inner.contains(&uav.uav_coordinates));
    }

    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_open_and_closed_input_store_the_same_ring() {
    let (gc, _rx) = ground_control(256);
    let open = gc.update_geofence(square()).await.unwrap();

    let mut closed_input = square();
    closed_input.push(vec![0.0, 0.0]);
    let closed = gc.update_geofence(closed_input).await.unwrap();

    assert_eq!(open.fenced_area, closed.fenced_area);
    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_geofence_keeps_previous_state() {
    let (gc, _rx) = ground_control(256);
    let before = gc.update_geofence(square()).await.unwrap();

    let err = gc.update_geofence(vec![vec![1.0, 1.0], vec![2.0, 2.0]]).await.unwrap_err();
    assert_eq!(err.to_string(), "Fenced area needs at least 3 distinct points, got 2");

    let after = gc.snapshot().await;
    assert_eq!(after.fenced_area, before.fenced_area);
    assert!(after.is_swarm_init);
    assert_eq!(after.swarm.unwrap().uavs.len(), 6);

    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_agent_ticks_reach_outbound_channel() {
    let (gc, mut rx) = ground_control(256);
    gc.update_geofence(square()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 6);

    let first = serde_json::to_value(&messages[0]).unwrap();
    assert_eq!(first["message"], json!(UAVS_UPDATED));
    let coordinates = first["data"]["uav_coordinates"].as_array().unwrap();
    assert_eq!(coordinates.len(), 3);
    assert_eq!(coordinates[2], json!(500.0));
    assert!(first["data"]["id"].is_u64());

    assert_eq!(gc.last_roster().len(), 6);
    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_status_broadcast_queues_one_message_per_uav() {
    let (gc, mut rx) = ground_control(256);
    assert_eq!(gc.request_status_broadcast().await.unwrap(), 0);
    assert!(drain(&mut rx).is_empty());

    gc.update_geofence(square()).await.unwrap();
    assert_eq!(gc.request_status_broadcast().await.unwrap(), 6);

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 6);
    assert!(messages.iter().all(|m| m.message == UAVS_UPDATED));

    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_full_channel_drops_updates_without_stalling_agents() {
    let (gc, mut rx) = ground_control(2);
    gc.update_geofence(square()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(drain(&mut rx).len(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(drain(&mut rx).len(), 2);

    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_processor_update_and_status_responses() {
    let (gc, _rx) = ground_control(256);
    let processor = CommandProcessor::new(gc.clone());

    let response = processor
        .process_text(r#"{"command": "update_fenced_area", "data": [[0, 0], [10, 0], [10, 10], [0, 10]]}"#)
        .await;
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.message, "Fenced area updated");
    let data = response.data.unwrap();
    assert_eq!(data["is_swarm_init"], json!(true));
    assert_eq!(data["fenced_area"].as_array().unwrap().len(), 5);
    assert_eq!(data["swarm"]["uavs"].as_array().unwrap().len(), 6);

    let response = processor.process_text(r#"{"command": "send_swarm_status"}"#).await;
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.message, "Swarm status sent");
    assert!(response.data.is_none());

    gc.shutdown().await;
}

#[tokio::test]
async fn test_processor_error_responses() {
    let (gc, _rx) = ground_control(16);
    let processor = CommandProcessor::new(gc.clone());

    let response = processor.process(CommandRequest::default()).await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.message, "Unknown command");

    let response = processor.process_text("not json").await;
    assert_eq!(response.status, ResponseStatus::Error);

    let response = processor
        .process_text(r#"{"command": "update_fenced_area", "data": [[0, 0], [0, 0], [0, 0]]}"#)
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.message, "Fenced area needs at least 3 distinct points, got 1");
    assert!(!gc.is_initialized().await);

    let encoded = serde_json::to_value(&response).unwrap();
    assert_eq!(encoded, json!({"status": "error", "message": "Fenced area needs at least 3 distinct points, got 1"}));
}

#[tokio::test(start_paused = true)]
async fn test_status_command_succeeds_on_a_full_channel() {
    let (gc, mut rx) = ground_control(6);
    let processor = CommandProcessor::new(gc.clone());
    gc.update_geofence(square()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let response = processor.process_text(r#"{"command": "send_swarm_status"}"#).await;
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.message, "Swarm status sent");
    assert_eq!(gc.request_status_broadcast().await.unwrap(), 0);

    assert_eq!(drain(&mut rx).len(), 6);
    assert_eq!(gc.request_status_broadcast().await.unwrap(), 6);

    gc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_geofence_smaller_than_buffer_is_rejected() {
    let (gc, _rx) = ground_control(16);
    let before = gc.update_geofence(square()).await.unwrap();

    let tiny = vec![vec![0.0, 0.0], vec![0.002, 0.0], vec![0.002, 0.002], vec![0.0, 0.002]];
    let err = gc.update_geofence(tiny).await.unwrap_err();
    assert_eq!(err.to_string(), "Geometry error: Polygon is too small for an inset of 250 m");
    assert_eq!(gc.snapshot().await.fenced_area, before.fenced_area);

    gc.shutdown().await;
}
