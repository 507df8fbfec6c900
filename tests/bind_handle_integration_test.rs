mod common;

use common::{assert_silent, channel_handler, recv, RecordingSource};
use evhub::{Hub, HubConfig};
use serde_json::{json, Value};

#[tokio::test]
async fn test_scoped_listeners_follow_their_binding() {
    let hub = Hub::new();
    let source = RecordingSource::new();
    let handle = hub.bind(source.clone(), "resize", "resized", Value::Null).unwrap();

    let (scoped, mut scoped_rx) = channel_handler();
    let (plain, mut plain_rx) = channel_handler();
    handle.listen(scoped).unwrap();
    hub.listen("resized", plain).unwrap();

    source.fire("resize", vec![json!([800, 600])]);
    assert_eq!(recv(&mut scoped_rx).await, Some(vec![json!([800, 600])]));
    assert_eq!(recv(&mut plain_rx).await, Some(vec![json!([800, 600])]));

    assert!(handle.unbind());
    assert_eq!(hub.listener_count("resized"), 1);

    hub.emit("resized", vec![json!("manual")]).await.unwrap();
    assert_eq!(recv(&mut plain_rx).await, Some(vec![json!("manual")]));
    assert_silent(&mut scoped_rx).await;
}

#[tokio::test]
async fn test_two_bindings_share_one_logical_event() {
    let hub = Hub::new();
    let mouse = RecordingSource::new();
    let touch = RecordingSource::new();
    let first = hub.bind(mouse.clone(), "click", "pressed", Value::Null).unwrap();
    hub.bind(touch.clone(), "tap", "pressed", Value::Null).unwrap();

    let (handler, mut rx) = channel_handler();
    hub.listen("pressed", handler).unwrap();

    mouse.fire("click", vec![json!("mouse")]);
    assert_eq!(recv(&mut rx).await, Some(vec![json!("mouse")]));
    touch.fire("tap", vec![json!("touch")]);
    assert_eq!(recv(&mut rx).await, Some(vec![json!("touch")]));

    assert!(first.unbind());
    assert_eq!(hub.binding_count("pressed"), 1);
    mouse.fire("click", vec![json!("ignored")]);
    assert_silent(&mut rx).await;
}

#[tokio::test]
async fn test_handle_outlives_hub() {
    let source = RecordingSource::new();
    let hub = Hub::with_config(HubConfig::new().with_label("short-lived"));
    let handle = hub.bind(source.clone(), "click", "clicked", Value::Null).unwrap();
    drop(hub);

    assert!(handle.is_stale());
    let err = handle.listen(Hub::next(Value::Null)).unwrap_err();
    assert_eq!(err.operation(), "listen");
    assert_eq!(source.active(), 0);
}

#[test]
fn test_config_from_lookup_drives_hub() {
    let config = HubConfig::from_lookup(|key| match key {
        "EVHUB_LABEL" => Some("ui".to_string()),
        "EVHUB_MAX_LISTENERS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();

    let hub = Hub::with_config(config);
    assert_eq!(hub.config().label, "ui");
    for _ in 0..3 {
        hub.listen("x", Hub::next(Value::Null)).unwrap();
    }
    assert_eq!(hub.listener_count("x"), 3);
}
