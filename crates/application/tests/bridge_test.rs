use application::status::StatusHub;
use application::{
    CommandCompiler, MethodCall, MethodResponse, PrinterBridge, PrinterService, RegistryOptions,
    SessionRegistry,
};
use domain::{ErrorCode, ErrorEnvelope, StatusPayload, StatusSnapshot};
use infrastructure::{ChannelStatusSink, FsImageLoader, SimulatedSdk};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn setup() -> (Arc<SimulatedSdk>, Arc<PrinterBridge>) {
    let sdk = Arc::new(SimulatedSdk::new());
    let registry = Arc::new(SessionRegistry::new(
        sdk.clone(),
        Arc::new(StatusHub::new()),
        RegistryOptions::default(),
    ));
    let compiler = CommandCompiler::new(Arc::new(FsImageLoader::new()));
    let service = Arc::new(PrinterService::new(registry, compiler));
    (sdk, Arc::new(PrinterBridge::new(service)))
}

async fn call(bridge: &PrinterBridge, method: &str, arguments: Value) -> MethodResponse {
    bridge.handle(&MethodCall::new(method, arguments)).await
}

fn error(code: ErrorCode, message: &str) -> MethodResponse {
    MethodResponse::Error(ErrorEnvelope::new(code, message))
}

#[tokio::test]
async fn test_unknown_method_is_not_implemented() {
    let (_sdk, bridge) = setup();
    let response = call(&bridge, "openCashDrawer", json!({})).await;
    assert_eq!(response, MethodResponse::NotImplemented);
}

#[tokio::test]
async fn test_missing_arguments_are_invalid() {
    let (_sdk, bridge) = setup();

    let cases = [
        ("portDiscovery", json!({}), "Type is required"),
        ("connect", json!({"emulation": "StarPRNT"}), "Port name is required"),
        ("connect", json!({"portName": "TCP:10.0.0.5"}), "Emulation is required"),
        ("disconnect", json!(null), "Port name is required"),
        ("checkStatus", json!({"portName": 42}), "Port name is required"),
        (
            "print",
            json!({"portName": "TCP:10.0.0.5", "emulation": "StarPRNT"}),
            "Print commands are required",
        ),
        (
            "print",
            json!({"portName": "TCP:10.0.0.5", "printCommands": []}),
            "Emulation is required",
        ),
    ];

    for (method, arguments, message) in cases {
        assert_eq!(
            call(&bridge, method, arguments).await,
            error(ErrorCode::InvalidArgument, message),
            "{method}"
        );
    }
}

#[tokio::test]
async fn test_discovery_lists_descriptors() {
    let (sdk, bridge) = setup();
    let mut config = infrastructure::SimulatedPrinterConfig::new("TCP:192.168.1.20");
    config.mac_address = Some("00:11:62:AA:BB:CC".into());
    config.model_name = Some("TSP100IV".into());
    sdk.add(infrastructure::SimulatedPrinter::from_config(&config).unwrap());
    sdk.add_printer("BT:mC-Print3").unwrap();

    let response = call(&bridge, "portDiscovery", json!({"type": "LAN"})).await;
    assert_eq!(
        response,
        MethodResponse::Success(json!([{
            "portName": "TCP:192.168.1.20",
            "macAddress": "00:11:62:AA:BB:CC",
            "modelName": "TSP100IV",
        }]))
    );

    let response = call(&bridge, "portDiscovery", json!({"type": "SERIAL"})).await;
    assert_eq!(
        response,
        error(ErrorCode::DiscoveryError, "Unsupported interface type")
    );
}

#[tokio::test]
async fn test_connection_lifecycle_codes() {
    let (sdk, bridge) = setup();
    sdk.add_printer("TCP:10.0.0.5").unwrap();
    let args = json!({"portName": "TCP:10.0.0.5", "emulation": "StarPRNT"});

    assert_eq!(
        call(&bridge, "connect", args.clone()).await,
        MethodResponse::Success(Value::Null)
    );
    assert_eq!(
        call(&bridge, "connect", args).await,
        error(ErrorCode::ConnectionError, "Printer already connected")
    );

    let port = json!({"portName": "TCP:10.0.0.5"});
    assert!(call(&bridge, "disconnect", port.clone()).await.is_success());
    assert_eq!(
        call(&bridge, "disconnect", port.clone()).await,
        error(ErrorCode::DisconnectionError, "Printer not connected")
    );
    assert_eq!(
        call(&bridge, "checkStatus", port).await,
        error(ErrorCode::StatusError, "Printer not connected")
    );
}

#[tokio::test]
async fn test_connect_to_unknown_interface() {
    let (_sdk, bridge) = setup();
    let response = call(
        &bridge,
        "connect",
        json!({"portName": "COM1", "emulation": "StarPRNT"}),
    )
    .await;
    assert_eq!(
        response,
        error(ErrorCode::ConnectionError, "Unknown interface type")
    );
}

#[tokio::test]
async fn test_print_returns_status_report() {
    let (sdk, bridge) = setup();
    let printer = sdk.add_printer("USB:TSP100").unwrap();
    call(
        &bridge,
        "connect",
        json!({"portName": "USB:TSP100", "emulation": "StarGraphic"}),
    )
    .await;

    let response = call(
        &bridge,
        "print",
        json!({
            "portName": "USB:TSP100",
            "emulation": "StarGraphic",
            "printCommands": [
                {"appendEncoding": "UTF-8"},
                {"appendBitmapText": "Thank you\n"},
                {"appendQrCode": "https://example.com"},
                {"appendCutPaper": "FullCut"},
            ],
        }),
    )
    .await;

    assert_eq!(
        response,
        MethodResponse::Success(json!({
            "offline": false,
            "coverOpen": false,
            "cutterError": false,
            "receiptPaperEmpty": false,
            "overTemp": false,
            "isSuccess": true,
        }))
    );
    let sent: Value = serde_json::from_str(&printer.printed_commands()[0]).unwrap();
    assert_eq!(
        sent["document"]["printer"],
        json!([
            {"action": "textEncoding", "charset": "UTF-8"},
            {"action": "text", "content": "Thank you\n"},
            {"action": "cut", "cut": "Full"},
        ])
    );
}

#[tokio::test]
async fn test_print_rejects_malformed_commands() {
    let (sdk, bridge) = setup();
    sdk.add_printer("TCP:10.0.0.6").unwrap();
    let base = json!({"portName": "TCP:10.0.0.6", "emulation": "StarPRNT"});
    call(&bridge, "connect", base.clone()).await;

    let mut args = base.clone();
    args["printCommands"] = json!("appendCutPaper");
    let response = call(&bridge, "print", args).await;
    assert_eq!(
        response.error().map(|e| e.code),
        Some(ErrorCode::InvalidArgument)
    );

    let mut args = base;
    args["printCommands"] = json!([{"appendBitmapText": "ok"}, 5]);
    let response = call(&bridge, "print", args).await;
    assert_eq!(
        response.error().map(|e| e.code),
        Some(ErrorCode::InvalidArgument)
    );
}

#[tokio::test]
async fn test_print_failure_is_print_error() {
    let (sdk, bridge) = setup();
    let printer = sdk.add_printer("BT:mC-Print3").unwrap();
    let args = json!({"portName": "BT:mC-Print3", "emulation": "StarPRNT"});
    call(&bridge, "connect", args.clone()).await;

    printer.fail_next_print("Printer is offline");
    let mut print = args;
    print["printCommands"] = json!([{"appendBitmapText": "hello"}]);
    assert_eq!(
        call(&bridge, "print", print).await,
        error(ErrorCode::PrintError, "Printer is offline")
    );
}

#[tokio::test]
async fn test_spawned_calls_run_concurrently() {
    let (sdk, bridge) = setup();
    sdk.add_printer("TCP:10.0.0.7").unwrap();
    sdk.add_printer("TCP:10.0.0.8").unwrap();

    let first = bridge.spawn(MethodCall::new(
        "connect",
        json!({"portName": "TCP:10.0.0.7", "emulation": "StarPRNT"}),
    ));
    let second = bridge.spawn(MethodCall::new(
        "connect",
        json!({"portName": "TCP:10.0.0.8", "emulation": "StarPRNT"}),
    ));

    assert!(first.await.unwrap().is_success());
    assert!(second.await.unwrap().is_success());
    assert_eq!(bridge.service().registry().connected_ports().len(), 2);
}

#[tokio::test]
async fn test_new_listener_replaces_previous() {
    let (sdk, bridge) = setup();
    let printer = sdk.add_printer("TCP:10.0.0.9").unwrap();
    call(
        &bridge,
        "connect",
        json!({"portName": "TCP:10.0.0.9", "emulation": "StarPRNT"}),
    )
    .await;

    let (first_sink, mut first_rx) = ChannelStatusSink::channel();
    let (second_sink, mut second_rx) = ChannelStatusSink::channel();
    bridge.listen(Arc::new(first_sink)).await;
    bridge.listen(Arc::new(second_sink)).await;
    assert_eq!(bridge.service().registry().hub().subscriber_count().await, 1);

    printer.set_status(StatusSnapshot {
        paper_empty: true,
        ..StatusSnapshot::healthy()
    });

    let event = timeout(Duration::from_secs(5), second_rx.recv())
        .await
        .unwrap()
        .unwrap();
    match event.payload {
        StatusPayload::Report(report) => assert!(report.receipt_paper_empty),
        other => panic!("expected status report, got {other:?}"),
    }
    assert!(first_rx.try_recv().is_err());

    assert!(bridge.cancel().await);
    assert!(!bridge.cancel().await);
    assert_eq!(bridge.service().registry().hub().subscriber_count().await, 0);
}
