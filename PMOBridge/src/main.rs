mod logs;

use std::sync::Arc;

use pmoadapters::{Bridge, MemoryDimmer, MemoryPlayer, MemorySwitch, Provider};
use pmoconfig::get_config;
use pmoupnp::UpnpConfigExt;
use pmoupnp::devices::{DeviceManifest, DeviceRegistry, UuidMap};
use pmoupnp::events::{LoggingSink, TokioScheduler};
use pmoupnp::server::router;
use tokio::signal;
use tracing::info;

/// Fournisseurs de démonstration, en attendant un vrai backend domotique.
fn demo_providers() -> Vec<Provider> {
    vec![
        Provider::BinarySwitch(Arc::new(MemorySwitch::new(
            DeviceManifest::new("Hall Lamp")
                .with_unique_id("hall-lamp")
                .with_description("Hall ceiling lamp"),
        ))),
        Provider::DimmableLight(Arc::new(MemoryDimmer::new(
            DeviceManifest::new("Living Room")
                .with_unique_id("living-room-dimmer")
                .with_model_number("1"),
        ))),
        Provider::MediaPlayer(Arc::new(MemoryPlayer::new(
            DeviceManifest::new("Kitchen Speaker")
                .with_unique_id("kitchen-speaker")
                .with_full_name("PMOBridge Kitchen Speaker"),
            vec![
                "http-get:*:audio/mpeg:*".to_string(),
                "http-get:*:audio/flac:*".to_string(),
                "http-get:*:audio/x-wav:*".to_string(),
            ],
        ))),
        Provider::Unsupported {
            kind: "Thermostat".to_string(),
            manifest: DeviceManifest::new("Boiler").with_unique_id("boiler"),
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config();
    logs::init_logging(&config);

    let port = config.get_http_port();
    let base_url = format!("http://{}:{}", config.get_base_url(), port);
    let manufacturer = config.get_upnp_manufacturer()?;
    let window = config.get_event_window()?;

    let registry = Arc::new(DeviceRegistry::with_uuid_map(
        UuidMap::with_config(config.clone()),
        manufacturer,
    ));
    let bridge = Bridge::new(
        registry.clone(),
        Arc::new(LoggingSink),
        Arc::new(TokioScheduler::current()),
    )
    .with_window(window);

    info!("📡 Registering UPnP devices...");
    let devices = bridge.register_all(&demo_providers())?;
    for device in &devices {
        info!(
            "  - {} ({}) at {}{}/desc.xml",
            device.manifest().display_name,
            device.properties().type_version(),
            base_url,
            device.mount_path()
        );
    }

    let app = router(registry.clone(), base_url.clone());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🚀 PMOBridge listening on {}", base_url);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C reçu, arrêt gracieux");
            }
        })
        .await?;

    registry.shutdown_all();
    Ok(())
}
