//! Plant node firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter     EspMqttTransport   LogEventSink         │
//! │  (Sensor+Actuator)   (Transport)        (EventSink)          │
//! │  Esp32TimeAdapter                                            │
//! │  (Clock)                                                     │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              NodeService (pure logic)                  │  │
//! │  │  link · dispatch · smoothing · dedup · telemetry       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Compile-time inputs: `WIFI_SSID`, `WIFI_PASS`, `MQTT_BROKER`.
#![deny(unused_must_use)]

use anyhow::{anyhow, bail, Result};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use plantnode::adapters::hardware::{HardwareAdapter, Relays};
use plantnode::adapters::log_sink::LogEventSink;
use plantnode::adapters::mqtt::EspMqttTransport;
use plantnode::adapters::time::Esp32TimeAdapter;
use plantnode::app::service::NodeService;
use plantnode::config::NodeConfig;
use plantnode::drivers::relay::RelayDriver;
use plantnode::drivers::watchdog::{Watchdog, DEFAULT_TIMEOUT_MS};
use plantnode::error::Error;
use plantnode::pins;
use plantnode::sensors::{analog, dht::Dht22};

fn connect_wifi(wifi: &mut BlockingWifi<&mut EspWifi<'static>>) -> Result<()> {
    let ssid = option_env!("WIFI_SSID").unwrap_or_default();
    let pass = option_env!("WIFI_PASS").unwrap_or_default();
    if ssid.is_empty() {
        bail!("no WIFI_SSID compiled in");
    }

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| anyhow!("wifi ssid too long"))?,
        password: pass
            .try_into()
            .map_err(|_| anyhow!("wifi password too long"))?,
        auth_method: if pass.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPAWPA2Personal
        },
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("wifi: connecting to `{}`", ssid);
    wifi.connect()?;
    wifi.wait_netif_up()?;
    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("wifi: up, ip {}", ip.ip);
    Ok(())
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  plantnode v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = NodeConfig::default();
    if let Some(host) = option_env!("MQTT_BROKER") {
        config.set_broker_host(host)?;
    }
    config.validate()?;
    info!("config: device {} -> {}", config.device_id, config.broker_url());

    // ── 3. Peripherals (outputs forced LOW first) ─────────────
    let peripherals = Peripherals::take()?;
    let relay = |pin, gpio| -> Result<_> {
        RelayDriver::new(PinDriver::output(pin)?, gpio).map_err(|e| Error::from(e).into())
    };
    let relays = Relays {
        pump: relay(peripherals.pins.gpio5.downgrade_output(), pins::PUMP_GPIO)?,
        fan: relay(peripherals.pins.gpio18.downgrade_output(), pins::FAN_GPIO)?,
        grow_light: relay(peripherals.pins.gpio19.downgrade_output(), pins::GROW_LIGHT_GPIO)?,
    };

    if let Err(e) = analog::init() {
        warn!("analog: init failed ({}), soil/light reads will be stale", e);
    }
    let dht_pin = PinDriver::input_output_od(peripherals.pins.gpio4)?;
    info!("dht: DHT22 on GPIO{}", pins::DHT_GPIO);
    let mut hw = HardwareAdapter::new(Dht22::new(dht_pin, Ets), relays);

    // ── 4. Wi-Fi (best effort) ────────────────────────────────
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut esp_wifi = EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sys_loop)?;
    if let Err(e) = connect_wifi(&mut wifi) {
        warn!("wifi: {:#}; running offline", e);
    }

    // ── 5. Control loop ───────────────────────────────────────
    let mut transport = EspMqttTransport::new(&config);
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();
    let idle_ms = config.loop_idle_ms;
    let mut service = NodeService::new(config);
    let mut watchdog = Watchdog::new(DEFAULT_TIMEOUT_MS);

    service.start(&mut hw, &mut sink);
    loop {
        service.iterate(&mut hw, &mut transport, &clock, &mut sink);
        watchdog.feed();
        FreeRtos::delay_ms(idle_ms);
    }
}
