// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use core::cell::RefCell;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{
    Config as NetConfig, Ipv4Address, Ipv4Cidr, Stack, StackResources, StaticConfigV4,
};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::{error, info};
use static_cell::StaticCell;

// Projekt-Module und Konfiguration
use dadicator::config::{
    AP_IP_ADDR, AP_PREFIX_LEN, AP_SSID, EXTRA_HEAP_SIZE, GREEN_GPIO_PIN, JSON_API_ENABLED,
    NET_SOCKET_COUNT, RED_GPIO_PIN, WIFI_HEAP_SIZE, WIFI_SSID, YELLOW_GPIO_PIN,
};
use dadicator::hal::GpioLampWriter;
use dadicator::tasks::{
    access_point_task, connection_task, dhcp_server_task, dhcp_task, dns_server_task,
    http_server_task, mdns_responder_task, net_task,
};
use dadicator::{Panel, PanelController, SharedPanel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Lampen, WiFi und Netzwerk-Stack und spawnt die Tasks.
/// Mit WIFI_SSID zur Build-Zeit läuft das Panel im Station-Modus,
/// sonst als offener Access Point mit Captive Portal.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Zwei Heap-Bereiche: reclaimed RAM (64 KB) + extra (36 KB)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Lampen zuerst, damit sie auch ohne WiFi einen definierten Zustand haben
    info!(
        "Lamps: red=GPIO{} yellow=GPIO{} green=GPIO{}",
        RED_GPIO_PIN, YELLOW_GPIO_PIN, GREEN_GPIO_PIN
    );
    // Muss zu RED/YELLOW/GREEN_GPIO_PIN in config.rs passen
    let writer = GpioLampWriter::new(peripherals.GPIO4, peripherals.GPIO5, peripherals.GPIO6);
    let mut panel: Panel = PanelController::new(writer);
    if let Err(e) = panel.sync() {
        error!("Lamps: Initial sync failed: {}", e);
    }

    static PANEL: StaticCell<SharedPanel> = StaticCell::new();
    let panel = &*PANEL.init(Mutex::new(RefCell::new(panel)));

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<NET_SOCKET_COUNT>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    static STACK: StaticCell<Stack<'static>> = StaticCell::new();

    match WIFI_SSID {
        Some(ssid) => {
            info!("Mode: Station, joining '{}'", ssid);

            let (stack, runner) = embassy_net::new(
                wifi_interface.sta,
                NetConfig::dhcpv4(Default::default()),
                resources,
                seed,
            );
            let stack = &*STACK.init(stack);

            spawner.spawn(connection_task(wifi_controller, ssid)).unwrap();
            spawner.spawn(net_task(runner)).unwrap();
            spawner.spawn(dhcp_task(stack)).unwrap();
            spawner.spawn(mdns_responder_task(stack)).unwrap();
            spawner.spawn(http_server_task(stack, panel)).unwrap();
        }
        None => {
            info!("Mode: Access point '{}' (no credentials configured)", AP_SSID);

            let [a, b, c, d] = AP_IP_ADDR;
            let ap_ip = Ipv4Address::new(a, b, c, d);
            let static_config = StaticConfigV4 {
                address: Ipv4Cidr::new(ap_ip, AP_PREFIX_LEN),
                gateway: Some(ap_ip),
                dns_servers: Default::default(),
            };

            let (stack, runner) = embassy_net::new(
                wifi_interface.ap,
                NetConfig::ipv4_static(static_config),
                resources,
                seed,
            );
            let stack = &*STACK.init(stack);

            spawner.spawn(access_point_task(wifi_controller)).unwrap();
            spawner.spawn(net_task(runner)).unwrap();
            spawner.spawn(dhcp_server_task(stack)).unwrap();
            spawner.spawn(dns_server_task(stack)).unwrap();
            spawner.spawn(http_server_task(stack, panel)).unwrap();
        }
    }

    info!("HTTP: JSON API {}", if JSON_API_ENABLED { "enabled" } else { "disabled" });

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
