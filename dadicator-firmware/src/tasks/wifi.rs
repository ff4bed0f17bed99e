// WiFi Tasks - Station-Modus (mit Credentials) oder offener Access Point
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice,
    WifiEvent,
};

use crate::config::{AP_SSID, WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS};

/// WiFi Connection Task (Station-Modus)
///
/// Verbindet mit dem konfigurierten Netz und reconnected nach jedem
/// Disconnect. Die IP kommt per DHCP (siehe `dhcp_task`).
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>, ssid: &'static str) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        info!("WiFi: Connecting to '{}'...", ssid);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Connected successfully!");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Access Point Task (Captive Portal)
///
/// Startet ein offenes Netz mit `AP_SSID` und startet es neu, falls der
/// Treiber den AP stoppt.
#[embassy_executor::task]
pub async fn access_point_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting access point task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            let ap_config = ModeConfig::AccessPoint(
                AccessPointConfig::default()
                    .with_ssid(AP_SSID.into())
                    .with_auth_method(AuthMethod::None),
            );

            if let Err(e) = controller.set_config(&ap_config) {
                error!("WiFi: Failed to set AP configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start AP: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Access point '{}' is up (open network)", AP_SSID);
        }

        controller.wait_for_event(WifiEvent::ApStop).await;
        warn!("WiFi: Access point stopped, restarting...");

        Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
    }
}

/// Network Task
///
/// Prozessiert Pakete des embassy-net Stacks (STA oder AP Interface)
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet auf die IP-Adresse vom DHCP-Server und loggt die Konfiguration
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    info!("WiFi: Waiting for IP address...");
    wait_for_network(stack).await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
        info!(
            "  Panel:   http://{}/",
            Debug2Format(&config.address.address())
        );
    }
}

/// Wartet bis Link up ist und eine IPv4-Konfiguration existiert
///
/// Im AP-Modus ist die Konfiguration statisch, dort zählt nur der Link.
pub async fn wait_for_network(stack: &Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
