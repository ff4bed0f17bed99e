// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// Lampen Konfiguration
// ============================================================================
//
// Die Pin-Nummern sind Doku für die Verdrahtung und landen im Boot-Log.
// Die eigentliche Zuordnung passiert in bin/main.rs über die Peripherals
// (`peripherals.GPIO4/5/6`). Wer hier einen Pin ändert, muss dort das
// passende Peripheral übergeben, sonst stimmt das Log nicht mehr.

/// GPIO-Pin der roten Lampe
pub const RED_GPIO_PIN: u8 = 4;

/// GPIO-Pin der gelben Lampe
pub const YELLOW_GPIO_PIN: u8 = 5;

/// GPIO-Pin der grünen Lampe
pub const GREEN_GPIO_PIN: u8 = 6;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen.
/// Fehlt sie, startet die Firmware als Access Point.
pub const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// WiFi Passwort (leer = offenes Netz)
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Anzahl Sockets im embassy-net Stack
/// HTTP (1) + mDNS (1) oder HTTP (1) + DHCP-Server (1) + DNS (1), plus Reserve
pub const NET_SOCKET_COUNT: usize = 6;

// ============================================================================
// Access Point (Captive Portal) Konfiguration
// ============================================================================

/// SSID des offenen Access Points ohne Credentials
pub const AP_SSID: &str = "dadicator";

/// Adresse des Access Points, gleichzeitig Gateway und DNS für die Clients
pub const AP_IP_ADDR: [u8; 4] = [192, 168, 4, 1];

/// Präfix-Länge des AP-Netzes (/24)
pub const AP_PREFIX_LEN: u8 = 24;

/// Ziel der Captive-Portal-Redirects (muss zu AP_IP_ADDR passen)
pub const AP_PORTAL_URL: &str = "http://192.168.4.1/";

/// UDP Buffer-Größen für DHCP- und DNS-Server
pub const PORTAL_UDP_BUFFER_SIZE: usize = 1024;

/// Paket-Buffer für DHCP (576 Bytes = minimale DHCP MTU)
pub const DHCP_PACKET_BUFFER_SIZE: usize = 576;

/// Paket-Buffer für DNS (512 Bytes = klassische UDP-Grenze)
pub const DNS_PACKET_BUFFER_SIZE: usize = 512;

/// Wartezeit vor Neustart eines Portal-Dienstes nach Socket-Fehler
pub const PORTAL_RESTART_DELAY_SECS: u64 = 5;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
/// Der ESP32 wird erreichbar sein unter: <MDNS_HOSTNAME>.local
pub const MDNS_HOSTNAME: &str = "dadicator";

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (Standard: 5353, RFC 6762)
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse (224.0.0.251)
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes (Standard MTU)
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP-Port des Panels
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes (Request-Zeile und Header)
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Render-Buffer für die HTML-Seite
/// Die Seite ist knapp 1 KB groß, abgelehnte Tokens werden in dadicator-core
/// gekürzt, damit auch der schlimmste Fall hineinpasst
pub const HTML_BUFFER_SIZE: usize = dadicator_core::MAX_PAGE_LEN;

/// JSON Serialisierungs-Buffer für den Status
/// Für {"red_led":false,"yellow_led":false,"green_led":false}
pub const JSON_STATUS_BUFFER_SIZE: usize = 64;

/// /status und /json_led/* aktiv (Cargo-Feature `json-api`)
pub const JSON_API_ENABLED: bool = cfg!(feature = "json-api");
