// Captive Portal Tasks - DHCP- und DNS-Server im Access-Point-Modus
//
// Die Paket-Logik liegt in dadicator-core (dhcp.rs, dns.rs). Hier passiert
// nur Socket-Handling, Logging und Neustart nach Fehlern.

use core::net::Ipv4Addr;

use dadicator_core::{dhcp, dns};
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_time::{Duration, Timer};

use crate::config::{
    AP_IP_ADDR, DHCP_PACKET_BUFFER_SIZE, DNS_PACKET_BUFFER_SIZE, PORTAL_RESTART_DELAY_SECS,
    PORTAL_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

/// Fehler der Portal-Dienste, führen zum Neustart des Dienstes
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum PortalError {
    /// Port konnte nicht gebunden werden
    BindFailed(u16),
    /// Empfangen vom Socket fehlgeschlagen
    ReceiveFailed,
}

/// DHCP Server Task
///
/// Vergibt Adressen aus `192.168.4.2..=50`, abgeleitet aus der Client-MAC.
/// Router und DNS zeigen beide auf den Access Point.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: &'static Stack<'static>) {
    wait_for_network(stack).await;

    loop {
        if let Err(e) = run_dhcp_server(stack).await {
            error!("DHCP: {}", e);
        }
        info!("DHCP: Restarting in {}s...", PORTAL_RESTART_DELAY_SECS);
        Timer::after(Duration::from_secs(PORTAL_RESTART_DELAY_SECS)).await;
    }
}

async fn run_dhcp_server(stack: &'static Stack<'static>) -> Result<(), PortalError> {
    let server_ip = Ipv4Addr::from(AP_IP_ADDR);

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; PORTAL_UDP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; PORTAL_UDP_BUFFER_SIZE];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket
        .bind(dhcp::DHCP_SERVER_PORT)
        .map_err(|_| PortalError::BindFailed(dhcp::DHCP_SERVER_PORT))?;

    info!("DHCP: Listening on port {}", dhcp::DHCP_SERVER_PORT);

    let mut packet = [0u8; DHCP_PACKET_BUFFER_SIZE];

    loop {
        let (len, _) = socket
            .recv_from(&mut packet)
            .await
            .map_err(|_| PortalError::ReceiveFailed)?;

        let Some(request) = dhcp::parse_request(&packet[..len]) else {
            continue;
        };
        let Some(reply_type) = request.message_type.reply() else {
            debug!("DHCP: Ignoring message type {}", request.message_type);
            continue;
        };

        let offered_ip = dhcp::allocate_ip(server_ip, &request.client_mac);
        let Some(reply_len) =
            dhcp::build_reply(&mut packet, &request, reply_type, server_ip, offered_ip)
        else {
            warn!("DHCP: Reply does not fit into packet buffer");
            continue;
        };

        // Client hat noch keine Adresse, Antwort geht per Broadcast
        let dest = (Ipv4Addr::BROADCAST, dhcp::DHCP_CLIENT_PORT);
        match socket.send_to(&packet[..reply_len], dest).await {
            Ok(()) => info!(
                "DHCP: {} {} to {:02x}",
                reply_type,
                Debug2Format(&offered_ip),
                request.client_mac
            ),
            Err(e) => warn!("DHCP: Send failed: {}", Debug2Format(&e)),
        }
    }
}

/// DNS Server Task
///
/// Beantwortet jede A-Anfrage mit der Adresse des Access Points, damit die
/// Connectivity-Checks der Clients beim Panel landen.
#[embassy_executor::task]
pub async fn dns_server_task(stack: &'static Stack<'static>) {
    wait_for_network(stack).await;

    loop {
        if let Err(e) = run_dns_server(stack).await {
            error!("DNS: {}", e);
        }
        info!("DNS: Restarting in {}s...", PORTAL_RESTART_DELAY_SECS);
        Timer::after(Duration::from_secs(PORTAL_RESTART_DELAY_SECS)).await;
    }
}

async fn run_dns_server(stack: &'static Stack<'static>) -> Result<(), PortalError> {
    let answer_ip = Ipv4Addr::from(AP_IP_ADDR);

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; PORTAL_UDP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; PORTAL_UDP_BUFFER_SIZE];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket
        .bind(dns::DNS_PORT)
        .map_err(|_| PortalError::BindFailed(dns::DNS_PORT))?;

    info!("DNS: Answering all queries with {}", Debug2Format(&answer_ip));

    let mut query = [0u8; DNS_PACKET_BUFFER_SIZE];
    let mut response = [0u8; DNS_PACKET_BUFFER_SIZE];

    loop {
        let (len, meta) = socket
            .recv_from(&mut query)
            .await
            .map_err(|_| PortalError::ReceiveFailed)?;

        let Some(question) = dns::parse_query(&query[..len]) else {
            continue;
        };
        let Some(response_len) =
            dns::build_response(&query[..len], &question, answer_ip, &mut response)
        else {
            continue;
        };

        if let Err(e) = socket.send_to(&response[..response_len], meta.endpoint).await {
            warn!("DNS: Send failed: {}", Debug2Format(&e));
        }
    }
}
