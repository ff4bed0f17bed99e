// mDNS Responder Task - Macht das Panel als <MDNS_HOSTNAME>.local erreichbar
//
// Nur im Station-Modus aktiv. Im Access-Point-Modus übernimmt der
// Wildcard-DNS (portal.rs) die Namensauflösung.
//
// - Protokoll: mDNS (RFC 6762), UDP Multicast auf 224.0.0.251:5353
// - Nur A-Records, kein Service Discovery
// - edge-mdns über den edge-nal-embassy Adapter

use core::net::{Ipv4Addr, SocketAddr};

use defmt::{Debug2Format, error, info, warn};
use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use esp_hal::rng::Rng;
use static_cell::StaticCell;

use crate::config::{
    MDNS_HOSTNAME, MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT,
    MDNS_RECONNECT_DELAY_SECS, MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

type MdnsUdpBuffers = UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>;

/// Query-IDs für edge-mdns aus dem Hardware-RNG
fn mdns_rng(buf: &mut [u8]) {
    let rng = Rng::new();
    for chunk in buf.chunks_mut(4) {
        let bytes = rng.random().to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

/// mDNS Responder Task
///
/// Wartet auf die DHCP-Adresse und beantwortet danach Anfragen nach
/// `MDNS_HOSTNAME.local`. Jeder Fehler führt nach
/// `MDNS_RECONNECT_DELAY_SECS` zu einem Neustart des Responders.
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>) {
    info!("mDNS: Task started, waiting for network...");

    // StaticCell darf nur einmal initialisiert werden, Reconnects teilen die Buffer
    static UDP_BUFFERS: StaticCell<MdnsUdpBuffers> = StaticCell::new();
    let udp_buffers = &*UDP_BUFFERS.init_with(MdnsUdpBuffers::new);

    loop {
        wait_for_network(stack).await;

        match run_mdns_responder(stack, udp_buffers).await {
            Ok(()) => warn!("mDNS: Responder stopped"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Reconnecting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Bindet den Multicast-Socket und lässt den Responder laufen
///
/// Die UDP-Buffer kommen vom Task und überleben den Aufruf. Der Socket
/// gibt seinen Slot beim Drop wieder frei, deshalb reicht ein Slot auch
/// über mehrere Reconnects.
async fn run_mdns_responder(
    stack: &'static Stack<'static>,
    udp_buffers: &'static MdnsUdpBuffers,
) -> Result<(), MdnsError> {
    // Lease kann zwischen wait_for_network und hier verloren gehen
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    let udp = Udp::new(*stack, udp_buffers);

    let mut socket = udp
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    let (recv, send) = socket.split();

    // smoltcp läuft ohne proto-ipv6, daher keine IPv6-Adresse
    let host = Host {
        hostname: MDNS_HOSTNAME,
        ipv4: our_ip.into(),
        ipv6: [0u8; 16].into(),
        ttl: Ttl::from_secs(MDNS_TTL_SECS),
    };

    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Broadcast-Signal wird nicht ausgelöst, die API verlangt es trotzdem
    let signal = Signal::<NoopRawMutex, ()>::new();

    let mdns = io::Mdns::new(
        Some(our_ip),
        None,
        recv,
        send,
        recv_buf,
        send_buf,
        mdns_rng,
        &signal,
    );

    info!("mDNS: Advertising '{}.local'", MDNS_HOSTNAME);

    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)
}

/// Fehler des Responders, jeder führt zu einem Reconnect
#[derive(Debug, Clone, Copy, defmt::Format)]
enum MdnsError {
    /// Keine IPv4-Adresse (DHCP Lease verloren)
    NoAddress,
    SocketBindFailed,
    MulticastJoinFailed,
    /// Responder Loop ist fehlgeschlagen (Verbindung oder Socket)
    ResponderFailed,
}
