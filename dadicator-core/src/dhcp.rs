//! Minimaler DHCP-Server (Paket-Ebene) für den Access-Point-Modus
//!
//! Zustandslos: die Client-Adresse wird aus der MAC abgeleitet, es gibt
//! keine Lease-Tabelle. Reicht für eine Handvoll Handys am Panel.

use core::net::Ipv4Addr;

/// DHCP Ports
pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;

/// Lease-Dauer für alle Clients
pub const LEASE_TIME_SECS: u32 = 3600;

/// Größte Antwort, die `build_reply` erzeugt (BOOTP-Header + Optionen)
pub const MAX_REPLY_LEN: usize = 300;

const BOOTREQUEST: u8 = 1;
const BOOTREPLY: u8 = 2;
const HTYPE_ETHERNET: u8 = 1;
const HLEN_ETHERNET: u8 = 6;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const MIN_PACKET_LEN: usize = 240;

const OPTION_PAD: u8 = 0;
const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_DNS: u8 = 6;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_END: u8 = 255;

/// Erste und letzte vergebene Host-Adresse im /24 des Access Points
const POOL_FIRST_HOST: u8 = 2;
const POOL_SIZE: u8 = 49;

/// DHCP Nachrichtentypen (Option 53)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    Discover,
    Offer,
    Request,
    Ack,
    Other(u8),
}

impl MessageType {
    fn from_code(code: u8) -> Self {
        match code {
            1 => MessageType::Discover,
            2 => MessageType::Offer,
            3 => MessageType::Request,
            5 => MessageType::Ack,
            other => MessageType::Other(other),
        }
    }

    fn code(self) -> u8 {
        match self {
            MessageType::Discover => 1,
            MessageType::Offer => 2,
            MessageType::Request => 3,
            MessageType::Ack => 5,
            MessageType::Other(code) => code,
        }
    }

    /// Antworttyp des Servers, `None` für Nachrichten ohne Antwort
    pub fn reply(self) -> Option<MessageType> {
        match self {
            MessageType::Discover => Some(MessageType::Offer),
            MessageType::Request => Some(MessageType::Ack),
            _ => None,
        }
    }
}

/// Geparster DHCP Request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRequest {
    pub xid: [u8; 4],
    pub flags: [u8; 2],
    pub client_mac: [u8; 6],
    pub message_type: MessageType,
}

/// Parst einen BOOTREQUEST
///
/// Gibt `None` zurück bei zu kurzen Paketen, falschem Op-Code, fehlendem
/// Magic Cookie oder fehlender Message-Type Option.
pub fn parse_request(packet: &[u8]) -> Option<DhcpRequest> {
    if packet.len() < MIN_PACKET_LEN || packet[0] != BOOTREQUEST {
        return None;
    }
    if packet[236..240] != MAGIC_COOKIE {
        return None;
    }

    let mut xid = [0u8; 4];
    xid.copy_from_slice(&packet[4..8]);
    let mut flags = [0u8; 2];
    flags.copy_from_slice(&packet[10..12]);
    let mut client_mac = [0u8; 6];
    client_mac.copy_from_slice(&packet[28..34]);

    let message_type = find_option(&packet[MIN_PACKET_LEN..], OPTION_MESSAGE_TYPE)
        .and_then(|data| data.first().copied())
        .map(MessageType::from_code)?;

    Some(DhcpRequest {
        xid,
        flags,
        client_mac,
        message_type,
    })
}

/// Leitet die Client-Adresse aus der MAC ab
///
/// Ergebnis liegt im /24 des Servers, Host-Teil `2..=50`.
pub fn allocate_ip(server_ip: Ipv4Addr, mac: &[u8; 6]) -> Ipv4Addr {
    let [a, b, c, _] = server_ip.octets();
    Ipv4Addr::new(a, b, c, POOL_FIRST_HOST + mac[5] % POOL_SIZE)
}

/// Baut OFFER oder ACK in `buffer`
///
/// Gibt die Länge der Antwort zurück, `None` wenn der Buffer zu klein ist.
pub fn build_reply(
    buffer: &mut [u8],
    request: &DhcpRequest,
    reply_type: MessageType,
    server_ip: Ipv4Addr,
    offered_ip: Ipv4Addr,
) -> Option<usize> {
    if buffer.len() < MAX_REPLY_LEN {
        return None;
    }
    buffer[..MAX_REPLY_LEN].fill(0);

    buffer[0] = BOOTREPLY;
    buffer[1] = HTYPE_ETHERNET;
    buffer[2] = HLEN_ETHERNET;
    buffer[4..8].copy_from_slice(&request.xid);
    buffer[10..12].copy_from_slice(&request.flags);
    buffer[16..20].copy_from_slice(&offered_ip.octets()); // yiaddr
    buffer[20..24].copy_from_slice(&server_ip.octets()); // siaddr
    buffer[28..34].copy_from_slice(&request.client_mac);
    buffer[236..240].copy_from_slice(&MAGIC_COOKIE);

    let server = server_ip.octets();
    let mut idx = MIN_PACKET_LEN;
    idx += put_option(&mut buffer[idx..], OPTION_MESSAGE_TYPE, &[reply_type.code()]);
    idx += put_option(&mut buffer[idx..], OPTION_SERVER_ID, &server);
    idx += put_option(
        &mut buffer[idx..],
        OPTION_LEASE_TIME,
        &LEASE_TIME_SECS.to_be_bytes(),
    );
    idx += put_option(&mut buffer[idx..], OPTION_SUBNET_MASK, &[255, 255, 255, 0]);
    idx += put_option(&mut buffer[idx..], OPTION_ROUTER, &server);
    // Eigener DNS-Server, damit jede Auflösung beim Panel landet
    idx += put_option(&mut buffer[idx..], OPTION_DNS, &server);
    buffer[idx] = OPTION_END;

    Some(idx + 1)
}

fn put_option(buffer: &mut [u8], code: u8, data: &[u8]) -> usize {
    buffer[0] = code;
    buffer[1] = data.len() as u8;
    buffer[2..2 + data.len()].copy_from_slice(data);
    2 + data.len()
}

/// Sucht eine Option im Options-Bereich (nach dem Magic Cookie)
fn find_option(options: &[u8], code: u8) -> Option<&[u8]> {
    let mut idx = 0;
    while idx < options.len() {
        match options[idx] {
            OPTION_END => return None,
            OPTION_PAD => idx += 1,
            current => {
                let len = *options.get(idx + 1)? as usize;
                let data = options.get(idx + 2..idx + 2 + len)?;
                if current == code {
                    return Some(data);
                }
                idx += 2 + len;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_option_skips_padding() {
        let options = [0, 0, 12, 2, b'h', b'i', 53, 1, 3, 255];
        assert_eq!(find_option(&options, 53), Some(&[3u8][..]));
        assert_eq!(find_option(&options, 54), None);
    }

    #[test]
    fn test_find_option_truncated() {
        let options = [53, 4, 1];
        assert_eq!(find_option(&options, 53), None);
    }

    #[test]
    fn test_reply_types() {
        assert_eq!(MessageType::Discover.reply(), Some(MessageType::Offer));
        assert_eq!(MessageType::Request.reply(), Some(MessageType::Ack));
        assert_eq!(MessageType::Other(7).reply(), None);
    }
}
