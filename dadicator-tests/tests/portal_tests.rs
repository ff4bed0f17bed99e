//! Integration Tests für den Captive Portal (DHCP- und DNS-Codecs)
//!
//! Die Pakete werden von Hand gebaut, so wie sie ein Handy beim Beitritt
//! zum Access Point schickt.

use core::net::Ipv4Addr;

use dadicator_core::dhcp::{self, MessageType};
use dadicator_core::dns;

const SERVER_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);
const CLIENT_MAC: [u8; 6] = [0x3c, 0x22, 0xfb, 0x10, 0x20, 0x30];

// ============================================================================
// Helpers
// ============================================================================

/// BOOTREQUEST mit Magic Cookie und Option 53
fn dhcp_packet(message_type: u8) -> Vec<u8> {
    let mut packet = vec![0u8; 240];
    packet[0] = 1; // BOOTREQUEST
    packet[1] = 1; // Ethernet
    packet[2] = 6;
    packet[4..8].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    packet[10..12].copy_from_slice(&[0x80, 0x00]); // Broadcast-Flag
    packet[28..34].copy_from_slice(&CLIENT_MAC);
    packet[236..240].copy_from_slice(&[99, 130, 83, 99]);
    packet.extend_from_slice(&[53, 1, message_type, 255]);
    packet
}

/// Liest eine Option aus einer Antwort
fn reply_option(reply: &[u8], code: u8) -> Option<Vec<u8>> {
    let mut idx = 240;
    while idx < reply.len() && reply[idx] != 255 {
        let len = reply[idx + 1] as usize;
        if reply[idx] == code {
            return Some(reply[idx + 2..idx + 2 + len].to_vec());
        }
        idx += 2 + len;
    }
    None
}

/// Standard-Anfrage mit RD-Bit für `name`
fn dns_query(id: u16, name: &str, qtype: u16) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&[0x01, 0x00]); // RD
    packet.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 0]);
    for label in name.split('.') {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);
    packet.extend_from_slice(&qtype.to_be_bytes());
    packet.extend_from_slice(&1u16.to_be_bytes());
    packet
}

// ============================================================================
// Tests: DHCP
// ============================================================================

#[test]
fn test_dhcp_parse_discover() {
    let request = dhcp::parse_request(&dhcp_packet(1)).unwrap();

    assert_eq!(request.message_type, MessageType::Discover);
    assert_eq!(request.client_mac, CLIENT_MAC);
    assert_eq!(request.xid, [0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn test_dhcp_parse_rejects_invalid_packets() {
    // zu kurz
    assert!(dhcp::parse_request(&[1u8; 100]).is_none());

    // BOOTREPLY statt BOOTREQUEST
    let mut reply = dhcp_packet(1);
    reply[0] = 2;
    assert!(dhcp::parse_request(&reply).is_none());

    // falsches Magic Cookie
    let mut cookie = dhcp_packet(1);
    cookie[236] = 0;
    assert!(dhcp::parse_request(&cookie).is_none());

    // keine Option 53
    let mut no_type = dhcp_packet(1);
    no_type.truncate(240);
    no_type.push(255);
    assert!(dhcp::parse_request(&no_type).is_none());
}

#[test]
fn test_dhcp_allocation_is_stable_and_in_pool() {
    let first = dhcp::allocate_ip(SERVER_IP, &CLIENT_MAC);
    let second = dhcp::allocate_ip(SERVER_IP, &CLIENT_MAC);
    assert_eq!(first, second);

    for last in 0..=255u8 {
        let mac = [0, 0, 0, 0, 0, last];
        let [a, b, c, host] = dhcp::allocate_ip(SERVER_IP, &mac).octets();
        assert_eq!([a, b, c], [192, 168, 4]);
        assert!((2..=50).contains(&host), "host {} outside pool", host);
    }
}

#[test]
fn test_dhcp_offer_layout() {
    let request = dhcp::parse_request(&dhcp_packet(1)).unwrap();
    let offered = dhcp::allocate_ip(SERVER_IP, &request.client_mac);
    let mut buffer = [0u8; 576];

    let len = dhcp::build_reply(&mut buffer, &request, MessageType::Offer, SERVER_IP, offered)
        .unwrap();
    let reply = &buffer[..len];

    assert_eq!(reply[0], 2); // BOOTREPLY
    assert_eq!(&reply[4..8], &request.xid);
    assert_eq!(&reply[10..12], &[0x80, 0x00]);
    assert_eq!(&reply[16..20], &offered.octets());
    assert_eq!(&reply[28..34], &CLIENT_MAC);
    assert_eq!(&reply[236..240], &[99, 130, 83, 99]);
    assert_eq!(reply[len - 1], 255);

    assert_eq!(reply_option(reply, 53), Some(vec![2]));
    assert_eq!(reply_option(reply, 54), Some(vec![192, 168, 4, 1]));
    assert_eq!(reply_option(reply, 51), Some(3600u32.to_be_bytes().to_vec()));
    assert_eq!(reply_option(reply, 1), Some(vec![255, 255, 255, 0]));
    assert_eq!(reply_option(reply, 3), Some(vec![192, 168, 4, 1]));
    assert_eq!(reply_option(reply, 6), Some(vec![192, 168, 4, 1]));
}

#[test]
fn test_dhcp_request_gets_ack() {
    let request = dhcp::parse_request(&dhcp_packet(3)).unwrap();
    let reply_type = request.message_type.reply().unwrap();
    let offered = dhcp::allocate_ip(SERVER_IP, &request.client_mac);
    let mut buffer = [0u8; 576];

    let len = dhcp::build_reply(&mut buffer, &request, reply_type, SERVER_IP, offered).unwrap();

    assert_eq!(reply_type, MessageType::Ack);
    assert_eq!(reply_option(&buffer[..len], 53), Some(vec![5]));
}

#[test]
fn test_dhcp_release_gets_no_reply() {
    // DHCPRELEASE (7)
    let request = dhcp::parse_request(&dhcp_packet(7)).unwrap();
    assert_eq!(request.message_type.reply(), None);
}

#[test]
fn test_dhcp_reply_needs_room() {
    let request = dhcp::parse_request(&dhcp_packet(1)).unwrap();
    let mut small = [0u8; 64];

    assert!(
        dhcp::build_reply(&mut small, &request, MessageType::Offer, SERVER_IP, SERVER_IP)
            .is_none()
    );
}

// ============================================================================
// Tests: DNS
// ============================================================================

#[test]
fn test_dns_a_query_answered_with_portal_ip() {
    let query = dns_query(0x1234, "connectivitycheck.gstatic.com", 1);
    let question = dns::parse_query(&query).unwrap();
    let mut response = [0u8; 512];

    let len = dns::build_response(&query, &question, SERVER_IP, &mut response).unwrap();
    let response = &response[..len];

    assert_eq!(&response[0..2], &[0x12, 0x34]);
    assert_eq!(response[2], 0x81); // QR + RD
    assert_eq!(response[3], 0x80); // RA, NOERROR
    assert_eq!(&response[4..6], &[0, 1]);
    assert_eq!(&response[6..8], &[0, 1]);
    assert_eq!(&response[12..query.len()], &query[12..]);

    let answer = &response[query.len()..];
    assert_eq!(answer.len(), 16);
    assert_eq!(&answer[0..2], &[0xC0, 0x0C]);
    assert_eq!(&answer[2..4], &[0, 1]); // A
    assert_eq!(&answer[4..6], &[0, 1]); // IN
    assert_eq!(&answer[6..10], &60u32.to_be_bytes());
    assert_eq!(&answer[10..12], &[0, 4]);
    assert_eq!(&answer[12..16], &[192, 168, 4, 1]);
}

#[test]
fn test_dns_aaaa_query_gets_empty_answer() {
    let query = dns_query(7, "captive.apple.com", 28);
    let question = dns::parse_query(&query).unwrap();
    let mut response = [0u8; 512];

    let len = dns::build_response(&query, &question, SERVER_IP, &mut response).unwrap();

    assert!(!question.wants_ipv4());
    assert_eq!(len, query.len());
    assert_eq!(&response[6..8], &[0, 0]);
    assert_eq!(response[3] & 0x0F, 0); // NOERROR
}

#[test]
fn test_dns_any_query_is_answered() {
    let query = dns_query(9, "dadicator.local", 255);
    let question = dns::parse_query(&query).unwrap();

    assert!(question.wants_ipv4());
}

#[test]
fn test_dns_response_too_small() {
    let query = dns_query(1, "example.com", 1);
    let question = dns::parse_query(&query).unwrap();
    let mut response = [0u8; 20];

    assert!(dns::build_response(&query, &question, SERVER_IP, &mut response).is_none());
}
