//! Wildcard-DNS für den Captive Portal
//!
//! Beantwortet jede A-Anfrage mit der Adresse des Access Points. Dadurch
//! landen die Connectivity-Checks der Handys beim Panel und das Betriebssystem
//! öffnet die Seite automatisch.

use core::net::Ipv4Addr;

pub const DNS_PORT: u16 = 53;

/// TTL der Antworten, kurz damit Clients nach dem Verlassen des AP neu fragen
pub const ANSWER_TTL_SECS: u32 = 60;

const HEADER_LEN: usize = 12;
const ANSWER_LEN: usize = 16;

const QTYPE_A: u16 = 1;
const QTYPE_ANY: u16 = 255;
const QCLASS_IN: u16 = 1;

const FLAG_QR: u8 = 0x80;

/// Erste Frage einer DNS-Anfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Länge von QNAME + QTYPE + QCLASS in Bytes
    pub len: usize,
    pub qtype: u16,
}

impl DnsQuestion {
    /// Nur A- und ANY-Fragen bekommen einen Eintrag
    pub fn wants_ipv4(&self) -> bool {
        self.qtype == QTYPE_A || self.qtype == QTYPE_ANY
    }
}

/// Parst Header und erste Frage
///
/// `None` bei Antworten (QR gesetzt), Paketen ohne Frage, komprimierten
/// Namen in der Frage oder abgeschnittenen Paketen.
pub fn parse_query(packet: &[u8]) -> Option<DnsQuestion> {
    if packet.len() < HEADER_LEN || packet[2] & FLAG_QR != 0 {
        return None;
    }
    let qdcount = u16::from_be_bytes([packet[4], packet[5]]);
    if qdcount == 0 {
        return None;
    }

    let mut idx = HEADER_LEN;
    loop {
        let label_len = *packet.get(idx)? as usize;
        idx += 1;
        if label_len == 0 {
            break;
        }
        // Pointer (0xC0) kommen in Anfragen nicht vor
        if label_len & 0xC0 != 0 {
            return None;
        }
        idx += label_len;
    }

    let fixed = packet.get(idx..idx + 4)?;
    let qtype = u16::from_be_bytes([fixed[0], fixed[1]]);

    Some(DnsQuestion {
        len: idx + 4 - HEADER_LEN,
        qtype,
    })
}

/// Baut die Antwort in `response`
///
/// Übernimmt ID und erste Frage aus `query`. Für A/ANY wird genau ein
/// A-Record mit `answer_ip` angehängt, sonst bleibt der Answer-Teil leer.
/// Gibt die Länge der Antwort zurück, `None` wenn `response` zu klein ist.
pub fn build_response(
    query: &[u8],
    question: &DnsQuestion,
    answer_ip: Ipv4Addr,
    response: &mut [u8],
) -> Option<usize> {
    let question_end = HEADER_LEN + question.len;
    let answers: u16 = if question.wants_ipv4() { 1 } else { 0 };
    let total = question_end + ANSWER_LEN * answers as usize;
    if query.len() < question_end || response.len() < total {
        return None;
    }

    response[..total].fill(0);
    response[0..2].copy_from_slice(&query[0..2]);
    // QR + Opcode aus der Anfrage + RD übernehmen, RA setzen, RCODE 0
    response[2] = FLAG_QR | (query[2] & 0x79);
    response[3] = 0x80;
    response[4..6].copy_from_slice(&1u16.to_be_bytes());
    response[6..8].copy_from_slice(&answers.to_be_bytes());
    response[HEADER_LEN..question_end].copy_from_slice(&query[HEADER_LEN..question_end]);

    if answers == 0 {
        return Some(question_end);
    }

    let answer = &mut response[question_end..total];
    answer[0..2].copy_from_slice(&[0xC0, 0x0C]); // Pointer auf QNAME
    answer[2..4].copy_from_slice(&QTYPE_A.to_be_bytes());
    answer[4..6].copy_from_slice(&QCLASS_IN.to_be_bytes());
    answer[6..10].copy_from_slice(&ANSWER_TTL_SECS.to_be_bytes());
    answer[10..12].copy_from_slice(&4u16.to_be_bytes());
    answer[12..16].copy_from_slice(&answer_ip.octets());

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_rejects_responses() {
        let mut packet = [0u8; 17];
        packet[2] = FLAG_QR;
        packet[5] = 1;
        assert_eq!(parse_query(&packet), None);
    }

    #[test]
    fn test_parse_query_rejects_missing_question() {
        let packet = [0u8; 12];
        assert_eq!(parse_query(&packet), None);
    }

    #[test]
    fn test_parse_query_truncated_name() {
        let mut packet = [0u8; 15];
        packet[5] = 1;
        packet[12] = 10; // Label länger als das Paket
        assert_eq!(parse_query(&packet), None);
    }
}
