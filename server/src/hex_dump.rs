use dns::HEADER_SIZE;

pub fn bytes_to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a packet as the header, two bytes per line, followed by
/// everything after the header on one line.
pub fn dump_packet(packet: &[u8]) -> String {
    let split = HEADER_SIZE.min(packet.len());
    let (header, rest) = packet.split_at(split);

    let mut lines = vec!["Header".to_string()];
    lines.extend(header.chunks(2).map(bytes_to_hex));
    lines.push("Questions".to_string());
    lines.push(bytes_to_hex(rest));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_test() {
        assert_eq!(bytes_to_hex(&[0, 15, 255, 0xab]), "00 0f ff ab");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn dump_test() {
        let packet = [
            0x04, 0xd2, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            0x01, b'a', 0x00, 0x00, 0x01, 0x00, 0x01,
        ];

        let expected = [
            "Header", "04 d2", "01 00", "00 01", "00 00", "00 00", "00 00", "Questions",
            "01 61 00 00 01 00 01",
        ]
        .join("\n");
        assert_eq!(dump_packet(&packet), expected);
    }

    #[test]
    fn dump_short_packet() {
        assert_eq!(dump_packet(&[1, 2, 3]), "Header\n01 02\n03\nQuestions\n");
    }
}
