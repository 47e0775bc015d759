use byteorder::{ByteOrder, BE};

pub const HEADER_SIZE: usize = 12;

pub const OPCODE_QUERY: u8 = 0;

pub const RCODE_NO_ERROR: u8 = 0;
pub const RCODE_NOT_IMPLEMENTED: u8 = 4;

//                                 1  1  1  1  1  1
//   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
// |                      ID                       |
// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
// |                    QDCOUNT                    |
// |                    ANCOUNT                    |
// |                    NSCOUNT                    |
// |                    ARCOUNT                    |
// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    /// false for a query, true for a response
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    /// 递归查询，请求中设置，响应中原样返回
    pub rd: bool,
    pub ra: bool,
    /// 3 bits, reserved
    pub z: u8,
    pub rcode: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        BE::write_u16(&mut bytes[0..2], self.id);

        bytes[2] = u8::from(self.qr) << 7
            | (self.opcode & 0x0F) << 3
            | u8::from(self.aa) << 2
            | u8::from(self.tc) << 1
            | u8::from(self.rd);
        bytes[3] = u8::from(self.ra) << 7 | (self.z & 0x07) << 4 | (self.rcode & 0x0F);

        BE::write_u16(&mut bytes[4..6], self.qdcount);
        BE::write_u16(&mut bytes[6..8], self.ancount);
        BE::write_u16(&mut bytes[8..10], self.nscount);
        BE::write_u16(&mut bytes[10..12], self.arcount);

        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            id: BE::read_u16(&bytes[0..2]),
            qr: bytes[2] & 0x80 != 0,
            opcode: (bytes[2] >> 3) & 0x0F,
            aa: bytes[2] & 0x04 != 0,
            tc: bytes[2] & 0x02 != 0,
            rd: bytes[2] & 0x01 != 0,
            ra: bytes[3] & 0x80 != 0,
            z: (bytes[3] >> 4) & 0x07,
            rcode: bytes[3] & 0x0F,
            qdcount: BE::read_u16(&bytes[4..6]),
            ancount: BE::read_u16(&bytes[6..8]),
            nscount: BE::read_u16(&bytes[8..10]),
            arcount: BE::read_u16(&bytes[10..12]),
        }
    }

    pub fn is_standard_query(&self) -> bool {
        self.opcode == OPCODE_QUERY
    }
}
