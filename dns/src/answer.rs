use crate::error::DnsError;
use crate::label::{decode_name, encode_name};
use crate::question::{CLASS_IN, TYPE_A};
use byteorder::{ByteOrder, BE};
use std::net::Ipv4Addr;

// type + class + ttl + rdlength
const ANSWER_TAIL_SIZE: usize = 10;

// root name + fixed fields, empty rdata
pub(crate) const MIN_ANSWER_SIZE: usize = 1 + ANSWER_TAIL_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    /// seconds
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl Answer {
    pub fn a_record(name: &str, ttl: u32, addr: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            rtype: TYPE_A,
            rclass: CLASS_IN,
            ttl,
            rdata: addr.octets().to_vec(),
        }
    }

    /// RDLENGTH as written on the wire, always the length of `rdata`.
    pub fn rdlength(&self) -> Result<u16, DnsError> {
        u16::try_from(self.rdata.len()).map_err(|_| DnsError::RDataTooLong {
            len: self.rdata.len(),
        })
    }

    /// The address carried by an A/IN record.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if self.rtype != TYPE_A || self.rclass != CLASS_IN {
            return None;
        }
        let octets: [u8; 4] = self.rdata.as_slice().try_into().ok()?;
        Some(Ipv4Addr::from(octets))
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<(), DnsError> {
        let rdlength = self.rdlength()?;
        encode_name(&self.name, bytes)?;

        let mut tail = [0u8; ANSWER_TAIL_SIZE];
        BE::write_u16(&mut tail[0..2], self.rtype);
        BE::write_u16(&mut tail[2..4], self.rclass);
        BE::write_u32(&mut tail[4..8], self.ttl);
        BE::write_u16(&mut tail[8..10], rdlength);
        bytes.extend_from_slice(&tail);
        bytes.extend_from_slice(&self.rdata);

        Ok(())
    }

    /// Decodes one resource record at `offset`, returning it with the number
    /// of bytes it occupies there. The name may be compressed.
    pub fn decode(buffer: &[u8], offset: usize) -> Result<(Self, usize), DnsError> {
        let (name, name_len) = decode_name(buffer, offset);
        let tail_at = offset + name_len;

        let Some(tail) = buffer.get(tail_at..tail_at + ANSWER_TAIL_SIZE) else {
            return Err(DnsError::IncompleteAnswer { offset: tail_at });
        };
        let rtype = BE::read_u16(&tail[0..2]);
        let rclass = BE::read_u16(&tail[2..4]);
        let ttl = BE::read_u32(&tail[4..8]);
        let rdlength = usize::from(BE::read_u16(&tail[8..10]));

        let rdata_at = tail_at + ANSWER_TAIL_SIZE;
        let Some(rdata) = buffer.get(rdata_at..rdata_at + rdlength) else {
            return Err(DnsError::IncompleteAnswer { offset: rdata_at });
        };

        let record = Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata: rdata.to_vec(),
        };

        Ok((record, name_len + ANSWER_TAIL_SIZE + rdlength))
    }
}
