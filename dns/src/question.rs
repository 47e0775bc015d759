use crate::error::DnsError;
use crate::header::HEADER_SIZE;
use crate::label::{decode_name, encode_name};
use byteorder::{ByteOrder, BE};

pub const TYPE_A: u16 = 1;
pub const CLASS_IN: u16 = 1;

// qtype + qclass
const QUESTION_TAIL_SIZE: usize = 4;

// root name + qtype + qclass
const MIN_QUESTION_SIZE: usize = 1 + QUESTION_TAIL_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            qtype: TYPE_A,
            qclass: CLASS_IN,
        }
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<(), DnsError> {
        encode_name(&self.name, bytes)?;

        let mut tail = [0u8; QUESTION_TAIL_SIZE];
        BE::write_u16(&mut tail[0..2], self.qtype);
        BE::write_u16(&mut tail[2..4], self.qclass);
        bytes.extend_from_slice(&tail);

        Ok(())
    }

    /// Decodes `count` questions following the header.
    ///
    /// Only A/IN queries are served, so every decoded question is recorded as
    /// A/IN whatever its wire type and class are.
    pub fn decode_many(buffer: &[u8], count: u16) -> Result<Vec<Self>, DnsError> {
        let (questions, _) = read_questions(buffer, count, false)?;
        Ok(questions)
    }
}

/// Reads `count` questions starting right after the header and returns them
/// with the offset of the first byte after the question section.
pub(crate) fn read_questions(
    buffer: &[u8],
    count: u16,
    keep_wire_type: bool,
) -> Result<(Vec<Question>, usize), DnsError> {
    let mut offset = HEADER_SIZE;
    let capacity = usize::from(count).min(buffer.len() / MIN_QUESTION_SIZE);
    let mut questions = Vec::with_capacity(capacity);

    for _ in 0..count {
        let (name, consumed) = decode_name(buffer, offset);
        offset += consumed;

        let Some(tail) = buffer.get(offset..offset + QUESTION_TAIL_SIZE) else {
            return Err(DnsError::IncompleteQuestion { offset });
        };

        let question = if keep_wire_type {
            Question {
                name,
                qtype: BE::read_u16(&tail[0..2]),
                qclass: BE::read_u16(&tail[2..4]),
            }
        } else {
            Question::new(&name)
        };

        questions.push(question);
        offset += QUESTION_TAIL_SIZE;
    }

    Ok((questions, offset))
}
