use crate::answer::{Answer, MIN_ANSWER_SIZE};
use crate::error::DnsError;
use crate::header::{Header, HEADER_SIZE};
use crate::question::{read_questions, Question};

/// One DNS packet: header, question section and answer section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

impl Message {
    /// A standard recursive query for the A record of `domain`.
    pub fn query(id: u16, domain: &str) -> Self {
        let header = Header {
            id,
            rd: true, // rd = 1 启用服务端的递归查询
            qdcount: 1,
            ..Header::default()
        };

        Self {
            header,
            questions: vec![Question::new(domain)],
            answers: vec![],
        }
    }

    /// Decodes an inbound query: the header and `qdcount` questions.
    /// Answer records are not parsed.
    pub fn decode(raw: &[u8]) -> Result<Self, DnsError> {
        let header = parse_header(raw)?;
        let questions = Question::decode_many(raw, header.qdcount)?;

        Ok(Self {
            header,
            questions,
            answers: vec![],
        })
    }

    /// Decodes a response from an upstream server, answer section included.
    /// Questions keep their wire type and class.
    pub fn decode_response(raw: &[u8]) -> Result<Self, DnsError> {
        let header = parse_header(raw)?;
        let (questions, mut offset) = read_questions(raw, header.qdcount, true)?;

        let capacity = usize::from(header.ancount).min(raw.len() / MIN_ANSWER_SIZE);
        let mut answers = Vec::with_capacity(capacity);
        for _ in 0..header.ancount {
            let (answer, consumed) = Answer::decode(raw, offset)?;
            answers.push(answer);
            offset += consumed;
        }

        Ok(Self {
            header,
            questions,
            answers,
        })
    }

    /// Serializes header, questions and answers back to back.
    ///
    /// The header counts are taken from the sections actually written;
    /// authority and additional sections are never written, so their counts
    /// are zero.
    pub fn encode(&self) -> Result<Vec<u8>, DnsError> {
        let header = Header {
            qdcount: record_count(self.questions.len())?,
            ancount: record_count(self.answers.len())?,
            nscount: 0,
            arcount: 0,
            ..self.header
        };

        let mut bytes = Vec::with_capacity(crate::MAX_UDP_MESSAGE_SIZE);
        bytes.extend_from_slice(&header.to_bytes());
        for question in &self.questions {
            question.to_bytes(&mut bytes)?;
        }
        for answer in &self.answers {
            answer.to_bytes(&mut bytes)?;
        }

        Ok(bytes)
    }
}

fn parse_header(raw: &[u8]) -> Result<Header, DnsError> {
    let bytes: &[u8; HEADER_SIZE] = raw
        .get(..HEADER_SIZE)
        .and_then(|b| <&[u8; HEADER_SIZE]>::try_from(b).ok())
        .ok_or(DnsError::IncompleteHeader { len: raw.len() })?;

    Ok(Header::from_bytes(bytes))
}

fn record_count(count: usize) -> Result<u16, DnsError> {
    u16::try_from(count).map_err(|_| DnsError::TooManyRecords { count })
}
