use std::net::Ipv4Addr;

use dns::{Answer, Header, Message, Question, RCODE_NOT_IMPLEMENTED, RCODE_NO_ERROR};
use thiserror::Error;

use crate::lookup::{Lookup, LookupError};

/// Answer used for every question when no upstream server is configured.
pub const PLACEHOLDER_ADDRESS: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

/// TTL of every synthesized answer, in seconds.
pub const ANSWER_TTL: u32 = 60;

/// Where answers come from.
#[derive(Debug, Clone)]
pub enum Upstream<L> {
    /// Answer every question with [`PLACEHOLDER_ADDRESS`].
    Local,
    /// Forward every question to an upstream lookup.
    Forward(L),
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream lookup for {name} failed: {source}")]
    UpstreamLookupFailed {
        name: String,
        #[source]
        source: LookupError,
    },
}

pub struct Forwarder<L> {
    upstream: Upstream<L>,
}

impl<L: Lookup> Forwarder<L> {
    pub fn new(upstream: Upstream<L>) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &Upstream<L> {
        &self.upstream
    }

    /// Answers every question in order. A question whose upstream lookup
    /// fails contributes no answers; the remaining questions are still
    /// resolved.
    pub async fn answer(&self, questions: &[Question]) -> Vec<Answer> {
        let mut answers = Vec::with_capacity(questions.len());

        for question in questions {
            match self.resolve_question(question).await {
                Ok(resolved) => answers.extend(resolved),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        answers
    }

    /// Builds the response to `request`: derived header, the request's
    /// questions, and their answers.
    pub async fn respond(&self, request: Message) -> Message {
        let answers = self.answer(&request.questions).await;
        let header = response_header(&request.header, request.questions.len(), answers.len());

        Message {
            header,
            questions: request.questions,
            answers,
        }
    }

    async fn resolve_question(&self, question: &Question) -> Result<Vec<Answer>, ForwardError> {
        let name = question.name.as_str();

        let addresses = match &self.upstream {
            Upstream::Local => vec![PLACEHOLDER_ADDRESS],
            Upstream::Forward(lookup) => lookup.lookup(name).await.map_err(|source| {
                ForwardError::UpstreamLookupFailed {
                    name: name.to_string(),
                    source,
                }
            })?,
        };

        for addr in &addresses {
            tracing::debug!("resolved {} to {}", name, addr);
        }

        let answers = addresses
            .into_iter()
            .map(|addr| Answer::a_record(name, ANSWER_TTL, addr))
            .collect();

        Ok(answers)
    }
}

/// Response header for `request`: ID and RD are echoed, QR is set, counts
/// match the response sections, and any opcode other than a standard query
/// is answered with NOTIMP.
pub fn response_header(request: &Header, question_count: usize, answer_count: usize) -> Header {
    let rcode = if request.is_standard_query() {
        RCODE_NO_ERROR
    } else {
        RCODE_NOT_IMPLEMENTED
    };

    Header {
        id: request.id,
        qr: true,
        opcode: request.opcode,
        rd: request.rd,
        rcode,
        qdcount: u16::try_from(question_count).unwrap_or(u16::MAX),
        ancount: u16::try_from(answer_count).unwrap_or(u16::MAX),
        nscount: 0,
        arcount: 0,
        ..Header::default()
    }
}
