use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("label '{label}' exceeds 63 bytes")]
    LabelTooLong { label: String },

    #[error("empty label inside a domain name")]
    EmptyLabel,

    #[error("incomplete header: {len} bytes, 12 required")]
    IncompleteHeader { len: usize },

    #[error("incomplete question at offset {offset}")]
    IncompleteQuestion { offset: usize },

    #[error("incomplete answer at offset {offset}")]
    IncompleteAnswer { offset: usize },

    #[error("rdata of {len} bytes does not fit in a 16 bit length")]
    RDataTooLong { len: usize },

    #[error("{count} records do not fit in a 16 bit count")]
    TooManyRecords { count: usize },
}
