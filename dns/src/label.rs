use crate::error::DnsError;

pub const MAX_LABEL_LEN: usize = 63;

// 一个 name 最多跟随的指针次数
const MAX_POINTER_HOPS: usize = 64;

const POINTER_MASK: u8 = 0xC0;

// 把域名转换为 DNS 的 label 序列，以 0 结尾，不做压缩
//
// `\.`, `\\` and `\DDD` escapes produced by `decode_name` are turned back
// into the raw label bytes.
pub fn encode_name(name: &str, bytes: &mut Vec<u8>) -> Result<(), DnsError> {
    let mut labels = split_labels(name);

    // trailing dot, or the root name
    if labels.last().is_some_and(|l| l.is_empty()) && labels.len() > 1 {
        labels.pop();
    }
    if labels.len() == 1 && labels[0].is_empty() {
        labels.clear();
    }

    for label in labels {
        if label.is_empty() {
            return Err(DnsError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DnsError::LabelTooLong {
                label: String::from_utf8_lossy(&label).to_string(),
            });
        }

        bytes.push(label.len() as u8);
        bytes.extend_from_slice(&label);
    }

    bytes.push(0);

    Ok(())
}

fn split_labels(name: &str) -> Vec<Vec<u8>> {
    let raw = name.as_bytes();
    let mut labels = vec![];
    let mut label = vec![];
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b'.' => labels.push(std::mem::take(&mut label)),
            b'\\' => {
                if let Some(value) = escaped_decimal(&raw[i + 1..]) {
                    label.push(value);
                    i += 3;
                } else if let Some(&next) = raw.get(i + 1) {
                    label.push(next);
                    i += 1;
                } else {
                    label.push(b'\\');
                }
            }
            b => label.push(b),
        }
        i += 1;
    }
    labels.push(label);

    labels
}

// `DDD` after a backslash, 000 to 255
fn escaped_decimal(rest: &[u8]) -> Option<u8> {
    let digits = rest.get(..3)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
    u8::try_from(value).ok()
}

// Label bytes as text: `.` and `\` are backslash escaped, bytes outside
// printable ASCII become `\DDD`.
fn escape_label(label: &[u8]) -> String {
    let mut text = String::with_capacity(label.len());
    for &b in label {
        match b {
            b'.' | b'\\' => {
                text.push('\\');
                text.push(char::from(b));
            }
            0x21..=0x7E => text.push(char::from(b)),
            _ => text.push_str(&format!("\\{:03}", b)),
        }
    }
    text
}

/// Decodes the name starting at `start` within the full message `buffer`.
///
/// Returns the dot-joined name and the number of bytes consumed at `start`.
/// A compression pointer ends the name and counts as 2 bytes, however long
/// the name it points to is. Malformed input never fails: truncated labels,
/// out of range pointers and pointer cycles stop decoding and the labels
/// read so far are returned.
pub fn decode_name(buffer: &[u8], start: usize) -> (String, usize) {
    let mut labels = Vec::new();
    let mut visited = vec![start];

    let consumed = read_labels(buffer, start, &mut labels, &mut visited);

    (labels.join("."), consumed)
}

fn read_labels(
    buffer: &[u8],
    start: usize,
    labels: &mut Vec<String>,
    visited: &mut Vec<usize>,
) -> usize {
    let mut offset = start;

    while let Some(&len) = buffer.get(offset) {
        if len == 0 {
            offset += 1;
            break;
        }

        if len & POINTER_MASK == POINTER_MASK {
            let Some(&low) = buffer.get(offset + 1) else {
                break;
            };
            offset += 2;

            let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);
            if visited.contains(&target) || visited.len() > MAX_POINTER_HOPS {
                break;
            }
            visited.push(target);

            read_labels(buffer, target, labels, visited);
            break;
        }

        // 0x40 and 0x80 prefixes are reserved label types
        if len & POINTER_MASK != 0 {
            break;
        }

        let begin = offset + 1;
        let end = begin + usize::from(len);
        let Some(label_bytes) = buffer.get(begin..end) else {
            break;
        };

        labels.push(escape_label(label_bytes));
        offset = end;
    }

    offset - start
}
