//! Textual Joint-Pair Parser
//!
//! Reads the catalog encoding `[(12, 14), (11, 13)]`. Lists that went
//! through a serialize/re-parse cycle may carry extra outer brackets or
//! square-bracketed pairs (`[[12, 14], [11, 13]]`); both are accepted.

use crate::{ConfigError, JointPair};
use tracing::debug;

/// Parse a textual pair list, keeping the written order.
///
/// Every pair token is handled the same way. Any malformed token rejects
/// the whole list.
pub fn parse_pairs(text: &str) -> Result<Vec<JointPair>, ConfigError> {
    let body = strip_outer_brackets(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let body = body.replace('[', "(").replace(']', ")");
    let pairs = split_pairs(&body)
        .into_iter()
        .enumerate()
        .map(|(position, token)| parse_token(position, token))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} joint pairs from {:?}", pairs.len(), text);
    Ok(pairs)
}

fn strip_outer_brackets(text: &str) -> &str {
    let mut body = text.trim();
    while let Some(inner) = body
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        body = inner.trim();
    }
    body
}

/// Split at each comma that follows a closing parenthesis, ignoring
/// whitespace between the two.
fn split_pairs(body: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut closed = false;

    for (i, c) in body.char_indices() {
        match c {
            ')' => closed = true,
            ',' if closed => {
                tokens.push(&body[start..i]);
                start = i + 1;
                closed = false;
            }
            c if c.is_whitespace() => {}
            _ => closed = false,
        }
    }
    tokens.push(&body[start..]);
    tokens
}

fn parse_token(position: usize, token: &str) -> Result<JointPair, ConfigError> {
    let malformed = || ConfigError::MalformedPair {
        position,
        token: token.trim().to_string(),
    };

    let inner = token.trim();
    let inner = inner.strip_prefix('(').unwrap_or(inner);
    let inner = inner.strip_suffix(')').unwrap_or(inner);

    let mut parts = inner.split(',');
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let a = first.trim().parse::<usize>().map_err(|_| malformed())?;
    let b = second.trim().parse::<usize>().map_err(|_| malformed())?;
    Ok(JointPair::new(a, b))
}
