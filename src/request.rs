//! Request framing and the `<Request>` start tag.
//!
//! Format:
//!   [ascii whitespace] <Request action="..." actor="..." [name="value" ...]> ...
//!
//! Framing:
//!   Document   — payload is the whole input, tag included
//!   HeaderLine — tag on the first line, payload is everything after the first '\n'

use std::io::Read;
use std::str::FromStr;

use crate::error::AuthError;
use crate::identity::{Identity, MAX_ACTOR_BYTES};

pub const REQUEST_TAG: &[u8] = b"<Request";

/// The start tag must close within this many bytes of its opening '<'.
pub const MAX_HEADER_BYTES: usize = 4096;

pub const ATTR_ACTOR: &[u8] = b"actor";
pub const ATTR_ACTION: &[u8] = b"action";

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framing {
    #[default]
    Document,
    HeaderLine,
}

impl FromStr for Framing {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Self::Document),
            "header-line" => Ok(Self::HeaderLine),
            other => Err(AuthError::Config(format!("unknown framing '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed request
// ---------------------------------------------------------------------------

/// Borrowed view of one inbound request.
#[derive(Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub actor: Identity,
    pub action: String,
    pub payload: &'a [u8],
}

/// Read the whole request, refusing anything larger than `max_bytes`.
pub fn read_input<R: Read>(reader: R, max_bytes: usize) -> Result<Vec<u8>, AuthError> {
    let mut buf = Vec::new();
    reader
        .take((max_bytes as u64).saturating_add(1))
        .read_to_end(&mut buf)?;
    if buf.len() > max_bytes {
        return Err(AuthError::malformed(format!(
            "request exceeds {} bytes",
            max_bytes
        )));
    }
    Ok(buf)
}

pub fn parse(input: &[u8], framing: Framing) -> Result<Request<'_>, AuthError> {
    let (header, payload) = match framing {
        Framing::Document => (input, input),
        Framing::HeaderLine => {
            let nl = input
                .iter()
                .position(|&b| b == b'\n')
                .ok_or_else(|| AuthError::malformed("missing header line terminator"))?;
            (&input[..nl], &input[nl + 1..])
        }
    };

    let (region, trailing) = start_tag(header)?;
    if framing == Framing::HeaderLine && !matches!(trailing, b"" | b"\r") {
        return Err(AuthError::malformed("unexpected bytes after request tag on header line"));
    }
    let attrs = parse_attributes(region)?;

    let actor_raw = single(&attrs, ATTR_ACTOR)?;
    if actor_raw.len() > MAX_ACTOR_BYTES {
        return Err(AuthError::malformed(format!(
            "actor exceeds {} bytes",
            MAX_ACTOR_BYTES
        )));
    }
    let actor_str = std::str::from_utf8(actor_raw)
        .map_err(|_| AuthError::malformed("actor is not valid UTF-8"))?;
    let actor = Identity::new(actor_str).map_err(AuthError::malformed)?;

    let action_raw = single(&attrs, ATTR_ACTION)?;
    if action_raw.is_empty() {
        return Err(AuthError::malformed("action is empty"));
    }
    let action = String::from_utf8_lossy(action_raw).into_owned();

    Ok(Request {
        actor,
        action,
        payload,
    })
}

// ---------------------------------------------------------------------------
// Tag scanning
// ---------------------------------------------------------------------------

/// Returns the attribute region of the start tag, between the element name
/// and the closing `>` (or `/>`), and the bytes following the `>`.
fn start_tag(header: &[u8]) -> Result<(&[u8], &[u8]), AuthError> {
    let start = header
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or_else(|| AuthError::malformed("empty request"))?;
    let rest = &header[start..];

    if !rest.starts_with(REQUEST_TAG) {
        return Err(AuthError::malformed("request does not start with <Request"));
    }
    let window = &rest[..rest.len().min(MAX_HEADER_BYTES)];
    let body = &window[REQUEST_TAG.len()..];

    match body.first() {
        Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {}
        _ => return Err(AuthError::malformed("request does not start with <Request")),
    }

    let mut in_quote = false;
    for (i, &b) in body.iter().enumerate() {
        match b {
            b'"' => in_quote = !in_quote,
            b'>' if !in_quote => {
                let attrs = &body[..i];
                let trailing = &rest[REQUEST_TAG.len() + i + 1..];
                return Ok((attrs.strip_suffix(b"/").unwrap_or(attrs), trailing));
            }
            _ => {}
        }
    }

    if rest.len() > MAX_HEADER_BYTES {
        Err(AuthError::malformed(format!(
            "request tag not closed within {} bytes",
            MAX_HEADER_BYTES
        )))
    } else {
        Err(AuthError::malformed("request tag is not closed"))
    }
}

fn parse_attributes(region: &[u8]) -> Result<Vec<(&[u8], &[u8])>, AuthError> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        while pos < region.len() && region[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == region.len() {
            return Ok(attrs);
        }

        let name_start = pos;
        while pos < region.len() && is_name_byte(region[pos]) {
            pos += 1;
        }
        let name = &region[name_start..pos];
        if name.is_empty() {
            return Err(AuthError::malformed("invalid attribute name"));
        }

        while pos < region.len() && region[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if region.get(pos) != Some(&b'=') {
            return Err(AuthError::malformed("attribute without value"));
        }
        pos += 1;
        while pos < region.len() && region[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if region.get(pos) != Some(&b'"') {
            return Err(AuthError::malformed("attribute value is not quoted"));
        }
        pos += 1;

        let value_start = pos;
        let len = region[value_start..]
            .iter()
            .position(|&b| b == b'"')
            .ok_or_else(|| AuthError::malformed("unterminated attribute value"))?;
        pos = value_start + len + 1;

        if let Some(b) = region.get(pos) {
            if !b.is_ascii_whitespace() {
                return Err(AuthError::malformed("attributes must be separated by whitespace"));
            }
        }

        attrs.push((name, &region[value_start..value_start + len]));
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

fn single<'a>(attrs: &[(&[u8], &'a [u8])], name: &[u8]) -> Result<&'a [u8], AuthError> {
    let mut found = attrs.iter().filter(|(n, _)| *n == name).map(|(_, v)| *v);
    let label = String::from_utf8_lossy(name);
    let value = found
        .next()
        .ok_or_else(|| AuthError::malformed(format!("missing {} attribute", label)))?;
    if found.next().is_some() {
        return Err(AuthError::malformed(format!("duplicate {} attribute", label)));
    }
    Ok(value)
}
