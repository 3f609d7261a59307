//! Invite token codec
//!
//! Current format: `locale \t category \t sender \t recipient \t message
//! [\t prize1 .. prize6]`, UTF-8 encoded, then URL-safe base64 without
//! padding. The decoder also reads every earlier generation:
//!
//! 1. base64 of URI-encoded JSON `{s, r, m}`
//! 2. the same with a locale, `{s, r, m, l}`
//! 3. the same with custom prizes, `{s, r, m, l, p}`
//! 4. delimited fields without the category column
//!
//! Links look like `<origin>/play?d=<token>`. The oldest links carried plain
//! `sender`, `recipient` and `reason` query parameters instead of a token.

use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::i18n::default_prizes;
use crate::invite::{Category, GameInvite, Locale, PRIZE_COUNT, PrizeList};

/// Field delimiter; a control character that free text practically never holds
pub const FIELD_SEPARATOR: char = '\t';

/// Query parameter carrying the token
pub const TOKEN_PARAM: &str = "d";

/// URL-safe alphabet, no padding on output, padding tolerated on input
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Why a token could not be read
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("legacy token is not valid percent-encoded UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("token is neither delimited fields nor legacy JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode an invite into a token made only of `[A-Za-z0-9_-]`
///
/// The prize list is left out when it equals the locale's defaults.
/// Delimiter characters inside free text are replaced by spaces.
pub fn encode(invite: &GameInvite) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        Cow::Borrowed(invite.locale.as_str()),
        Cow::Borrowed(invite.category.as_str()),
        sanitize(&invite.sender),
        sanitize(&invite.recipient),
        sanitize(&invite.message),
    ];

    if let Some(prizes) = &invite.prizes {
        if !prizes.matches(&default_prizes(invite.locale)) {
            parts.extend(prizes.as_slice().iter().map(|p| sanitize(p)));
        }
    }

    let raw = parts.join(&FIELD_SEPARATOR.to_string());
    TOKEN_ENGINE.encode(raw.as_bytes())
}

fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains(FIELD_SEPARATOR) {
        Cow::Owned(text.replace(FIELD_SEPARATOR, " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// Decode a token of any generation; `None` on anything malformed
pub fn decode(token: &str) -> Option<GameInvite> {
    match try_decode(token) {
        Ok(invite) => Some(invite),
        Err(e) => {
            log::warn!("Rejected invite token: {}", e);
            None
        }
    }
}

/// Decode a token of any generation, keeping the failure reason
pub fn try_decode(token: &str) -> Result<GameInvite, DecodeError> {
    let bytes = TOKEN_ENGINE.decode(normalize_token(token))?;
    let text = String::from_utf8_lossy(&bytes);
    let parts: Vec<&str> = text.split(FIELD_SEPARATOR).collect();

    if parts.len() >= 5 {
        if let Some(category) = Category::from_code(parts[1]) {
            return Ok(from_fields(parts[0], category, &parts[2..]));
        }
    }
    if parts.len() >= 4 {
        log::debug!("Token has no category column, reading legacy layout");
        return Ok(from_fields(parts[0], Category::Apology, &parts[1..]));
    }

    log::debug!("Token is not delimited, trying legacy JSON");
    decode_json(&text)
}

/// Map a standard-base64 or form-decoded token onto the URL-safe alphabet
fn normalize_token(token: &str) -> String {
    token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            c => c,
        })
        .collect()
}

/// `fields` is `sender, recipient, message, prizes...`
fn from_fields(locale: &str, category: Category, fields: &[&str]) -> GameInvite {
    let extras = &fields[3..];
    let prizes = if extras.len() >= PRIZE_COUNT {
        PrizeList::from_vec(extras[..PRIZE_COUNT].iter().map(|p| p.to_string()).collect())
    } else {
        if !extras.is_empty() {
            log::debug!("Ignoring {} trailing token fields", extras.len());
        }
        None
    };

    GameInvite {
        sender: fields[0].to_string(),
        recipient: fields[1].to_string(),
        message: fields[2].to_string(),
        locale: Locale::from_code_or_default(locale),
        category,
        prizes,
    }
}

#[derive(Debug, Deserialize)]
struct LegacyJson {
    #[serde(default)]
    s: String,
    #[serde(default)]
    r: String,
    #[serde(default)]
    m: String,
    #[serde(default)]
    l: Option<String>,
    #[serde(default)]
    p: Option<Vec<String>>,
}

fn decode_json(text: &str) -> Result<GameInvite, DecodeError> {
    let json: Cow<'_, str> = if text.trim_start().starts_with('{') {
        Cow::Borrowed(text)
    } else {
        percent_decode_str(text).decode_utf8()?
    };
    let legacy: LegacyJson = serde_json::from_str(&json)?;

    Ok(GameInvite {
        sender: legacy.s,
        recipient: legacy.r,
        message: legacy.m,
        locale: legacy
            .l
            .as_deref()
            .map(Locale::from_code_or_default)
            .unwrap_or_default(),
        category: Category::Apology,
        prizes: legacy.p.and_then(PrizeList::from_vec),
    })
}

/// Build the canonical play link for an invite
pub fn play_url(origin: &str, invite: &GameInvite) -> String {
    format!(
        "{}/play?{}={}",
        origin.trim_end_matches('/'),
        TOKEN_PARAM,
        encode(invite)
    )
}

/// Read an invite from a query string (`?d=...` or the legacy plain form)
pub fn invite_from_query(query: &str) -> Option<GameInvite> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut token = None;
    let mut sender = None;
    let mut recipient = None;
    let mut reason = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            TOKEN_PARAM => token = Some(value.into_owned()),
            "sender" => sender = Some(value.into_owned()),
            "recipient" => recipient = Some(value.into_owned()),
            "reason" => reason = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(token) = token {
        return decode(&token);
    }

    match (sender, recipient) {
        (Some(sender), Some(recipient)) if !sender.is_empty() && !recipient.is_empty() => {
            Some(GameInvite::new(sender, recipient, reason.unwrap_or_default()))
        }
        _ => {
            log::warn!("Play link has neither a token nor sender/recipient");
            None
        }
    }
}

/// Read an invite from a full or relative play URL
pub fn invite_from_url(link: &str) -> Option<GameInvite> {
    match Url::parse(link) {
        Ok(url) => invite_from_query(url.query().unwrap_or_default()),
        Err(_) => {
            let (_, query) = link.split_once('?')?;
            invite_from_query(query)
        }
    }
}
