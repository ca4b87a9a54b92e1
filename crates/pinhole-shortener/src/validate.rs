use crate::error::{Result, ShortenerError};
use url::{Host, Url};

/// Longest URL accepted for shortening.
pub const MAX_URL_LENGTH: usize = 2083;

/// Validates that `raw` is an absolute `http`/`https` URL with a real host.
///
/// Domain hosts must carry a top-level domain (`example.com`, not
/// `localhost`); IP literals are accepted as-is.
pub fn validate_url(raw: &str) -> Result<Url> {
    if raw.is_empty() {
        return Err(ShortenerError::MissingUrl);
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL exceeds {} characters",
            MAX_URL_LENGTH
        )));
    }

    if raw
        .chars()
        .any(|c| c.is_whitespace() || c == '<' || c == '>')
    {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL contains whitespace or angle brackets: {}",
            raw
        )));
    }

    let url = Url::parse(raw)
        .map_err(|e| ShortenerError::InvalidUrl(format!("{}: {}", e, raw)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                other
            )))
        }
    }

    match url.host() {
        Some(Host::Domain(domain)) if has_tld(domain) => Ok(url),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(url),
        _ => Err(ShortenerError::InvalidUrl(format!(
            "URL must have a valid host: {}",
            raw
        ))),
    }
}

fn has_tld(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !name.is_empty()
        && tld.len() >= 2
        && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
}
