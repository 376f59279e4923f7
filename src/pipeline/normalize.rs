use crate::error::QuoteError;
use crate::models::NormalizedSymbol;

/// Default market suffix (National Stock Exchange of India).
pub const NSE_SUFFIX: &str = ".NS";

/// Canonicalize user input into the upstream query key.
///
/// " reliance " → RELIANCE.NS | "^nsei" → ^NSEI | "tcs.bo" → TCS.BO
///
/// Anything already carrying an exchange qualifier (".") or an index marker
/// ("^") passes through untouched.
pub fn normalize(raw: &str) -> Result<NormalizedSymbol, QuoteError> {
    let safe: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    // "." and ".." would vanish from the upstream URL path.
    if safe.is_empty() || safe.chars().all(|c| c == '.') {
        return Err(QuoteError::InvalidInput);
    }

    if safe.contains('.') || safe.starts_with('^') {
        return Ok(NormalizedSymbol::new_unchecked(safe));
    }

    Ok(NormalizedSymbol::new_unchecked(format!("{safe}{NSE_SUFFIX}")))
}
