//! Chat-target resolution.
//!
//! The webhook handler decides where a notification goes by walking an
//! ordered strategy list and taking the first one that applies. Future
//! strategies (per-repository mappings, say) slot in without touching the
//! callers.

use crate::{domain::ChatId, errors::Error, token::TokenCodec, Result};

/// One way of resolving the destination chat for a webhook delivery.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// Operator-configured fixed chat id.
    Fixed(ChatId),
    /// Decode the `token` query parameter with the token codec.
    QueryToken,
}

/// The standard chain: configured default first, token second.
pub fn default_strategies(default_chat_id: Option<i64>) -> Vec<Strategy> {
    let mut out = Vec::new();
    if let Some(id) = default_chat_id {
        out.push(Strategy::Fixed(ChatId(id)));
    }
    out.push(Strategy::QueryToken);
    out
}

/// Walk the strategies and return the first resolvable chat target.
///
/// A token that is present but does not decode is an auth failure, not a
/// fall-through: a forged token must never silently degrade to another
/// target.
pub fn resolve(
    strategies: &[Strategy],
    query_token: Option<&str>,
    codec: &TokenCodec,
) -> Result<ChatId> {
    for strategy in strategies {
        match strategy {
            Strategy::Fixed(id) => return Ok(*id),
            Strategy::QueryToken => {
                if let Some(token) = query_token {
                    return codec.decode(token);
                }
            }
        }
    }
    Err(Error::Routing("no chat target resolved".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("resolver-secret")
    }

    #[test]
    fn configured_default_wins_over_token() {
        let c = codec();
        let token = c.encode(ChatId(42)).unwrap();
        let chain = default_strategies(Some(7));

        let resolved = resolve(&chain, Some(&token), &c).unwrap();
        assert_eq!(resolved, ChatId(7));
    }

    #[test]
    fn token_resolves_when_no_default() {
        let c = codec();
        let token = c.encode(ChatId(42)).unwrap();
        let chain = default_strategies(None);

        let resolved = resolve(&chain, Some(&token), &c).unwrap();
        assert_eq!(resolved, ChatId(42));
    }

    #[test]
    fn bad_token_is_an_auth_error() {
        let chain = default_strategies(None);
        let err = resolve(&chain, Some("not-a-token"), &codec()).unwrap_err();
        assert!(matches!(err, Error::Auth));
    }

    #[test]
    fn exhausted_chain_is_a_routing_error() {
        let chain = default_strategies(None);
        let err = resolve(&chain, None, &codec()).unwrap_err();
        assert!(matches!(err, Error::Routing(_)));
    }
}
