use rolegate_flow::{AuthToken, Message};

/// Where the caller's role is read from: the `role` claim of the token that
/// upstream authentication attached to the message.
///
/// This is the only location consulted. A role placed anywhere else (for
/// example inside `payload`) is ignored.
pub const CLAIM_SOURCE: &str = "token.role";

/// The role claim carried by `message`, untouched.
///
/// `None` when the message has no token or the token has no role. The token
/// is trusted as-is; nothing is decoded or re-validated here.
pub fn claim_role(message: &Message) -> Option<&str> {
    message.token().and_then(AuthToken::role)
}
