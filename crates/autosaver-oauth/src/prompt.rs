//! The human interaction boundary of the authorization-code flow.

use crate::error::Result;

/// Presents an authorization URL to a human and returns the callback they
/// were redirected to.
///
/// The session only needs "present a string, obtain a string"; console,
/// browser automation or a test double all fit.
pub trait AuthorizationPrompt {
    fn authorize(&self, authorization_url: &str) -> Result<String>;
}

impl<F> AuthorizationPrompt for F
where
    F: Fn(&str) -> Result<String>,
{
    fn authorize(&self, authorization_url: &str) -> Result<String> {
        self(authorization_url)
    }
}
