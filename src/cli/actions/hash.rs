use crate::fava::user::credential_digest;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub secret: SecretString,
    pub value: SecretString,
}

/// Digest of `secret || value`, as stored in the secrets file.
#[must_use]
pub fn digest(args: &Args) -> String {
    credential_digest(args.secret.expose_secret(), args.value.expose_secret())
}

/// Print the digest to stdout.
pub fn execute(args: &Args) {
    println!("{}", digest(args));
}
