use dkimsign::{
    crypto::{digest_sha256, PrivateKeySigner},
    encode_base64, Message, Params, Signer, SigningError,
};

/// A deterministic stand-in key whose "signature" is a fixed Base64 string.
///
/// Lets assertions target the exact tag string without depending on real key
/// material.
pub struct FakeKey;

pub const FAKE_SIGNATURE: &str = "ZmFrZXNpZ25hdHVyZQ==";

impl PrivateKeySigner for FakeKey {
    fn create_signature(&self, _payload: &[u8]) -> Result<String, SigningError> {
        Ok(FAKE_SIGNATURE.into())
    }

    fn algorithm(&self) -> &str {
        "rsa-sha256"
    }

    fn selector(&self) -> &str {
        "202209"
    }
}

/// A stand-in key whose "signature" is the Base64 SHA-256 digest of the
/// payload, so that differing canonical header blocks produce differing
/// *b=* values.
pub struct DigestKey;

impl PrivateKeySigner for DigestKey {
    fn create_signature(&self, payload: &[u8]) -> Result<String, SigningError> {
        Ok(encode_base64(digest_sha256(payload)))
    }

    fn algorithm(&self) -> &str {
        "rsa-sha256"
    }

    fn selector(&self) -> &str {
        "202209"
    }
}

pub fn make_params(identifier: &str) -> Params {
    Params::new(
        "example.com",
        ["From", "To", "Subject"],
        "relaxed/simple".parse().unwrap(),
        identifier,
    )
    .unwrap()
}

pub fn make_signer() -> Signer<FakeKey> {
    Signer::new(make_params(""), FakeKey)
}

pub fn make_message(subject: &str, body: &str) -> Message {
    let mut message = Message::new();
    message.add_header("From", "from@example.com").unwrap();
    message.add_header("To", "to@example.com").unwrap();
    message.add_header("Subject", subject).unwrap();
    message.set_body(body);
    message
}
