//! Signs with a real RSA key and verifies the produced signature the way an
//! independent verifier would.

pub mod common;

use common::make_message;
use dkimsign::{
    canonicalize::{canonicalize_body, canonicalize_headers},
    crypto::digest_sha256,
    decode_base64, HeaderName, HeaderValue, Message, Params, RsaSha256Key, Signer,
    DKIM_SIGNATURE_NAME,
};
use rsa::{pkcs8::DecodePublicKey, Pkcs1v15Sign, RsaPublicKey};
use sha2::Sha256;
use std::{collections::HashMap, fs};

fn read_signer() -> Signer<RsaSha256Key> {
    let pem = fs::read_to_string("tests/keys/rsa2048.pem").unwrap();
    let key = RsaSha256Key::from_pkcs8_pem("202209", &pem).unwrap();

    let params = Params::new(
        "example.com",
        ["From", "To", "Subject"],
        "relaxed/simple".parse().unwrap(),
        "",
    )
    .unwrap();

    Signer::new(params, key)
}

fn read_public_key() -> RsaPublicKey {
    let pem = fs::read_to_string("tests/keys/rsa2048.pub.pem").unwrap();
    RsaPublicKey::from_public_key_pem(&pem).unwrap()
}

fn parse_tags(value: &str) -> HashMap<&str, &str> {
    value
        .split("; ")
        .map(|tag| tag.split_once('=').unwrap())
        .collect()
}

fn verify(signed: &Message, public_key: &RsaPublicKey) {
    let _ = tracing_subscriber::fmt::try_init();

    let value = signed.headers().get(DKIM_SIGNATURE_NAME).unwrap().raw();
    let tags = parse_tags(value);

    assert_eq!(tags["v"], "1");
    assert_eq!(tags["a"], "rsa-sha256");
    assert_eq!(tags["c"], "relaxed/simple");
    assert_eq!(tags["d"], "example.com");
    assert_eq!(tags["s"], "202209");

    let canonicalization: dkimsign::Canonicalization = tags["c"].parse().unwrap();

    // body hash over the transmitted body
    let canonical_body = canonicalize_body(&signed.body().render(), canonicalization.body);
    let body_hash = digest_sha256(canonical_body);
    assert_eq!(decode_base64(tags["bh"]).unwrap(), *body_hash);

    // reconstruct the signed header block with an empty b= tag
    let skeleton_end = value.rfind("b=").unwrap() + 2;
    let skeleton = &value[..skeleton_end];

    let mut headers = signed.headers().clone();
    headers.remove_all(DKIM_SIGNATURE_NAME);
    headers.push(
        HeaderName::new(DKIM_SIGNATURE_NAME).unwrap(),
        HeaderValue::new(skeleton),
    );

    let mut selected: Vec<HeaderName> = tags["h"]
        .split(':')
        .map(|name| HeaderName::new(name).unwrap())
        .collect();
    selected.push(HeaderName::new("dkim-signature").unwrap());

    let mut canonical = canonicalize_headers(canonicalization.header, &headers, &selected);
    assert!(canonical.ends_with("\r\n"));
    canonical.truncate(canonical.len() - 2);

    let digest = digest_sha256(canonical);
    let signature = decode_base64(tags["b"]).unwrap();

    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
        .unwrap();
}

#[test]
fn rsa_signature_verifies() {
    let message = make_message("Subject Subject", "Hello world!\r\nHello Again!\r\n");

    let signed = read_signer().sign_message(&message).unwrap();

    verify(&signed, &read_public_key());
}

#[test]
fn rsa_signature_verifies_with_folded_headers() {
    let mut message = Message::new();
    message.add_header("From", "from@example.com").unwrap();
    message.add_header("To", "to@example.com").unwrap();
    message
        .add_header("Subject", "a subject\r\n longer than one line")
        .unwrap();
    message.set_body("Hello world!\n");

    let signed = read_signer().sign_message(&message).unwrap();

    verify(&signed, &read_public_key());
}

#[test]
fn tampered_body_fails_verification() {
    let message = make_message("Hi", "Hello world!\r\n");

    let mut signed = read_signer().sign_message(&message).unwrap();
    signed.set_body("Hello world?\r\n");

    let value = signed.headers().get(DKIM_SIGNATURE_NAME).unwrap().raw();
    let tags = parse_tags(value);

    let canonical_body = canonicalize_body(&signed.body().render(), Default::default());
    let body_hash = digest_sha256(canonical_body);
    assert_ne!(decode_base64(tags["bh"]).unwrap(), *body_hash);
}
