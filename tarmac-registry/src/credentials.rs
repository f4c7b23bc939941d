//! Credential generation and hashing. Only the pass/fail contract leaves
//! this module; plain passwords are shown once at issue time.

use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::Write;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}

/// Username from the first two letters of the first and last name plus two
/// random digits, e.g. "Ada Lovelace" -> "adlo42".
pub fn generate_username(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut parts = lower.split_whitespace();
    let first = parts.next().unwrap_or("user");
    let last = parts.last().unwrap_or(first);

    let mut prefix: String = first.chars().filter(|c| c.is_ascii_alphabetic()).take(2).collect();
    prefix.extend(last.chars().filter(|c| c.is_ascii_alphabetic()).take(2));

    let digits = rand::thread_rng().gen_range(10..100);
    format!("{}{}", prefix, digits)
}

/// Eight characters with at least one uppercase, one lowercase and one digit,
/// matching the password policy staff must satisfy on change.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<u8> = [UPPER, LOWER, DIGITS].concat();

    let mut chars = vec![
        UPPER[rng.gen_range(0..UPPER.len())],
        LOWER[rng.gen_range(0..LOWER.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
    ];
    for _ in 0..5 {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    String::from_utf8(chars).unwrap_or_else(|_| unreachable!("ascii alphabet"))
}
