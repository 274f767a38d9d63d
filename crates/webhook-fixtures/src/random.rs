//! Small random value helpers shared by the payload builders.

use fake::Fake;
use fake::faker::internet::raw::{DomainSuffix, IPv4};
use fake::faker::lorem::raw::Word;
use fake::locales::EN;
use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

/// Length of the random part of provider object identifiers.
pub(crate) const ID_SUFFIX_LEN: usize = 24;

/// Suffix length for customer, plan, product, item and price identifiers.
pub(crate) const SHORT_ID_SUFFIX_LEN: usize = 14;

pub(crate) fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Provider-style identifier such as `pi_3NqK...`.
pub(crate) fn prefixed_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    format!("{prefix}{}", alphanumeric(rng, ID_SUFFIX_LEN))
}

/// Provider-style identifier with the shorter suffix, such as `cus_N2x...`.
pub(crate) fn short_prefixed_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    format!("{prefix}{}", alphanumeric(rng, SHORT_ID_SUFFIX_LEN))
}

/// 32 random bytes rendered as 64 lowercase hex digits.
pub(crate) fn hex_digest<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0_u8; 32];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

/// Version 4 UUID drawn from `rng` rather than the OS.
pub(crate) fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

pub(crate) fn domain_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let word: String = Word(EN).fake_with_rng(rng);
    let suffix: String = DomainSuffix(EN).fake_with_rng(rng);
    format!("{}.{suffix}", word.to_lowercase())
}

pub(crate) fn ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    IPv4(EN).fake_with_rng(rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn prefixed_ids_have_fixed_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = prefixed_id(&mut rng, "evt_");

        assert!(id.starts_with("evt_"));
        assert_eq!(id.len(), 4 + ID_SUFFIX_LEN);
        assert!(id.chars().skip(4).all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn short_prefixed_ids_use_the_short_suffix() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let id = short_prefixed_id(&mut rng, "price_");

        assert!(id.starts_with("price_"));
        assert_eq!(id.len(), "price_".len() + SHORT_ID_SUFFIX_LEN);
        assert!(id.chars().skip(6).all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn hex_digest_is_64_lowercase_hex_digits() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let digest = hex_digest(&mut rng);

        assert_eq!(digest.len(), 64);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn uuids_are_version_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(uuid_v4(&mut rng).get_version_num(), 4);
    }

    #[test]
    fn ipv4_parses() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let ip = ipv4(&mut rng);
        assert!(ip.parse::<std::net::Ipv4Addr>().is_ok(), "{ip}");
    }
}
