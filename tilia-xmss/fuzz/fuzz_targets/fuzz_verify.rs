#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tilia_xmss::{DigestAlgorithm, Error, StatefulSigner, Xmss, XmssParams, XmssSignature};

/// A deterministic RNG seeded from fuzzer input.
struct FuzzRng {
    seed: [u8; 32],
    counter: u64,
}

impl FuzzRng {
    fn new(seed: &[u8]) -> Self {
        let mut s = [0u8; 32];
        let len = seed.len().min(32);
        s[..len].copy_from_slice(&seed[..len]);
        Self { seed: s, counter: 0 }
    }

    fn next_bytes(&mut self, dest: &mut [u8]) {
        use sha3::{Shake256, digest::{ExtendableOutput, Update, XofReader}};

        let mut hasher = Shake256::default();
        hasher.update(&self.seed);
        hasher.update(&self.counter.to_le_bytes());
        self.counter += 1;

        let mut reader = hasher.finalize_xof();
        reader.read(dest);
    }
}

impl rand_core::RngCore for FuzzRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.next_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.next_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.next_bytes(dest);
    }
}

impl rand_core::CryptoRng for FuzzRng {}

#[derive(Debug, Arbitrary)]
struct VerifyInput {
    key_seed: Vec<u8>,
    message: Vec<u8>,
    corruption_index: usize,
    corruption_value: u8,
    raw_signature: Vec<u8>,
}

fuzz_target!(|input: VerifyInput| {
    if input.key_seed.is_empty() {
        return;
    }
    let params = XmssParams::new(DigestAlgorithm::Sha256, 2, 16).unwrap();

    let mut rng = FuzzRng::new(&input.key_seed);
    let (mut sk, pk) = Xmss::keygen(&params, &mut rng).unwrap();
    let sig = Xmss::sign(&mut sk, &input.message).unwrap();
    assert!(Xmss::verify(&pk, &input.message, &sig), "fresh signature should verify");

    // Any change is rejected, at parsing if the index leaves the tree.
    let mut bytes = sig.to_bytes();
    let idx = input.corruption_index % bytes.len();
    bytes[idx] ^= input.corruption_value | 1;
    match XmssSignature::from_bytes(&params, &bytes) {
        Ok(corrupted) => {
            assert!(!Xmss::verify(&pk, &input.message, &corrupted), "corrupted signature verified");
        }
        Err(Error::IndexOutOfRange { .. }) => assert!(idx < 4),
        Err(e) => panic!("unexpected parse error: {e}"),
    }

    if !input.message.is_empty() {
        let mut corrupted_msg = input.message.clone();
        let idx = input.corruption_index % corrupted_msg.len();
        corrupted_msg[idx] ^= input.corruption_value | 1;
        assert!(!Xmss::verify(&pk, &corrupted_msg, &sig), "corrupted message verified");
    }

    // Arbitrary bytes either fail to parse or are rejected without panicking.
    if let Ok(forged) = XmssSignature::from_bytes(&params, &input.raw_signature) {
        if forged != sig {
            let _ = Xmss::verify(&pk, &input.message, &forged);
        }
    }
});
