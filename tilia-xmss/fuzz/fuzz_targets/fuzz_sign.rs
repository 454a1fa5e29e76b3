#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tilia_xmss::{DigestAlgorithm, Error, XmssMtParams, XmssMtPrivateKey};

#[derive(Debug, Arbitrary)]
struct SignInput {
    secret_seed: [u8; 32],
    secret_prf: [u8; 32],
    public_seed: [u8; 32],
    messages: Vec<Vec<u8>>,
    reload_at: u8,
}

fuzz_target!(|input: SignInput| {
    let params = XmssMtParams::new(DigestAlgorithm::Shake128, 4, 2, 16).unwrap();
    let (mut sk, pk) = XmssMtPrivateKey::from_seeds(
        &params,
        &input.secret_seed,
        &input.secret_prf,
        &input.public_seed,
    )
    .unwrap();

    let mut expected = 0u64;
    for (i, message) in input.messages.iter().enumerate().take(20) {
        if i == usize::from(input.reload_at) {
            if let Ok(bytes) = sk.to_bytes() {
                sk = XmssMtPrivateKey::from_bytes(&params, &bytes).unwrap();
            }
        }
        match sk.sign(message) {
            Ok(sig) => {
                assert_eq!(sig.index(), expected);
                assert!(pk.verify(message, &sig));
                expected += 1;
            }
            Err(err) => {
                assert_eq!(err, Error::KeyExhausted { capacity: 16 });
                assert_eq!(expected, 16);
            }
        }
    }
});
