#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tilia_xmss::{
    Address, DigestAlgorithm, XmssMtParams, XmssMtPrivateKey, XmssMtPublicKey, XmssMtSignature,
    XmssParams, XmssPrivateKey, XmssPublicKey, XmssSignature,
};

#[derive(Debug, Arbitrary)]
enum ParseInput {
    Address(Vec<u8>),
    XmssPublicKey(Vec<u8>),
    XmssSignature(Vec<u8>),
    XmssPrivateKey(Vec<u8>),
    XmssMtPublicKey(Vec<u8>),
    XmssMtSignature(Vec<u8>),
    XmssMtPrivateKey(Vec<u8>),
    Oid(u32, bool),
}

fuzz_target!(|input: ParseInput| {
    // Small trees keep private key parsing, which rebuilds trees, fast.
    let xmss = XmssParams::new(DigestAlgorithm::Shake128, 2, 16).unwrap();
    let xmssmt = XmssMtParams::new(DigestAlgorithm::Shake128, 4, 2, 16).unwrap();

    match input {
        ParseInput::Address(bytes) => {
            if let Ok(adrs) = Address::from_bytes(&bytes) {
                assert_eq!(&adrs.to_bytes()[..], &bytes[..]);
            }
        }
        ParseInput::XmssPublicKey(bytes) => {
            if let Ok(pk) = XmssPublicKey::from_bytes(&xmss, &bytes) {
                assert_eq!(pk.to_bytes(), bytes);
            }
        }
        ParseInput::XmssSignature(bytes) => {
            if let Ok(sig) = XmssSignature::from_bytes(&xmss, &bytes) {
                assert_eq!(sig.to_bytes(), bytes);
            }
        }
        ParseInput::XmssPrivateKey(bytes) => {
            if let Ok(sk) = XmssPrivateKey::from_bytes(&xmss, &bytes) {
                assert_eq!(&*sk.to_bytes().unwrap(), &bytes[..]);
            }
        }
        ParseInput::XmssMtPublicKey(bytes) => {
            if let Ok(pk) = XmssMtPublicKey::from_bytes(&xmssmt, &bytes) {
                assert_eq!(pk.to_bytes(), bytes);
            }
        }
        ParseInput::XmssMtSignature(bytes) => {
            if let Ok(sig) = XmssMtSignature::from_bytes(&xmssmt, &bytes) {
                assert_eq!(sig.to_bytes(), bytes);
            }
        }
        ParseInput::XmssMtPrivateKey(bytes) => {
            if let Ok(sk) = XmssMtPrivateKey::from_bytes(&xmssmt, &bytes) {
                assert_eq!(&*sk.to_bytes().unwrap(), &bytes[..]);
            }
        }
        ParseInput::Oid(value, multi_tree) => {
            if multi_tree {
                if let Ok(params) = XmssMtParams::from_oid(value) {
                    assert_eq!(params.oid().map(|oid| oid.value), Some(value));
                }
            } else if let Ok(params) = XmssParams::from_oid(value) {
                assert_eq!(params.oid().map(|oid| oid.value), Some(value));
            }
        }
    }
});
