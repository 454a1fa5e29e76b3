//! Known-answer tests for the public building blocks.
//!
//! Byte layouts, registered identifiers and sizes are fixed by RFC 8391;
//! keyed-hash outputs are pinned so that any change in domain separation or
//! padding shows up here.

use tilia_xmss::oid::{lookup_xmss, lookup_xmssmt};
use tilia_xmss::utils::{base_w, to_byte};
use tilia_xmss::{
    Address, DigestAlgorithm, Error, ErrorKind, KeyedHash, Subtree, Wots, WotsParams,
    XmssMtParams, XmssMtPrivateKey, XmssParams, XmssPrivateKey,
};

#[test]
fn prf_zero_key_sha256() {
    let hash = KeyedHash::new(DigestAlgorithm::Sha256);
    let out = hash.prf(&[0u8; 32], &[0u8; 32]).unwrap();
    assert_eq!(
        hex::encode(&*out),
        "6945a6f13aa83e598cb8d0abebb5cddbd87e576226517f9001c1d36bb320bf80"
    );
}

#[test]
fn address_encoding() {
    let adrs = Address::ots(1, 2, 3, 4, 5).with_key_and_mask(1);
    assert_eq!(
        hex::encode(adrs.to_bytes()),
        concat!(
            "00000001", "0000000000000002", "00000000",
            "00000003", "00000004", "00000005", "00000001",
        )
    );

    let adrs = Subtree::new(2, 7).hash_tree(3, 9);
    assert_eq!(
        hex::encode(adrs.to_bytes()),
        concat!(
            "00000002", "0000000000000007", "00000002",
            "00000000", "00000003", "00000009", "00000000",
        )
    );
}

#[test]
fn to_byte_and_base_w() {
    let mut out = [0u8; 32];
    to_byte(0x0102, &mut out);
    assert_eq!(&out[30..], &[1, 2]);
    assert!(out[..30].iter().all(|&b| b == 0));

    assert_eq!(base_w(&[0x12, 0x34], 4, 4), vec![1, 2, 3, 4]);
    assert_eq!(base_w(&[0x12, 0x34], 2, 8), vec![0, 1, 0, 2, 0, 3, 1, 0]);
}

#[test]
fn registered_identifiers() {
    let p = XmssParams::new(DigestAlgorithm::Sha256, 10, 16).unwrap();
    let oid = p.oid().unwrap();
    assert_eq!((oid.value, oid.name), (0x01, "XMSS-SHA2_10_256"));

    let p = XmssParams::new(DigestAlgorithm::Shake256, 20, 16).unwrap();
    assert_eq!(p.oid().unwrap().value, 0x0c);

    let p = XmssMtParams::new(DigestAlgorithm::Shake128, 60, 12, 16).unwrap();
    assert_eq!(p.oid().unwrap().name, "XMSSMT-SHAKE_60/12_256");

    assert!(lookup_xmss(DigestAlgorithm::Sha256, 4, 133, 10).is_none());
    assert!(lookup_xmssmt(DigestAlgorithm::Sha512, 16, 131, 20, 2).is_some());
    assert!(XmssParams::new(DigestAlgorithm::Sha256, 4, 16).unwrap().oid().is_none());

    let err = XmssParams::from_oid(0x0d).unwrap_err();
    assert_eq!(err, Error::UnknownOid { oid: 0x0d });
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn registered_sizes() {
    let sizes = [
        (0x01, 2500),
        (0x02, 2692),
        (0x03, 2820),
        (0x04, 9092),
        (0x07, 2500),
    ];
    for (oid, signature_bytes) in sizes {
        let p = XmssParams::from_oid(oid).unwrap();
        assert_eq!(p.signature_bytes(), signature_bytes, "oid {oid:#x}");
        assert_eq!(p.oid().unwrap().value, oid);
    }

    let sizes = [(0x01, 4963), (0x03, 5605), (0x08, 27688)];
    for (oid, signature_bytes) in sizes {
        let p = XmssMtParams::from_oid(oid).unwrap();
        assert_eq!(p.signature_bytes(), signature_bytes, "oid {oid:#x}");
    }
}

#[test]
fn wots_chain_composes() {
    let params = WotsParams::new(32, 16).unwrap();
    let public_seed = [7u8; 32];
    let wots = Wots::new(&params, KeyedHash::new(DigestAlgorithm::Sha256), &public_seed);
    let subtree = Subtree::new(0, 1);
    let x = [3u8; 32];

    let full = wots.chain(&x, 0, 15, subtree, 2, 5).unwrap();
    let head = wots.chain(&x, 0, 6, subtree, 2, 5).unwrap();
    let tail = wots.chain(&head, 6, 9, subtree, 2, 5).unwrap();
    assert_eq!(full, tail);
    assert_eq!(wots.chain(&x, 4, 0, subtree, 2, 5).unwrap(), x.to_vec());
    assert_eq!(
        wots.chain(&x, 10, 6, subtree, 2, 5),
        Err(Error::ChainOutOfRange {
            start: 10,
            steps: 6,
            w: 16
        })
    );
}

#[test]
fn deterministic_keys_from_seeds() {
    let p = XmssParams::new(DigestAlgorithm::Shake128, 4, 16).unwrap();
    let (_, a) = XmssPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[3; 32]).unwrap();
    let (_, b) = XmssPrivateKey::from_seeds(&p, &[1; 32], &[9; 32], &[3; 32]).unwrap();
    // The PRF key only randomizes messages; the tree depends on the other seeds.
    assert_eq!(a, b);

    let (_, c) = XmssPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[4; 32]).unwrap();
    assert_ne!(a.root(), c.root());

    let mt = XmssMtParams::new(DigestAlgorithm::Shake128, 4, 1, 16).unwrap();
    let (_, d) = XmssMtPrivateKey::from_seeds(&mt, &[1; 32], &[2; 32], &[3; 32]).unwrap();
    assert_eq!(d.root(), a.root());
}
