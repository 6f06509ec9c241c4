//! End-to-end integration tests for the MARK protocol.
//!
//! These tests walk ledger data through the whole public surface: crypto
//! initialization, key import, script addresses, transaction signing, block
//! production and linking, and finally the network envelope a peer would put
//! on the wire. Each test decodes what it encoded from raw bytes only, the
//! way the receiving peer would.

use mark_protocol::block::{Block, BlockHeader};
use mark_protocol::chain::{AddressInfo, ChainProperties};
use mark_protocol::codec::{ByteBuffer, CodecError};
use mark_protocol::crypto::{self, generate_keypair, Digest, KeyPair, PublicKey, ScriptHash};
use mark_protocol::net::{Body, FilteredBlock, Msg, NetworkError, Request, Response};
use mark_protocol::script::{Operand, ScriptBuilder};
use mark_protocol::tx::{MintTx, OwnerTx, RewardTx, TransferTx, Tx, TxType, TxVariant, TxVerifyError};
use mark_protocol::Asset;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const PRIV_WIF: &str = "3GAD3otqozDorfu1iDpMQJ1gzWp8PRFEjVHZivZdedKW3i3KtM";
const PUB_WIF: &str = "GOD52QZDBUStV5CudxvKf6bPsQeN7oeKTkEm2nAU1vAUqNVexGTb8";

fn get_asset(s: &str) -> Asset {
    s.parse().expect("valid asset")
}

fn owner_tx(minter: &KeyPair, wallet: &KeyPair) -> TxVariant {
    let mut tx: TxVariant = OwnerTx {
        base: Tx::new(1_700_000_000_000u64, get_asset("0.00000 MARK")),
        minter: minter.public_key,
        wallet: wallet.public_key.to_script().hash(),
        script: wallet.public_key.to_script(),
    }
    .into();
    tx.sign(wallet, true).expect("sign owner tx");
    tx
}

fn signed_transfer(from: &KeyPair, to: &ScriptHash, amount: &str) -> TxVariant {
    let script = from.public_key.to_script();
    let mut tx: TxVariant = TransferTx {
        base: Tx::new(1_700_000_000_500u64, get_asset("0.01000 MARK")),
        from: script.hash(),
        to: *to,
        script,
        amount: get_asset(amount),
        memo: b"invoice #42".to_vec(),
    }
    .into();
    tx.sign(from, true).expect("sign transfer");
    tx
}

/// Serializes a message and decodes it from a fresh buffer.
fn over_the_wire(msg: &Msg) -> Msg {
    let bytes = msg.to_bytes().expect("serialize msg");
    Msg::from_bytes(bytes).expect("deserialize msg")
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[test]
fn known_private_wif_yields_known_public_wif() {
    let kp = KeyPair::from_wif(PRIV_WIF).unwrap();
    assert_eq!(kp.public_key.to_wif(), PUB_WIF);
    assert_eq!(kp.private_key.to_wif(), PRIV_WIF);

    let pk: PublicKey = PUB_WIF.parse().unwrap();
    assert_eq!(pk, kp.public_key);
}

#[tokio::test]
async fn generated_identities_round_trip_through_wif() {
    let ready = crypto::init().await.expect("crypto init");
    let kp = generate_keypair(&ready);

    let imported = KeyPair::from_wif(&kp.private_key.to_wif()).unwrap();
    assert_eq!(imported, kp);

    let addr = kp.public_key.to_script().hash();
    let parsed: ScriptHash = addr.to_wif().parse().unwrap();
    assert_eq!(parsed, addr);
}

#[test]
fn multisig_address() {
    let a = KeyPair::from_seed(&[1u8; 32]).unwrap();
    let b = KeyPair::from_seed(&[2u8; 32]).unwrap();

    let mut builder = ScriptBuilder::new();
    builder.push_pubkey(&a.public_key).unwrap();
    builder.push_pubkey(&b.public_key).unwrap();
    builder.push_check_multisig(2, 2, true).unwrap();
    let script = builder.build().unwrap();

    assert_eq!(script.len(), 2 * 33 + 3);
    assert_eq!(script.as_bytes()[66], Operand::OpCheckMultiSigFastFail as u8);
    assert_ne!(script.hash(), a.public_key.to_script().hash());
}

// ---------------------------------------------------------------------------
// Transactions and Blocks
// ---------------------------------------------------------------------------

#[test]
fn chain_of_blocks() {
    let minter = KeyPair::from_seed(&[10u8; 32]).unwrap();
    let wallet = KeyPair::from_seed(&[11u8; 32]).unwrap();
    let alice = KeyPair::from_seed(&[12u8; 32]).unwrap();
    let bob_addr = KeyPair::from_seed(&[13u8; 32])
        .unwrap()
        .public_key
        .to_script()
        .hash();

    let mut genesis = Block::new(
        Digest::default(),
        0,
        1_700_000_000_000u64,
        vec![owner_tx(&minter, &wallet)],
    )
    .unwrap();
    genesis.sign(&minter);

    let mint: TxVariant = MintTx {
        base: Tx::new(1_700_000_000_100u64, get_asset("0.00000 MARK")),
        to: alice.public_key.to_script().hash(),
        amount: get_asset("1000.00000 MARK"),
        attachment: Vec::new(),
        attachment_name: String::new(),
        script: wallet.public_key.to_script(),
    }
    .into();
    let mut block1 = genesis
        .new_child(vec![mint], 1_700_000_001_000u64)
        .unwrap();
    block1.sign(&minter);

    let reward: TxVariant = RewardTx {
        base: Tx::new(1_700_000_002_000u64, get_asset("0.00000 MARK")),
        to: wallet.public_key.to_script().hash(),
        rewards: get_asset("0.01000 MARK"),
    }
    .into();
    let transfer = signed_transfer(&alice, &bob_addr, "250.00000 MARK");
    let mut block2 = block1
        .new_child(vec![reward, transfer], 1_700_000_002_000u64)
        .unwrap();
    block2.sign(&minter);

    let chain = [genesis, block1, block2];
    for pair in chain.windows(2) {
        assert!(pair[1].verify_hash(&pair[0]));
        assert_eq!(pair[1].height(), pair[0].height() + 1);
    }

    for block in &chain {
        let bytes = block.to_bytes().unwrap();
        let decoded = Block::deserialize(&mut ByteBuffer::from(bytes)).unwrap();
        assert_eq!(&decoded, block);
        assert!(decoded.verify_signer());
        assert!(decoded.verify_tx_merkle_root().unwrap());
        for tx in decoded.transactions() {
            if tx.tx_type() != TxType::Reward && tx.tx_type() != TxType::Mint {
                assert!(tx.verify_signatures().unwrap());
            }
        }
    }
}

#[test]
fn unsigned_block_is_not_transmittable() {
    let block = Block::new(Digest::default(), 0, 0u64, Vec::new()).unwrap();
    let msg = Msg::new(1, Body::Response(Response::GetFullBlock(block)));
    assert_eq!(msg.to_bytes(), Err(CodecError::UnsignedBlock));
}

// ---------------------------------------------------------------------------
// Network Envelope
// ---------------------------------------------------------------------------

#[test]
fn broadcast_and_validation_error() {
    let alice = KeyPair::from_seed(&[20u8; 32]).unwrap();
    let to = ScriptHash(crypto::double_sha256(b"merchant"));
    let tx = signed_transfer(&alice, &to, "1.50000 MARK");

    let req = Msg::new(5, Body::Request(Request::Broadcast(tx.clone())));
    let decoded = over_the_wire(&req);
    assert_eq!(decoded, req);
    match decoded.body {
        Body::Request(Request::Broadcast(received)) => {
            assert!(received.verify_signatures().unwrap());
            assert_eq!(received.calc_txid().unwrap(), tx.calc_txid().unwrap());
        }
        other => panic!("unexpected body: {other:?}"),
    }

    let res = Msg::new(
        5,
        Body::Error(NetworkError::TxValidation(TxVerifyError::InsufficientBalance)),
    );
    assert_eq!(over_the_wire(&res), res);
}

#[test]
fn block_queries() {
    let minter = KeyPair::from_seed(&[30u8; 32]).unwrap();
    let wallet = KeyPair::from_seed(&[31u8; 32]).unwrap();
    let mut block = Block::new(
        Digest::default(),
        0,
        1u64,
        vec![owner_tx(&minter, &wallet)],
    )
    .unwrap();
    let signer = block.sign(&minter);

    let filtered = Msg::new(
        9,
        Body::Response(Response::GetBlock(FilteredBlock::Header(
            block.header(),
            signer,
        ))),
    );
    let decoded = over_the_wire(&filtered);
    match &decoded.body {
        Body::Response(Response::GetBlock(FilteredBlock::Header(header, pair))) => {
            assert_eq!(header.calc_hash(), block.calc_hash());
            assert!(pair.verify(header.calc_hash().as_bytes()));
        }
        other => panic!("unexpected body: {other:?}"),
    }

    let range = [
        Msg::new(10, Body::Request(Request::GetBlockRange { min_height: 0, max_height: 0 })),
        Msg::new(10, Body::Response(Response::GetBlock(FilteredBlock::Block(block.clone())))),
        Msg::new(10, Body::Response(Response::GetBlockRange)),
    ];
    for msg in &range {
        assert_eq!(&over_the_wire(msg), msg);
    }

    let header_only = BlockHeader::deserialize(&mut ByteBuffer::from(
        block.to_bytes().unwrap(),
    ))
    .unwrap();
    assert_eq!(header_only, block.header());
}

#[test]
fn chain_queries() {
    let minter = KeyPair::from_seed(&[40u8; 32]).unwrap();
    let wallet = KeyPair::from_seed(&[41u8; 32]).unwrap();
    let addr = wallet.public_key.to_script().hash();

    let msgs = [
        Msg::new(1, Body::Request(Request::GetProperties)),
        Msg::new(
            1,
            Body::Response(Response::GetProperties(ChainProperties {
                height: 100,
                owner: owner_tx(&minter, &wallet),
                network_fee: get_asset("0.00100 MARK"),
                token_supply: get_asset("1000000.00000 MARK"),
            })),
        ),
        Msg::new(2, Body::Request(Request::GetAddressInfo(addr))),
        Msg::new(
            2,
            Body::Response(Response::GetAddressInfo(AddressInfo {
                net_fee: get_asset("0.00100 MARK"),
                addr_fee: get_asset("0.00200 MARK"),
                balance: get_asset("42.00000 MARK"),
            })),
        ),
        Msg::new(3, Body::Request(Request::SetBlockFilter(Some(vec![addr])))),
        Msg::new(3, Body::Response(Response::SetBlockFilter)),
        Msg::new(4, Body::Ping(99)),
        Msg::new(4, Body::Pong(99)),
    ];
    for msg in &msgs {
        assert_eq!(&over_the_wire(msg), msg);
    }
}

#[test]
fn garbage_is_rejected_with_named_errors() {
    let cases: [(Vec<u8>, &str); 4] = [
        (vec![0, 0, 0, 1, 0x09], "unknown msg body id: 9"),
        (vec![0, 0, 0, 1, 0x02, 0x7f], "unknown request id: 127"),
        (vec![0, 0, 0, 1, 0x03, 0x7f], "unknown response id: 127"),
        (vec![0, 0, 0, 1, 0x01, 0x7f], "unknown error kind: 127"),
    ];
    for (bytes, expected) in cases {
        let err = Msg::from_bytes(bytes).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }

    // Broadcast of a tx with an unknown version.
    let err = Msg::from_bytes(vec![0, 0, 0, 1, 0x02, 0x10, 0xff, 0xff]).unwrap_err();
    assert_eq!(err.to_string(), "unknown tx version: 65535");
}
