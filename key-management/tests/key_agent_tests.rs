// key-management/tests/key_agent_tests.rs
//
// End-to-end: InMemoryKeyAgent + mọi chain adapter, kiểm tra bằng verifier độc lập.

use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, U256};
use alloy::rpc::types::eth::TransactionRequest;
use key_management::chains::evm::{self, EthereumSignatureResult};
use key_management::chains::mina::{
    verify, AccountUpdate, AccountUpdateBody, FeePayerBody, MinaSignatureResult, TransactionBody,
    ZkAppCommand,
};
use key_management::chains::starknet::{self, grind_key};
use key_management::crypto::{DerivationPaths, KeyDeriver, WalletMnemonic};
use key_management::error::{DerivationError, ErrorKind};
use key_management::prelude::*;
use key_management::{AgentState, GroupedCredential, KeyAgentData, Network};
use zeroize::Zeroizing;

// =============================================================================
// FIXTURES
// =============================================================================

const MINA_MNEMONIC: &str =
    "habit hope tip crystal because grunt nation idea electric witness alert like";
const STARK_MNEMONIC: &str = "range mountain blast problem vibrant void vivid doctor cluster enough melody salt layer language laptop boat major space monkey unit glimpse pause change vibrant";
const PASSPHRASE: &str = "passphrase";

const MINA_ACCOUNT_0: &str = "B62qjsV6WQwTeEWrNrRRBP6VaaLvQhwWTnFi4WP4LQjGvpfZEumXzxb";
const MINA_ACCOUNT_1: &str = "B62qnhgMG71bvPDvAn3x8dEpXB2sXKCWukj2B6hFKACCHp6uVTCt6HB";
const ETH_ACCOUNT_0: &str = "0xA98005e6ce8E62ADf8f9020fa99888E8f107e3C9";
const STARK_ETH_ADDRESS: &str = "0xa4864d977b944315389d1765ffa7e66F74ee8cd7";

/// `RUST_LOG=key_management=debug cargo test` để xem log của agent.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn agent(mnemonic: &str) -> InMemoryKeyAgent {
    init_tracing();
    InMemoryKeyAgent::from_mnemonic(
        mnemonic,
        None,
        PASSPHRASE.as_bytes(),
        KeyAgentConfig::default(),
    )
    .expect("create agent")
}

fn provider() -> StaticPassphrase {
    StaticPassphrase::new(PASSPHRASE)
}

fn mina_args(account: u32) -> DerivationArgs {
    MinaSpecificArgs::new(account, 0, NetworkType::Testnet).into()
}

fn stark_args() -> DerivationArgs {
    StarknetSpecificArgs::new("starkex", "starkdeployement", STARK_ETH_ADDRESS, 0).into()
}

async fn derive(
    agent: &mut InMemoryKeyAgent,
    payload: ChainPayload,
    args: &DerivationArgs,
    pure: bool,
) -> GroupedCredential {
    agent
        .derive_credentials(&payload, args, &provider(), pure)
        .await
        .expect("derive credential")
}

// =============================================================================
// DERIVATION
// =============================================================================

#[tokio::test]
async fn test_mina_addresses_for_first_two_accounts() {
    let mut agent = agent(MINA_MNEMONIC);

    let first = derive(&mut agent, MinaPayload.into(), &mina_args(0), true).await;
    let second = derive(&mut agent, MinaPayload.into(), &mina_args(1), true).await;

    assert_eq!(first.address(), MINA_ACCOUNT_0);
    assert_eq!(second.address(), MINA_ACCOUNT_1);
    assert_eq!(first.id(), format!("did:mina:{}", MINA_ACCOUNT_0));
    assert_eq!(first.controller(), first.id());
    assert_eq!(first.display_name(), "Mina Account");
}

#[tokio::test]
async fn test_derivation_is_deterministic_across_agents() {
    let mut original = agent(MINA_MNEMONIC);
    let a = derive(&mut original, MinaPayload.into(), &mina_args(0), true).await;
    let b = derive(&mut original, MinaPayload.into(), &mina_args(0), true).await;
    assert_eq!(a, b);

    // agent mới, cùng encrypted seed
    let data = original.serializable_data().unwrap();
    let mut restored = InMemoryKeyAgent::from_serializable_data(data).unwrap();
    let c = derive(&mut restored, MinaPayload.into(), &mina_args(0), true).await;
    assert_eq!(a, c);
}

#[tokio::test]
async fn test_ethereum_address() {
    let mut agent = agent(MINA_MNEMONIC);
    let args: DerivationArgs = EthereumSpecificArgs::new(0, 0).into();
    let credential = derive(&mut agent, EthereumPayload::default().into(), &args, true).await;

    assert_eq!(credential.address(), ETH_ACCOUNT_0);
    assert_eq!(credential.id(), format!("did:ethr:{}", ETH_ACCOUNT_0));
    assert_eq!(credential.chain(), Network::Ethereum);
}

#[test]
fn test_stark_key_grinding() {
    let seed = WalletMnemonic::from_phrase(STARK_MNEMONIC)
        .unwrap()
        .to_seed(None)
        .unwrap();
    let eth = evm::EvmAddress::parse(STARK_ETH_ADDRESS).unwrap();
    let path = DerivationPaths::starknet_account("starkex", "starkdeployement", &eth, 0);
    assert_eq!(path, "m/2645'/579218131'/891216374'/1961790679'/2135936222'/0");

    let child = KeyDeriver::derive(&*seed, &path).unwrap();
    let stark = grind_key(&child.private_key).unwrap();
    assert_eq!(
        format!("{:x}", *stark),
        "6cf0a8bf113352eb863157a45c5e5567abb34f8d32cddafd2c22aa803f4892c"
    );
}

#[tokio::test]
async fn test_starknet_missing_argument() {
    let mut agent = agent(STARK_MNEMONIC);
    let mut args = StarknetSpecificArgs::new("starkex", "starkdeployement", STARK_ETH_ADDRESS, 0);
    args.application = None;

    let err = agent
        .derive_credentials(&StarknetPayload.into(), &args.into(), &provider(), false)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WalletError::Derivation(DerivationError::MissingArgument("application"))
    );
    assert_eq!(err.kind(), ErrorKind::Derivation);
    assert!(agent.known_credentials().is_empty());
}

#[tokio::test]
async fn test_starknet_account_index_must_be_zero() {
    let mut agent = agent(STARK_MNEMONIC);
    derive(&mut agent, StarknetPayload.into(), &stark_args(), false).await;

    let mut args = StarknetSpecificArgs::new("starkex", "starkdeployement", STARK_ETH_ADDRESS, 0);
    args.account_index = 1;
    let err = agent
        .derive_credentials(&StarknetPayload.into(), &args.into(), &provider(), false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Derivation(DerivationError::InvalidArgument { name: "accountIndex", .. })
    ));
    assert_eq!(agent.known_credentials().len(), 1);
    assert_eq!(agent.known_credentials()[0].account_index(), 0);
}

// =============================================================================
// LEDGER
// =============================================================================

#[tokio::test]
async fn test_pure_derivation_leaves_ledger_untouched() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), true).await;

    assert!(agent.known_credentials().is_empty());
    assert_eq!(agent.state(), AgentState::Initialized);
    assert!(agent.serializable_data().unwrap().known_credentials().is_empty());
}

#[tokio::test]
async fn test_stored_derivation_is_deduplicated() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;

    assert_eq!(agent.known_credentials().len(), 1);
    assert_eq!(agent.state(), AgentState::Populated);
}

#[tokio::test]
async fn test_multiple_accounts_are_stored_in_order() {
    let mut agent = agent(MINA_MNEMONIC);
    for account in 0..2 {
        derive(&mut agent, MinaPayload.into(), &mina_args(account), false).await;
    }

    let known = agent.known_credentials();
    assert_eq!(known.len(), 2);
    assert_eq!(known[0].address(), MINA_ACCOUNT_0);
    assert_eq!(known[1].address(), MINA_ACCOUNT_1);
    assert_eq!(known[1].account_index(), 1);
    assert_eq!(
        agent.credentials().find_by_address(MINA_ACCOUNT_1).unwrap().account_index(),
        1
    );
}

#[tokio::test]
async fn test_same_indices_on_two_chains_are_distinct() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;
    derive(
        &mut agent,
        EthereumPayload::default().into(),
        &EthereumSpecificArgs::new(0, 0).into(),
        false,
    )
    .await;
    assert_eq!(agent.known_credentials().len(), 2);
}

// =============================================================================
// FAILURE ATOMICITY
// =============================================================================

#[tokio::test]
async fn test_wrong_passphrase_changes_nothing() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;
    let before = agent.serializable_data().unwrap();

    let wrong = StaticPassphrase::new("not the passphrase");
    let err = agent
        .derive_credentials(&MinaPayload.into(), &mina_args(1), &wrong, false)
        .await
        .unwrap_err();

    assert_eq!(err, WalletError::Authentication);
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(agent.serializable_data().unwrap(), before);
    assert_eq!(agent.state(), AgentState::Populated);
}

#[tokio::test]
async fn test_failing_provider_is_wrapped() {
    let mut agent = agent(MINA_MNEMONIC);
    let failing = || async {
        Err::<Zeroizing<Vec<u8>>, ProviderError>("biometric prompt dismissed".into())
    };

    let err = agent
        .derive_credentials(&MinaPayload.into(), &mina_args(0), &failing, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PassphraseProvider);
    assert!(!err.to_string().contains("biometric"));
    assert!(agent.known_credentials().is_empty());
}

#[tokio::test]
async fn test_closure_provider_works() {
    let mut agent = agent(MINA_MNEMONIC);
    let closure = || async { Ok::<_, ProviderError>(Zeroizing::new(PASSPHRASE.as_bytes().to_vec())) };

    let credential = agent
        .derive_credentials(&MinaPayload.into(), &mina_args(0), &closure, true)
        .await
        .unwrap();
    assert_eq!(credential.address(), MINA_ACCOUNT_0);
}

// =============================================================================
// SIGNING - MINA
// =============================================================================

async fn mina_sign(signable: MinaSignable) -> MinaSignatureResult {
    let mut agent = agent(MINA_MNEMONIC);
    let args = mina_args(0);
    let credential = derive(&mut agent, MinaPayload.into(), &args, false).await;

    let result = agent
        .sign(&credential, &signable.into(), &args, &provider())
        .await
        .expect("sign");
    match result {
        ChainSignatureResult::Mina(result) => result,
        other => panic!("expected a Mina result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mina_payment_verifies() {
    let body = TransactionBody::payment(MINA_ACCOUNT_0, MINA_ACCOUNT_1, 2_000_000_000, 10_000_000, 3)
        .with_memo("rent");
    let MinaSignatureResult::Transaction(signed) = mina_sign(MinaSignable::Transaction(body)).await
    else {
        panic!("expected a transaction signature");
    };

    assert_eq!(signed.public_key, MINA_ACCOUNT_0);
    assert!(verify::verify_transaction(&signed, NetworkType::Testnet).unwrap());
    assert!(!verify::verify_transaction(&signed, NetworkType::Mainnet).unwrap());
}

#[tokio::test]
async fn test_mina_delegation_verifies() {
    let body = TransactionBody::delegation(MINA_ACCOUNT_0, MINA_ACCOUNT_1, 10_000_000, 4);
    let MinaSignatureResult::Transaction(signed) = mina_sign(MinaSignable::Transaction(body)).await
    else {
        panic!("expected a transaction signature");
    };
    assert!(verify::verify_transaction(&signed, NetworkType::Testnet).unwrap());
}

#[tokio::test]
async fn test_mina_message_verifies() {
    let MinaSignatureResult::Message(signed) =
        mina_sign(MinaSignable::Message("Hello, Bob!".to_string())).await
    else {
        panic!("expected a message signature");
    };
    assert!(verify::verify_message(&signed, NetworkType::Testnet).unwrap());
}

#[tokio::test]
async fn test_mina_fields_verify() {
    let fields = vec!["10".to_string(), "20".to_string(), "30".to_string()];
    let MinaSignatureResult::Fields(signed) = mina_sign(MinaSignable::Fields(fields)).await else {
        panic!("expected a fields signature");
    };
    assert!(verify::verify_fields(&signed, NetworkType::Testnet).unwrap());
}

#[tokio::test]
async fn test_mina_zkapp_command_from_json_verifies() {
    let command: ZkAppCommand = serde_json::from_value(serde_json::json!({
        "feePayer": {
            "body": {
                "publicKey": MINA_ACCOUNT_0,
                "fee": "100000000",
                "validUntil": "100000",
                "nonce": "1"
            },
            "authorization": ""
        },
        "accountUpdates": [],
        "memo": "E4YM2vTHhWEg66xpj52JErHUBU4pZ1yageL4TVDDpTTSsv8mK6YaH"
    }))
    .unwrap();

    let MinaSignatureResult::ZkAppCommand(signed) =
        mina_sign(MinaSignable::ZkAppCommand(command.clone())).await
    else {
        panic!("expected a zkApp signature");
    };
    assert!(verify::verify_zkapp_command(&signed, NetworkType::Testnet).unwrap());
    assert!(signed.command.fee_payer.authorization.starts_with('7'));
    assert_eq!(signed.command.account_updates, command.account_updates);

    // JSON đã ký vẫn đọc lại được như một zkappCommand
    let json = serde_json::to_value(&signed.command).unwrap();
    assert_eq!(json["feePayer"]["body"]["fee"], "100000000");
    let reparsed: ZkAppCommand = serde_json::from_value(json).unwrap();
    assert_eq!(reparsed, signed.command);
}

#[tokio::test]
async fn test_mina_zkapp_command_with_nested_updates_verifies() {
    let mut own = AccountUpdateBody::new(MINA_ACCOUNT_0);
    own.authorization_kind = key_management::chains::mina::zkapp::AuthorizationKind::signature();
    own.use_full_commitment = true;
    let mut child = AccountUpdateBody::new(MINA_ACCOUNT_1);
    child.call_depth = 1;

    let command = ZkAppCommand::new(
        FeePayerBody::new(MINA_ACCOUNT_0, 100_000_000, 0),
        vec![AccountUpdate::new(own), AccountUpdate::new(child)],
        "zkapp call",
    );
    let MinaSignatureResult::ZkAppCommand(signed) =
        mina_sign(MinaSignable::ZkAppCommand(command)).await
    else {
        panic!("expected a zkApp signature");
    };
    assert!(signed.command.account_updates[0].authorization.signature.is_some());
    assert!(signed.command.account_updates[1].authorization.signature.is_none());
    assert!(verify::verify_zkapp_command(&signed, NetworkType::Testnet).unwrap());
}

#[tokio::test]
async fn test_mina_signable_on_ethereum_credential_is_unsupported() {
    let mut agent = agent(MINA_MNEMONIC);
    let args: DerivationArgs = EthereumSpecificArgs::new(0, 0).into();
    let credential = derive(&mut agent, EthereumPayload::default().into(), &args, false).await;

    let signable: ChainSignable = MinaSignable::Message("hi".to_string()).into();
    let err = agent
        .sign(&credential, &signable, &args, &provider())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPayload);
}

#[tokio::test]
async fn test_sign_with_wrong_passphrase() {
    let mut agent = agent(MINA_MNEMONIC);
    let args = mina_args(0);
    let credential = derive(&mut agent, MinaPayload.into(), &args, false).await;

    let signable: ChainSignable = MinaSignable::Message("hi".to_string()).into();
    let err = agent
        .sign(&credential, &signable, &args, &StaticPassphrase::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::Authentication);
}

// =============================================================================
// SIGNING - ETHEREUM
// =============================================================================

#[tokio::test]
async fn test_ethereum_message_and_transaction() {
    let mut agent = agent(MINA_MNEMONIC);
    let args: DerivationArgs = EthereumSpecificArgs::new(0, 0).into();
    let credential = derive(&mut agent, EthereumPayload::default().into(), &args, false).await;

    let message = b"Sign in to example.org".to_vec();
    let result = agent
        .sign(&credential, &EthereumSignable::Message(message.clone()).into(), &args, &provider())
        .await
        .unwrap();
    let ChainSignatureResult::Ethereum(EthereumSignatureResult::Message { signer, signature }) = result
    else {
        panic!("expected an Ethereum message signature");
    };
    assert_eq!(signer.to_checksum(None), ETH_ACCOUNT_0);
    assert!(evm::verify_message(ETH_ACCOUNT_0, &message, &signature));

    let tx = TransactionRequest::default()
        .with_to(STARK_ETH_ADDRESS.parse().unwrap())
        .with_value(U256::from(1_000u64))
        .with_nonce(0)
        .with_gas_limit(21_000)
        .with_max_fee_per_gas(30_000_000_000)
        .with_max_priority_fee_per_gas(1_000_000_000);
    let result = agent
        .sign(&credential, &EthereumSignable::Transaction(tx).into(), &args, &provider())
        .await
        .unwrap();
    let ChainSignatureResult::Ethereum(EthereumSignatureResult::Transaction { signer, raw }) = result
    else {
        panic!("expected a signed transaction");
    };
    assert_eq!(evm::recover_transaction_signer(&raw).unwrap(), signer);
}

#[tokio::test]
async fn test_ethereum_hash_signature_verifies() {
    let mut agent = agent(MINA_MNEMONIC);
    let args: DerivationArgs = EthereumSpecificArgs::new(0, 0).into();
    let credential = derive(&mut agent, EthereumPayload::default().into(), &args, false).await;

    let hash = keccak256(b"raw prehashed payload");
    let result = agent
        .sign(&credential, &EthereumSignable::Hash(hash).into(), &args, &provider())
        .await
        .unwrap();
    let ChainSignatureResult::Ethereum(EthereumSignatureResult::Hash { signer, signature }) = result
    else {
        panic!("expected an Ethereum hash signature");
    };
    assert_eq!(signer.to_checksum(None), ETH_ACCOUNT_0);
    assert!(evm::verify_hash(ETH_ACCOUNT_0, &hash, &signature));

    // hash thô, không có prefix EIP-191
    assert!(!evm::verify_message(ETH_ACCOUNT_0, hash.as_slice(), &signature));
    let other = keccak256(b"another payload");
    assert!(!evm::verify_hash(ETH_ACCOUNT_0, &other, &signature));
}

// =============================================================================
// SIGNING - STARKNET
// =============================================================================

#[tokio::test]
async fn test_starknet_sign_and_verify() {
    let mut agent = agent(STARK_MNEMONIC);
    let args = stark_args();
    let credential = derive(&mut agent, StarknetPayload.into(), &args, false).await;
    assert!(credential.address().starts_with("0x"));
    assert_eq!(credential.id(), format!("did:starknet:{}", credential.address()));

    let signable: ChainSignable =
        StarknetSignable::MessageHash("0x1234abcd".to_string()).into();
    let result = agent.sign(&credential, &signable, &args, &provider()).await.unwrap();
    let ChainSignatureResult::Starknet(signature) = result else {
        panic!("expected a Starknet signature");
    };
    assert_eq!(signature.public_key, credential.address());
    assert!(starknet::verify(&signature).unwrap());
}

// =============================================================================
// SNAPSHOT + LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_snapshot_json_roundtrip() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;
    derive(&mut agent, MinaPayload.into(), &mina_args(1), false).await;

    let json = agent.serializable_data().unwrap().to_json().unwrap();
    assert!(!json.contains(MINA_MNEMONIC));

    let data = KeyAgentData::from_json(&json).unwrap();
    let mut restored = InMemoryKeyAgent::from_serializable_data(data).unwrap();
    assert_eq!(restored.state(), AgentState::Populated);
    assert_eq!(restored.known_credentials(), agent.known_credentials());

    // dedup vẫn hoạt động sau khi restore
    derive(&mut restored, MinaPayload.into(), &mina_args(1), false).await;
    assert_eq!(restored.known_credentials().len(), 2);
}

#[tokio::test]
async fn test_export_root_private_key() {
    let agent = agent(MINA_MNEMONIC);
    let exported = agent.export_root_private_key(&provider()).await.unwrap();

    let seed = WalletMnemonic::from_phrase(MINA_MNEMONIC)
        .unwrap()
        .to_seed(None)
        .unwrap();
    let master = bip32::XPrv::new(*seed).unwrap();
    assert_eq!(exported.as_slice(), master.to_bytes().as_slice());

    let err = agent
        .export_root_private_key(&StaticPassphrase::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::Authentication);
}

#[tokio::test]
async fn test_destroyed_agent_refuses_work() {
    let mut agent = agent(MINA_MNEMONIC);
    derive(&mut agent, MinaPayload.into(), &mina_args(0), false).await;

    agent.destroy();
    assert_eq!(agent.state(), AgentState::Destroyed);
    assert!(agent.known_credentials().is_empty());

    let err = agent
        .derive_credentials(&MinaPayload.into(), &mina_args(0), &provider(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidState { .. }));
    assert!(agent.serializable_data().is_err());
}
