//! Canned-response providers for unit tests.

use alloy::consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom};
use alloy::primitives::{Address, Bloom, TxHash, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::mock::Asserter;

use crate::blockchain::BlockchainClient;
use crate::config::NetworkConfig;

/// A client whose single provider answers from `asserter`, in push order.
///
/// No fillers are installed, so a send is exactly one `eth_sendTransaction`.
pub fn client(asserter: &Asserter) -> BlockchainClient {
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone())
        .erased();
    let network = NetworkConfig {
        chain_id: 31337,
        ..NetworkConfig::default()
    };
    BlockchainClient::from_providers(&network, vec![provider]).unwrap()
}

/// A mined receipt for `tx_hash` in block `block_number`.
pub fn receipt(tx_hash: TxHash, success: bool, block_number: u64) -> TransactionReceipt {
    TransactionReceipt {
        inner: ReceiptEnvelope::Eip1559(ReceiptWithBloom {
            receipt: Receipt {
                status: Eip658Value::Eip658(success),
                cumulative_gas_used: 21_000,
                logs: Vec::new(),
            },
            logs_bloom: Bloom::ZERO,
        }),
        transaction_hash: tx_hash,
        transaction_index: Some(0),
        block_hash: Some(B256::repeat_byte(0xbb)),
        block_number: Some(block_number),
        gas_used: 21_000,
        effective_gas_price: 1_000_000_000,
        blob_gas_used: None,
        blob_gas_price: None,
        from: Address::repeat_byte(0xf3),
        to: Some(Address::repeat_byte(0x5f)),
        contract_address: None,
    }
}
