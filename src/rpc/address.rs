//! scriptPubKey to address conversion for node-sourced outputs
//!
//! Bitcoin Core reports no address for pay-to-pubkey outputs, while block
//! explorers show the P2PKH address of the key. Both are mapped here so that
//! node and web API records use the same canonical form.

use bitcoin::{Address, Network, ScriptBuf};

/// Canonical mainnet address for a serialised scriptPubKey, if it has one
pub fn address_from_script(script_bytes: &[u8]) -> Option<String> {
    let script = ScriptBuf::from_bytes(script_bytes.to_vec());

    if let Ok(address) = Address::from_script(&script, Network::Bitcoin) {
        return Some(address.to_string());
    }

    script
        .p2pk_public_key()
        .map(|pubkey| Address::p2pkh(pubkey.pubkey_hash(), Network::Bitcoin).to_string())
}
