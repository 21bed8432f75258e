//! JSON shapes of the node's HTTP gateway.
//!
//! | Endpoint                          | Request             | Response            |
//! |-----------------------------------|---------------------|---------------------|
//! | `POST /sendTx`                    | [`TransactionJson`] | [`SendTxResponse`]  |
//! | `GET /getTxByHash/{hash}`         |                     | [`TxByHashResponse`]|
//! | `GET /getTxReceiptByTxHash/{hash}`|                     | [`ReceiptJson`]     |
//! | `GET /getChainInfo`               |                     | [`ChainInfoJson`]   |
//!
//! The gateway prints 64-bit integers as decimal strings, so those fields
//! go through [`JsonInt`], which accepts either form. Signature and key
//! bytes travel as standard base64, `referred_tx` as base58.
//!
//! None of this is hashed. The canonical encoding lives in
//! [`crate::encoding`].

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ClientError;
use crate::crypto::{Algorithm, Signature};
use crate::identity::SignerId;
use crate::transaction::{
    Action, AmountLimit, ChainInfo, ReceiptEntry, StatusCode, Transaction, TransactionBuilder,
    TransactionStatus, TxLookup, TxReceipt,
};

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// An `i64` read from a JSON number or a decimal string, written as a
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonInt(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum IntRepr {
    Number(i64),
    Text(String),
}

impl Serialize for JsonInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for JsonInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match IntRepr::deserialize(deserializer)? {
            IntRepr::Number(n) => Ok(JsonInt(n)),
            IntRepr::Text(s) => s.trim().parse().map(JsonInt).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureJson {
    /// `"ED25519"` or `"SECP256K1"`.
    pub algorithm: String,
    pub public_key: String,
    pub signature: String,
}

impl From<&Signature> for SignatureJson {
    fn from(sig: &Signature) -> Self {
        Self {
            algorithm: sig.algorithm().name().to_ascii_uppercase(),
            public_key: STANDARD.encode(sig.public_key()),
            signature: STANDARD.encode(sig.sig()),
        }
    }
}

impl TryFrom<SignatureJson> for Signature {
    type Error = ClientError;

    fn try_from(json: SignatureJson) -> Result<Self, Self::Error> {
        let algorithm: Algorithm = json.algorithm.parse()?;
        let decode = |field: &str, text: &str| {
            STANDARD
                .decode(text)
                .map_err(|e| ClientError::Decode(format!("signature {field} is not base64: {e}")))
        };
        Ok(Signature::from_parts(
            algorithm,
            decode("bytes", &json.signature)?,
            decode("public key", &json.public_key)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionJson {
    pub contract: String,
    pub action_name: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLimitJson {
    pub token: String,
    pub value: String,
}

/// A transaction as `/sendTx` takes it and `/getTxByHash` returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionJson {
    pub time: JsonInt,
    pub expiration: JsonInt,
    pub gas_ratio: f64,
    pub gas_limit: f64,
    #[serde(default)]
    pub delay: JsonInt,
    pub chain_id: u32,
    #[serde(default)]
    pub signers: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionJson>,
    #[serde(default)]
    pub amount_limit: Vec<AmountLimitJson>,
    #[serde(default)]
    pub signatures: Vec<SignatureJson>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub referred_tx: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publisher_sigs: Vec<SignatureJson>,
    /// Only in lookups of executed transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_receipt: Option<ReceiptJson>,
}

impl From<&Transaction> for TransactionJson {
    fn from(tx: &Transaction) -> Self {
        Self {
            time: JsonInt(tx.time()),
            expiration: JsonInt(tx.expiration()),
            gas_ratio: tx.gas_ratio(),
            gas_limit: tx.gas_limit(),
            delay: JsonInt(tx.delay()),
            chain_id: tx.chain_id(),
            signers: tx.signers().iter().map(ToString::to_string).collect(),
            actions: tx
                .actions()
                .iter()
                .map(|a| ActionJson {
                    contract: a.contract().to_string(),
                    action_name: a.action_name().to_string(),
                    data: a.data().to_string(),
                })
                .collect(),
            amount_limit: tx
                .amount_limits()
                .iter()
                .map(|l| AmountLimitJson {
                    token: l.token().to_string(),
                    value: l.value().to_string(),
                })
                .collect(),
            signatures: tx.signatures().iter().map(SignatureJson::from).collect(),
            referred_tx: bs58::encode(tx.referred_tx()).into_string(),
            publisher: tx.publisher().to_string(),
            publisher_sigs: tx.publisher_signatures().iter().map(SignatureJson::from).collect(),
            tx_receipt: None,
        }
    }
}

impl TryFrom<TransactionJson> for Transaction {
    type Error = ClientError;

    fn try_from(json: TransactionJson) -> Result<Self, Self::Error> {
        let referred_tx = bs58::decode(&json.referred_tx)
            .into_vec()
            .map_err(|e| ClientError::Decode(format!("referred_tx is not base58: {e}")))?;

        let mut tx = TransactionBuilder::new()
            .time(json.time.0)
            .gas_ratio(json.gas_ratio)
            .gas_limit(json.gas_limit)
            .delay(json.delay.0)
            .chain_id(json.chain_id)
            .referred_tx(referred_tx)
            .build_with_expiration(json.expiration.0);

        for signer in json.signers {
            let signer: SignerId = signer
                .parse()
                .map_err(|e| ClientError::Decode(format!("bad signer: {e}")))?;
            tx.push_signer(signer);
        }
        for a in json.actions {
            tx.push_action(Action::from_raw(a.contract, a.action_name, a.data));
        }
        for l in json.amount_limit {
            tx.push_amount_limit(AmountLimit::from_raw(l.token, l.value));
        }
        for sig in json.signatures {
            tx.push_signature(sig.try_into()?);
        }
        tx.set_publisher(&json.publisher);
        for sig in json.publisher_sigs {
            tx.push_publisher_signature(&json.publisher, sig.try_into()?);
        }
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTxResponse {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptJson {
    pub tx_hash: String,
    #[serde(default)]
    pub gas_usage: f64,
    #[serde(default)]
    pub ram_usage: BTreeMap<String, JsonInt>,
    pub status_code: StatusCode,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub returns: Vec<String>,
    #[serde(default)]
    pub receipts: Vec<ReceiptEntry>,
}

impl From<ReceiptJson> for TxReceipt {
    fn from(json: ReceiptJson) -> Self {
        Self {
            tx_hash: json.tx_hash,
            gas_usage: json.gas_usage,
            ram_usage: json.ram_usage.into_iter().map(|(k, v)| (k, v.0)).collect(),
            status_code: json.status_code,
            message: json.message,
            returns: json.returns,
            receipts: json.receipts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxByHashResponse {
    pub status: TransactionStatus,
    pub transaction: TransactionJson,
}

impl TryFrom<TxByHashResponse> for TxLookup {
    type Error = ClientError;

    fn try_from(mut json: TxByHashResponse) -> Result<Self, Self::Error> {
        let receipt = json.transaction.tx_receipt.take().map(TxReceipt::from);
        Ok(TxLookup {
            status: json.status,
            transaction: json.transaction.try_into()?,
            receipt,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfoJson {
    pub net_name: String,
    pub protocol_version: String,
    pub chain_id: u32,
    pub head_block: JsonInt,
    pub head_block_hash: String,
    pub lib_block: JsonInt,
    pub lib_block_hash: String,
    #[serde(default)]
    pub witness_list: Vec<String>,
}

impl From<ChainInfoJson> for ChainInfo {
    fn from(json: ChainInfoJson) -> Self {
        Self {
            net_name: json.net_name,
            protocol_version: json.protocol_version,
            chain_id: json.chain_id,
            head_block: json.head_block.0,
            head_block_hash: json.head_block_hash,
            lib_block: json.lib_block.0,
            lib_block_hash: json.lib_block_hash,
            witness_list: json.witness_list,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::transaction::ActionArg;

    fn published() -> Transaction {
        let alice = KeyPair::generate(Algorithm::Secp256k1);
        let admin = KeyPair::generate(Algorithm::Ed25519);
        let mut tx = TransactionBuilder::new()
            .time(1_600_000_000_000_000_000)
            .referred_tx(vec![7; 32])
            .build();
        tx.add_action("token.iost", "transfer", ["iost", "alice", "bob", "1.5", ""].map(ActionArg::from))
            .unwrap()
            .add_signer("alice", "active")
            .unwrap()
            .add_amount_limit("iost", "1.5")
            .unwrap()
            .add_signature(&alice)
            .add_publisher_signature("admin", &admin);
        tx
    }

    #[test]
    fn json_int_accepts_numbers_and_strings() {
        let n: JsonInt = serde_json::from_str("42").unwrap();
        let s: JsonInt = serde_json::from_str("\"1600000000000000000\"").unwrap();
        assert_eq!(n, JsonInt(42));
        assert_eq!(s, JsonInt(1_600_000_000_000_000_000));
        assert!(serde_json::from_str::<JsonInt>("\"ten\"").is_err());
        assert_eq!(serde_json::to_string(&s).unwrap(), "1600000000000000000");
    }

    #[test]
    fn signature_json_uses_upper_case_name_and_base64() {
        let kp = KeyPair::generate(Algorithm::Ed25519);
        let sig = kp.sign(b"msg");
        let json = SignatureJson::from(&sig);
        assert_eq!(json.algorithm, "ED25519");
        assert_eq!(STANDARD.decode(&json.public_key).unwrap(), kp.public_key());
        assert_eq!(Signature::try_from(json).unwrap(), sig);
    }

    #[test]
    fn unknown_wire_algorithm_is_unsupported() {
        let json = SignatureJson {
            algorithm: "RSA".into(),
            public_key: String::new(),
            signature: String::new(),
        };
        assert!(matches!(
            Signature::try_from(json),
            Err(ClientError::Key(crate::crypto::KeyError::UnsupportedAlgorithm(_)))
        ));
    }

    #[test]
    fn decoded_transaction_keeps_its_hash() {
        let tx = published();
        let text = serde_json::to_string(&TransactionJson::from(&tx)).unwrap();
        let back: TransactionJson = serde_json::from_str(&text).unwrap();
        let decoded = Transaction::try_from(back).unwrap();
        assert_eq!(decoded.hash_base58(), tx.hash_base58());
        assert_eq!(decoded.verify_self(), Ok(()));
    }

    #[test]
    fn decodes_gateway_lookup() {
        let body = r#"{
            "status": "PACKED",
            "transaction": {
                "hash": "9siUgJAGKee4wMB1LZ744ZyKAFX3weoWka8UmezmBsuS",
                "time": "1600000000000000000",
                "expiration": "1600000090000000000",
                "gas_ratio": 1,
                "gas_limit": 10000,
                "delay": "0",
                "chain_id": 1024,
                "actions": [{"contract": "token.test", "action_name": "transfer", "data": "[\"alice\", \"bob\", \"10.0\", \"\"]"}],
                "signers": ["alice@active"],
                "publisher": "admin",
                "referred_tx": "",
                "amount_limit": [{"token": "iost", "value": "unlimited"}],
                "tx_receipt": {
                    "tx_hash": "9siUgJAGKee4wMB1LZ744ZyKAFX3weoWka8UmezmBsuS",
                    "gas_usage": 3.05,
                    "ram_usage": {"admin": "211"},
                    "status_code": "SUCCESS",
                    "message": "",
                    "returns": ["[\"\"]"],
                    "receipts": [{"func_name": "token.test/transfer", "content": "[]"}]
                }
            },
            "block_number": "77"
        }"#;
        let response: TxByHashResponse = serde_json::from_str(body).unwrap();
        let lookup = TxLookup::try_from(response).unwrap();

        assert_eq!(lookup.status, TransactionStatus::Packed);
        assert_eq!(lookup.transaction.publisher(), "admin");
        assert_eq!(lookup.transaction.signers()[0].to_string(), "alice@active");
        assert_eq!(lookup.transaction.expiration(), 1_600_000_090_000_000_000);
        let receipt = lookup.receipt.unwrap();
        assert_eq!(receipt.ram_usage["admin"], 211);
        assert!(receipt.is_success());
    }

    #[test]
    fn decodes_chain_info() {
        let body = r#"{
            "net_name": "debugnet",
            "protocol_version": "1.0",
            "chain_id": 1020,
            "head_block": "1234",
            "head_block_hash": "Fa1hSPz",
            "lib_block": 1200,
            "lib_block_hash": "AdKLw9e",
            "witness_list": ["IOSTfQFocqDn7VrKV7vvPqhAQGyeFU9XMYo5SNn5yQbdbzC75wM7C"]
        }"#;
        let info = ChainInfo::from(serde_json::from_str::<ChainInfoJson>(body).unwrap());
        assert_eq!(info.chain_id, 1020);
        assert_eq!(info.head_block, 1234);
        assert_eq!(info.lib_block, 1200);
    }

    #[test]
    fn bad_signer_in_response_is_a_decode_error() {
        let mut json = TransactionJson::from(&published());
        json.signers = vec!["no-separator".into()];
        assert!(matches!(Transaction::try_from(json), Err(ClientError::Decode(_))));
    }
}
