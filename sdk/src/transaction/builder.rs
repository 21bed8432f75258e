//! Transaction construction and canonical hashing.
//!
//! A [`Transaction`] is assembled in place: create it (directly or through
//! [`TransactionBuilder`] when the scalar fields need overriding), append
//! actions, signers and amount limits, then collect signatures through
//! [`super::signing`].
//!
//! # Canonical byte levels
//!
//! The same field list is encoded at three levels, each a byte-prefix of the
//! next:
//!
//! ```text
//! base     time, expiration, gas_ratio*100, gas_limit*100, delay,
//!          chain_id (i32), 0 (i32), signers, actions, amount_limits
//! publish  base ++ signer signatures
//! full     publish ++ referred_tx ++ publisher ++ publisher signatures
//! ```
//!
//! Signers sign `sha3_256(base)`, the publisher signs `sha3_256(publish)`
//! and `sha3_256(full)` is the transaction's identity on the node.

use std::sync::OnceLock;

use chrono::Utc;

use super::action::{Action, ActionArg, ActionError};
use super::amount_limit::{AmountLimit, AmountLimitError};
use crate::config::{
    DEFAULT_CHAIN_ID, DEFAULT_DELAY_NS, DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_LIMIT,
    DEFAULT_GAS_RATIO, GAS_SCALE, NANOS_PER_SEC,
};
use crate::crypto::hash::sha3_256;
use crate::crypto::signatures::Signature;
use crate::encoding::{CanonicalEncode, CanonicalEncoder};
use crate::identity::signer::{SignerId, SignerIdError};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Where a transaction is in its local signing lifecycle. Statuses after
/// submission are reported by the node, see
/// [`TransactionStatus`](super::types::TransactionStatus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningState {
    /// No signatures of any kind.
    Unsigned,
    /// Some signer signatures, no publisher yet.
    PartiallySigned,
    /// Publisher set and at least one publisher signature attached.
    Published,
}

/// An IOST transaction under construction or decoded from a node.
#[derive(Debug, Clone)]
pub struct Transaction {
    time: i64,
    expiration: i64,
    gas_ratio: f64,
    gas_limit: f64,
    delay: i64,
    chain_id: u32,
    signers: Vec<SignerId>,
    actions: Vec<Action>,
    amount_limits: Vec<AmountLimit>,
    signatures: Vec<Signature>,
    referred_tx: Vec<u8>,
    publisher: String,
    publisher_signatures: Vec<Signature>,
    full_hash: OnceLock<[u8; 32]>,
}

impl Transaction {
    /// A transaction stamped with the current time and the default gas,
    /// chain and expiration settings.
    pub fn new() -> Self {
        TransactionBuilder::new().build()
    }

    // -- scalar fields ------------------------------------------------------

    /// Creation time, Unix nanoseconds.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Absolute expiration, Unix nanoseconds.
    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    pub fn gas_ratio(&self) -> f64 {
        self.gas_ratio
    }

    pub fn gas_limit(&self) -> f64 {
        self.gas_limit
    }

    pub fn delay(&self) -> i64 {
        self.delay
    }

    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    pub fn referred_tx(&self) -> &[u8] {
        &self.referred_tx
    }

    // -- collections ----------------------------------------------------------

    pub fn signers(&self) -> &[SignerId] {
        &self.signers
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn amount_limits(&self) -> &[AmountLimit] {
        &self.amount_limits
    }

    /// Signer signatures in the order they were added.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Publisher account name; empty until a publisher signs.
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn publisher_signatures(&self) -> &[Signature] {
        &self.publisher_signatures
    }

    // -- mutation -------------------------------------------------------------

    /// `expiration = time + ttl_secs * 1e9`.
    pub fn set_expiration(&mut self, ttl_secs: i64) -> &mut Self {
        self.expiration = self.time.saturating_add(ttl_secs.saturating_mul(NANOS_PER_SEC));
        self.invalidate_hash();
        self
    }

    /// Appends a contract call built from `args`.
    pub fn add_action(
        &mut self,
        contract: &str,
        action_name: &str,
        args: impl IntoIterator<Item = ActionArg>,
    ) -> Result<&mut Self, ActionError> {
        let action = Action::new(contract, action_name, args)?;
        Ok(self.push_action(action))
    }

    pub fn push_action(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self.invalidate_hash();
        self
    }

    /// Declares `name@permission` as a required signer.
    pub fn add_signer(&mut self, name: &str, permission: &str) -> Result<&mut Self, SignerIdError> {
        let signer = SignerId::new(name, permission)?;
        Ok(self.push_signer(signer))
    }

    pub fn push_signer(&mut self, signer: SignerId) -> &mut Self {
        self.signers.push(signer);
        self.invalidate_hash();
        self
    }

    /// Caps spending of `token` at `bound` (`"unlimited"` or a decimal).
    pub fn add_amount_limit(&mut self, token: &str, bound: &str) -> Result<&mut Self, AmountLimitError> {
        let limit = AmountLimit::new(token, bound)?;
        Ok(self.push_amount_limit(limit))
    }

    pub fn push_amount_limit(&mut self, limit: AmountLimit) -> &mut Self {
        self.amount_limits.push(limit);
        self.invalidate_hash();
        self
    }

    pub(crate) fn push_signature(&mut self, signature: Signature) -> &mut Self {
        self.signatures.push(signature);
        self.invalidate_hash();
        self
    }

    pub(crate) fn push_publisher_signature(&mut self, publisher: &str, signature: Signature) -> &mut Self {
        self.publisher = publisher.to_string();
        self.publisher_signatures.push(signature);
        self.invalidate_hash();
        self
    }

    /// Publisher name of a decoded transaction whose signatures the node
    /// did not return.
    pub(crate) fn set_publisher(&mut self, publisher: &str) -> &mut Self {
        self.publisher = publisher.to_string();
        self.invalidate_hash();
        self
    }

    /// The only place the cached full hash is dropped.
    fn invalidate_hash(&mut self) {
        self.full_hash.take();
    }

    // -- canonical bytes ----------------------------------------------------------

    fn encode_base(&self, enc: &mut CanonicalEncoder) {
        enc.write_int64(self.time)
            .write_int64(self.expiration)
            .write_int64(scale_gas(self.gas_ratio))
            .write_int64(scale_gas(self.gas_limit))
            .write_int64(self.delay)
            .write_int32(self.chain_id as i32)
            .write_int32(0)
            .write_string_slice(&self.signers.iter().map(ToString::to_string).collect::<Vec<_>>())
            .write_bytes_slice(&canonical_all(&self.actions))
            .write_bytes_slice(&canonical_all(&self.amount_limits));
    }

    fn encode_publish(&self, enc: &mut CanonicalEncoder) {
        self.encode_base(enc);
        enc.write_bytes_slice(&canonical_all(&self.signatures));
    }

    fn encode_full(&self, enc: &mut CanonicalEncoder) {
        self.encode_publish(enc);
        enc.write_bytes(&self.referred_tx)
            .write_string(&self.publisher)
            .write_bytes_slice(&canonical_all(&self.publisher_signatures));
    }

    /// Input of the hash every signer signs.
    pub fn base_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(256);
        self.encode_base(&mut enc);
        enc.into_bytes()
    }

    /// Base bytes plus the signer signatures.
    pub fn publish_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(512);
        self.encode_publish(&mut enc);
        enc.into_bytes()
    }

    /// Publish bytes plus referred tx, publisher and publisher signatures.
    pub fn full_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(512);
        self.encode_full(&mut enc);
        enc.into_bytes()
    }

    // -- hashes -------------------------------------------------------------------

    pub fn base_hash(&self) -> [u8; 32] {
        sha3_256(&self.base_bytes())
    }

    pub fn publish_hash(&self) -> [u8; 32] {
        sha3_256(&self.publish_bytes())
    }

    /// The transaction hash. Computed once and reused until the next
    /// mutation.
    pub fn full_hash(&self) -> [u8; 32] {
        *self.full_hash.get_or_init(|| sha3_256(&self.full_bytes()))
    }

    /// Alias of [`full_hash`](Self::full_hash).
    pub fn transaction_hash(&self) -> [u8; 32] {
        self.full_hash()
    }

    /// [`full_hash`](Self::full_hash) in base58, the form the node uses.
    pub fn hash_base58(&self) -> String {
        bs58::encode(self.full_hash()).into_string()
    }

    // -- state ----------------------------------------------------------------------

    /// Ready to submit: a publisher is named and has signed.
    pub fn is_published(&self) -> bool {
        !self.publisher.is_empty() && !self.publisher_signatures.is_empty()
    }

    pub fn signing_state(&self) -> SigningState {
        if self.is_published() {
            SigningState::Published
        } else if self.signatures.is_empty() {
            SigningState::Unsigned
        } else {
            SigningState::PartiallySigned
        }
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality over the encoded fields. The hash cache is ignored.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.full_bytes() == other.full_bytes()
    }
}

/// `(gas * 100) as i64`, truncating toward zero.
fn scale_gas(gas: f64) -> i64 {
    (gas * GAS_SCALE) as i64
}

fn canonical_all<T: CanonicalEncode>(items: &[T]) -> Vec<Vec<u8>> {
    items.iter().map(CanonicalEncode::to_canonical_bytes).collect()
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Overrides for the scalar fields of a new [`Transaction`].
///
/// ```
/// use iost_sdk::transaction::TransactionBuilder;
///
/// let tx = TransactionBuilder::new()
///     .time(1_600_000_000_000_000_000)
///     .expiration_secs(300)
///     .gas_limit(1_000_000.0)
///     .build();
/// assert_eq!(tx.expiration() - tx.time(), 300_000_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    time: Option<i64>,
    expiration_secs: i64,
    gas_ratio: f64,
    gas_limit: f64,
    delay: i64,
    chain_id: u32,
    referred_tx: Vec<u8>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            time: None,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            gas_ratio: DEFAULT_GAS_RATIO,
            gas_limit: DEFAULT_GAS_LIMIT,
            delay: DEFAULT_DELAY_NS,
            chain_id: DEFAULT_CHAIN_ID,
            referred_tx: Vec::new(),
        }
    }

    /// Creation time in Unix nanoseconds. Defaults to now.
    pub fn time(mut self, time_ns: i64) -> Self {
        self.time = Some(time_ns);
        self
    }

    pub fn expiration_secs(mut self, ttl_secs: i64) -> Self {
        self.expiration_secs = ttl_secs;
        self
    }

    pub fn gas_ratio(mut self, gas_ratio: f64) -> Self {
        self.gas_ratio = gas_ratio;
        self
    }

    pub fn gas_limit(mut self, gas_limit: f64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Deferred execution delay in nanoseconds.
    pub fn delay(mut self, delay_ns: i64) -> Self {
        self.delay = delay_ns;
        self
    }

    pub fn chain_id(mut self, chain_id: u32) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Raw hash of the transaction this one refers to.
    pub fn referred_tx(mut self, hash: Vec<u8>) -> Self {
        self.referred_tx = hash;
        self
    }

    pub fn build(self) -> Transaction {
        let time = self
            .time
            .unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default());

        let mut tx = Transaction {
            time,
            expiration: time,
            gas_ratio: self.gas_ratio,
            gas_limit: self.gas_limit,
            delay: self.delay,
            chain_id: self.chain_id,
            signers: Vec::new(),
            actions: Vec::new(),
            amount_limits: Vec::new(),
            signatures: Vec::new(),
            referred_tx: self.referred_tx,
            publisher: String::new(),
            publisher_signatures: Vec::new(),
            full_hash: OnceLock::new(),
        };
        tx.set_expiration(self.expiration_secs);
        tx
    }

    /// Builds a transaction with an absolute expiration instead of a TTL,
    /// as needed when decoding one from the node.
    pub(crate) fn build_with_expiration(self, expiration: i64) -> Transaction {
        let mut tx = self.build();
        tx.expiration = expiration;
        tx
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Algorithm, KeyPair};

    const TIME: i64 = 1_600_000_000_000_000_000;

    // Reference bytes for the same inputs, as hashed by the node.
    const TRANSFER_BASE_HEX: &str = "16345785d8a000001634579acd0b0400000000000000006400000000000f424000000000000000000000040000000000000000010000000c616c69636540616374697665000000010000003a0000000a746f6b656e2e74657374000000087472616e736665720000001c5b22616c696365222c2022626f62222c202231302e30222c2022225d000000010000001500000004696f737400000009756e6c696d69746564";
    const TRANSFER_BASE_HASH: &str = "4f012501cf93285be9d4e2b276a977fb0c869f11f780503d7b1433f51bda4cfc";

    fn transfer_tx() -> Transaction {
        let mut tx = TransactionBuilder::new().time(TIME).build();
        tx.add_action(
            "token.test",
            "transfer",
            ["alice", "bob", "10.0", ""].map(ActionArg::from),
        )
        .unwrap()
        .add_signer("alice", "active")
        .unwrap()
        .add_amount_limit("iost", "unlimited")
        .unwrap();
        tx
    }

    fn test_key() -> KeyPair {
        KeyPair::generate(Algorithm::Ed25519)
    }

    #[test]
    fn base_bytes_match_golden_vector() {
        let tx = transfer_tx();
        assert_eq!(hex::encode(tx.base_bytes()), TRANSFER_BASE_HEX);
        assert_eq!(hex::encode(tx.base_hash()), TRANSFER_BASE_HASH);
    }

    #[test]
    fn defaults_come_from_config() {
        let tx = TransactionBuilder::new().time(TIME).build();
        assert_eq!(tx.expiration(), TIME + 90 * NANOS_PER_SEC);
        assert_eq!(tx.gas_ratio(), 1.0);
        assert_eq!(tx.gas_limit(), 10_000.0);
        assert_eq!(tx.delay(), 0);
        assert_eq!(tx.chain_id(), 1024);
        assert!(tx.referred_tx().is_empty());
        assert_eq!(tx.publisher(), "");
    }

    #[test]
    fn new_uses_current_time() {
        let before = Utc::now().timestamp_nanos_opt().unwrap();
        let tx = Transaction::new();
        let after = Utc::now().timestamp_nanos_opt().unwrap();
        assert!(tx.time() >= before && tx.time() <= after);
        assert_eq!(tx.expiration(), tx.time() + DEFAULT_EXPIRATION_SECS * NANOS_PER_SEC);
    }

    #[test]
    fn set_expiration_is_relative_to_creation_time() {
        let mut tx = TransactionBuilder::new().time(TIME).build();
        tx.set_expiration(300);
        assert_eq!(tx.expiration(), TIME + 300_000_000_000);
        tx.set_expiration(0);
        assert_eq!(tx.expiration(), TIME);
    }

    #[test]
    fn gas_is_truncated_not_rounded() {
        assert_eq!(scale_gas(0.29), 28);
        assert_eq!(scale_gas(1.0), 100);
        assert_eq!(scale_gas(10_000.0), 1_000_000);
        assert_eq!(scale_gas(1.239), 123);
    }

    #[test]
    fn hashing_is_deterministic() {
        let tx = transfer_tx();
        assert_eq!(tx.base_hash(), tx.base_hash());
        assert_eq!(tx.base_bytes(), transfer_tx().base_bytes());
    }

    #[test]
    fn levels_are_byte_prefixes() {
        let mut tx = transfer_tx();
        let key = test_key();
        tx.push_signature(key.sign(&tx.base_hash()));
        tx.push_publisher_signature("bob", key.sign(&tx.publish_hash()));

        let base = tx.base_bytes();
        let publish = tx.publish_bytes();
        let full = tx.full_bytes();
        assert!(publish.len() > base.len() && publish.starts_with(&base));
        assert!(full.len() > publish.len() && full.starts_with(&publish));
    }

    #[test]
    fn base_hash_ignores_signatures() {
        let mut tx = transfer_tx();
        let before = tx.base_hash();
        tx.push_signature(test_key().sign(&before));
        assert_eq!(tx.base_hash(), before);
        assert_ne!(tx.publish_hash(), sha3_256(&tx.base_bytes()));
    }

    #[test]
    fn every_mutator_invalidates_cached_hash() {
        let mut tx = transfer_tx();
        let mut last = tx.full_hash();

        let mut check = |tx: &Transaction, what: &str| {
            let now = tx.full_hash();
            assert_ne!(now, last, "{what} did not change the full hash");
            assert_eq!(now, sha3_256(&tx.full_bytes()), "{what} left a stale cache");
            last = now;
        };

        tx.add_signer("bob", "owner").unwrap();
        check(&tx, "add_signer");
        tx.add_action("c", "a", []).unwrap();
        check(&tx, "add_action");
        tx.add_amount_limit("*", "5").unwrap();
        check(&tx, "add_amount_limit");
        tx.set_expiration(10);
        check(&tx, "set_expiration");
        let key = test_key();
        tx.push_signature(key.sign(b"x"));
        check(&tx, "push_signature");
        tx.push_publisher_signature("bob", key.sign(b"y"));
        check(&tx, "push_publisher_signature");
    }

    #[test]
    fn invalid_inputs_leave_transaction_untouched() {
        let mut tx = transfer_tx();
        let before = tx.full_bytes();
        assert!(tx.add_signer("alice", "").is_err());
        assert!(tx.add_action("", "transfer", []).is_err());
        assert!(tx.add_amount_limit("iost", "lots").is_err());
        assert_eq!(tx.full_bytes(), before);
    }

    #[test]
    fn signing_state_progresses() {
        let mut tx = transfer_tx();
        assert_eq!(tx.signing_state(), SigningState::Unsigned);
        assert!(!tx.is_published());

        let key = test_key();
        tx.push_signature(key.sign(&tx.base_hash()));
        assert_eq!(tx.signing_state(), SigningState::PartiallySigned);

        tx.push_publisher_signature("bob", key.sign(&tx.publish_hash()));
        assert_eq!(tx.signing_state(), SigningState::Published);
        assert!(tx.is_published());
    }

    #[test]
    fn hash_base58_encodes_full_hash() {
        let tx = transfer_tx();
        let decoded = bs58::decode(tx.hash_base58()).into_vec().unwrap();
        assert_eq!(decoded, tx.full_hash().to_vec());
        assert_eq!(tx.transaction_hash(), tx.full_hash());
    }

    #[test]
    fn referred_tx_only_affects_full_level() {
        let plain = transfer_tx();
        let mut referring = TransactionBuilder::new()
            .time(TIME)
            .referred_tx(vec![0xab; 32])
            .build();
        referring
            .add_action("token.test", "transfer", ["alice", "bob", "10.0", ""].map(ActionArg::from))
            .unwrap()
            .add_signer("alice", "active")
            .unwrap()
            .add_amount_limit("iost", "unlimited")
            .unwrap();

        assert_eq!(plain.publish_bytes(), referring.publish_bytes());
        assert_ne!(plain.full_hash(), referring.full_hash());
    }

    #[test]
    fn equality_ignores_hash_cache() {
        let a = transfer_tx();
        let b = transfer_tx();
        let _ = a.full_hash();
        assert_eq!(a, b);
    }
}
