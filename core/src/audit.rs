//! Append-only audit trail
//!
//! Every state transition in the protocol appends one record here with a
//! monotonic sequence number. External monitoring consumes the stream;
//! nothing in the protocol ever rewrites or deletes a record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    /// Monotonic sequence number, starts at 1
    pub seq: u64,
    /// Entity kind, e.g. "asset", "pool", "vault"
    pub entity: String,
    pub entity_id: String,
    pub old_state: String,
    pub new_state: String,
    pub actor: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    next_seq: u64,
    records: Vec<AuditRecord>,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            records: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        entity: &str,
        entity_id: &str,
        old_state: &str,
        new_state: &str,
        actor: &str,
        timestamp: i64,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push(AuditRecord {
            seq,
            entity: entity.to_string(),
            entity_id: entity_id.to_string(),
            old_state: old_state.to_string(),
            new_state: new_state.to_string(),
            actor: actor.to_string(),
            timestamp,
        });
        seq
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Records appended after the given sequence number
    pub fn records_since(&self, seq: u64) -> Vec<&AuditRecord> {
        self.records.iter().filter(|r| r.seq > seq).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut trail = AuditTrail::new();
        let s1 = trail.record("asset", "a1", "PendingVerification", "Rejected", "admin", 100);
        let s2 = trail.record("asset", "a2", "PendingVerification", "Rejected", "admin", 101);

        assert_eq!(s1, 1);
        assert_eq!(s2, 2);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_records_since() {
        let mut trail = AuditTrail::new();
        trail.record("vault", "v", "0", "100", "alice", 1);
        trail.record("vault", "v", "100", "200", "bob", 2);
        trail.record("vault", "v", "200", "300", "carol", 3);

        let tail = trail.records_since(1);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].actor, "bob");
    }
}
