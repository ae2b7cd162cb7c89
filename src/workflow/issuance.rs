//! Credential issuance workflow.
//!
//! ```text
//! Idle → Validating → Submitting → Confirmed
//!            │             │
//!            └─────────────┴──────→ Rejected
//! ```
//!
//! Validation never touches the chain. A reverted transaction is rejected
//! but keeps its receipt. Nothing is retried; callers re-run the workflow.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::blockchain::{parse_checksummed, CredentialRegistry, IssuanceReceipt, IssuerCredentials};
use crate::config::IssuerSettings;
use crate::observability::metrics;
use crate::workflow::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuanceStage {
    #[default]
    Idle,
    Validating,
    Submitting,
    Confirmed,
    Rejected,
}

/// What to issue and to whom.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssuanceRequest {
    /// Student address; must pass checksum validation.
    pub recipient: String,
    /// Pointer to the off-chain credential document. Opaque, non-empty.
    pub metadata_url: String,
}

/// Final result of one issuance attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceOutcome {
    Confirmed(IssuanceReceipt),
    Rejected {
        reason: WorkflowError,
        /// Present when the transaction was mined but reverted.
        receipt: Option<IssuanceReceipt>,
    },
}

impl IssuanceOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, IssuanceOutcome::Confirmed(_))
    }

    pub fn receipt(&self) -> Option<&IssuanceReceipt> {
        match self {
            IssuanceOutcome::Confirmed(receipt) => Some(receipt),
            IssuanceOutcome::Rejected { receipt, .. } => receipt.as_ref(),
        }
    }

    pub fn reason(&self) -> Option<&WorkflowError> {
        match self {
            IssuanceOutcome::Confirmed(_) => None,
            IssuanceOutcome::Rejected { reason, .. } => Some(reason),
        }
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            IssuanceOutcome::Confirmed(_) => "confirmed",
            IssuanceOutcome::Rejected { receipt: Some(_), .. } => "reverted",
            IssuanceOutcome::Rejected { reason, .. } => reason.kind().as_str(),
        }
    }
}

/// A request that passed validation, holding the parsed issuer key until
/// submission consumes it.
#[derive(Debug)]
pub struct ValidatedIssuance {
    recipient: Address,
    metadata_url: String,
    issuer: IssuerCredentials,
}

impl ValidatedIssuance {
    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    pub fn issuer_address(&self) -> Address {
        self.issuer.address()
    }
}

/// One issuance attempt, tracking its stage.
#[derive(Debug, Default)]
pub struct IssuanceWorkflow {
    stage: IssuanceStage,
}

impl IssuanceWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> IssuanceStage {
        self.stage
    }

    fn transition(&mut self, to: IssuanceStage) {
        tracing::debug!(from = ?self.stage, to = ?to, "Issuance stage change");
        self.stage = to;
    }

    fn finish(&mut self, outcome: IssuanceOutcome) -> IssuanceOutcome {
        match &outcome {
            IssuanceOutcome::Confirmed(receipt) => {
                self.transition(IssuanceStage::Confirmed);
                tracing::info!(
                    tx_hash = %receipt.transaction_hash,
                    block_number = receipt.block_number,
                    "Credential issued"
                );
            }
            IssuanceOutcome::Rejected { reason, receipt } => {
                self.transition(IssuanceStage::Rejected);
                tracing::warn!(
                    kind = reason.kind().as_str(),
                    reason = %reason,
                    mined = receipt.is_some(),
                    "Credential issuance rejected"
                );
            }
        }
        metrics::record_issuance(outcome.label());
        outcome
    }

    /// Reject the attempt from outside the workflow, e.g. when the contract
    /// cannot be bound after validation.
    pub fn abort(&mut self, reason: WorkflowError) -> IssuanceOutcome {
        self.finish(IssuanceOutcome::Rejected {
            reason,
            receipt: None,
        })
    }

    /// Check the request and parse the issuer key. No chain access.
    pub fn validate(
        &mut self,
        request: &IssuanceRequest,
        issuer: &IssuerSettings,
    ) -> Result<ValidatedIssuance, IssuanceOutcome> {
        self.transition(IssuanceStage::Idle);
        self.transition(IssuanceStage::Validating);

        match check_request(request, issuer) {
            Ok(validated) => Ok(validated),
            Err(reason) => Err(self.abort(reason)),
        }
    }

    /// Submit a validated request and wait for it to be mined.
    pub async fn submit(
        &mut self,
        registry: &dyn CredentialRegistry,
        validated: ValidatedIssuance,
    ) -> IssuanceOutcome {
        self.transition(IssuanceStage::Submitting);
        let started = Instant::now();

        let ValidatedIssuance {
            recipient,
            metadata_url,
            issuer,
        } = validated;

        let result = registry.issue(recipient, &metadata_url, &issuer).await;
        drop(issuer);
        metrics::record_issuance_latency(started);

        let outcome = match result {
            Ok(receipt) if receipt.success => IssuanceOutcome::Confirmed(receipt),
            Ok(receipt) => IssuanceOutcome::Rejected {
                reason: WorkflowError::Transaction(format!(
                    "transaction {} reverted",
                    receipt.transaction_hash
                )),
                receipt: Some(receipt),
            },
            Err(e) => IssuanceOutcome::Rejected {
                reason: e.into(),
                receipt: None,
            },
        };
        self.finish(outcome)
    }

    /// Validate, then submit.
    pub async fn run(
        &mut self,
        registry: &dyn CredentialRegistry,
        request: &IssuanceRequest,
        issuer: &IssuerSettings,
    ) -> IssuanceOutcome {
        match self.validate(request, issuer) {
            Ok(validated) => self.submit(registry, validated).await,
            Err(outcome) => outcome,
        }
    }
}

fn check_request(
    request: &IssuanceRequest,
    issuer: &IssuerSettings,
) -> Result<ValidatedIssuance, WorkflowError> {
    let recipient = parse_checksummed(&request.recipient)
        .map_err(|e| WorkflowError::Validation(format!("recipient: {e}")))?;

    if request.metadata_url.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "metadata URL must not be empty".to_string(),
        ));
    }

    let issuer = IssuerCredentials::from_private_key(&issuer.private_key, &issuer.public_address)
        .map_err(|e| WorkflowError::Validation(format!("issuer: {e}")))?;

    Ok(ValidatedIssuance {
        recipient,
        metadata_url: request.metadata_url.clone(),
        issuer,
    })
}
