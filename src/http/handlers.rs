//! Request handlers for the dashboard API.
//!
//! Each handler takes one configuration snapshot and works from it for the
//! whole request; a reload mid-request does not change its view.

use alloy::primitives::{Address, U256};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::blockchain::{
    parse_checksummed, serialize_checksummed, serialize_checksummed_opt, IssuerCredentials,
};
use crate::blockchain::units::format_ether;
use crate::config::IssuerSettings;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::workflow::{
    connection_status, lookup_token, network_stats, query_balance, ConnectionStatus,
    IssuanceRequest, IssuanceWorkflow, NetworkStats, TokenRecord, WorkflowError,
};

/// Address of the configured issuer, if one can be determined.
///
/// Prefers the configured public address; falls back to the key's address.
fn issuer_address(issuer: &IssuerSettings) -> Option<Address> {
    if !issuer.public_address.trim().is_empty() {
        return parse_checksummed(&issuer.public_address).ok();
    }
    if issuer.has_key() {
        return IssuerCredentials::from_private_key(&issuer.private_key, "")
            .ok()
            .map(|creds| creds.address());
    }
    None
}

pub async fn get_status(State(state): State<AppState>) -> Json<ConnectionStatus> {
    let inner = state.snapshot();
    Json(connection_status(inner.gateway.chain(), inner.config.chain.expected_chain_id).await)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<NetworkStats> {
    let inner = state.snapshot();
    let issuer = issuer_address(&inner.config.issuer);
    Json(network_stats(inner.gateway.chain(), issuer).await)
}

#[derive(Debug, Serialize)]
pub struct ContractInfo {
    pub address: String,
    pub configured: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub issuer_address: Option<Address>,
    pub issuer_balance_eth: Option<String>,
}

pub async fn get_contract(State(state): State<AppState>) -> Json<ContractInfo> {
    let inner = state.snapshot();
    let contract = &inner.config.contract;

    let binding = inner.gateway.bind(contract);
    let issuer = issuer_address(&inner.config.issuer);
    let issuer_balance_eth = match issuer {
        Some(address) => inner
            .gateway
            .chain()
            .balance(address)
            .await
            .ok()
            .map(format_ether),
        None => None,
    };

    Json(ContractInfo {
        address: contract.address.clone(),
        configured: !contract.address.trim().is_empty(),
        valid: binding.is_ok(),
        error: binding.err().map(|e| e.to_string()),
        issuer_address: issuer,
        issuer_balance_eth,
    })
}

/// Issuance body. The issuer key may be supplied per request; otherwise the
/// configured issuer signs.
#[derive(Deserialize)]
pub struct IssueCredentialBody {
    #[serde(flatten)]
    pub request: IssuanceRequest,
    #[serde(default)]
    pub issuer_private_key: Option<String>,
    #[serde(default)]
    pub issuer_address: Option<String>,
}

pub async fn issue_credential(
    State(state): State<AppState>,
    Json(body): Json<IssueCredentialBody>,
) -> Response {
    let inner = state.snapshot();
    let IssueCredentialBody {
        request,
        issuer_private_key,
        issuer_address,
    } = body;

    let mut workflow = IssuanceWorkflow::new();

    let issuer = match (issuer_private_key, issuer_address) {
        (Some(private_key), public_address) => IssuerSettings {
            private_key,
            public_address: public_address.unwrap_or_default(),
        },
        (None, Some(_)) => {
            return workflow
                .abort(WorkflowError::Validation(
                    "issuer_address requires issuer_private_key".to_string(),
                ))
                .into_response();
        }
        (None, None) => inner.config.issuer.clone(),
    };

    let validated = match workflow.validate(&request, &issuer) {
        Ok(validated) => validated,
        Err(outcome) => return outcome.into_response(),
    };
    drop(issuer);

    let registry = match inner.gateway.bind(&inner.config.contract) {
        Ok(registry) => registry,
        Err(e) => return workflow.abort(e.into()).into_response(),
    };

    workflow
        .submit(registry.as_ref(), validated)
        .await
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct CredentialCount {
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    pub count: u64,
}

pub async fn get_credential_count(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CredentialCount>, ApiError> {
    let holder = parse_checksummed(&address)?;

    let inner = state.snapshot();
    let registry = inner.gateway.bind(&inner.config.contract)?;
    let count = query_balance(registry.as_ref(), &address).await?;

    Ok(Json(CredentialCount {
        address: holder,
        count,
    }))
}

pub async fn get_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<Json<TokenRecord>, ApiError> {
    let token_id = U256::from_str(&token_id)
        .map_err(|_| WorkflowError::Validation(format!("invalid token id '{token_id}'")))?;

    let inner = state.snapshot();
    let registry = inner.gateway.bind(&inner.config.contract)?;
    Ok(Json(lookup_token(registry.as_ref(), token_id).await?))
}
