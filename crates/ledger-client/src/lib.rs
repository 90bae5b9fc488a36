//! ledger-client: typed REST client for the BONK ledger service
//!
//! Shapes requests and responses for the balance/transaction backend; no
//! business logic beyond error mapping. Service error messages are carried
//! verbatim so the UI can surface them unchanged.

pub mod api;

use bonk_core::{
    Balance, BonkAmount, DbonkAmount, LedgerConfig, LedgerError, PowerDownStatus, WalletAddress,
    WithdrawalId, WithdrawalRequest,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use api::{CancelReceipt, Ledger};

/// Timeout for ledger API calls. Long enough for settlement-side lookups,
/// short enough to avoid perpetual spinners.
const LEDGER_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Result type for ledger client operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error body the ledger service returns on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestWithdrawBody<'a> {
    amount: BonkAmount,
    destination_address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmWithdrawBody<'a> {
    fee_payment_tx_hash: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartPowerDownBody {
    dbonk_amount: DbonkAmount,
}

/// HTTP client for the ledger service
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    config: LedgerConfig,
}

impl LedgerClient {
    /// Create a new client for the configured ledger service.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("bonkpad")
            .timeout(LEDGER_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Unreachable {
                url: format!("{}: {}", config.base_url, e),
            })?;

        Ok(Self { http, config })
    }

    /// Get the current ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.auth_token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.config.auth_token)
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = self
            .authed(req)
            .send()
            .await
            .map_err(|e| LedgerError::Unreachable {
                url: format!("{}: {}", self.config.base_url, e),
            })?;

        read_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.get(self.url(path))).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }
}

/// Parse a ledger response, mapping non-2xx bodies to [`LedgerError::Api`]
/// with the service's message intact.
async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(LedgerError::Unauthenticated);
    }

    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("Ledger service returned HTTP {}", status.as_u16()),
        };
        return Err(LedgerError::Api { message });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| LedgerError::Parse(e.to_string()))
}

/// Empty-object response for operations that return no data
#[derive(Debug, Deserialize)]
struct Empty {}

impl Ledger for LedgerClient {
    async fn request_withdraw(
        &self,
        amount: BonkAmount,
        destination: &WalletAddress,
    ) -> Result<WithdrawalRequest> {
        tracing::debug!(amount, destination = %destination, "Submitting withdrawal request");
        self.post_json(
            "/wallet/withdrawals",
            &RequestWithdrawBody {
                amount,
                destination_address: destination.as_str(),
            },
        )
        .await
    }

    async fn confirm_withdraw(&self, id: &WithdrawalId, fee_payment_tx_hash: &str) -> Result<()> {
        tracing::debug!(withdrawal_id = %id, "Confirming fee payment");
        let _: Empty = self
            .post_json(
                &format!("/wallet/withdrawals/{}/confirm", id),
                &ConfirmWithdrawBody {
                    fee_payment_tx_hash,
                },
            )
            .await?;
        Ok(())
    }

    async fn cancel_withdraw(&self, id: &WithdrawalId) -> Result<CancelReceipt> {
        tracing::debug!(withdrawal_id = %id, "Cancelling withdrawal");
        self.send(
            self.http
                .post(self.url(&format!("/wallet/withdrawals/{}/cancel", id))),
        )
        .await
    }

    async fn list_withdraw_requests(&self) -> Result<Vec<WithdrawalRequest>> {
        self.get_json("/wallet/withdrawals").await
    }

    async fn start_power_down(&self, dbonk_amount: DbonkAmount) -> Result<PowerDownStatus> {
        tracing::debug!(dbonk_amount, "Starting power-down");
        self.post_json("/wallet/powerdown", &StartPowerDownBody { dbonk_amount })
            .await
    }

    async fn cancel_power_down(&self) -> Result<()> {
        tracing::debug!("Cancelling power-down");
        let _: Empty = self
            .send(self.http.delete(self.url("/wallet/powerdown")))
            .await?;
        Ok(())
    }

    async fn get_power_down_status(&self) -> Result<Option<PowerDownStatus>> {
        // The service returns JSON `null` when no power-down is active.
        self.get_json("/wallet/powerdown").await
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.get_json("/wallet/balance").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = LedgerClient::new(LedgerConfig {
            base_url: "https://api.bonk.fun/".to_string(),
            auth_token: String::new(),
        })
        .unwrap();

        assert_eq!(
            client.url("/wallet/balance"),
            "https://api.bonk.fun/wallet/balance"
        );
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":"insufficient_balance","message":"Insufficient balance for withdrawal"}"#,
        )
        .unwrap();
        assert_eq!(body.message, "Insufficient balance for withdrawal");
    }

    #[test]
    fn test_cancel_receipt_wire_format() {
        let receipt: CancelReceipt = serde_json::from_str(r#"{"refundedAmount":250.0}"#).unwrap();
        assert_eq!(receipt.refunded_amount, 250.0);
    }

    #[test]
    fn test_power_down_null_maps_to_none() {
        let status: Option<PowerDownStatus> = serde_json::from_str("null").unwrap();
        assert!(status.is_none());
    }

    #[test]
    fn test_request_body_wire_format() {
        let body = RequestWithdrawBody {
            amount: 100.0,
            destination_address: "So1anaDest1nation1111111111111111111111111111",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 100.0);
        assert_eq!(
            json["destinationAddress"],
            "So1anaDest1nation1111111111111111111111111111"
        );
    }
}
