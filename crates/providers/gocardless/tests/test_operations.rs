#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use core_lib::{token::TokenSet, AuthSession, OAuthConfig};
    use gocardless::{
        models::{
            BillingRequest, BillingRequestFlow, BillingRequestFlowLinks, BillingRequestLinks,
            BillingRequestStatus, Mandate, MandateStatus, NewBillingRequest, NewBillingRequestFlow,
        },
        ApiError, BillingApi, Environment, GoCardlessConnect, Lookup, Operations, OperationsError,
    };

    #[derive(Clone, Copy, Default, PartialEq)]
    enum Remote {
        #[default]
        Healthy,
        NotFound,
        Down,
    }

    #[derive(Default)]
    struct FakeApi {
        remote: Remote,
        mandate_link: Option<String>,
        created: Mutex<Vec<NewBillingRequest>>,
        flows: Mutex<Vec<NewBillingRequestFlow>>,
        fetched_billing_requests: Mutex<Vec<String>>,
        fetched_mandates: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn failure(&self) -> Option<ApiError> {
            match self.remote {
                Remote::Healthy => None,
                Remote::NotFound => Some(ApiError::Api {
                    status: 404,
                    error_type: "invalid_api_usage".to_string(),
                    message: "Resource not found".to_string(),
                    request_id: None,
                    details: Vec::new(),
                }),
                Remote::Down => Some(ApiError::Api {
                    status: 503,
                    error_type: "gocardless".to_string(),
                    message: "Service unavailable".to_string(),
                    request_id: None,
                    details: Vec::new(),
                }),
            }
        }
    }

    #[async_trait::async_trait]
    impl BillingApi for FakeApi {
        async fn create_billing_request(
            &self,
            params: &NewBillingRequest,
        ) -> Result<BillingRequest, ApiError> {
            if let Some(err) = self.failure() {
                return Err(err);
            }
            self.created.lock().unwrap().push(params.clone());
            Ok(BillingRequest {
                id: "BRQ001".to_string(),
                status: BillingRequestStatus::Pending,
                created_at: None,
                currency: Some(params.payment_request.currency.clone()),
                links: BillingRequestLinks::default(),
            })
        }

        async fn create_billing_request_flow(
            &self,
            params: &NewBillingRequestFlow,
        ) -> Result<BillingRequestFlow, ApiError> {
            self.flows.lock().unwrap().push(params.clone());
            Ok(BillingRequestFlow {
                id: "BRF001".to_string(),
                authorisation_url: "https://pay-sandbox.gocardless.com/flow/BRF001".to_string(),
                redirect_uri: Some(params.redirect_uri.clone()),
                exit_uri: Some(params.exit_uri.clone()),
                created_at: None,
                expires_at: None,
                links: BillingRequestFlowLinks {
                    billing_request: Some(params.links.billing_request.clone()),
                },
            })
        }

        async fn get_billing_request(&self, id: &str) -> Result<BillingRequest, ApiError> {
            self.fetched_billing_requests
                .lock()
                .unwrap()
                .push(id.to_string());
            if let Some(err) = self.failure() {
                return Err(err);
            }
            Ok(BillingRequest {
                id: id.to_string(),
                status: BillingRequestStatus::Fulfilled,
                created_at: None,
                currency: Some("GBP".to_string()),
                links: BillingRequestLinks {
                    mandate_request_mandate: self.mandate_link.clone(),
                    ..Default::default()
                },
            })
        }

        async fn get_mandate(&self, id: &str) -> Result<Mandate, ApiError> {
            self.fetched_mandates.lock().unwrap().push(id.to_string());
            if let Some(err) = self.failure() {
                return Err(err);
            }
            Ok(Mandate {
                id: id.to_string(),
                status: MandateStatus::Active,
                reference: Some("REF-1".to_string()),
                created_at: None,
                scheme: Some("bacs".to_string()),
                next_possible_charge_date: None,
            })
        }
    }

    fn unauthenticated_session() -> AuthSession<GoCardlessConnect> {
        AuthSession::new(GoCardlessConnect::new(
            OAuthConfig::new("cid", "secret"),
            Environment::Sandbox,
        ))
    }

    fn authenticated_session() -> AuthSession<GoCardlessConnect> {
        unauthenticated_session().with_token(TokenSet::new("access_token", "OR123"))
    }

    fn operations(api: FakeApi) -> Operations<FakeApi> {
        Operations::with_api(&authenticated_session(), api).unwrap()
    }

    #[test]
    fn test_unauthenticated_session_is_rejected() {
        for environment in [Environment::Sandbox, Environment::Live] {
            let result = Operations::connect(&unauthenticated_session(), environment);
            assert!(matches!(result, Err(OperationsError::NotAuthenticated)));
        }

        let result = Operations::with_api(&unauthenticated_session(), FakeApi::default());
        assert!(matches!(result, Err(OperationsError::NotAuthenticated)));
    }

    #[test]
    fn test_token_without_organisation_is_rejected() {
        let mut token = TokenSet::new("access_token", "OR123");
        token.organisation_id = None;
        let session = unauthenticated_session().with_token(token);

        let result = Operations::connect(&session, Environment::Sandbox);
        assert!(matches!(result, Err(OperationsError::NotAuthenticated)));
    }

    #[test]
    fn test_connect_with_authenticated_session() {
        let operations = Operations::connect(&authenticated_session(), Environment::Live).unwrap();
        assert_eq!(operations.api().base_url(), "https://api.gocardless.com");
        assert!(operations.billing_request_id().is_none());
        assert!(operations.mandate_id().is_none());
    }

    #[tokio::test]
    async fn test_create_billing_request_and_flow() {
        let mut ops = operations(FakeApi::default());

        let flow = ops
            .create_billing_request_and_flow(1000, "GBP", Some("Test payment"))
            .await
            .unwrap();

        assert_eq!(flow.authorisation_url, "https://pay-sandbox.gocardless.com/flow/BRF001");
        assert_eq!(ops.billing_request_id(), Some("BRQ001"));

        let created = ops.api().created.lock().unwrap();
        let payment = &created[0].payment_request;
        assert_eq!(payment.amount, 1000);
        assert_eq!(payment.currency, "GBP");
        assert_eq!(payment.description.as_deref(), Some("Test payment"));
        assert_eq!(created[0].mandate_request.currency, "GBP");

        let flows = ops.api().flows.lock().unwrap();
        assert_eq!(flows[0].redirect_uri, "https://example.com/redirect");
        assert_eq!(flows[0].exit_uri, "https://example.com/exit");
        assert_eq!(flows[0].links.billing_request, "BRQ001");
    }

    #[tokio::test]
    async fn test_mandate_currency_stays_gbp() {
        let mut ops = operations(FakeApi::default());

        ops.create_billing_request_and_flow(2500, "EUR", None)
            .await
            .unwrap();

        let created = ops.api().created.lock().unwrap();
        assert_eq!(created[0].payment_request.currency, "EUR");
        assert_eq!(created[0].mandate_request.currency, "GBP");
    }

    #[tokio::test]
    async fn test_custom_flow_urls() {
        let mut ops = operations(FakeApi::default())
            .with_flow_urls("https://shop.example/done", "https://shop.example/cancel");

        ops.create_billing_request_and_flow(100, "GBP", None)
            .await
            .unwrap();

        let flows = ops.api().flows.lock().unwrap();
        assert_eq!(flows[0].redirect_uri, "https://shop.example/done");
        assert_eq!(flows[0].exit_uri, "https://shop.example/cancel");
    }

    #[tokio::test]
    async fn test_creation_failure_propagates() {
        let mut ops = operations(FakeApi {
            remote: Remote::Down,
            ..Default::default()
        });

        let result = ops.create_billing_request_and_flow(1000, "GBP", None).await;

        assert!(matches!(result, Err(OperationsError::Api(_))));
        assert!(ops.billing_request_id().is_none());
        assert!(ops.api().flows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_billing_request_without_id_fails() {
        let mut ops = operations(FakeApi::default());

        let result = ops.get_billing_request(None).await;

        assert!(matches!(result, Err(OperationsError::MissingBillingRequestId)));
        assert!(ops.api().fetched_billing_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_billing_request_uses_cached_id() {
        let mut ops = operations(FakeApi::default());
        ops.create_billing_request_and_flow(1000, "GBP", None)
            .await
            .unwrap();

        let billing_request = ops.get_billing_request(None).await.unwrap().ready().unwrap();

        assert_eq!(billing_request.id, "BRQ001");
        assert_eq!(
            *ops.api().fetched_billing_requests.lock().unwrap(),
            vec!["BRQ001".to_string()]
        );
    }

    #[tokio::test]
    async fn test_explicit_id_overrides_cached_id() {
        let mut ops = operations(FakeApi::default());
        ops.create_billing_request_and_flow(1000, "GBP", None)
            .await
            .unwrap();

        ops.get_billing_request(Some("BRQ999")).await.unwrap();

        assert_eq!(
            *ops.api().fetched_billing_requests.lock().unwrap(),
            vec!["BRQ999".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mandate_link_is_recorded() {
        let mut ops = operations(FakeApi {
            mandate_link: Some("MD123".to_string()),
            ..Default::default()
        });

        let lookup = ops.get_billing_request(Some("BRQ001")).await.unwrap();

        assert!(lookup.is_ready());
        assert_eq!(ops.mandate_id(), Some("MD123"));
    }

    #[tokio::test]
    async fn test_missing_mandate_link_keeps_mandate_unset() {
        let mut ops = operations(FakeApi::default());

        ops.get_billing_request(Some("BRQ001")).await.unwrap();

        assert!(ops.mandate_id().is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_raised() {
        let mut ops = operations(FakeApi {
            remote: Remote::Down,
            mandate_link: Some("MD123".to_string()),
            ..Default::default()
        });

        let lookup = ops.get_billing_request(Some("BRQ001")).await.unwrap();

        assert!(matches!(lookup, Lookup::Failed(_)));
        assert!(lookup.ready().is_none());
        assert!(ops.mandate_id().is_none());
    }

    #[tokio::test]
    async fn test_not_found_is_not_ready() {
        let mut ops = operations(FakeApi {
            remote: Remote::NotFound,
            ..Default::default()
        });

        let lookup = ops.get_billing_request(Some("BRQ001")).await.unwrap();
        assert!(matches!(lookup, Lookup::NotReady));

        let lookup = ops.get_mandate("MD123").await.unwrap();
        assert!(matches!(lookup, Lookup::NotReady));
    }

    #[tokio::test]
    async fn test_get_mandate() {
        let ops = operations(FakeApi::default());

        let mandate = ops.get_mandate("MD123").await.unwrap().ready().unwrap();

        assert_eq!(mandate.id, "MD123");
        assert_eq!(mandate.status, MandateStatus::Active);
        assert_eq!(mandate.scheme.as_deref(), Some("bacs"));
    }

    #[tokio::test]
    async fn test_blank_mandate_id_is_rejected_locally() {
        let ops = operations(FakeApi::default());

        for id in ["", "   "] {
            let result = ops.get_mandate(id).await;
            assert!(matches!(result, Err(OperationsError::InvalidMandateId)));
        }
        assert!(ops.api().fetched_mandates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mandate_remote_failure_is_not_raised() {
        let ops = operations(FakeApi {
            remote: Remote::Down,
            ..Default::default()
        });

        let lookup = ops.get_mandate("MD123").await.unwrap();

        assert!(matches!(lookup, Lookup::Failed(ApiError::Api { status: 503, .. })));
    }
}
