//! Receipt validation for in-app purchases and subscriptions.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::*;
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct ReceiptRequest<'a> {
    receipt: &'a str,
    persist: bool,
}

#[derive(Serialize)]
struct PurchaseRequest<'a> {
    purchase: &'a str,
    persist: bool,
}

impl NakamaClient {
    async fn validate<B: Serialize, T>(&self, session: &Session, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        self.invoke(
            Method::POST,
            path,
            &QueryParams::new(),
            Some(body),
            session.into(),
        )
        .await
    }

    /// Validate an App Store receipt. `persist` records the purchase server side.
    pub async fn validate_purchase_apple(
        &self,
        session: &Session,
        receipt: &str,
        persist: bool,
    ) -> Result<ValidatePurchaseResponse> {
        self.validate(
            session,
            "/v2/iap/purchase/apple",
            &ReceiptRequest { receipt, persist },
        )
        .await
    }

    /// Validate a Google Play purchase (the JSON purchase payload).
    pub async fn validate_purchase_google(
        &self,
        session: &Session,
        purchase: &str,
        persist: bool,
    ) -> Result<ValidatePurchaseResponse> {
        self.validate(
            session,
            "/v2/iap/purchase/google",
            &PurchaseRequest { purchase, persist },
        )
        .await
    }

    pub async fn validate_purchase_huawei(
        &self,
        session: &Session,
        purchase: &str,
        signature: &str,
        persist: bool,
    ) -> Result<ValidatePurchaseResponse> {
        #[derive(Serialize)]
        struct Request<'a> {
            purchase: &'a str,
            signature: &'a str,
            persist: bool,
        }

        self.validate(
            session,
            "/v2/iap/purchase/huawei",
            &Request {
                purchase,
                signature,
                persist,
            },
        )
        .await
    }

    pub async fn validate_purchase_facebook_instant(
        &self,
        session: &Session,
        signed_request: &str,
        persist: bool,
    ) -> Result<ValidatePurchaseResponse> {
        #[derive(Serialize)]
        struct Request<'a> {
            signed_request: &'a str,
            persist: bool,
        }

        self.validate(
            session,
            "/v2/iap/purchase/facebookinstant",
            &Request {
                signed_request,
                persist,
            },
        )
        .await
    }

    pub async fn validate_subscription_apple(
        &self,
        session: &Session,
        receipt: &str,
        persist: bool,
    ) -> Result<ValidateSubscriptionResponse> {
        self.validate(
            session,
            "/v2/iap/subscription/apple",
            &ReceiptRequest { receipt, persist },
        )
        .await
    }

    pub async fn validate_subscription_google(
        &self,
        session: &Session,
        receipt: &str,
        persist: bool,
    ) -> Result<ValidateSubscriptionResponse> {
        self.validate(
            session,
            "/v2/iap/subscription/google",
            &ReceiptRequest { receipt, persist },
        )
        .await
    }

    /// Fetch the current user's subscription for a product.
    pub async fn get_subscription(
        &self,
        session: &Session,
        product_id: &str,
    ) -> Result<ValidatedSubscription> {
        let path = format!("/v2/iap/subscription/{}", encode_path_segment(product_id));
        self.invoke(
            Method::GET,
            &path,
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List the current user's validated subscriptions.
    pub async fn list_subscriptions(
        &self,
        session: &Session,
        limit: Option<i32>,
        cursor: Option<&str>,
    ) -> Result<SubscriptionList> {
        #[derive(Serialize)]
        struct Request<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            limit: Option<i32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            cursor: Option<&'a str>,
        }

        self.validate(session, "/v2/iap/subscription", &Request { limit, cursor })
            .await
    }
}
