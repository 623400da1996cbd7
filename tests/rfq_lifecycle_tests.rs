//! Integration tests for the RFQ lifecycle: submission with line-item
//! validation, the quote/accept/reject transitions, party-scoped
//! visibility, and the dashboard statistics that aggregate it all.

use anyhow::Result;
use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, body_json};

struct Rfq {
    app: TestApp,
    supplier: String,
    buyer: String,
    supplier_id: String,
    product_id: String,
}

/// One supplier with a single product (MOQ 5), one buyer.
async fn setup() -> Result<Rfq> {
    let app = TestApp::spawn().await?;
    let supplier = app
        .register("Nusantara Aroma", "supplier@x.co.id", "supplier")
        .await?;
    let buyer = app.register("Parfum Jakarta", "buyer@x.co.id", "buyer").await?;

    let supplier_id = body_json(app.get("/api/v1/auth/me", Some(&supplier)).await).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let product = app
        .send_json(
            "POST",
            "/api/v1/dashboard/products",
            Some(&supplier),
            json!({
                "name": "Patchouli Oil",
                "price_idr": 850000,
                "unit": "kg",
                "stock_qty": 100,
                "min_order_qty": 5,
            }),
        )
        .await;
    let product_id = body_json(product).await["id"].as_str().unwrap().to_string();

    Ok(Rfq {
        app,
        supplier,
        buyer,
        supplier_id,
        product_id,
    })
}

fn inquiry_payload(rfq: &Rfq, message: &str, quantity: i32) -> serde_json::Value {
    json!({
        "supplier_id": rfq.supplier_id,
        "message": message,
        "items": [{ "product_id": rfq.product_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn submission_without_message_creates_nothing() -> Result<()> {
    let rfq = setup().await?;

    let response = rfq
        .app
        .send_json(
            "POST",
            "/api/v1/inquiries",
            Some(&rfq.buyer),
            inquiry_payload(&rfq, "   ", 10),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");

    // No inquiry row was persisted by the failed attempt
    let count = aromara::models::Inquiry::find().count(&rfq.app.db).await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn submission_below_moq_is_rejected() -> Result<()> {
    let rfq = setup().await?;

    let response = rfq
        .app
        .send_json(
            "POST",
            "/api/v1/inquiries",
            Some(&rfq.buyer),
            inquiry_payload(&rfq, "Need a sample batch", 2),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("minimum order"));

    Ok(())
}

#[tokio::test]
async fn only_buyers_submit_inquiries() -> Result<()> {
    let rfq = setup().await?;

    let response = rfq
        .app
        .send_json(
            "POST",
            "/api/v1/inquiries",
            Some(&rfq.supplier),
            inquiry_payload(&rfq, "Need patchouli", 10),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn full_lifecycle_quote_then_accept() -> Result<()> {
    let rfq = setup().await?;

    // Buyer submits
    let created = rfq
        .app
        .send_json(
            "POST",
            "/api/v1/inquiries",
            Some(&rfq.buyer),
            inquiry_payload(&rfq, "Need 10kg monthly for Q3", 10),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["items"][0]["product_name"], "Patchouli Oil");
    let id = created["id"].as_str().unwrap().to_string();

    // Supplier sees it on the dashboard
    let incoming = body_json(
        rfq.app
            .get("/api/v1/dashboard/inquiries", Some(&rfq.supplier))
            .await,
    )
    .await;
    assert_eq!(incoming.as_array().unwrap().len(), 1);

    // Supplier quotes
    let quoted = rfq
        .app
        .send_json(
            "PUT",
            &format!("/api/v1/dashboard/inquiries/{}", id),
            Some(&rfq.supplier),
            json!({
                "status": "quoted",
                "quoted_price_idr": 8200000,
                "quote_notes": "Includes COA",
            }),
        )
        .await;
    assert_eq!(quoted.status(), StatusCode::OK);
    let quoted = body_json(quoted).await;
    assert_eq!(quoted["status"], "quoted");
    assert_eq!(quoted["quoted_price_idr"], 8_200_000);

    // Buyer accepts
    let accepted = rfq
        .app
        .send_json(
            "PUT",
            &format!("/api/v1/account/inquiries/{}", id),
            Some(&rfq.buyer),
            json!({ "status": "accepted" }),
        )
        .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(body_json(accepted).await["status"], "accepted");

    // Terminal state: the supplier can no longer reject
    let too_late = rfq
        .app
        .send_json(
            "PUT",
            &format!("/api/v1/dashboard/inquiries/{}", id),
            Some(&rfq.supplier),
            json!({ "status": "rejected" }),
        )
        .await;
    assert_eq!(too_late.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn illegal_transitions_conflict() -> Result<()> {
    let rfq = setup().await?;

    let created = body_json(
        rfq.app
            .send_json(
                "POST",
                "/api/v1/inquiries",
                Some(&rfq.buyer),
                inquiry_payload(&rfq, "Need patchouli", 10),
            )
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Buyer cannot accept a pending inquiry
    let premature = rfq
        .app
        .send_json(
            "PUT",
            &format!("/api/v1/account/inquiries/{}", id),
            Some(&rfq.buyer),
            json!({ "status": "accepted" }),
        )
        .await;
    assert_eq!(premature.status(), StatusCode::CONFLICT);

    // A quote without a price is a validation error
    let priceless = rfq
        .app
        .send_json(
            "PUT",
            &format!("/api/v1/dashboard/inquiries/{}", id),
            Some(&rfq.supplier),
            json!({ "status": "quoted" }),
        )
        .await;
    assert_eq!(priceless.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn visibility_is_scoped_to_the_two_parties() -> Result<()> {
    let rfq = setup().await?;
    let stranger = rfq
        .app
        .register("Bali Scents", "stranger@x.co.id", "buyer")
        .await?;

    let created = body_json(
        rfq.app
            .send_json(
                "POST",
                "/api/v1/inquiries",
                Some(&rfq.buyer),
                inquiry_payload(&rfq, "Need patchouli", 10),
            )
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    for cookie in [&rfq.buyer, &rfq.supplier] {
        let response = rfq
            .app
            .get(&format!("/api/v1/inquiries/{}", id), Some(cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let hidden = rfq
        .app
        .get(&format!("/api/v1/inquiries/{}", id), Some(&stranger))
        .await;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    // The stranger's inquiry list stays empty
    let listing = body_json(
        rfq.app
            .get("/api/v1/account/inquiries", Some(&stranger))
            .await,
    )
    .await;
    assert!(listing.as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn status_filters_and_dashboard_stats() -> Result<()> {
    let rfq = setup().await?;

    let first = body_json(
        rfq.app
            .send_json(
                "POST",
                "/api/v1/inquiries",
                Some(&rfq.buyer),
                inquiry_payload(&rfq, "First inquiry", 5),
            )
            .await,
    )
    .await;
    rfq.app
        .send_json(
            "POST",
            "/api/v1/inquiries",
            Some(&rfq.buyer),
            inquiry_payload(&rfq, "Second inquiry", 6),
        )
        .await;

    rfq.app
        .send_json(
            "PUT",
            &format!(
                "/api/v1/dashboard/inquiries/{}",
                first["id"].as_str().unwrap()
            ),
            Some(&rfq.supplier),
            json!({ "status": "quoted", "quoted_price_idr": 1000000 }),
        )
        .await;

    let pending = body_json(
        rfq.app
            .get(
                "/api/v1/dashboard/inquiries?status=pending",
                Some(&rfq.supplier),
            )
            .await,
    )
    .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let unknown_filter = rfq
        .app
        .get(
            "/api/v1/dashboard/inquiries?status=haggling",
            Some(&rfq.supplier),
        )
        .await;
    assert_eq!(unknown_filter.status(), StatusCode::BAD_REQUEST);

    let stats = body_json(
        rfq.app
            .get("/api/v1/dashboard/stats", Some(&rfq.supplier))
            .await,
    )
    .await;
    assert_eq!(stats["product_count"], 1);
    assert_eq!(stats["active_product_count"], 1);
    assert_eq!(stats["inquiry_counts"]["pending"], 1);
    assert_eq!(stats["inquiry_counts"]["quoted"], 1);
    assert_eq!(stats["total_inquiries"], 2);

    Ok(())
}
