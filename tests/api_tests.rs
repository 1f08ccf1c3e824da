mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{id_of, TestApp, API_TOKEN, BRANCH_NAME};
use gate_control::models::VisitEventType;

fn today_range() -> String {
    let today = Utc::now().date_naive();
    format!(
        "start={}&end={}",
        today - Duration::days(1),
        today + Duration::days(1)
    )
}

#[tokio::test]
async fn test_health_check_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.get_with_cookie("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = TestApp::new().await;

    let (status, body) = app.get_with_cookie("/api/people", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "ok": false, "error": "Unauthorized" }));

    let (status, _) = app.get_with_cookie("/api/people", Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get_with_cookie("/api/people", Some(API_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "data": [] }));
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let builder = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/vehicles")
        .header("authorization", format!("bearer {}", API_TOKEN));
    let (status, _) = app.send(builder, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_vehicle_crud_normalizes_plate() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/vehicles",
            json!({ "plate": "abc-1234", "model": "Fiorino", "color": " " }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plate"], "ABC1234");
    assert_eq!(body["data"]["model"], "Fiorino");
    assert!(body["data"]["color"].is_null());
    let id = id_of(&body["data"]);

    let (status, body) = app.post("/api/vehicles", json!({ "plate": "ABC 1234" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Esta placa já está cadastrada nesta empresa.");

    let (status, body) = app.post("/api/vehicles", json!({ "plate": "12" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);

    let (status, body) = app
        .put(
            &format!("/api/vehicles/{}", id),
            json!({ "plate": "abc1d23", "color": "Branco" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plate"], "ABC1D23");
    assert!(body["data"]["model"].is_null());

    let (status, body) = app.delete(&format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = app.delete(&format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_body_and_id() {
    let app = TestApp::new().await;

    let builder = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/vehicles")
        .header("authorization", format!("Bearer {}", API_TOKEN))
        .header("content-type", "application/json");
    let request = builder.body(axum::body::Body::from("{not json")).unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app.delete("/api/people/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identificador inválido.");
}

#[tokio::test]
async fn test_people_crud() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/people", json!({ "full_name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Nome completo é obrigatório.");

    let (status, body) = app
        .post(
            "/api/people",
            json!({
                "full_name": " Maria Souza ",
                "doc_number": "123.456.789-00",
                "phone": "(11) 98765-4321",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Maria Souza");
    assert_eq!(body["data"]["phone"], "11987654321");
    let id = id_of(&body["data"]);

    let (status, body) = app
        .post(
            "/api/people",
            json!({ "full_name": "Outra", "doc_number": "123.456.789-00" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Já existe uma pessoa cadastrada com este documento nesta empresa."
    );

    // Campos ausentes no cambian; null borra
    let (status, body) = app
        .put(
            &format!("/api/people/{}", id),
            json!({ "phone": null, "notes": "Motorista" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Maria Souza");
    assert_eq!(body["data"]["doc_number"], "123.456.789-00");
    assert!(body["data"]["phone"].is_null());
    assert_eq!(body["data"]["notes"], "Motorista");

    let (status, _) = app
        .put(&format!("/api/people/{}", Uuid::new_v4()), json!({ "notes": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/people/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/people").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_companies_are_isolated() {
    let app = TestApp::new().await;
    app.create_vehicle("ABC1234").await;

    let other = app.sibling(Uuid::new_v4(), app.branch_id);
    let (_, body) = other.get("/api/vehicles").await;
    assert_eq!(body["data"], json!([]));

    // La misma placa puede existir en otra empresa
    other.create_vehicle("ABC1234").await;
}

#[tokio::test]
async fn test_authorized_creates_person_and_vehicle() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/authorized",
            json!({ "plate": "xyz-9a87", "name": "João Lima", "department": "Logística" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["plate"], "XYZ9A87");
    assert_eq!(data["department"], "Logística");
    assert!(data["personId"].is_string());
    assert!(data["vehicleId"].is_string());
    let id = id_of(data);

    let (_, people) = app.get("/api/people").await;
    assert_eq!(people["data"][0]["full_name"], "João Lima");
    let (_, vehicles) = app.get("/api/vehicles").await;
    assert_eq!(vehicles["data"][0]["plate"], "XYZ9A87");

    let (status, body) = app
        .post(
            "/api/authorized",
            json!({ "plate": "XYZ9A87", "name": "Outro", "department": "TI" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Esta placa já está autorizada.");

    let (status, body) = app
        .post("/api/authorized", json!({ "plate": "XYZ9A87", "name": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Placa, nome e departamento são obrigatórios.");

    // Reutiliza la persona y el vehículo existentes
    let (status, body) = app
        .put(
            &format!("/api/authorized/{}", id),
            json!({ "plate": "XYZ9A87", "name": "João Lima", "department": "Compras" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["department"], "Compras");
    assert_eq!(body["data"]["personId"], data["personId"]);
    let (_, people) = app.get("/api/people").await;
    assert_eq!(people["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/api/authorized/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vehicle_people_links() {
    let app = TestApp::new().await;
    let vehicle_id = app.create_vehicle("ABC1234").await;
    let person_id = app.create_person("Carlos").await;
    let pair = json!({ "vehicleId": vehicle_id, "personId": person_id });

    let (status, body) = app.post("/api/vehicle-people", pair.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = app.post("/api/vehicle-people", pair.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Esta pessoa já está vinculada a este veículo.");

    let (status, body) = app
        .post("/api/vehicle-people", json!({ "vehicleId": vehicle_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "vehicleId e personId são obrigatórios.");

    let (status, _) = app
        .post(
            "/api/vehicle-people",
            json!({ "vehicleId": Uuid::new_v4(), "personId": person_id }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .get(&format!("/api/vehicle-people?vehicleId={}", vehicle_id))
        .await;
    assert_eq!(body["data"][0]["person"]["full_name"], "Carlos");

    let (status, _) = app.delete("/api/vehicle-people", Some(pair.clone())).await;
    assert_eq!(status, StatusCode::OK);
    // Desvincular algo inexistente también es ok
    let (status, _) = app.delete("/api/vehicle-people", Some(pair)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/vehicle-people").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_plate_lookup_shapes() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/lookup/plate/ABC1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "type": "none" }));

    let (_, body) = app.get("/api/lookup/plate/%20").await;
    assert_eq!(body, json!({ "type": "none" }));

    // Autorizada pero sin vehículo registrado
    let (_, created) = app
        .post(
            "/api/authorized",
            json!({ "plate": "XYZ9A87", "name": "Ana", "department": "TI" }),
        )
        .await;
    let vehicle_id = created["data"]["vehicleId"].as_str().unwrap().to_string();
    app.delete(&format!("/api/vehicles/{}", vehicle_id), None).await;

    let (_, body) = app.get("/api/lookup/plate/xyz-9a87").await;
    assert_eq!(body["type"], "authorized");
    assert_eq!(body["authorized"]["name"], "Ana");
    assert!(body.get("ok").is_none());

    // Registrado, con visitas y personas vinculadas
    let vehicle_id = app.create_vehicle("ABC1234").await;
    let person_id = app.create_person("Bruno").await;
    app.post(
        "/api/vehicle-people",
        json!({ "vehicleId": vehicle_id, "personId": person_id }),
    )
    .await;
    app.post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;

    let (_, body) = app.get("/api/lookup/plate/abc1234").await;
    assert_eq!(body["type"], "registered");
    assert_eq!(body["vehicle"]["plate"], "ABC1234");
    assert_eq!(body["people"][0]["full_name"], "Bruno");
    assert_eq!(body["visits"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_checkin_and_checkout_lifecycle() {
    let app = TestApp::new().await;
    let vehicle_id = app.create_vehicle("ABC1234").await;
    let person_id = app.create_person("Diego").await;

    let (status, body) = app
        .post(
            "/api/visits/checkin",
            json!({ "vehicleId": vehicle_id, "personId": person_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["visit"]["purpose"], "despacho");
    assert!(body["visit"]["checkout_time"].is_null());
    let visit_id = id_of(&body["visit"]);

    let (status, body) = app
        .post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Veículo já possui uma visita em aberto.");

    let (status, _) = app
        .post("/api/visits/checkin", json!({ "personId": Uuid::new_v4() }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, open) = app.get("/api/visits/open").await;
    let open = open["data"].as_array().unwrap().clone();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["vehicle"]["plate"], "ABC1234");
    assert_eq!(open[0]["person"]["full_name"], "Diego");
    assert_eq!(open[0]["branch_name"], BRANCH_NAME);

    // Otra filial de la misma empresa no puede cerrarla
    let other_branch = app.sibling(app.company_id, Some(Uuid::new_v4()));
    let (status, body) = other_branch
        .post(&format!("/api/visits/{}/checkout", visit_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Visita não pertence à organização atual.");

    let (status, body) = app
        .post(&format!("/api/visits/{}/checkout", visit_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["visit"]["checkout_time"].is_string());

    let (status, body) = app
        .post(&format!("/api/visits/{}/checkout", visit_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Visita já foi encerrada.");

    let (status, _) = app
        .post(&format!("/api/visits/{}/checkout", Uuid::new_v4()), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let events: Vec<_> = app
        .store
        .events()
        .await
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(events, vec![VisitEventType::Checkin, VisitEventType::Checkout]);

    // Cerrada la visita, el vehículo puede volver a entrar
    let (status, _) = app
        .post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_same_vehicle_open_in_other_branch() {
    let app = TestApp::new().await;
    let vehicle_id = app.create_vehicle("ABC1234").await;
    let other_branch = app.sibling(app.company_id, Some(Uuid::new_v4()));

    let (status, _) = app
        .post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = other_branch
        .post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, open) = other_branch.get("/api/visits/open").await;
    assert_eq!(open["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_visits_require_branch() {
    let app = TestApp::without_branch().await;

    let (status, body) = app.post("/api/visits/checkin", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);

    let (status, _) = app.get("/api/visits/open").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // La consulta por placa sigue funcionando, sin visitas
    app.create_vehicle("ABC1234").await;
    let (status, body) = app.get("/api/lookup/plate/ABC1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visits"], json!([]));
}

#[tokio::test]
async fn test_history_pagination() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/visits/history").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Parâmetros obrigatórios: start e end (YYYY-MM-DD)."
    );

    let (status, body) = app
        .get(&format!("/api/visits/history?{}", today_range()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 1);

    for _ in 0..12 {
        let (status, _) = app.post("/api/visits/checkin", json!({})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app
        .get(&format!("/api/visits/history?{}&pageSize=1", today_range()))
        .await;
    assert_eq!(body["pageSize"], 5);
    assert_eq!(body["total"], 12);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (_, body) = app
        .get(&format!("/api/visits/history?{}&pageSize=500&page=x", today_range()))
        .await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 50);
    assert_eq!(body["data"].as_array().unwrap().len(), 12);

    let (_, body) = app
        .get(&format!("/api/visits/history?{}&pageSize=5&page=3", today_range()))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Fuera del período
    let (_, body) = app
        .get("/api/visits/history?start=2020-01-01&end=2020-01-31")
        .await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_history_matches_checkin_day() {
    let app = TestApp::new().await;
    let (_, body) = app.post("/api/visits/checkin", json!({})).await;
    let visit_id = id_of(&body["visit"]);
    let past = Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap();
    assert!(app.store.set_checkin_time(visit_id, past).await);

    let (_, body) = app
        .get("/api/visits/history?start=2020-01-15&end=2020-01-15")
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(id_of(&body["data"][0]), visit_id);
}

#[tokio::test]
async fn test_history_matches_checkout_day() {
    let app = TestApp::new().await;
    let (_, body) = app.post("/api/visits/checkin", json!({})).await;
    let visit_id = id_of(&body["visit"]);
    let past = Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap();
    assert!(app.store.set_checkin_time(visit_id, past).await);

    // Entrada antes del período, salida dentro
    let (_, body) = app
        .get(&format!("/api/visits/history?{}", today_range()))
        .await;
    assert_eq!(body["total"], 0);

    let (status, _) = app
        .post(&format!("/api/visits/{}/checkout", visit_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/visits/history?{}", today_range()))
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(id_of(&body["data"][0]), visit_id);
    assert!(body["data"][0]["checkout_time"].is_string());
}

#[tokio::test]
async fn test_history_page_past_the_end_is_empty() {
    let app = TestApp::new().await;
    app.post("/api/visits/checkin", json!({})).await;

    let (status, body) = app
        .get(&format!(
            "/api/visits/history?{}&page=9223372036854775807",
            today_range()
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["total"], 1);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn test_visit_pdf_export() {
    let app = TestApp::new().await;
    let vehicle_id = app.create_vehicle("ABC1234").await;
    let (_, body) = app
        .post("/api/visits/checkin", json!({ "vehicleId": vehicle_id }))
        .await;
    let visit_id = id_of(&body["visit"]);

    let (status, body) = app
        .call(Method::POST, &format!("/api/pdf/visit/{}", visit_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    let url = body["url"].as_str().unwrap();
    assert!(url.contains(&format!("visits/{}.pdf", visit_id)));

    let object = app
        .storage
        .object(&format!("visits/{}.pdf", visit_id))
        .await
        .unwrap();
    assert_eq!(object.content_type, "application/pdf");
    assert!(object.bytes.starts_with(b"%PDF"));

    let events = app.store.events().await;
    let exported = events
        .iter()
        .find(|e| e.event_type == VisitEventType::PdfExported)
        .unwrap();
    assert_eq!(exported.visit_id, Some(visit_id));
    assert_eq!(exported.meta["url"], url);

    let (status, _) = app
        .call(Method::POST, &format!("/api/pdf/visit/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_pdf_export() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(Method::POST, "/api/pdf/history?start=2025-01-01", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Período vacío también genera el PDF
    let (status, body) = app
        .call(Method::POST, "/api/pdf/history?start=2025-01-01&end=2025-01-31", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["url"]
        .as_str()
        .unwrap()
        .contains("reports/history_2025-01-01_2025-01-31.pdf"));
    assert!(app
        .storage
        .object("reports/history_2025-01-01_2025-01-31.pdf")
        .await
        .is_some());

    let events = app.store.events().await;
    let exported = events
        .iter()
        .find(|e| e.event_type == VisitEventType::HistoryPdfExported)
        .unwrap();
    assert_eq!(exported.visit_id, None);
    assert_eq!(exported.meta["start"], "2025-01-01");
    assert_eq!(exported.meta["end"], "2025-01-31");
}
