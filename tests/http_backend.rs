//! HttpBackend against a canned HTTP responder on a loopback socket.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use treatment_predictor_lib::{
    ClientConfig, ClientError, FormSnapshot, HttpBackend, OptionCategory, PredictionBackend, ResultView, Stage,
};

/// Serves exactly one request with `status` and `body`, handing the raw request text back.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        let _ = tx.send(request);
    });

    (base_url, rx)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|v| v.trim().parse::<usize>().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn backend(base_url: &str) -> HttpBackend {
    let config = ClientConfig::default().with_base_url(base_url).unwrap();
    HttpBackend::new(config).unwrap()
}

fn valid_form() -> FormSnapshot {
    FormSnapshot::new("45")
        .with_stage(Stage::IB)
        .with_cancer_category("Ductal")
        .with_diagnosis_method("Biopsy")
        .with_treatment_category("Surgery")
}

#[tokio::test]
async fn predict_posts_form_fields() -> anyhow::Result<()> {
    let (base_url, request) = serve_once("200 OK", r#"{"prediction": "Chemotherapy"}"#).await;
    let backend = backend(&base_url);

    let prediction = backend.predict(&valid_form().validate()?).await?;
    assert_eq!(prediction, "Chemotherapy");

    let request = request.await?;
    assert!(request.starts_with("POST /predict_treatment HTTP/1.1"), "{request}");
    assert!(request
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert!(request.contains("age_at_diagnosis=45"));
    assert!(request.contains("ajcc_pathologic_stage=2"));
    assert!(request.contains("cancer_category=Ductal"));
    assert!(request.contains("diagnosis_method=Biopsy"));
    assert!(request.contains("treatment_category=Surgery"));
    Ok(())
}

#[tokio::test]
async fn padded_category_reaches_the_wire_unchanged() -> anyhow::Result<()> {
    let (base_url, request) = serve_once("200 OK", r#"{"prediction": "Chemotherapy"}"#).await;
    let form = valid_form().with_cancer_category(" Ductal ");

    backend(&base_url).predict(&form.validate()?).await?;

    let request = request.await?;
    assert!(request.contains("cancer_category=+Ductal+"), "{request}");
    Ok(())
}

#[tokio::test]
async fn predict_error_payload_is_a_backend_error() -> anyhow::Result<()> {
    let (base_url, _request) = serve_once("200 OK", r#"{"error": "'age_at_diagnosis'"}"#).await;

    let err = backend(&base_url)
        .predict(&valid_form().validate()?)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Backend(ref msg) if msg == "'age_at_diagnosis'"));
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_reported() -> anyhow::Result<()> {
    let (base_url, _request) = serve_once("500 Internal Server Error", r#"{"message": "boom"}"#).await;

    let err = backend(&base_url)
        .option_list(OptionCategory::TreatmentCategories)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn option_list_keeps_server_order() -> anyhow::Result<()> {
    let (base_url, request) =
        serve_once("200 OK", r#"{"cancer_categories": ["Lobular", "Ductal", "Mixed"]}"#).await;

    let options = backend(&base_url)
        .option_list(OptionCategory::CancerCategories)
        .await?;
    assert_eq!(options, vec!["Lobular", "Ductal", "Mixed"]);

    let request = request.await?;
    assert!(request.starts_with("GET /get_cancer_categories HTTP/1.1"), "{request}");
    Ok(())
}

#[tokio::test]
async fn stage_label_sends_query() -> anyhow::Result<()> {
    let (base_url, request) = serve_once("200 OK", r#"{"stage_label": "Stage IIIC"}"#).await;

    let label = backend(&base_url).stage_label(9).await?;
    assert_eq!(label, "Stage IIIC");

    let request = request.await?;
    assert!(request.starts_with("GET /get_stage_label?stage=9 HTTP/1.1"), "{request}");
    Ok(())
}

#[tokio::test]
async fn hung_service_times_out() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}/", listener.local_addr()?);
    tokio::spawn(async move {
        // Accept and never answer.
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = ClientConfig::default()
        .with_base_url(&base_url)?
        .with_env(|key| (key == "PREDICTOR_TIMEOUT_SECS").then(|| "1".to_string()))?;
    let controller = treatment_predictor_lib::http_controller(config)?;

    let view = controller.submit(&valid_form()).await;
    assert_eq!(view, Some(ResultView::RemoteError));
    Ok(())
}

#[tokio::test]
async fn full_round_trip_through_controller() -> anyhow::Result<()> {
    let (base_url, _request) = serve_once("200 OK", r#"{"prediction": "Needs Treatment/Therapy"}"#).await;
    let config = ClientConfig::default().with_base_url(&base_url)?;
    let controller = treatment_predictor_lib::http_controller(config)?;

    let view = controller.submit(&valid_form()).await.expect("latest submission is applied");
    assert_eq!(view.to_html(), "<h2>Needs Treatment/Therapy</h2>");
    Ok(())
}
