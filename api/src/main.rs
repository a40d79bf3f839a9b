mod error;
mod routes;

use std::sync::Arc;

use food_vision::{NutritionClient, Pipeline, VitClassifier};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

fn env_or(name: &str, default: &str) -> String {
    dotenvy::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key =
        dotenvy::var("NUTRITION_API_KEY").expect("NUTRITION_API_KEY env var must be set");
    let model_path = env_or("CLASSIFIER_MODEL_PATH", "models/vit-base-patch16-224.onnx");
    let labels_path = env_or("CLASSIFIER_LABELS_PATH", "models/imagenet_labels.txt");
    let api_port = env_or("API_PORT", "8000");
    let form_port = env_or("FORM_PORT", "7860");

    let classifier = VitClassifier::load(&model_path, &labels_path)?;
    tracing::info!(%model_path, "classifier model loaded");

    let pipeline = Arc::new(Pipeline::new(
        Arc::new(classifier),
        Arc::new(NutritionClient::new(api_key)),
    ));
    let state = AppState { pipeline };

    let api_router = routes::nutrition::nutrition_routes().with_state(state.clone());
    let form_router = routes::form::form_routes().with_state(state);

    let api_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{api_port}")).await?;
    tracing::info!("nutrition endpoint listening on {}", api_listener.local_addr()?);
    let form_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{form_port}")).await?;
    tracing::info!("upload form listening on {}", form_listener.local_addr()?);

    // Both surfaces serve for the process lifetime; exit only once both stop.
    let api_server = tokio::spawn(async move { axum::serve(api_listener, api_router).await });
    let form_server = tokio::spawn(async move { axum::serve(form_listener, form_router).await });

    let (api_result, form_result) = tokio::try_join!(api_server, form_server)?;
    api_result?;
    form_result?;

    Ok(())
}
