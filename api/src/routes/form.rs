use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::get;
use food_vision::NutritionRecord;

use super::{MAX_UPLOAD_BYTES, read_image_field};
use crate::AppState;
use crate::error::AppError;

pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(upload_page).post(analyze_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn upload_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let image = read_image_field(&mut multipart).await?;
    let records = state.pipeline.run(image).await?;

    let html = match records.first() {
        Some(record) => render_nutrition_table(record),
        None => String::from("No nutritional information found."),
    };

    Ok(Html(html))
}

// Fixed nutrition-facts layout; when the lookup returns several records
// only the first is rendered.
fn render_nutrition_table(record: &NutritionRecord) -> String {
    format!(
        r#"<table border="1" style="width: 100%; border-collapse: collapse;">
    <tr><th colspan="4" style="text-align: center;"><b>Nutrition Facts</b></th></tr>
    <tr><td colspan="4" style="text-align: center;"><b>Food Name: {name}</b></td></tr>
    <tr>
        <td style="text-align: left;"><b>Calories</b></td><td style="text-align: right;">{calories}</td>
        <td style="text-align: left;"><b>Serving Size (g)</b></td><td style="text-align: right;">{serving_size}</td>
    </tr>
    <tr>
        <td style="text-align: left;"><b>Total Fat (g)</b></td><td style="text-align: right;">{fat_total}</td>
        <td style="text-align: left;"><b>Saturated Fat (g)</b></td><td style="text-align: right;">{fat_saturated}</td>
    </tr>
    <tr>
        <td style="text-align: left;"><b>Protein (g)</b></td><td style="text-align: right;">{protein}</td>
        <td style="text-align: left;"><b>Sodium (mg)</b></td><td style="text-align: right;">{sodium}</td>
    </tr>
    <tr>
        <td style="text-align: left;"><b>Potassium (mg)</b></td><td style="text-align: right;">{potassium}</td>
        <td style="text-align: left;"><b>Cholesterol (mg)</b></td><td style="text-align: right;">{cholesterol}</td>
    </tr>
    <tr>
        <td style="text-align: left;"><b>Total Carbohydrates (g)</b></td><td style="text-align: right;">{carbohydrates}</td>
        <td style="text-align: left;"><b>Fiber (g)</b></td><td style="text-align: right;">{fiber}</td>
    </tr>
    <tr>
        <td style="text-align: left;"><b>Sugar (g)</b></td><td style="text-align: right;">{sugar}</td>
        <td></td><td></td>
    </tr>
</table>
"#,
        name = record.name,
        calories = record.calories,
        serving_size = record.serving_size_g,
        fat_total = record.fat_total_g,
        fat_saturated = record.fat_saturated_g,
        protein = record.protein_g,
        sodium = record.sodium_mg,
        potassium = record.potassium_mg,
        cholesterol = record.cholesterol_mg,
        carbohydrates = record.carbohydrates_total_g,
        fiber = record.fiber_g,
        sugar = record.sugar_g,
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::nutrition::tests::{
        FixedClassifier, StubLookup, banana_record, stub_state, upload_request,
    };

    #[test]
    fn table_renders_the_fixed_nutrition_facts_layout() {
        let html = render_nutrition_table(&banana_record());

        assert!(html.contains("Nutrition Facts"));
        assert!(html.contains("Food Name: banana"));
        assert!(html.contains("89"));
        assert!(html.contains("Total Carbohydrates (g)"));
        assert!(html.contains("22.8"));
    }

    #[tokio::test]
    async fn upload_page_serves_the_form() {
        let app = form_routes().with_state(stub_state(
            FixedClassifier("banana"),
            StubLookup::Records(vec![]),
        ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("<form"));
        assert!(page.contains("Food Identification and Nutrition Info"));
    }

    #[tokio::test]
    async fn recognized_food_renders_a_table_with_the_first_record() {
        let mut second = banana_record();
        second.name = String::from("plantain");

        let app = form_routes().with_state(stub_state(
            FixedClassifier("banana"),
            StubLookup::Records(vec![banana_record(), second]),
        ));

        let response = app.oneshot(upload_request("/", "file")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("banana"));
        assert!(page.contains("89"));
        assert!(!page.contains("plantain"));
    }

    #[tokio::test]
    async fn unrecognized_food_renders_the_plain_message() {
        let app = form_routes().with_state(stub_state(
            FixedClassifier("banana"),
            StubLookup::Records(vec![]),
        ));

        let response = app.oneshot(upload_request("/", "file")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"No nutritional information found.");
    }
}
