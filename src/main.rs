use std::sync::Arc;

use selectui::{DocumentFormat, DropdownConfig, DropdownField, FormUI, StaticCatalog};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEMO_CATALOG: &str = r#"{
  "environment": [
    {"value": "dev", "label": "Development"},
    {"value": "staging", "label": "Staging"},
    {"value": "prod", "label": "Production"}
  ],
  "region": [
    {"value": "us-east", "label": "US East"},
    {"value": "eu-west", "label": "EU West"},
    {"value": "ap-south", "label": "AP South"}
  ]
}"#;

fn main() -> AppResult<()> {
    let catalog: Arc<StaticCatalog> =
        Arc::new(StaticCatalog::parse_str(DEMO_CATALOG, DocumentFormat::Json)?);

    let environment = DropdownField::new(
        DropdownConfig::new()
            .with_lookup_key("environment")
            .with_description("Where this service will be deployed.")
            .with_required(true),
        catalog.clone(),
    );
    let region = DropdownField::new(
        DropdownConfig::new()
            .with_lookup_key("region")
            .with_placeholder("--Any region--"),
        catalog,
    );

    let selections = FormUI::new()
        .with_title("Deployment target")
        .add_field("environment", "Environment", environment)
        .add_field("region", "Region", region)
        .run()?;

    println!("{}", serde_json::to_string_pretty(&selections)?);
    Ok(())
}
