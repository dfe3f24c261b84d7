use newsprobe::analyzer::NewsAnalyzer;
use newsprobe::labels::TaskLabel;

/// Manual smoke test: runs one hardcoded example end-to-end against the
/// real inference API and prints the result.
#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let api_url = std::env::var("INFERENCE_API_URL")
        .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string());
    let api_key = std::env::var("HF_API_TOKEN").ok();

    let config: common::Config = toml::from_str(&format!(
        r#"
        [inference]
        api_url = "{api_url}"

        [models.category]
        id = "elozano/news-category"
        [models.fake]
        id = "elozano/news-fake"
        [models.clickbait]
        id = "elozano/news-clickbait"
        [models.ner]
        id = "dslim/bert-base-NER"
        "#
    ))
    .expect("inline config");

    println!("\n{}", "=".repeat(60));
    println!("Newsprobe smoke test");
    println!("Inference API: {}", api_url);
    println!("{}", "=".repeat(60));

    println!("\nProbing models (this may take a while on a cold start)...");
    let analyzer = match NewsAnalyzer::connect(&config, api_key).await {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("✗ Failed to construct analyzer: {:#}", e);
            std::process::exit(1);
        }
    };

    println!("\n[Example] headline = \"Lakers Won!\", no content");
    match analyzer.analyze("Lakers Won!", None).await {
        Ok(result) => {
            println!("✓ Success!");
            println!(
                "  {} Category: {} ({:.3})",
                result.category.emoji(),
                result.category.label.as_str(),
                result.category.score
            );
            println!(
                "  {} Clickbait: {} ({:.3})",
                result.clickbait.emoji(),
                result.clickbait.label.as_str(),
                result.clickbait.score
            );
            println!(
                "  {} Fake: {} ({:.3})",
                result.fake.emoji(),
                result.fake.label.as_str(),
                result.fake.score
            );
            println!("  Headline entities: {:?}", result.ner.headline);
            assert!(result.ner.content.is_none());
        }
        Err(e) => {
            eprintln!("✗ Failed: {:#}", e);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Smoke test completed");
    println!("{}", "=".repeat(60));
}
