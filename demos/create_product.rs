use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use ox_storefront::forms::testing::ScriptedUploader;
use ox_storefront::forms::{run_all, FileHandle};
use ox_storefront::product::{ChoiceSource, MemoryProductStore, SubmitOutcome};
use ox_storefront::{ProductForm, ProductFormConfig, StaticCatalog};

#[derive(Parser, Debug)]
#[command(author, version, about = "Walks through creating a product with the product form", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "demos/forms.yaml")]
    config: String,
    /// Writes the final form markup to this file.
    #[arg(long)]
    html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match ProductFormConfig::from_path(Path::new(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = StaticCatalog;
    let mut form = ProductForm::create(&catalog, &config);
    let store = MemoryProductStore::new();

    if let SubmitOutcome::Invalid(errors) = form.submit(&store).await? {
        info!("Empty form rejected: {}", errors);
    }

    {
        let (fields, state) = form.split_mut();
        fields.name.input(state, "Linen shirt");
        fields.description.input(state, "Relaxed fit shirt in washed linen.");
        if !fields.price.key_down(state, "-") {
            info!("Negative prices cannot be typed");
        }
        fields.price.input(state, "29.9");
        fields.stock.input(state, "40");
        if let Some(m) = catalog.sizes().iter().find(|s| s.label == "M") {
            fields.size.toggle(state, m);
        }
    }

    if let Err(rejection) = form.select_thumbnail(FileHandle::new("poster.png", 2_000_000, "image/png")) {
        warn!("{}", rejection);
    }

    let uploader = ScriptedUploader::new("https://cdn.example.com/products").with_delay(Duration::from_millis(120));
    let thumbnail = form.select_thumbnail(FileHandle::new("front.png", 420_000, "image/png"))?;
    let (images, rejected) = form.add_images(vec![
        FileHandle::new("side.jpg", 310_000, "image/jpeg"),
        FileHandle::new("notes.pdf", 12_000, "application/pdf"),
    ]);
    for rejection in rejected {
        warn!("{}", rejection);
    }

    let mut tasks = images;
    tasks.insert(0, thumbnail);
    for outcome in run_all(tasks, &uploader).await {
        info!("Upload finished: {:?}", outcome);
    }

    match form.submit(&store).await? {
        SubmitOutcome::Saved(id) => info!("Product saved as {}", id),
        SubmitOutcome::Invalid(errors) => warn!("Product not saved: {}", errors),
    }

    if let Some(path) = cli.html {
        std::fs::write(&path, form.to_html())?;
        info!("Form markup written to {:?}", path);
    }
    for (id, payload) in store.saved() {
        println!("{}: {}", id, serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}
